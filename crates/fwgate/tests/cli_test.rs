//! Integration tests for the `fwgate` binary.
//!
//! Argument parsing, help output and completions run without a server;
//! the end-to-end cases point `--api-url` at a wiremock instance.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fwgate` binary with env isolation.
///
/// Clears credential env vars and points config lookups into `home` so
/// tests never touch the user's real configuration.
fn fwgate_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fwgate");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("FWGATE_CONFIG", home.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("LINODE_TOKEN")
        .env_remove("FWGATE_TOKEN")
        .env_remove("FWGATE_TOKEN_ENV")
        .env_remove("FWGATE_API_URL")
        .env_remove("FWGATE_TIMEOUT")
        .env_remove("FWGATE_PAGE_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(home: &std::path::Path, body: &str) {
    std::fs::write(home.join("config.toml"), body).unwrap();
}

const SMALL_RULE: &str = r#"
[rule]
addresses = ["140.82.112.0/20"]
"#;

fn managed_rule(ports: &str) -> Value {
    json!({
        "label": "allow-github-actions",
        "action": "ACCEPT",
        "protocol": "TCP",
        "ports": ports,
        "addresses": { "ipv4": ["140.82.112.0/20"] }
    })
}

async fn mount_firewalls(server: &MockServer, data: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/networking/firewalls"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": data, "page": 1, "pages": 1, "results": 1
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_rules(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/networking/firewalls/77/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inbound": [
                { "action": "ACCEPT", "protocol": "TCP", "ports": "22", "label": "keep",
                  "addresses": { "ipv4": ["0.0.0.0/0"] } },
                { "action": "ACCEPT", "protocol": "TCP", "ports": "80,443",
                  "label": "allow-github-actions",
                  "addresses": { "ipv4": ["140.82.112.0/20"] } }
            ],
            "outbound": [
                { "action": "ACCEPT", "protocol": "TCP", "ports": "22",
                  "label": "allow-github-actions",
                  "addresses": { "ipv4": ["1.2.3.4/32"] } }
            ],
            "inbound_policy": "DROP",
            "outbound_policy": "DROP"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    fwgate_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Linode Cloud Firewall")
            .and(predicate::str::contains("apply"))
            .and(predicate::str::contains("plan")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    fwgate_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fwgate"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    fwgate_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = fwgate_cmd(home.path()).arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults_redacts_token() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "token = \"very-secret\"\n");

    fwgate_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("rpc-infra")
                .and(predicate::str::contains("allow-github-actions"))
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("very-secret").not()),
        );
}

#[test]
fn test_config_init_refuses_overwrite() {
    let home = tempfile::tempdir().unwrap();

    fwgate_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home.path().join("config.toml").exists());

    fwgate_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("already exists"));

    fwgate_cmd(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_path_honours_flag() {
    let home = tempfile::tempdir().unwrap();
    let custom = home.path().join("elsewhere.toml");

    fwgate_cmd(home.path())
        .args(["config", "path", "--config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_apply_without_token_fails() {
    let home = tempfile::tempdir().unwrap();

    fwgate_cmd(home.path())
        .arg("apply")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No API token"));
}

#[test]
fn test_invalid_page_size_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), "page_size = 0\n");

    fwgate_cmd(home.path())
        .args(["apply", "--token", "t"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("page_size"));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_end_to_end() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), SMALL_RULE);
    let server = MockServer::start().await;

    mount_firewalls(&server, json!([{ "id": 77, "label": "rpc-infra" }]), 1).await;
    mount_rules(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/networking/firewalls/77/rules"))
        .and(body_json(json!({
            "inbound": [
                { "action": "ACCEPT", "protocol": "TCP", "ports": "22", "label": "keep",
                  "addresses": { "ipv4": ["0.0.0.0/0"] } }
            ],
            "outbound": [managed_rule("80,443")]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let output = fwgate_cmd(home.path())
        .args(["--token", "t", "--api-url", &server.uri()])
        .output()
        .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "apply failed:\n{text}");
    assert!(text.contains("Found firewall ID: 77"), "{text}");
    assert!(text.contains("Original inbound rules: 2"), "{text}");
    assert!(text.contains("Final inbound rules: 1"), "{text}");
    assert!(text.contains("Final outbound rules: 1"), "{text}");
    assert!(text.contains("Adding 1 addresses"), "{text}");
    assert!(text.contains("Success!"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_ports_override() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), SMALL_RULE);
    let server = MockServer::start().await;

    mount_firewalls(&server, json!([{ "id": 77, "label": "rpc-infra" }]), 1).await;
    mount_rules(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/networking/firewalls/77/rules"))
        .and(body_json(json!({
            "inbound": [
                { "action": "ACCEPT", "protocol": "TCP", "ports": "22", "label": "keep",
                  "addresses": { "ipv4": ["0.0.0.0/0"] } }
            ],
            "outbound": [managed_rule("443")]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    fwgate_cmd(home.path())
        .args(["apply", "--token", "t", "--ports", "443", "--api-url", &server.uri()])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_label_not_found_skips_fetch_and_update() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    mount_firewalls(&server, json!([{ "id": 1, "label": "other" }]), 1).await;
    mount_rules(&server, 0).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = fwgate_cmd(home.path())
        .args(["apply", "--token", "t", "--api-url", &server.uri()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not found"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_failure_exits_one_with_server_text() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), SMALL_RULE);
    let server = MockServer::start().await;

    mount_firewalls(&server, json!([{ "id": 77, "label": "rpc-infra" }]), 1).await;
    mount_rules(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/networking/firewalls/77/rules"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "field": "outbound", "reason": "Too many rules" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = fwgate_cmd(home.path())
        .args(["apply", "--token", "t", "--api-url", &server.uri()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Too many rules"), "{stdout}");
    assert!(!stdout.contains("Success!"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_json_does_not_submit() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path(), SMALL_RULE);
    let server = MockServer::start().await;

    mount_firewalls(&server, json!([{ "id": 77, "label": "rpc-infra" }]), 1).await;
    mount_rules(&server, 1).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = fwgate_cmd(home.path())
        .args(["plan", "-o", "json", "--token", "t", "--api-url", &server.uri()])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let plan: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["rules"]["outbound"], json!([managed_rule("80,443")]));
    assert_eq!(plan["changes"]["removed_inbound"], json!(1));
    assert_eq!(plan["changes"]["removed_outbound"], json!(1));
}
