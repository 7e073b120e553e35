//! Configuration for fwgate.
//!
//! TOML file + `FWGATE_*` environment layering, token resolution
//! (env + keyring + plaintext), and translation to
//! `fwgate_core::SyncConfig`. The binary layers its own flags on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fwgate_core::{AllowRule, SyncConfig};

/// Keyring service name; entries are keyed `<firewall label>/token`.
pub const KEYRING_SERVICE: &str = "fwgate";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for firewall '{label}'")]
    NoCredentials { label: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Page size for the firewall label scan.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// API token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default)]
    pub firewall: FirewallSection,

    /// The managed outbound rule.
    #[serde(default)]
    pub rule: AllowRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            timeout: default_timeout(),
            token: None,
            token_env: None,
            firewall: FirewallSection::default(),
            rule: AllowRule::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirewallSection {
    /// Label of the firewall to update.
    #[serde(default = "default_firewall_label")]
    pub label: String,
}

impl Default for FirewallSection {
    fn default() -> Self {
        Self {
            label: default_firewall_label(),
        }
    }
}

fn default_api_url() -> String {
    fwgate_api::client::DEFAULT_BASE_URL.into()
}
fn default_page_size() -> u32 {
    fwgate_core::config::DEFAULT_PAGE_SIZE
}
fn default_timeout() -> u64 {
    30
}
fn default_firewall_label() -> String {
    "rpc-infra".into()
}

impl Config {
    /// Copy with the plaintext token masked, for display.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.token.is_some() {
            cfg.token = Some(REDACTED.into());
        }
        cfg
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fwgate", "fwgate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fwgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FWGATE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the API token from the credential chain (no CLI flag step).
pub fn resolve_token(cfg: &Config) -> Result<SecretString, ConfigError> {
    resolve_token_with(cfg, keyring_token)
}

fn keyring_token(label: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{label}/token"))
        .ok()?
        .get_password()
        .ok()
}

fn resolve_token_with(
    cfg: &Config,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Configured env var name → env var lookup
    if let Some(ref env_name) = cfg.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring(&cfg.firewall.label) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref token) = cfg.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        label: cfg.firewall.label.clone(),
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Translate a loaded `Config` + resolved token into a `SyncConfig`.
///
/// This is the single boundary where file config crosses into core types.
pub fn to_sync_config(cfg: &Config, token: SecretString) -> Result<SyncConfig, ConfigError> {
    let api_url: url::Url = cfg.api_url.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {}", cfg.api_url),
    })?;

    if cfg.page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    if cfg.firewall.label.is_empty() {
        return Err(ConfigError::Validation {
            field: "firewall.label".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(SyncConfig {
        api_url,
        token,
        firewall_label: cfg.firewall.label.clone(),
        page_size: cfg.page_size,
        timeout: Duration::from_secs(cfg.timeout),
        rule: cfg.rule.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.api_url, "https://api.linode.com/v4");
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.firewall.label, "rpc-infra");
        assert_eq!(cfg.rule, AllowRule::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
page_size = 25

[firewall]
label = "edge"

[rule]
ports = "443"
addresses = ["198.51.100.0/24"]
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.firewall.label, "edge");
        assert_eq!(cfg.rule.ports, "443");
        assert_eq!(cfg.rule.addresses, vec!["198.51.100.0/24".to_string()]);
        assert_eq!(cfg.rule.label, "allow-github-actions");
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.firewall.label = "ci-egress".into();
        cfg.timeout = 10;
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.firewall.label, "ci-egress");
        assert_eq!(loaded.timeout, 10);
        assert!(loaded.token.is_none());
    }

    #[test]
    fn redacted_masks_token() {
        let cfg = Config {
            token: Some("secret".into()),
            ..Config::default()
        };
        assert_eq!(cfg.redacted().token.as_deref(), Some(REDACTED));
        assert!(Config::default().redacted().token.is_none());
    }

    #[test]
    fn token_chain_prefers_keyring_over_plaintext() {
        let cfg = Config {
            token: Some("plain".into()),
            token_env: Some("FWGATE_TEST_UNSET_TOKEN_VAR".into()),
            ..Config::default()
        };

        let from_keyring =
            resolve_token_with(&cfg, |label| Some(format!("ring-{label}"))).unwrap();
        assert_eq!(from_keyring.expose_secret(), "ring-rpc-infra");

        let from_file = resolve_token_with(&cfg, |_| None).unwrap();
        assert_eq!(from_file.expose_secret(), "plain");
    }

    #[test]
    fn token_chain_exhausted() {
        let err = resolve_token_with(&Config::default(), |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref label } if label == "rpc-infra"));
    }

    #[test]
    fn sync_config_translation() {
        let cfg = Config {
            api_url: "http://127.0.0.1:8080/v4".into(),
            timeout: 7,
            ..Config::default()
        };

        let sync = to_sync_config(&cfg, SecretString::from("t".to_string())).unwrap();
        assert_eq!(sync.api_url.as_str(), "http://127.0.0.1:8080/v4");
        assert_eq!(sync.timeout, Duration::from_secs(7));
        assert_eq!(sync.firewall_label, "rpc-infra");
        assert_eq!(sync.page_size, 100);
    }

    #[test]
    fn sync_config_rejects_bad_values() {
        let bad_url = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            to_sync_config(&bad_url, SecretString::from("t".to_string())),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        let zero_page = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(matches!(
            to_sync_config(&zero_page, SecretString::from("t".to_string())),
            Err(ConfigError::Validation { ref field, .. }) if field == "page_size"
        ));
    }
}
