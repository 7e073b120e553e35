//! The rule-set transform.
//!
//! Pure and infallible: no I/O happens here. Given the current rule set
//! and the [`AllowRule`] this tool owns, [`apply_allow_rule`] produces the
//! rule set to submit. Rules without the marker label pass through in
//! their original order, untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fwgate_api::{FirewallRule, Protocol, RuleAction, RuleAddresses, RuleSet};

/// Label identifying the rule this tool manages.
pub const DEFAULT_MARKER_LABEL: &str = "allow-github-actions";

pub const DEFAULT_PORTS: &str = "80,443";

/// GitHub web/API/git ranges plus the Azure-hosted addresses GitHub
/// Actions runners egress through.
pub const GITHUB_ADDRESSES: &[&str] = &[
    "20.26.156.215/32",
    "4.208.26.197/32",
    "4.225.11.194/32",
    "20.217.135.5/32",
    "20.199.39.232/32",
    "20.29.134.23/32",
    "20.233.83.145/32",
    "20.175.192.147/32",
    "20.200.245.247/32",
    "20.27.177.113/32",
    "20.207.73.82/32",
    "4.228.31.150/32",
    "4.237.22.38/32",
    "20.87.245.0/32",
    "20.205.243.166/32",
    "20.201.28.151/32",
    "20.26.156.210/32",
    "4.208.26.200/32",
    "4.225.11.201/32",
    "20.217.135.0/32",
    "20.199.39.228/32",
    "20.29.134.17/32",
    "20.233.83.146/32",
    "20.175.192.149/32",
    "20.200.245.245/32",
    "20.27.177.116/32",
    "20.207.73.85/32",
    "4.228.31.149/32",
    "4.237.22.34/32",
    "20.87.245.6/32",
    "20.205.243.168/32",
    "20.201.28.148/32",
    "143.55.64.0/20",
    "140.82.112.0/20",
    "185.199.108.0/22",
    "192.30.252.0/22",
];

// ── Allow rule ───────────────────────────────────────────────────────

/// Settings for the single outbound rule this tool owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowRule {
    /// Marker label. Any existing rule with this label is replaced.
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default = "default_protocol")]
    pub protocol: Protocol,

    /// Port specifier passed through verbatim, e.g. `"80,443"`.
    #[serde(default = "default_ports")]
    pub ports: String,

    /// IPv4 CIDR literals. Not validated.
    #[serde(default = "default_addresses")]
    pub addresses: Vec<String>,
}

fn default_label() -> String {
    DEFAULT_MARKER_LABEL.into()
}
fn default_protocol() -> Protocol {
    Protocol::Tcp
}
fn default_ports() -> String {
    DEFAULT_PORTS.into()
}
fn default_addresses() -> Vec<String> {
    GITHUB_ADDRESSES.iter().map(|s| (*s).to_owned()).collect()
}

impl Default for AllowRule {
    fn default() -> Self {
        Self {
            label: default_label(),
            protocol: default_protocol(),
            ports: default_ports(),
            addresses: default_addresses(),
        }
    }
}

impl AllowRule {
    /// Build the wire rule: always `ACCEPT`, addresses under `ipv4`.
    pub fn to_rule(&self) -> FirewallRule {
        FirewallRule {
            action: RuleAction::Accept,
            protocol: self.protocol,
            ports: Some(self.ports.clone()),
            label: Some(self.label.clone()),
            description: None,
            addresses: Some(RuleAddresses {
                ipv4: Some(self.addresses.clone()),
                ipv6: None,
            }),
            extra: HashMap::new(),
        }
    }
}

// ── Transform ────────────────────────────────────────────────────────

/// Rule counts before and after the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleChanges {
    pub inbound_before: usize,
    pub outbound_before: usize,
    pub inbound_after: usize,
    pub outbound_after: usize,
    /// Stale marker rules dropped from inbound.
    pub removed_inbound: usize,
    /// Stale marker rules dropped from outbound.
    pub removed_outbound: usize,
    /// Addresses carried by the appended rule.
    pub addresses: usize,
}

/// The rule set to submit, plus what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub rules: RuleSet,
    pub changes: RuleChanges,
}

/// Strip every `allow.label` rule from both directions, then append the
/// freshly built rule to outbound.
///
/// Inbound never receives the rule; a marker rule found there is removed
/// as cleanup. Policies and unmodelled fields of `current` carry over.
pub fn apply_allow_rule(current: RuleSet, allow: &AllowRule) -> Plan {
    let inbound_before = current.inbound.len();
    let outbound_before = current.outbound.len();

    let RuleSet {
        inbound,
        outbound,
        inbound_policy,
        outbound_policy,
        extra,
    } = current;

    let inbound = without_label(inbound, &allow.label);
    let mut outbound = without_label(outbound, &allow.label);

    let removed_inbound = inbound_before - inbound.len();
    let removed_outbound = outbound_before - outbound.len();

    outbound.push(allow.to_rule());

    let changes = RuleChanges {
        inbound_before,
        outbound_before,
        inbound_after: inbound.len(),
        outbound_after: outbound.len(),
        removed_inbound,
        removed_outbound,
        addresses: allow.addresses.len(),
    };

    Plan {
        rules: RuleSet {
            inbound,
            outbound,
            inbound_policy,
            outbound_policy,
            extra,
        },
        changes,
    }
}

fn without_label(rules: Vec<FirewallRule>, label: &str) -> Vec<FirewallRule> {
    rules.into_iter().filter(|r| !r.has_label(label)).collect()
}
