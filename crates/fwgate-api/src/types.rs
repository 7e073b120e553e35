//! Request and response types for the Linode v4 firewall endpoints.
//!
//! Field names are snake_case on the wire, so no renaming is needed.
//! Rule-level types keep unmodelled fields in `extra` so a fetched rule
//! set can be submitted back without losing anything.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Pagination ───────────────────────────────────────────────────────

/// Page envelope returned by every Linode list endpoint.
///
/// `page` is 1-based. A missing `pages` is treated as a single page.
/// The echoed `page` is informational; callers track the page they asked
/// for and pass it to [`Page::is_last`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
    #[serde(default)]
    pub results: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// `true` when no page follows `requested`.
    pub fn is_last(&self, requested: u32) -> bool {
        requested >= self.pages
    }
}

// ── Firewalls ────────────────────────────────────────────────────────

/// Firewall overview, from `GET /networking/firewalls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firewall {
    pub id: u64,
    pub label: String,
    /// One of: `enabled`, `disabled`, `deleted`.
    #[serde(default)]
    pub status: Option<String>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Rules ────────────────────────────────────────────────────────────

/// What a rule (or a direction's default policy) does with matching traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    Accept,
    Drop,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "ACCEPT",
            Self::Drop => "DROP",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Ipencap,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Icmp => "ICMP",
            Self::Ipencap => "IPENCAP",
        })
    }
}

/// Address set a rule matches against. CIDR literals are passed through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Vec<String>>,
}

impl RuleAddresses {
    /// Total number of literals across both families.
    pub fn len(&self) -> usize {
        self.ipv4.as_ref().map_or(0, Vec::len) + self.ipv6.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single inbound or outbound rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub action: RuleAction,
    pub protocol: Protocol,
    /// Port specifier, e.g. `"22"`, `"80,443"`, `"8000-8080"`. Absent for ICMP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Left out of the body when the fetched rule had none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<RuleAddresses>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FirewallRule {
    /// Number of address literals, zero when the rule has no `addresses`.
    pub fn address_count(&self) -> usize {
        self.addresses.as_ref().map_or(0, RuleAddresses::len)
    }

    /// `true` if the rule carries exactly this label.
    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }
}

/// Full rule set, from `GET /networking/firewalls/{id}/rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub inbound: Vec<FirewallRule>,
    #[serde(default)]
    pub outbound: Vec<FirewallRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_policy: Option<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_policy: Option<RuleAction>,
    /// Catch-all (`version`, `fingerprint`, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Body of `PUT /networking/firewalls/{id}/rules`.
///
/// The endpoint replaces the whole rule set, so both directions are
/// always sent even when only one changed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RulesUpdate<'a> {
    pub inbound: &'a [FirewallRule],
    pub outbound: &'a [FirewallRule],
}

impl<'a> From<&'a RuleSet> for RulesUpdate<'a> {
    fn from(rules: &'a RuleSet) -> Self {
        Self {
            inbound: &rules.inbound,
            outbound: &rules.outbound,
        }
    }
}
