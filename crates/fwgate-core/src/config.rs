// ── Sync configuration ──
//
// Built by the binary from the config file, environment and flags.
// Core never reads files or env vars itself.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::rules::AllowRule;

/// Page size used when scanning the firewall list.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API root, e.g. `https://api.linode.com/v4`.
    pub api_url: Url,
    /// Personal access token with `firewall:read_write` scope.
    pub token: SecretString,
    /// Label of the firewall to update.
    pub firewall_label: String,
    /// Page size for the label scan.
    pub page_size: u32,
    pub timeout: Duration,
    /// The rule this tool owns.
    pub rule: AllowRule,
}
