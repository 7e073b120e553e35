// ── Sync pipeline ──
//
// One method per remote step. The steps are sequential and each runs at
// most once per invocation; any error ends the run.

use fwgate_api::{FirewallClient, RuleSet, RulesUpdate, TransportConfig};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::{CoreError, Step};
use crate::rules::{Plan, apply_allow_rule};

/// Drives the label lookup, rule fetch, transform and submit steps
/// against a single firewall.
pub struct Syncer {
    client: FirewallClient,
    config: SyncConfig,
}

impl Syncer {
    /// Build the HTTP client from `config` (bearer token, timeout).
    pub fn new(config: SyncConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = FirewallClient::from_token(config.api_url.as_str(), &config.token, &transport)
            .map_err(|e| CoreError::at(Step::ListFirewalls, e, config.timeout.as_secs()))?;
        Ok(Self { client, config })
    }

    /// Use a pre-built client (tests, custom transports).
    pub fn with_client(client: FirewallClient, config: SyncConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn fail(&self, step: Step, err: fwgate_api::Error) -> CoreError {
        CoreError::at(step, err, self.config.timeout.as_secs())
    }

    // ── Step 1: label → ID ───────────────────────────────────────────

    /// Scan the firewall list page by page until one carries the
    /// configured label. Stops on the first match, or once the requested
    /// page number reaches the server's `pages` count.
    pub async fn resolve_firewall_id(&self) -> Result<u64, CoreError> {
        let label = self.config.firewall_label.as_str();
        let mut page = 1;

        loop {
            let listing = self
                .client
                .list_firewalls(page, self.config.page_size)
                .await
                .map_err(|e| self.fail(Step::ListFirewalls, e))?;
            debug!(page, pages = listing.pages, count = listing.data.len(), "scanned firewall page");

            if let Some(fw) = listing.data.iter().find(|fw| fw.label == label) {
                info!(id = fw.id, label, "resolved firewall");
                return Ok(fw.id);
            }

            if listing.is_last(page) {
                return Err(CoreError::FirewallNotFound {
                    label: label.to_owned(),
                    pages: page,
                });
            }
            page += 1;
        }
    }

    // ── Step 2: fetch ────────────────────────────────────────────────

    pub async fn fetch_rules(&self, firewall_id: u64) -> Result<RuleSet, CoreError> {
        let rules = self
            .client
            .get_rules(firewall_id)
            .await
            .map_err(|e| self.fail(Step::FetchRules, e))?;
        debug!(
            firewall_id,
            inbound = rules.inbound.len(),
            outbound = rules.outbound.len(),
            "fetched rules"
        );
        Ok(rules)
    }

    // ── Step 3: transform ────────────────────────────────────────────

    pub fn plan(&self, current: RuleSet) -> Plan {
        apply_allow_rule(current, &self.config.rule)
    }

    // ── Step 4: submit ───────────────────────────────────────────────

    /// Replace the firewall's rule set with both directions of `rules`.
    pub async fn submit(&self, firewall_id: u64, rules: &RuleSet) -> Result<(), CoreError> {
        self.client
            .update_rules(firewall_id, &RulesUpdate::from(rules))
            .await
            .map_err(|e| self.fail(Step::UpdateRules, e))?;
        info!(firewall_id, "rules updated");
        Ok(())
    }
}
