//! Command handlers.

pub mod apply;
pub mod config_cmd;
pub mod plan;

use fwgate_core::{Plan, Syncer};

use crate::error::CliError;
use crate::output::Progress;

/// Steps shared by `apply` and `plan`: resolve, fetch, transform.
async fn prepare(syncer: &Syncer, progress: Progress) -> Result<(u64, Plan), CliError> {
    let label = &syncer.config().firewall_label;

    progress.line(&format!("Searching for firewall with label: {label}..."));
    let firewall_id = syncer.resolve_firewall_id().await?;
    progress.line(&format!("Found firewall ID: {firewall_id}"));

    progress.line(&format!("Fetching rules for firewall ID: {firewall_id}..."));
    let current = syncer.fetch_rules(firewall_id).await?;

    let plan = syncer.plan(current);
    let changes = &plan.changes;

    progress.line(&format!("Original inbound rules: {}", changes.inbound_before));
    progress.line(&format!("Original outbound rules: {}", changes.outbound_before));
    if changes.removed_inbound > 0 {
        progress.line(&format!(
            "Removing {} stale rule(s) from inbound.",
            changes.removed_inbound
        ));
    }
    if changes.removed_outbound > 0 {
        progress.line(&format!(
            "Replacing {} existing rule(s) in outbound.",
            changes.removed_outbound
        ));
    }
    progress.line(&format!("Final inbound rules: {}", changes.inbound_after));
    progress.line(&format!("Final outbound rules: {}", changes.outbound_after));
    progress.line(&format!(
        "Adding {} addresses to outbound allowlist.",
        changes.addresses
    ));

    Ok((firewall_id, plan))
}
