//! `fwgate plan`: everything `apply` does except the update call.

use tabled::Tabled;

use fwgate_core::{FirewallRule, Syncer};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Progress};

// ── Rule table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Direction")]
    direction: &'static str,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Addresses")]
    addresses: usize,
    #[tabled(rename = "Managed")]
    managed: &'static str,
}

impl RuleRow {
    fn new(direction: &'static str, rule: &FirewallRule, marker: &str) -> Self {
        Self {
            direction,
            label: rule.label.clone().unwrap_or_else(|| "-".into()),
            action: rule.action.to_string(),
            protocol: rule.protocol.to_string(),
            ports: rule.ports.clone().unwrap_or_else(|| "-".into()),
            addresses: rule.address_count(),
            managed: if rule.has_label(marker) { "yes" } else { "" },
        }
    }
}

pub async fn handle(syncer: &Syncer, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    // Structured output must stay parseable, so progress is table-only.
    let table = matches!(global.output, OutputFormat::Table);
    let progress = Progress::new(global.quiet || !table, color);

    let (_, plan) = super::prepare(syncer, progress).await?;

    let marker = &syncer.config().rule.label;
    let rows: Vec<RuleRow> = plan
        .rules
        .inbound
        .iter()
        .map(|r| RuleRow::new("inbound", r, marker))
        .chain(
            plan.rules
                .outbound
                .iter()
                .map(|r| RuleRow::new("outbound", r, marker)),
        )
        .collect();

    let out = output::render(&global.output, &plan, &rows)?;
    output::print_output(&out, global.quiet);

    progress.line("Dry run: no changes submitted.");
    Ok(())
}
