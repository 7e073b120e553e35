//! `fwgate apply`: resolve, fetch, transform, submit.

use fwgate_core::Syncer;

use crate::error::CliError;
use crate::output::Progress;

pub async fn handle(syncer: &Syncer, progress: Progress) -> Result<(), CliError> {
    let (firewall_id, plan) = super::prepare(syncer, progress).await?;

    progress.line("Pushing updated rules...");
    syncer.submit(firewall_id, &plan.rules).await?;
    progress.success("Success! Firewall rules updated.");

    Ok(())
}
