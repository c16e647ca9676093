//! `scafe cleanup`: delete leftover generator artifacts.
//!
//! Never fails because of an individual path: each one is reported as
//! deleted, missing or failed, and the command exits 0.

use scafe_adapters::LocalFilesystem;
use scafe_core::application::{CleanupService, CleanupStatus};

use crate::{cli::CleanupArgs, error::CliResult, output::OutputManager};

pub fn execute(args: CleanupArgs, output: OutputManager) -> CliResult<()> {
    let service = CleanupService::new(Box::new(LocalFilesystem::new()));
    let report = service.run(&args.paths);

    if output.is_json() {
        return output.json(&report);
    }

    for entry in &report.entries {
        let path = entry.path.display();
        match &entry.status {
            CleanupStatus::Deleted => output.success(&format!("Deleted {path}"))?,
            CleanupStatus::Missing => output.skipped(&format!("{path} does not exist"))?,
            CleanupStatus::Failed(reason) => {
                output.warning(&format!("Could not delete {path}: {reason}"))?
            }
        }
    }
    output.print(&format!(
        "{} deleted, {} missing, {} failed",
        report.deleted(),
        report.missing(),
        report.failed()
    ))?;
    Ok(())
}
