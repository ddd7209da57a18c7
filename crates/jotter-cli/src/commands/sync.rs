use jotter_core::SyncReport;

use crate::commands::common::Context;
use crate::error::CliError;

pub async fn run_sync(as_json: bool, context: &Context) -> Result<(), CliError> {
    let service = context.open_service()?;
    if !service.has_remote() {
        return Err(CliError::SyncNotConfigured);
    }

    let report = service.sync().await?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_sync_report(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_sync_report(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Tombstones: {} ({} removed locally)",
            report.tombstones, report.deleted_locally
        ),
        format!(
            "Notes: {} cached, {} remote",
            report.cache_notes, report.remote_notes
        ),
        format!(
            "Pulled: {} new, {} updated; pushed: {}; unchanged: {}",
            report.inserted_locally, report.updated_locally, report.pushed_remote, report.unchanged
        ),
    ];
    if report.failures > 0 {
        lines.push(format!(
            "Sync completed with {} failure(s); run again to retry",
            report.failures
        ));
    } else {
        lines.push("Sync completed".to_string());
    }
    lines
}
