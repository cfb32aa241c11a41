//! Migration, verification and full-migration commands

use crate::cli::commands::print_report;
use crate::cli::error::CliError;
use crate::signatures::migration::MigrationEngine;
use crate::store::{AssetStore, RecordStore};

/// Run one migration batch over the legacy table.
pub async fn handle_migrate(
    records: &dyn RecordStore,
    assets: &dyn AssetStore,
) -> Result<(), CliError> {
    let report = MigrationEngine::new(records, assets)
        .migrate_from_documents_table()
        .await?;
    print_report(&report)
}

/// Recount both stores and check trainer coverage.
pub async fn handle_verify(
    records: &dyn RecordStore,
    assets: &dyn AssetStore,
) -> Result<(), CliError> {
    let summary = MigrationEngine::new(records, assets)
        .verify_migration()
        .await?;
    print_report(&summary)
}

/// Diagnose, migrate, verify in one run. The composite report is printed
/// even when a step failed; the exit code still reflects the failure.
pub async fn handle_full_migrate(
    records: &dyn RecordStore,
    assets: &dyn AssetStore,
) -> Result<(), CliError> {
    let report = MigrationEngine::new(records, assets).run_full_migration().await;
    print_report(&report)?;
    match &report.error {
        Some(error) => Err(CliError::MigrationError(format!(
            "full migration incomplete: {error}"
        ))),
        None => Ok(()),
    }
}
