//! Diagnose and apply-fixes commands

use serde::Serialize;

use crate::cli::commands::print_report;
use crate::cli::error::CliError;
use crate::signatures::diagnostic::{DiagnosticEngine, DiagnosticReport, FixReport};
use crate::store::{AssetStore, RecordStore};

#[derive(Serialize)]
struct CombinedDiagnostic {
    legacy: DiagnosticReport,
    canonical: DiagnosticReport,
    missing_trainer_signatures: Vec<String>,
}

/// Scan both signature representations and print the combined report.
pub async fn handle_diagnose(
    records: &dyn RecordStore,
    assets: &dyn AssetStore,
) -> Result<(), CliError> {
    let engine = DiagnosticEngine::new(records, assets);
    let report = CombinedDiagnostic {
        legacy: engine.diagnose_documents_table().await?,
        canonical: engine.diagnose_document_signatures().await?,
        missing_trainer_signatures: engine
            .find_missing_trainer_signatures()
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect(),
    };
    print_report(&report)
}

#[derive(Serialize)]
struct CombinedFixes {
    legacy: FixReport,
    canonical: FixReport,
}

/// Re-scan, apply every suggested fix, print what was applied.
pub async fn handle_apply_fixes(
    records: &dyn RecordStore,
    assets: &dyn AssetStore,
) -> Result<(), CliError> {
    let engine = DiagnosticEngine::new(records, assets);
    let legacy = engine.diagnose_documents_table().await?;
    let canonical = engine.diagnose_document_signatures().await?;
    let report = CombinedFixes {
        legacy: engine.apply_fixes(&legacy).await?,
        canonical: engine.apply_fixes(&canonical).await?,
    };
    print_report(&report)
}
