//! Signature migration engine
//!
//! Moves legacy `documents` signature rows into the canonical
//! `document_signatures` set, renaming their stored assets to the canonical
//! naming scheme along the way. Every legacy record is processed
//! independently; one failure never aborts the batch. Re-running is safe:
//! records already present canonically count as already migrated and assets
//! already canonically named are left alone.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{canonical_asset_name, LegacyDocumentRecord, SignatureRecord, SignatureType};
use crate::signatures::diagnostic::{DiagnosticEngine, DiagnosticReport};
use crate::signatures::{legacy, SignatureError};
use crate::store::{sets, AssetStore, Filter, RecordStore};

/// Outcome of one migration batch.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub processed: usize,
    pub migrated: usize,
    pub already_migrated: usize,
    pub failed: usize,
    pub renamed_assets: usize,
    pub failures: BTreeMap<String, String>,
}

/// Recount of both stores after a migration.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct VerificationSummary {
    pub legacy_count: usize,
    pub canonical_count: usize,
    pub missing_trainer_signatures: Vec<String>,
    pub successful: bool,
}

/// Composite report of a full diagnose → migrate → verify run.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct FullMigrationReport {
    pub legacy_diagnostic: Option<DiagnosticReport>,
    pub canonical_diagnostic: Option<DiagnosticReport>,
    pub migration: Option<MigrationReport>,
    pub verification: Option<VerificationSummary>,
    pub error: Option<String>,
}

enum Outcome {
    Migrated { renamed: bool },
    AlreadyMigrated { renamed: bool },
}

/// Batch migration from the legacy set to the canonical set.
pub struct MigrationEngine<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> {
    records: &'a R,
    assets: &'a A,
}

impl<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> MigrationEngine<'a, R, A> {
    pub fn new(records: &'a R, assets: &'a A) -> Self {
        MigrationEngine { records, assets }
    }

    /// Migrate every legacy signature row. Records are processed serially so
    /// re-runs and partial failures stay easy to reason about.
    pub async fn migrate_from_documents_table(&self) -> Result<MigrationReport, SignatureError> {
        let rows = self.records.select(sets::DOCUMENTS, &[]).await?;
        let mut report = MigrationReport {
            processed: rows.len(),
            migrated: 0,
            already_migrated: 0,
            failed: 0,
            renamed_assets: 0,
            failures: BTreeMap::new(),
        };

        for row in &rows {
            let id = row
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<no id>")
                .to_string();
            match self.migrate_record(row).await {
                Ok(Outcome::Migrated { renamed }) => {
                    report.migrated += 1;
                    report.renamed_assets += usize::from(renamed);
                }
                Ok(Outcome::AlreadyMigrated { renamed }) => {
                    report.already_migrated += 1;
                    report.renamed_assets += usize::from(renamed);
                }
                Err(reason) => {
                    warn!(record_id = %id, %reason, "legacy record not migrated");
                    report.failed += 1;
                    report.failures.insert(id, reason);
                }
            }
        }
        info!(
            processed = report.processed,
            migrated = report.migrated,
            already_migrated = report.already_migrated,
            failed = report.failed,
            "migration batch complete"
        );
        Ok(report)
    }

    async fn migrate_record(&self, row: &Value) -> Result<Outcome, String> {
        let record = LegacyDocumentRecord::from_record(row).map_err(|e| e.to_string())?;

        let title = record.title.as_deref().unwrap_or_default();
        let signature_type = legacy::signature_type_from_title(title)
            .ok_or_else(|| format!("unmappable title {title:?}"))?;
        let document_type = legacy::document_type_from_str(record.doc_type.as_deref());
        let training_id = record
            .training_id
            .clone()
            .ok_or_else(|| "missing training_id".to_string())?;
        let url = record
            .url
            .clone()
            .ok_or_else(|| "missing url".to_string())?;

        let (user_id, inferred) = match &record.user_id {
            Some(user) => (Some(user.clone()), false),
            None => match self.resolve_user_id(&record, &training_id).await? {
                Some((user, inferred)) => (Some(user), inferred),
                None if signature_type == SignatureType::OrganizationSeal => (None, false),
                None => return Err("no user id resolvable".to_string()),
            },
        };

        let canonical_name = canonical_asset_name(
            signature_type,
            document_type,
            &training_id,
            user_id.as_deref(),
            extension_of(&url),
        );

        let existing = self
            .records
            .select(
                sets::DOCUMENT_SIGNATURES,
                &[
                    Filter::eq("training_id", training_id.as_str()),
                    Filter::eq("signature_type", signature_type.as_str()),
                    Filter::eq("document_type", document_type.as_str()),
                ],
            )
            .await
            .map_err(|e| e.to_string())?;
        if let Some(existing) = existing.first() {
            let existing_url = existing.get("url").and_then(Value::as_str).unwrap_or(&url);
            let renamed = if asset_name_of(existing_url) != canonical_name {
                self.rename_asset(existing_url, &canonical_name).await?;
                true
            } else {
                false
            };
            return Ok(Outcome::AlreadyMigrated { renamed });
        }

        let (final_url, renamed) = if asset_name_of(&url) == canonical_name {
            (url.clone(), false)
        } else {
            (self.rename_asset(&url, &canonical_name).await?, true)
        };

        let canonical = SignatureRecord {
            id: Uuid::new_v4().to_string(),
            training_id,
            user_id,
            company_id: None,
            document_type,
            signature_type,
            url: final_url,
            shared_from_user_id: None,
            migrated_from: Some(record.id.clone()),
            inferred,
            created_at: record
                .created_at
                .clone()
                .or_else(|| Some(Utc::now().to_rfc3339())),
        };
        let value = serde_json::to_value(&canonical).map_err(|e| e.to_string())?;
        self.records
            .insert(sets::DOCUMENT_SIGNATURES, value)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Outcome::Migrated { renamed })
    }

    async fn resolve_user_id(
        &self,
        record: &LegacyDocumentRecord,
        training_id: &str,
    ) -> Result<Option<(String, bool)>, String> {
        if let Some(creator) = &record.created_by {
            return Ok(Some((creator.clone(), false)));
        }
        let participants = self
            .records
            .select(sets::PARTICIPANTS, &[Filter::eq("training_id", training_id)])
            .await
            .map_err(|e| e.to_string())?;
        Ok(participants
            .first()
            .and_then(|p| p.get("id").and_then(Value::as_str))
            .map(|id| (id.to_string(), true)))
    }

    /// Copy an asset to its canonical name and rewrite every reference to
    /// the old URL in both record sets. The old asset is left in place.
    async fn rename_asset(&self, old_url: &str, canonical_name: &str) -> Result<String, String> {
        let old_name = asset_name_of(old_url);
        let bytes = self
            .assets
            .download(old_name)
            .await
            .map_err(|e| format!("asset {old_name}: {e}"))?;
        self.assets
            .upload(canonical_name, bytes, true)
            .await
            .map_err(|e| e.to_string())?;
        let new_url = self.assets.public_url(canonical_name);

        for set in [sets::DOCUMENTS, sets::DOCUMENT_SIGNATURES] {
            let referencing = self
                .records
                .select(set, &[Filter::eq("url", old_url)])
                .await
                .map_err(|e| e.to_string())?;
            for row in &referencing {
                if let Some(id) = row.get("id").and_then(Value::as_str) {
                    self.records
                        .update(set, id, json!({ "url": new_url }))
                        .await
                        .map_err(|e| e.to_string())?;
                }
            }
        }
        info!(old = old_name, new = canonical_name, "asset renamed");
        Ok(new_url)
    }

    /// Recount both stores and re-check trainer coverage.
    pub async fn verify_migration(&self) -> Result<VerificationSummary, SignatureError> {
        let legacy_count = self.records.select(sets::DOCUMENTS, &[]).await?.len();
        let canonical_count = self
            .records
            .select(sets::DOCUMENT_SIGNATURES, &[])
            .await?
            .len();
        let missing = DiagnosticEngine::new(self.records, self.assets)
            .find_missing_trainer_signatures()
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect::<Vec<_>>();
        let successful = canonical_count >= legacy_count && missing.is_empty();
        Ok(VerificationSummary {
            legacy_count,
            canonical_count,
            missing_trainer_signatures: missing,
            successful,
        })
    }

    /// Diagnose, migrate, verify. Every completed step's report is returned
    /// even when a later step fails.
    pub async fn run_full_migration(&self) -> FullMigrationReport {
        let mut report = FullMigrationReport {
            legacy_diagnostic: None,
            canonical_diagnostic: None,
            migration: None,
            verification: None,
            error: None,
        };
        let engine = DiagnosticEngine::new(self.records, self.assets);

        match engine.diagnose_documents_table().await {
            Ok(diag) => report.legacy_diagnostic = Some(diag),
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        }
        match engine.diagnose_document_signatures().await {
            Ok(diag) => report.canonical_diagnostic = Some(diag),
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        }
        match self.migrate_from_documents_table().await {
            Ok(migration) => report.migration = Some(migration),
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        }
        match self.verify_migration().await {
            Ok(verification) => report.verification = Some(verification),
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

/// Last path segment of an asset URL, query string stripped.
fn asset_name_of(url: &str) -> &str {
    let no_query = url.split(['?', '#']).next().unwrap_or(url);
    no_query.rsplit('/').next().unwrap_or(no_query)
}

fn extension_of(url: &str) -> &str {
    let name = asset_name_of(url);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_name_strips_path_and_query() {
        assert_eq!(asset_name_of("https://cdn/b/sig.png?token=1"), "sig.png");
        assert_eq!(asset_name_of("sig.png"), "sig.png");
    }

    #[test]
    fn extension_defaults_to_png() {
        assert_eq!(extension_of("https://cdn/sig.jpg"), "jpg");
        assert_eq!(extension_of("https://cdn/sig"), "png");
    }
}
