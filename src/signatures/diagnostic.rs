//! Signature diagnostic engine
//!
//! Read-only scans of the legacy `documents` set and the canonical
//! `document_signatures` set. Each scan produces a [`DiagnosticReport`] with
//! per-record issues and single-field suggested fixes; applying fixes is a
//! separate, explicit step so an operator can review the report first.
//!
//! Every suggested fix carries an `inferred` flag: false when the value comes
//! from a certain source (the row's own `created_by`), true when it was
//! resolved heuristically (a participant fallback, a URL substring match).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::models::{LegacyDocumentRecord, SignatureType, Training};
use crate::signatures::{legacy, SignatureError};
use crate::store::{sets, AssetStore, Filter, RecordStore};

/// One record with at least one issue.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemRecord {
    pub record_id: String,
    pub issues: Vec<String>,
}

/// A proposed single-field correction.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedFix {
    pub record_id: String,
    pub field: String,
    pub current: Option<String>,
    pub proposed: String,
    /// True when the proposed value was resolved heuristically.
    pub inferred: bool,
}

/// Outcome of one diagnostic scan.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    /// Record set the scan ran over.
    pub store: String,
    pub scanned: usize,
    pub missing_user_ids: usize,
    pub missing_training_ids: usize,
    pub type_inconsistencies: usize,
    pub problem_records: Vec<ProblemRecord>,
    pub suggested_fixes: Vec<SuggestedFix>,
}

impl DiagnosticReport {
    fn new(store: &str) -> Self {
        DiagnosticReport {
            store: store.to_string(),
            scanned: 0,
            missing_user_ids: 0,
            missing_training_ids: 0,
            type_inconsistencies: 0,
            problem_records: Vec::new(),
            suggested_fixes: Vec::new(),
        }
    }

    fn problem(&mut self, record_id: &str, issue: String) {
        match self
            .problem_records
            .iter_mut()
            .find(|p| p.record_id == record_id)
        {
            Some(existing) => existing.issues.push(issue),
            None => self.problem_records.push(ProblemRecord {
                record_id: record_id.to_string(),
                issues: vec![issue],
            }),
        }
    }
}

/// Outcome of applying a report's suggested fixes.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub applied: usize,
    pub failed: usize,
    pub failures: BTreeMap<String, String>,
}

/// Read-mostly diagnostic scans over both signature representations.
pub struct DiagnosticEngine<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> {
    records: &'a R,
    assets: &'a A,
}

impl<'a, R: RecordStore + ?Sized, A: AssetStore + ?Sized> DiagnosticEngine<'a, R, A> {
    pub fn new(records: &'a R, assets: &'a A) -> Self {
        DiagnosticEngine { records, assets }
    }

    /// Resolve a user id for a record that lacks one: the row's own
    /// `created_by` first, then any participant of the training.
    async fn resolve_user_id(
        &self,
        created_by: Option<&str>,
        training_id: Option<&str>,
    ) -> Result<Option<(String, bool)>, SignatureError> {
        if let Some(creator) = created_by {
            return Ok(Some((creator.to_string(), false)));
        }
        let Some(training_id) = training_id else {
            return Ok(None);
        };
        let participants = self
            .records
            .select(sets::PARTICIPANTS, &[Filter::eq("training_id", training_id)])
            .await?;
        Ok(participants
            .first()
            .and_then(|p| p.get("id").and_then(|v| v.as_str()))
            .map(|id| (id.to_string(), true)))
    }

    /// Scan the legacy `documents` set.
    pub async fn diagnose_documents_table(&self) -> Result<DiagnosticReport, SignatureError> {
        let rows = self.records.select(sets::DOCUMENTS, &[]).await?;
        let mut report = DiagnosticReport::new(sets::DOCUMENTS);
        report.scanned = rows.len();

        for row in &rows {
            let record = match LegacyDocumentRecord::from_record(row) {
                Ok(record) => record,
                Err(e) => {
                    let id = row
                        .get("id")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<no id>")
                        .to_string();
                    report.problem(&id, format!("undecodable row: {e}"));
                    continue;
                }
            };

            if record.training_id.is_none() {
                report.missing_training_ids += 1;
                report.problem(&record.id, "missing training_id".to_string());
            }

            let signature_type = record.title.as_deref().and_then(legacy::signature_type_from_title);
            match signature_type {
                None => {
                    report.type_inconsistencies += 1;
                    report.problem(
                        &record.id,
                        format!("unmappable title {:?}", record.title.as_deref().unwrap_or("")),
                    );
                    if let Some(inferred) =
                        record.url.as_deref().and_then(legacy::infer_signature_type_from_url)
                    {
                        report.suggested_fixes.push(SuggestedFix {
                            record_id: record.id.clone(),
                            field: "title".to_string(),
                            current: record.title.clone(),
                            proposed: legacy::canonical_title(inferred).to_string(),
                            inferred: true,
                        });
                    }
                }
                Some(signature_type) => {
                    if record.user_id.is_none() {
                        if signature_type.requires_user_id() {
                            report.missing_user_ids += 1;
                            report.problem(&record.id, "missing user_id".to_string());
                        }
                        // Trainer and seal rows are valid without a user id,
                        // but the migration needs one, so still suggest it.
                        if let Some((user_id, inferred)) = self
                            .resolve_user_id(record.created_by.as_deref(), record.training_id.as_deref())
                            .await?
                        {
                            report.suggested_fixes.push(SuggestedFix {
                                record_id: record.id.clone(),
                                field: "user_id".to_string(),
                                current: None,
                                proposed: user_id,
                                inferred,
                            });
                        }
                    }
                }
            }
        }
        info!(
            scanned = report.scanned,
            problems = report.problem_records.len(),
            "legacy documents scan complete"
        );
        Ok(report)
    }

    /// Scan the canonical `document_signatures` set.
    pub async fn diagnose_document_signatures(&self) -> Result<DiagnosticReport, SignatureError> {
        let rows = self.records.select(sets::DOCUMENT_SIGNATURES, &[]).await?;
        let mut report = DiagnosticReport::new(sets::DOCUMENT_SIGNATURES);
        report.scanned = rows.len();

        for row in &rows {
            let id = row
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("<no id>")
                .to_string();
            let raw_type = row.get("signature_type").and_then(|v| v.as_str());
            let signature_type = raw_type.and_then(SignatureType::parse);
            let url = row.get("url").and_then(|v| v.as_str());

            if row.get("training_id").and_then(|v| v.as_str()).is_none() {
                report.missing_training_ids += 1;
                report.problem(&id, "missing training_id".to_string());
            }

            match signature_type {
                None => {
                    report.type_inconsistencies += 1;
                    report.problem(
                        &id,
                        format!("unknown signature_type {:?}", raw_type.unwrap_or("")),
                    );
                    if let Some(inferred) = url.and_then(legacy::infer_signature_type_from_url) {
                        report.suggested_fixes.push(SuggestedFix {
                            record_id: id.clone(),
                            field: "signature_type".to_string(),
                            current: raw_type.map(str::to_string),
                            proposed: inferred.as_str().to_string(),
                            inferred: true,
                        });
                    }
                }
                Some(signature_type) => {
                    let user_missing = row
                        .get("user_id")
                        .map(|v| v.is_null())
                        .unwrap_or(true);
                    if user_missing && signature_type.requires_user_id() {
                        report.missing_user_ids += 1;
                        report.problem(&id, "missing user_id".to_string());
                        let created_by = row.get("created_by").and_then(|v| v.as_str());
                        let training_id = row.get("training_id").and_then(|v| v.as_str());
                        if let Some((user_id, inferred)) =
                            self.resolve_user_id(created_by, training_id).await?
                        {
                            report.suggested_fixes.push(SuggestedFix {
                                record_id: id.clone(),
                                field: "user_id".to_string(),
                                current: None,
                                proposed: user_id,
                                inferred,
                            });
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    /// Trainings with no trainer signature in the legacy set, the canonical
    /// set, or the asset bucket. Missing means absent from all three.
    pub async fn find_missing_trainer_signatures(&self) -> Result<Vec<Training>, SignatureError> {
        let trainings = self
            .records
            .select(sets::TRAININGS, &[])
            .await?
            .iter()
            .map(Training::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let asset_names = self.assets.list("").await?;

        let mut missing = Vec::new();
        for training in trainings {
            let legacy_rows = self
                .records
                .select(
                    sets::DOCUMENTS,
                    &[Filter::eq("training_id", training.id.as_str())],
                )
                .await?;
            let in_legacy = legacy_rows.iter().any(|row| {
                row.get("title")
                    .and_then(|v| v.as_str())
                    .and_then(legacy::signature_type_from_title)
                    == Some(SignatureType::Trainer)
            });
            if in_legacy {
                continue;
            }

            let canonical = self
                .records
                .select(
                    sets::DOCUMENT_SIGNATURES,
                    &[
                        Filter::eq("training_id", training.id.as_str()),
                        Filter::eq("signature_type", SignatureType::Trainer.as_str()),
                    ],
                )
                .await?;
            if !canonical.is_empty() {
                continue;
            }

            let in_assets = asset_names.iter().any(|name| {
                let name = name.to_ascii_lowercase();
                name.contains(&training.id.to_ascii_lowercase())
                    && (name.contains("trainer") || name.contains("formateur"))
            });
            if !in_assets {
                missing.push(training);
            }
        }
        Ok(missing)
    }

    /// Apply a report's suggested fixes. Each fix is an independent
    /// single-field update; failures are recorded and never abort the batch.
    pub async fn apply_fixes(&self, report: &DiagnosticReport) -> Result<FixReport, SignatureError> {
        let mut applied = 0;
        let mut failures = BTreeMap::new();
        for fix in &report.suggested_fixes {
            let mut patch = serde_json::Map::new();
            patch.insert(fix.field.clone(), json!(fix.proposed));
            let patch = serde_json::Value::Object(patch);
            match self.records.update(&report.store, &fix.record_id, patch).await {
                Ok(_) => applied += 1,
                Err(e) => {
                    warn!(record_id = %fix.record_id, error = %e, "fix failed");
                    failures.insert(fix.record_id.clone(), e.to_string());
                }
            }
        }
        Ok(FixReport {
            applied,
            failed: failures.len(),
            failures,
        })
    }
}
