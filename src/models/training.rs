//! Training records
//!
//! A `Training` is one scheduled instance of a course offering. The admin
//! forms that wrote these rows over the years stored objectives and method
//! sets in several shapes (native arrays, JSON-encoded strings, plain text,
//! null); [`Training::from_record`] decodes a row once and runs every such
//! field through the normalizer so templates only ever see canonical values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{string_field, DecodeError};
use crate::normalize::{
    evaluation_defaults, material_defaults, normalize_method_set, normalize_objectives,
    normalize_schedule, pedagogical_defaults, tracking_defaults, MethodSet,
};

/// Lifecycle status of a training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Draft,
    New,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for TrainingStatus {
    fn default() -> Self {
        TrainingStatus::Draft
    }
}

impl TrainingStatus {
    /// Parse a stored status string, falling back to `Draft` for anything
    /// unrecognized (legacy rows carry a few free-typed values).
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| serde_json::from_value(Value::String(s.trim().to_string())).ok())
            .unwrap_or_default()
    }
}

/// One scheduled course instance, fully normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub id: String,
    pub title: String,
    /// Always a non-empty ordered sequence, whatever the stored shape was.
    pub objectives: Vec<String>,
    pub evaluation_methods: MethodSet,
    pub tracking_methods: MethodSet,
    pub pedagogical_methods: MethodSet,
    pub material_elements: MethodSet,
    /// ISO `YYYY-MM-DD` when the form wrote one, otherwise free text.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub duration: Option<String>,
    pub schedule: Option<String>,
    pub trainer_name: Option<String>,
    pub trainer_id: Option<String>,
    pub company_id: Option<String>,
    pub price: Option<f64>,
    pub status: TrainingStatus,
}

impl Training {
    /// Decode a raw store row into a normalized training.
    ///
    /// Only the `id` is required; every other field degrades to a safe
    /// default. The shape-shifting fields are normalized here and nowhere
    /// else.
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        let id = string_field(record, "id").ok_or(DecodeError::MissingField("id"))?;
        let null = Value::Null;
        let raw = |field: &str| record.get(field).unwrap_or(&null);

        Ok(Training {
            id,
            title: string_field(record, "title").unwrap_or_else(|| "Formation".to_string()),
            objectives: normalize_objectives(raw("objectives")),
            evaluation_methods: normalize_method_set(raw("evaluation_methods"), &evaluation_defaults()),
            tracking_methods: normalize_method_set(raw("tracking_methods"), &tracking_defaults()),
            pedagogical_methods: normalize_method_set(
                raw("pedagogical_methods"),
                &pedagogical_defaults(),
            ),
            material_elements: normalize_method_set(raw("material_elements"), &material_defaults()),
            start_date: string_field(record, "start_date"),
            end_date: string_field(record, "end_date"),
            duration: string_field(record, "duration"),
            schedule: normalize_schedule(raw("schedule")),
            trainer_name: string_field(record, "trainer_name"),
            trainer_id: string_field(record, "trainer_id"),
            company_id: string_field(record, "company_id"),
            price: record.get("price").and_then(Value::as_f64),
            status: TrainingStatus::parse(record.get("status").and_then(Value::as_str)),
        })
    }

    /// Duplicate this training for re-scheduling: fresh id, company
    /// association cleared, status back to draft. Attached signatures are
    /// purged separately by the signature store adapter.
    pub fn duplicate(&self) -> Training {
        Training {
            id: Uuid::new_v4().to_string(),
            company_id: None,
            status: TrainingStatus::Draft,
            ..self.clone()
        }
    }
}
