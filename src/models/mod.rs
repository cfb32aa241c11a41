//! Typed domain records
//!
//! Rows coming back from the record store travel as `serde_json::Value` and
//! are decoded exactly once, here, into fixed types. Loosely-typed fields
//! (objectives, method sets, schedules) are normalized during decoding so
//! their ambiguous external shape never leaks past this boundary.

pub mod company;
pub mod organization;
pub mod participant;
pub mod signature;
pub mod training;

pub use company::Company;
pub use organization::OrganizationSettings;
pub use participant::Participant;
pub use signature::{
    canonical_asset_name, DocumentType, LegacyDocumentRecord, SignatureRecord, SignatureType,
};
pub use training::{Training, TrainingStatus};

/// Error while decoding a store row into a typed record
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid record: {0}")]
    Invalid(String),
}

/// Extract a trimmed, non-empty string field from a raw store row.
pub(crate) fn string_field(record: &serde_json::Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
