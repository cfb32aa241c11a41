//! Signature records
//!
//! The canonical representation is one row per signature in the
//! `document_signatures` record set, tagged with two enums. The legacy
//! representation (generic `documents` rows tagged by a human-readable
//! title) is decoded here for the diagnostic and migration engines only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{string_field, DecodeError};

/// Whose signature or stamp an asset represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureType {
    Participant,
    Representative,
    Trainer,
    CompanySeal,
    OrganizationSeal,
}

impl SignatureType {
    /// Stored string form (`camelCase`, matching the canonical table).
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureType::Participant => "participant",
            SignatureType::Representative => "representative",
            SignatureType::Trainer => "trainer",
            SignatureType::CompanySeal => "companySeal",
            SignatureType::OrganizationSeal => "organizationSeal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(Value::String(raw.trim().to_string())).ok()
    }

    /// Trainer signatures and organization seals may structurally lack a
    /// user id; every other type requires one.
    pub fn requires_user_id(&self) -> bool {
        !matches!(self, SignatureType::Trainer | SignatureType::OrganizationSeal)
    }
}

/// Which generated document a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Convention,
    Attestation,
    AttendanceSheet,
    Certificate,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Convention,
        DocumentType::Attestation,
        DocumentType::AttendanceSheet,
        DocumentType::Certificate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Convention => "convention",
            DocumentType::Attestation => "attestation",
            DocumentType::AttendanceSheet => "attendance_sheet",
            DocumentType::Certificate => "certificate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(Value::String(raw.trim().to_string())).ok()
    }

    /// Document title as printed on the generated PDF.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Convention => "Convention de formation professionnelle",
            DocumentType::Attestation => "Attestation de fin de formation",
            DocumentType::AttendanceSheet => "Feuille d'émargement",
            DocumentType::Certificate => "Certificat de réalisation",
        }
    }

    /// Short ASCII label used in output filenames.
    pub fn file_label(&self) -> &'static str {
        match self {
            DocumentType::Convention => "Convention",
            DocumentType::Attestation => "Attestation",
            DocumentType::AttendanceSheet => "Emargement",
            DocumentType::Certificate => "Certificat",
        }
    }
}

/// Canonical signature row (post-migration shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub id: String,
    pub training_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    pub document_type: DocumentType,
    pub signature_type: SignatureType,
    /// Public URL of the stored signature image.
    pub url: String,
    /// Set when a representative's signature was propagated to this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_from_user_id: Option<String>,
    /// Legacy `documents` row this record was migrated from, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated_from: Option<String>,
    /// True when a missing field was resolved heuristically rather than read
    /// from a certain source.
    #[serde(default)]
    pub inferred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl SignatureRecord {
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        serde_json::from_value(record.clone()).map_err(|e| DecodeError::Invalid(e.to_string()))
    }
}

/// Legacy `documents` table row. Everything but the id is optional because
/// the table accumulated rows from several generations of the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDocumentRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub training_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl LegacyDocumentRecord {
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        serde_json::from_value(record.clone()).map_err(|e| DecodeError::Invalid(e.to_string()))
    }
}

/// Canonical asset filename for a stored signature image.
///
/// Every newly stored or migrated asset must follow this scheme so the asset
/// bucket can be audited by name alone.
pub fn canonical_asset_name(
    signature_type: SignatureType,
    document_type: DocumentType,
    training_id: &str,
    user_id: Option<&str>,
    extension: &str,
) -> String {
    match user_id {
        Some(user) => format!(
            "{}_{}_{}_{}.{}",
            signature_type.as_str(),
            document_type.as_str(),
            training_id,
            user,
            extension
        ),
        None => format!(
            "{}_{}_{}.{}",
            signature_type.as_str(),
            document_type.as_str(),
            training_id,
            extension
        ),
    }
}
