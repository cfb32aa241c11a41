//! Training organization settings
//!
//! Settings of the organization issuing the documents: legal identity,
//! training-activity declaration number and the name signing on its behalf.
//! Stored as a single row in the `organization_settings` record set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::string_field;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSettings {
    pub name: String,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub siret: Option<String>,
    /// "Numéro de déclaration d'activité" required on French training documents.
    pub declaration_number: Option<String>,
    pub representative_name: Option<String>,
    /// Public URL of the organization-wide seal image, when one was uploaded.
    pub seal_url: Option<String>,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        OrganizationSettings {
            name: "Organisme de formation".to_string(),
            address_line: None,
            postal_code: None,
            city: None,
            siret: None,
            declaration_number: None,
            representative_name: None,
            seal_url: None,
        }
    }
}

impl OrganizationSettings {
    /// Decode from a raw settings row; absent fields fall back to defaults.
    pub fn from_record(record: &Value) -> Self {
        let defaults = OrganizationSettings::default();
        OrganizationSettings {
            name: string_field(record, "name").unwrap_or(defaults.name),
            address_line: string_field(record, "address_line"),
            postal_code: string_field(record, "postal_code"),
            city: string_field(record, "city"),
            siret: string_field(record, "siret"),
            declaration_number: string_field(record, "declaration_number"),
            representative_name: string_field(record, "representative_name"),
            seal_url: string_field(record, "seal_url"),
        }
    }

    pub fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.address_line.as_deref(),
            self.postal_code.as_deref(),
            self.city.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
