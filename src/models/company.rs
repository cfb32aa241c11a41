//! Company (client legal entity) records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{string_field, DecodeError};

/// Client company a training is sold to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub address_line: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub siret: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl Company {
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        let id = string_field(record, "id").ok_or(DecodeError::MissingField("id"))?;
        Ok(Company {
            id,
            name: string_field(record, "name").unwrap_or_default(),
            address_line: string_field(record, "address_line"),
            postal_code: string_field(record, "postal_code"),
            city: string_field(record, "city"),
            siret: string_field(record, "siret"),
            contact_email: string_field(record, "contact_email"),
            contact_phone: string_field(record, "contact_phone"),
        })
    }

    /// Postal address on a single line, skipping absent parts.
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
