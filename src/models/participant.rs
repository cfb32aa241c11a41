//! Participant (learner) records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{string_field, DecodeError};

/// A learner attached to at most one training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub company_id: Option<String>,
    pub training_id: Option<String>,
}

impl Participant {
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        let id = string_field(record, "id").ok_or(DecodeError::MissingField("id"))?;
        Ok(Participant {
            id,
            first_name: string_field(record, "first_name").unwrap_or_default(),
            last_name: string_field(record, "last_name").unwrap_or_default(),
            job_title: string_field(record, "job_title"),
            email: string_field(record, "email"),
            company_name: string_field(record, "company_name"),
            company_id: string_field(record, "company_id"),
            training_id: string_field(record, "training_id"),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
