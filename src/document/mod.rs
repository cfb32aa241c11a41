//! Document view model and templates
//!
//! Every generated document (convention, attendance sheet, attestation,
//! certificate) renders from one immutable [`DocumentViewModel`] built per
//! render from the training, the participant, the optional client company
//! and the organization settings. The builder is pure; callers resolve all
//! I/O first.

pub mod builder;
pub mod templates;

pub use builder::{build_document_model, METHOD_PLACEHOLDER};
pub use templates::{document_content, ContentLine, ContentSection, DocumentContent, LineStyle};

use serde::{Deserialize, Serialize};

use crate::models::DocumentType;

/// Participant fields as consumed by the templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
}

/// Client company fields as consumed by the templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyView {
    pub name: String,
    pub address: Option<String>,
    pub siret: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Issuing-organization fields as consumed by the templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationView {
    pub name: String,
    pub address: Option<String>,
    pub siret: Option<String>,
    pub declaration_number: Option<String>,
    pub representative_name: Option<String>,
}

/// The exact shape every document template consumes. Ephemeral; built per
/// render, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentViewModel {
    pub training_id: String,
    pub training_title: String,
    /// "du {start} au {end}" / "le {start}" / a placeholder. Never empty.
    pub date_range: String,
    pub duration: Option<String>,
    pub schedule: Option<String>,
    pub trainer_name: Option<String>,
    pub price_label: Option<String>,
    pub objectives: Vec<String>,
    pub evaluation_descriptions: Vec<String>,
    pub tracking_descriptions: Vec<String>,
    pub pedagogical_descriptions: Vec<String>,
    pub material_descriptions: Vec<String>,
    pub participant: ParticipantView,
    pub company: Option<CompanyView>,
    pub organization: OrganizationView,
}

/// Output PDF filename:
/// `{DocumentKindLabel}_{First}_{Last}_{TrainingTitleWithUnderscores}.pdf`.
pub fn output_filename(kind: DocumentType, view: &DocumentViewModel) -> String {
    format!(
        "{}_{}_{}_{}.pdf",
        kind.file_label(),
        sanitize(&view.participant.first_name),
        sanitize(&view.participant.last_name),
        sanitize(&view.training_title)
    )
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_labels_and_underscores() {
        let view = DocumentViewModel {
            training_id: "t-1".into(),
            training_title: "Maîtriser Rust / niveau 2".into(),
            date_range: "le 01/02/2026".into(),
            duration: None,
            schedule: None,
            trainer_name: None,
            price_label: None,
            objectives: vec![],
            evaluation_descriptions: vec![],
            tracking_descriptions: vec![],
            pedagogical_descriptions: vec![],
            material_descriptions: vec![],
            participant: ParticipantView {
                first_name: "Marie".into(),
                last_name: "Durand".into(),
                full_name: "Marie Durand".into(),
                job_title: None,
                email: None,
                company_name: None,
            },
            company: None,
            organization: OrganizationView {
                name: "Org".into(),
                address: None,
                siret: None,
                declaration_number: None,
                representative_name: None,
            },
        };
        assert_eq!(
            output_filename(DocumentType::Attestation, &view),
            "Attestation_Marie_Durand_Maîtriser_Rust___niveau_2.pdf"
        );
    }
}
