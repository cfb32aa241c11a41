//! Tests for document view-model building and content templates

use serde_json::json;
use training_docs_sdk::document::{
    build_document_model, document_content, output_filename, METHOD_PLACEHOLDER,
};
use training_docs_sdk::models::{
    Company, DocumentType, OrganizationSettings, Participant, Training,
};

fn sample_training() -> Training {
    Training::from_record(&json!({
        "id": "t-1",
        "title": "Maîtriser Rust",
        "objectives": ["Lire du code", "Écrire des tests"],
        "evaluation_methods": {"qcm": true},
        "start_date": "2026-03-02",
        "end_date": "2026-03-06",
        "duration": "35 heures",
        "trainer_name": "Jean Martin",
        "price": 2400.0
    }))
    .unwrap()
}

fn sample_participant() -> Participant {
    Participant::from_record(&json!({
        "id": "u-1",
        "first_name": "Marie",
        "last_name": "Durand",
        "job_title": "Développeuse",
        "company_id": "c-1"
    }))
    .unwrap()
}

#[test]
fn test_view_model_carries_resolved_fields() {
    let training = sample_training();
    let participant = sample_participant();
    let company = Company::from_record(&json!({"id": "c-1", "name": "Acme SARL"})).unwrap();
    let organization = OrganizationSettings::default();

    let view = build_document_model(&training, &participant, Some(&company), &organization);
    assert_eq!(view.training_title, "Maîtriser Rust");
    assert_eq!(view.date_range, "du 02/03/2026 au 06/03/2026");
    assert_eq!(view.participant.full_name, "Marie Durand");
    assert_eq!(view.company.as_ref().unwrap().name, "Acme SARL");
    assert_eq!(view.price_label.as_deref(), Some("2400.00 € HT"));
    assert!(view
        .evaluation_descriptions
        .iter()
        .all(|d| d != METHOD_PLACEHOLDER));
}

#[test]
fn test_single_day_training_renders_le_date() {
    let training = Training::from_record(&json!({
        "id": "t-2",
        "start_date": "2026-04-10"
    }))
    .unwrap();
    let view = build_document_model(
        &training,
        &sample_participant(),
        None,
        &OrganizationSettings::default(),
    );
    assert_eq!(view.date_range, "le 10/04/2026");
}

// One loosely-typed row end to end: JSON-string objectives and null
// evaluation methods must come out as parsed objectives plus the method
// placeholder.
#[test]
fn test_loose_row_end_to_end() {
    let training = Training::from_record(&json!({
        "id": "t-3",
        "objectives": "[\"Savoir X\",\"Savoir Y\"]",
        "evaluation_methods": null
    }))
    .unwrap();
    let view = build_document_model(
        &training,
        &sample_participant(),
        None,
        &OrganizationSettings::default(),
    );
    assert_eq!(view.objectives, vec!["Savoir X", "Savoir Y"]);
    assert_eq!(view.evaluation_descriptions, vec![METHOD_PLACEHOLDER]);
}

#[test]
fn test_every_document_kind_produces_content() {
    let view = build_document_model(
        &sample_training(),
        &sample_participant(),
        None,
        &OrganizationSettings::default(),
    );
    for kind in DocumentType::ALL {
        let content = document_content(kind, &view);
        assert!(!content.sections.is_empty(), "{kind:?} has no sections");
        let title_found = content
            .sections
            .iter()
            .flat_map(|s| &s.lines)
            .any(|line| line.text == kind.label());
        assert!(title_found, "{kind:?} is missing its title line");
    }
}

#[test]
fn test_output_filename_convention() {
    let view = build_document_model(
        &sample_training(),
        &sample_participant(),
        None,
        &OrganizationSettings::default(),
    );
    assert_eq!(
        output_filename(DocumentType::Convention, &view),
        "Convention_Marie_Durand_Maîtriser_Rust.pdf"
    );
}
