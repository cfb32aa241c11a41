//! Document templates
//!
//! Each template turns the view model into structured text content: a list
//! of sections the paginator treats as unbreakable blocks. The wording
//! follows the French legal/pedagogical documents the back-office issues.

use serde::{Deserialize, Serialize};

use crate::document::DocumentViewModel;
use crate::models::DocumentType;

/// Visual weight of one content line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
    Small,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentLine {
    pub text: String,
    pub style: LineStyle,
}

impl ContentLine {
    fn title(text: impl Into<String>) -> Self {
        ContentLine { text: text.into(), style: LineStyle::Title }
    }
    fn heading(text: impl Into<String>) -> Self {
        ContentLine { text: text.into(), style: LineStyle::Heading }
    }
    fn body(text: impl Into<String>) -> Self {
        ContentLine { text: text.into(), style: LineStyle::Body }
    }
    fn small(text: impl Into<String>) -> Self {
        ContentLine { text: text.into(), style: LineStyle::Small }
    }
}

/// One logical block the paginator never splits across pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    pub lines: Vec<ContentLine>,
}

/// Structured content of one document, ready for rasterization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContent {
    pub sections: Vec<ContentSection>,
}

/// Build the content of one document kind from the view model.
pub fn document_content(kind: DocumentType, view: &DocumentViewModel) -> DocumentContent {
    let sections = match kind {
        DocumentType::Convention => convention_sections(view),
        DocumentType::Attestation => attestation_sections(view),
        DocumentType::AttendanceSheet => attendance_sections(view),
        DocumentType::Certificate => certificate_sections(view),
    };
    DocumentContent { sections }
}

fn header_section(kind: DocumentType, view: &DocumentViewModel) -> ContentSection {
    let mut lines = vec![
        ContentLine::title(kind.label()),
        ContentLine::body(format!("Formation : {}", view.training_title)),
        ContentLine::body(view.date_range.clone()),
    ];
    if let Some(duration) = &view.duration {
        lines.push(ContentLine::body(format!("Durée : {}", duration)));
    }
    ContentSection { lines }
}

fn organization_section(view: &DocumentViewModel) -> ContentSection {
    let org = &view.organization;
    let mut lines = vec![
        ContentLine::heading("Organisme de formation"),
        ContentLine::body(org.name.clone()),
    ];
    if let Some(address) = &org.address {
        lines.push(ContentLine::body(address.clone()));
    }
    if let Some(siret) = &org.siret {
        lines.push(ContentLine::small(format!("SIRET : {}", siret)));
    }
    if let Some(nda) = &org.declaration_number {
        lines.push(ContentLine::small(format!("Déclaration d'activité : {}", nda)));
    }
    ContentSection { lines }
}

fn company_section(view: &DocumentViewModel) -> Option<ContentSection> {
    let company = view.company.as_ref()?;
    let mut lines = vec![
        ContentLine::heading("Entreprise bénéficiaire"),
        ContentLine::body(company.name.clone()),
    ];
    if let Some(address) = &company.address {
        lines.push(ContentLine::body(address.clone()));
    }
    if let Some(siret) = &company.siret {
        lines.push(ContentLine::small(format!("SIRET : {}", siret)));
    }
    Some(ContentSection { lines })
}

fn participant_section(view: &DocumentViewModel) -> ContentSection {
    let p = &view.participant;
    let mut lines = vec![
        ContentLine::heading("Stagiaire"),
        ContentLine::body(p.full_name.clone()),
    ];
    if let Some(job) = &p.job_title {
        lines.push(ContentLine::body(job.clone()));
    }
    if let Some(company) = &p.company_name {
        lines.push(ContentLine::body(company.clone()));
    }
    ContentSection { lines }
}

fn objectives_section(view: &DocumentViewModel) -> ContentSection {
    let mut lines = vec![ContentLine::heading("Objectifs pédagogiques")];
    for objective in &view.objectives {
        lines.push(ContentLine::body(format!("• {}", objective)));
    }
    ContentSection { lines }
}

fn list_section(heading: &str, items: &[String]) -> ContentSection {
    let mut lines = vec![ContentLine::heading(heading)];
    for item in items {
        lines.push(ContentLine::body(format!("• {}", item)));
    }
    ContentSection { lines }
}

fn signature_block(view: &DocumentViewModel, include_company: bool) -> ContentSection {
    let mut lines = vec![
        ContentLine::heading("Signatures"),
        ContentLine::body(format!(
            "Pour l'organisme de formation : {}",
            view.organization
                .representative_name
                .as_deref()
                .unwrap_or(view.organization.name.as_str())
        )),
    ];
    if include_company {
        if let Some(company) = &view.company {
            lines.push(ContentLine::body(format!("Pour l'entreprise : {}", company.name)));
        }
        lines.push(ContentLine::body(format!("Le stagiaire : {}", view.participant.full_name)));
    }
    if let Some(trainer) = &view.trainer_name {
        lines.push(ContentLine::body(format!("Le formateur : {}", trainer)));
    }
    ContentSection { lines }
}

fn convention_sections(view: &DocumentViewModel) -> Vec<ContentSection> {
    let mut sections = vec![
        header_section(DocumentType::Convention, view),
        organization_section(view),
    ];
    if let Some(company) = company_section(view) {
        sections.push(company);
    }
    sections.push(participant_section(view));
    sections.push(objectives_section(view));
    sections.push(list_section("Moyens pédagogiques", &view.pedagogical_descriptions));
    sections.push(list_section("Moyens matériels", &view.material_descriptions));
    sections.push(list_section("Modalités de suivi", &view.tracking_descriptions));
    sections.push(list_section("Modalités d'évaluation", &view.evaluation_descriptions));
    if let Some(price) = &view.price_label {
        sections.push(ContentSection {
            lines: vec![
                ContentLine::heading("Dispositions financières"),
                ContentLine::body(format!("Coût total de la formation : {}", price)),
            ],
        });
    }
    sections.push(signature_block(view, true));
    sections
}

fn attestation_sections(view: &DocumentViewModel) -> Vec<ContentSection> {
    let statement = ContentSection {
        lines: vec![
            ContentLine::body(format!(
                "{} atteste que {} a suivi la formation « {} », {}.",
                view.organization.name, view.participant.full_name, view.training_title,
                view.date_range
            )),
        ],
    };
    let mut sections = vec![
        header_section(DocumentType::Attestation, view),
        organization_section(view),
        statement,
        objectives_section(view),
        list_section("Modalités d'évaluation", &view.evaluation_descriptions),
    ];
    sections.push(signature_block(view, false));
    sections
}

fn attendance_sections(view: &DocumentViewModel) -> Vec<ContentSection> {
    let mut sections = vec![
        header_section(DocumentType::AttendanceSheet, view),
        participant_section(view),
    ];
    if let Some(schedule) = &view.schedule {
        let mut lines = vec![ContentLine::heading("Horaires")];
        for slot in schedule.lines() {
            lines.push(ContentLine::body(slot.to_string()));
        }
        sections.push(ContentSection { lines });
    }
    sections.push(ContentSection {
        lines: vec![
            ContentLine::heading("Émargement"),
            ContentLine::body("Matin : signature du stagiaire"),
            ContentLine::body("Après-midi : signature du stagiaire"),
            ContentLine::body("Signature du formateur"),
        ],
    });
    sections
}

fn certificate_sections(view: &DocumentViewModel) -> Vec<ContentSection> {
    let statement = ContentSection {
        lines: vec![
            ContentLine::body(format!(
                "{} certifie que {} a réalisé l'action de formation « {} », {}.",
                view.organization.name, view.participant.full_name, view.training_title,
                view.date_range
            )),
        ],
    };
    vec![
        header_section(DocumentType::Certificate, view),
        organization_section(view),
        statement,
        signature_block(view, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{OrganizationView, ParticipantView};

    fn view() -> DocumentViewModel {
        DocumentViewModel {
            training_id: "t-1".into(),
            training_title: "Rust avancé".into(),
            date_range: "du 02/03/2026 au 04/03/2026".into(),
            duration: Some("21 heures".into()),
            schedule: Some("9h00 - 12h30\n14h00 - 17h30".into()),
            trainer_name: Some("Paul Martin".into()),
            price_label: Some("1800.00 € HT".into()),
            objectives: vec!["Savoir X".into()],
            evaluation_descriptions: vec!["QCM d'évaluation des acquis en fin de formation.".into()],
            tracking_descriptions: vec!["Feuilles de présence émargées par demi-journée.".into()],
            pedagogical_descriptions: vec!["Apports théoriques illustrés d'exemples concrets.".into()],
            material_descriptions: vec!["Salle de formation équipée.".into()],
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
                name: "Formation Plus".into(),
                address: None,
                siret: None,
                declaration_number: None,
                representative_name: None,
            },
        }
    }

    #[test]
    fn every_kind_starts_with_its_label() {
        for kind in DocumentType::ALL {
            let content = document_content(kind, &view());
            assert_eq!(content.sections[0].lines[0].text, kind.label());
            assert_eq!(content.sections[0].lines[0].style, LineStyle::Title);
        }
    }

    #[test]
    fn convention_without_company_skips_company_section() {
        let content = document_content(DocumentType::Convention, &view());
        assert!(!content
            .sections
            .iter()
            .flat_map(|s| &s.lines)
            .any(|l| l.text.contains("Entreprise bénéficiaire")));
    }

    #[test]
    fn attendance_sheet_lists_schedule_slots() {
        let content = document_content(DocumentType::AttendanceSheet, &view());
        let texts: Vec<&str> = content
            .sections
            .iter()
            .flat_map(|s| &s.lines)
            .map(|l| l.text.as_str())
            .collect();
        assert!(texts.contains(&"9h00 - 12h30"));
        assert!(texts.contains(&"14h00 - 17h30"));
    }
}
