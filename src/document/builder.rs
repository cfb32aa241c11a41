//! Document model builder
//!
//! Pure, synchronous assembly of the [`DocumentViewModel`] from already
//! loaded records. The fixed flag→sentence tables live here so every
//! template describes methods with exactly the same wording.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::document::{CompanyView, DocumentViewModel, OrganizationView, ParticipantView};
use crate::models::{Company, OrganizationSettings, Participant, Training};
use crate::normalize::MethodSet;

/// Sentence emitted when no flag of a category is set.
pub const METHOD_PLACEHOLDER: &str = "Méthode non spécifiée.";

const DATE_PLACEHOLDER: &str = "Dates à définir";

static EVALUATION_SENTENCES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("qcm", "QCM d'évaluation des acquis en fin de formation."),
        ("practical_exercises", "Exercices pratiques corrigés tout au long de la formation."),
        ("continuous_assessment", "Évaluation continue des acquis pendant la formation."),
        ("final_evaluation", "Évaluation finale des compétences acquises."),
        ("satisfaction_survey", "Questionnaire de satisfaction remis aux stagiaires."),
    ]
});

static TRACKING_SENTENCES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("attendance_sheet", "Feuilles de présence émargées par demi-journée."),
        ("completion_certificate", "Attestation de fin de formation remise au stagiaire."),
        ("connection_logs", "Relevés de connexion à la plateforme de formation."),
        ("work_submissions", "Travaux rendus par les stagiaires."),
    ]
});

static PEDAGOGICAL_SENTENCES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("theoretical_input", "Apports théoriques illustrés d'exemples concrets."),
        ("case_studies", "Études de cas issues de situations réelles."),
        ("group_work", "Travaux en sous-groupes et mises en commun."),
        ("demonstrations", "Démonstrations pas à pas par le formateur."),
        ("role_playing", "Mises en situation et jeux de rôle."),
    ]
});

static MATERIAL_SENTENCES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("training_room", "Salle de formation équipée."),
        ("video_projector", "Vidéoprojecteur et support visuel."),
        ("course_materials", "Support de cours remis à chaque stagiaire."),
        ("individual_computer", "Poste informatique individuel."),
        ("online_platform", "Accès à la plateforme de formation en ligne."),
    ]
});

/// Build the view model every document template consumes.
///
/// Pure and synchronous: the caller resolves the company lookup (and any
/// other I/O) beforehand. Never fails and never leaves a field undefined —
/// absent data degrades to placeholders.
pub fn build_document_model(
    training: &Training,
    participant: &Participant,
    company: Option<&Company>,
    organization: &OrganizationSettings,
) -> DocumentViewModel {
    DocumentViewModel {
        training_id: training.id.clone(),
        training_title: training.title.clone(),
        date_range: date_range_label(training.start_date.as_deref(), training.end_date.as_deref()),
        duration: training.duration.clone(),
        schedule: training.schedule.clone(),
        trainer_name: training.trainer_name.clone(),
        price_label: training.price.map(|p| format!("{:.2} € HT", p)),
        objectives: training.objectives.clone(),
        evaluation_descriptions: describe_methods(&training.evaluation_methods, &EVALUATION_SENTENCES),
        tracking_descriptions: describe_methods(&training.tracking_methods, &TRACKING_SENTENCES),
        pedagogical_descriptions: describe_methods(
            &training.pedagogical_methods,
            &PEDAGOGICAL_SENTENCES,
        ),
        material_descriptions: describe_methods(&training.material_elements, &MATERIAL_SENTENCES),
        participant: ParticipantView {
            first_name: participant.first_name.clone(),
            last_name: participant.last_name.clone(),
            full_name: participant.full_name(),
            job_title: participant.job_title.clone(),
            email: participant.email.clone(),
            company_name: participant
                .company_name
                .clone()
                .or_else(|| company.map(|c| c.name.clone())),
        },
        company: company.map(|c| CompanyView {
            name: c.name.clone(),
            address: c.address(),
            siret: c.siret.clone(),
            contact_email: c.contact_email.clone(),
            contact_phone: c.contact_phone.clone(),
        }),
        organization: OrganizationView {
            name: organization.name.clone(),
            address: organization.address(),
            siret: organization.siret.clone(),
            declaration_number: organization.declaration_number.clone(),
            representative_name: organization.representative_name.clone(),
        },
    }
}

/// Human-readable date range: "du {start} au {end}" when both differ,
/// "le {start}" when equal or end absent, a placeholder when nothing is set.
fn date_range_label(start: Option<&str>, end: Option<&str>) -> String {
    match (start, end) {
        (Some(s), Some(e)) if s != e => format!("du {} au {}", format_date(s), format_date(e)),
        (Some(s), _) => format!("le {}", format_date(s)),
        (None, Some(e)) => format!("le {}", format_date(e)),
        (None, None) => DATE_PLACEHOLDER.to_string(),
    }
}

/// Render an ISO date as `dd/mm/yyyy`; pass free text through unchanged.
fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Map each set flag to its fixed sentence, in table order. All-false sets
/// yield the single placeholder sentence.
fn describe_methods(set: &MethodSet, table: &[(&'static str, &'static str)]) -> Vec<String> {
    let sentences: Vec<String> = table
        .iter()
        .filter(|(flag, _)| set.get(*flag).copied().unwrap_or(false))
        .map(|(_, sentence)| sentence.to_string())
        .collect();
    if sentences.is_empty() {
        vec![METHOD_PLACEHOLDER.to_string()]
    } else {
        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_variants() {
        assert_eq!(
            date_range_label(Some("2026-03-02"), Some("2026-03-04")),
            "du 02/03/2026 au 04/03/2026"
        );
        assert_eq!(date_range_label(Some("2026-03-02"), Some("2026-03-02")), "le 02/03/2026");
        assert_eq!(date_range_label(Some("2026-03-02"), None), "le 02/03/2026");
        assert_eq!(date_range_label(None, None), DATE_PLACEHOLDER);
    }

    #[test]
    fn free_text_dates_pass_through() {
        assert_eq!(date_range_label(Some("mars 2026"), None), "le mars 2026");
    }

    #[test]
    fn all_false_methods_yield_placeholder() {
        let set = crate::normalize::evaluation_defaults();
        assert_eq!(describe_methods(&set, &EVALUATION_SENTENCES), vec![METHOD_PLACEHOLDER]);
    }

    #[test]
    fn set_flags_map_to_sentences_in_table_order() {
        let mut set = crate::normalize::evaluation_defaults();
        set.insert("satisfaction_survey".into(), true);
        set.insert("qcm".into(), true);
        let out = describe_methods(&set, &EVALUATION_SENTENCES);
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("QCM"));
        assert!(out[1].starts_with("Questionnaire"));
    }
}
