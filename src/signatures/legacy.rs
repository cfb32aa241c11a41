//! Legacy signature vocabulary
//!
//! Before the canonical table existed, signatures were stored as generic
//! `documents` rows identified by a human-readable French title. The exact
//! title strings and the URL heuristics used to repair mistyped rows live
//! here so the diagnostic and migration engines share one vocabulary.

use crate::models::{DocumentType, SignatureType};

/// Exact legacy titles, one per signature type. Matching is by full string
/// equality after trimming; anything else is unmappable.
const TITLE_MAP: &[(&str, SignatureType)] = &[
    ("Signature du participant", SignatureType::Participant),
    ("Signature du représentant", SignatureType::Representative),
    ("Signature du représentant légal", SignatureType::Representative),
    ("Signature du formateur", SignatureType::Trainer),
    ("Tampon de l'entreprise", SignatureType::CompanySeal),
    ("Tampon de l'organisme", SignatureType::OrganizationSeal),
    ("Tampon de l'organisme de formation", SignatureType::OrganizationSeal),
];

/// Substrings found in stored asset URLs, checked in order. Kept narrow on
/// purpose: a URL that matches none of these stays unclassified.
const URL_HINTS: &[(&str, SignatureType)] = &[
    ("organizationseal", SignatureType::OrganizationSeal),
    ("organisme", SignatureType::OrganizationSeal),
    ("companyseal", SignatureType::CompanySeal),
    ("tampon", SignatureType::CompanySeal),
    ("representative", SignatureType::Representative),
    ("representant", SignatureType::Representative),
    ("trainer", SignatureType::Trainer),
    ("formateur", SignatureType::Trainer),
    ("participant", SignatureType::Participant),
];

/// Map a legacy row title to its signature type.
pub fn signature_type_from_title(title: &str) -> Option<SignatureType> {
    let title = title.trim();
    TITLE_MAP
        .iter()
        .find(|(known, _)| *known == title)
        .map(|(_, sig)| *sig)
}

/// The title a legacy row of this type should carry.
pub fn canonical_title(signature_type: SignatureType) -> &'static str {
    match signature_type {
        SignatureType::Participant => "Signature du participant",
        SignatureType::Representative => "Signature du représentant",
        SignatureType::Trainer => "Signature du formateur",
        SignatureType::CompanySeal => "Tampon de l'entreprise",
        SignatureType::OrganizationSeal => "Tampon de l'organisme",
    }
}

/// Decode a legacy document-type string, defaulting to convention for the
/// oldest rows that predate the field.
pub fn document_type_from_str(raw: Option<&str>) -> DocumentType {
    raw.and_then(DocumentType::parse)
        .unwrap_or(DocumentType::Convention)
}

/// Guess a signature type from the stored asset URL.
pub fn infer_signature_type_from_url(url: &str) -> Option<SignatureType> {
    let url = url.to_ascii_lowercase();
    URL_HINTS
        .iter()
        .find(|(hint, _)| url.contains(hint))
        .map(|(_, sig)| *sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_map_to_types() {
        assert_eq!(
            signature_type_from_title("Signature du formateur"),
            Some(SignatureType::Trainer)
        );
        assert_eq!(
            signature_type_from_title("  Tampon de l'entreprise  "),
            Some(SignatureType::CompanySeal)
        );
        assert_eq!(signature_type_from_title("Signature"), None);
    }

    #[test]
    fn canonical_titles_round_trip() {
        for sig in [
            SignatureType::Participant,
            SignatureType::Representative,
            SignatureType::Trainer,
            SignatureType::CompanySeal,
            SignatureType::OrganizationSeal,
        ] {
            assert_eq!(signature_type_from_title(canonical_title(sig)), Some(sig));
        }
    }

    #[test]
    fn document_type_defaults_to_convention() {
        assert_eq!(document_type_from_str(Some("certificate")), DocumentType::Certificate);
        assert_eq!(document_type_from_str(Some("facture")), DocumentType::Convention);
        assert_eq!(document_type_from_str(None), DocumentType::Convention);
    }

    #[test]
    fn url_hints_classify_assets() {
        assert_eq!(
            infer_signature_type_from_url("https://cdn/sig/trainer_convention_t-1.png"),
            Some(SignatureType::Trainer)
        );
        assert_eq!(
            infer_signature_type_from_url("https://cdn/Tampon-Entreprise.PNG"),
            Some(SignatureType::CompanySeal)
        );
        assert_eq!(infer_signature_type_from_url("https://cdn/logo.png"), None);
    }
}
