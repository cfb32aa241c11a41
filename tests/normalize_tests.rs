//! Tests for field normalization of heterogeneous training metadata

use serde_json::json;
use training_docs_sdk::normalize::{
    evaluation_defaults, material_defaults, normalize_method_set, normalize_objectives,
    normalize_schedule, pedagogical_defaults, tracking_defaults, OBJECTIVE_PLACEHOLDER,
};

mod objectives {
    use super::*;

    #[test]
    fn test_array_passes_through() {
        let out = normalize_objectives(&json!(["Savoir X", "Savoir Y"]));
        assert_eq!(out, vec!["Savoir X", "Savoir Y"]);
    }

    #[test]
    fn test_json_string_array_is_parsed() {
        let out = normalize_objectives(&json!("[\"Savoir X\",\"Savoir Y\"]"));
        assert_eq!(out, vec!["Savoir X", "Savoir Y"]);
    }

    #[test]
    fn test_json_object_values_are_collected() {
        let out = normalize_objectives(&json!("{\"0\":\"Premier\",\"1\":\"Second\"}"));
        assert_eq!(out.len(), 2);
        assert!(out.contains(&"Premier".to_string()));
        assert!(out.contains(&"Second".to_string()));
    }

    #[test]
    fn test_plain_text_splits_on_newlines_and_bullets() {
        let out = normalize_objectives(&json!("• Lire le code\n• Écrire des tests"));
        assert_eq!(out, vec!["Lire le code", "Écrire des tests"]);
    }

    #[test]
    fn test_null_and_junk_degrade_to_placeholder() {
        assert_eq!(normalize_objectives(&json!(null)), vec![OBJECTIVE_PLACEHOLDER]);
        assert_eq!(normalize_objectives(&json!(42)), vec![OBJECTIVE_PLACEHOLDER]);
        assert_eq!(normalize_objectives(&json!([])), vec![OBJECTIVE_PLACEHOLDER]);
        assert_eq!(normalize_objectives(&json!("   ")), vec![OBJECTIVE_PLACEHOLDER]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = vec![
            json!(["Savoir X"]),
            json!("[\"Savoir X\"]"),
            json!("• Un\n• Deux"),
            json!(null),
        ];
        for input in inputs {
            let once = normalize_objectives(&input);
            let twice = normalize_objectives(&json!(once.clone()));
            assert_eq!(once, twice);
        }
    }
}

mod methods {
    use super::*;

    #[test]
    fn test_output_always_carries_every_known_key() {
        let defaults = evaluation_defaults();
        for input in [json!(null), json!({"qcm": true}), json!("not json"), json!("{\"qcm\":1}")] {
            let out = normalize_method_set(&input, &defaults);
            for key in defaults.keys() {
                assert!(out.contains_key(key), "missing key {key} for input {input}");
            }
        }
    }

    #[test]
    fn test_json_string_merges_over_defaults() {
        let out = normalize_method_set(
            &json!("{\"practical_exercises\":true}"),
            &evaluation_defaults(),
        );
        assert!(out["practical_exercises"]);
        assert!(!out["qcm"]);
    }

    #[test]
    fn test_truthy_coercion() {
        let out = normalize_method_set(
            &json!({"qcm": 1, "final_evaluation": "true", "satisfaction_survey": 0}),
            &evaluation_defaults(),
        );
        assert!(out["qcm"]);
        assert!(out["final_evaluation"]);
        assert!(!out["satisfaction_survey"]);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let out = normalize_method_set(&json!({"examen_blanc": true}), &tracking_defaults());
        assert!(out["examen_blanc"]);
        assert!(out.contains_key("attendance_sheet"));
    }

    #[test]
    fn test_all_four_families_have_defaults() {
        assert!(!evaluation_defaults().is_empty());
        assert!(!tracking_defaults().is_empty());
        assert!(!pedagogical_defaults().is_empty());
        assert!(!material_defaults().is_empty());
    }
}

mod schedule {
    use super::*;

    #[test]
    fn test_free_text_passes_through() {
        assert_eq!(
            normalize_schedule(&json!("9h - 17h")),
            Some("9h - 17h".to_string())
        );
    }

    #[test]
    fn test_slot_array_is_formatted() {
        let out = normalize_schedule(&json!([
            {"day": "Lundi", "start": "09:00", "end": "12:30"},
            {"day": "Mardi", "start": "14:00", "end": "17:00"}
        ]))
        .unwrap();
        assert!(out.contains("Lundi : 09:00 - 12:30"));
        assert!(out.contains("Mardi : 14:00 - 17:00"));
    }

    #[test]
    fn test_null_is_none() {
        assert_eq!(normalize_schedule(&json!(null)), None);
    }
}
