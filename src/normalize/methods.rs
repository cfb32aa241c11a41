//! Method-set normalization
//!
//! A training carries four independent method categories (evaluation,
//! tracking, pedagogical, material), each a fixed set of named boolean
//! flags. Rows store them as native objects, JSON-encoded strings, or not at
//! all; normalization always yields a fully-populated flag set.

use std::collections::BTreeMap;

use serde_json::Value;

/// A fixed set of named boolean flags for one method category.
pub type MethodSet = BTreeMap<String, bool>;

/// Flag keys per category. Defaults are all-false: a category with no flag
/// set renders as the placeholder sentence.
pub const EVALUATION_FLAGS: &[&str] = &[
    "qcm",
    "practical_exercises",
    "continuous_assessment",
    "final_evaluation",
    "satisfaction_survey",
];

pub const TRACKING_FLAGS: &[&str] = &[
    "attendance_sheet",
    "completion_certificate",
    "connection_logs",
    "work_submissions",
];

pub const PEDAGOGICAL_FLAGS: &[&str] = &[
    "theoretical_input",
    "case_studies",
    "group_work",
    "demonstrations",
    "role_playing",
];

pub const MATERIAL_FLAGS: &[&str] = &[
    "training_room",
    "video_projector",
    "course_materials",
    "individual_computer",
    "online_platform",
];

fn defaults_from(flags: &[&str]) -> MethodSet {
    flags.iter().map(|k| (k.to_string(), false)).collect()
}

pub fn evaluation_defaults() -> MethodSet {
    defaults_from(EVALUATION_FLAGS)
}

pub fn tracking_defaults() -> MethodSet {
    defaults_from(TRACKING_FLAGS)
}

pub fn pedagogical_defaults() -> MethodSet {
    defaults_from(PEDAGOGICAL_FLAGS)
}

pub fn material_defaults() -> MethodSet {
    defaults_from(MATERIAL_FLAGS)
}

/// Merge a stored method-set value over the category defaults.
///
/// Objects win per key; JSON-encoded strings are parsed then merged;
/// anything else returns the defaults unchanged. Flag values are coerced
/// from booleans, numbers (non-zero = true) and `"true"`/`"1"` strings,
/// since every generation of the form serialized them differently. Never
/// errors; every default key is always present in the output.
pub fn normalize_method_set(raw: &Value, defaults: &MethodSet) -> MethodSet {
    let mut merged = defaults.clone();
    let stored = match raw {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .and_then(|v| v.as_object().cloned()),
        _ => None,
    };
    if let Some(map) = stored {
        for (key, value) in map {
            merged.insert(key, coerce_flag(&value));
        }
    }
    merged
}

fn coerce_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    }
}
