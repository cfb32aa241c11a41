//! Field normalization
//!
//! The admin forms stored objectives, method sets and schedules in whatever
//! shape the UI of the day produced: native arrays, JSON-encoded strings,
//! bulleted plain text, or nothing at all. These functions turn each shape
//! into one canonical value, deterministically and without ever failing, so
//! the generated documents are self-consistent no matter which legacy form
//! wrote the row.
//!
//! Every function here is pure and side-effect free. Callers decode store
//! rows through [`crate::models`], which is the single place these functions
//! are applied; the ambiguous external shape must not leak past it.

pub mod methods;
pub mod objectives;

pub use methods::{
    evaluation_defaults, material_defaults, normalize_method_set, pedagogical_defaults,
    tracking_defaults, MethodSet,
};
pub use objectives::{normalize_objectives, OBJECTIVE_PLACEHOLDER};

use serde_json::Value;

/// Normalize a stored schedule descriptor into display text.
///
/// Accepts free text, a JSON-encoded array, or a native array of either
/// strings or `{day, start, end}` slot objects. Anything unusable yields
/// `None`; the document builder renders its own placeholder.
pub fn normalize_schedule(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(items)) => schedule_from_slots(&items),
                _ => Some(trimmed.to_string()),
            }
        }
        Value::Array(items) => schedule_from_slots(items),
        _ => None,
    }
}

fn schedule_from_slots(items: &[Value]) -> Option<String> {
    let lines: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(slot) => {
                let start = slot.get("start").and_then(Value::as_str)?;
                let end = slot.get("end").and_then(Value::as_str)?;
                match slot.get("day").and_then(Value::as_str) {
                    Some(day) => Some(format!("{} : {} - {}", day, start, end)),
                    None => Some(format!("{} - {}", start, end)),
                }
            }
            _ => None,
        })
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
