//! Objective list normalization

use serde_json::Value;

/// Placeholder emitted when no usable objective can be extracted. Documents
/// must always print at least one objective line.
pub const OBJECTIVE_PLACEHOLDER: &str = "Objectif à définir";

/// Normalize a stored objectives field into a non-empty ordered list.
///
/// Accepted shapes, in order of trust:
/// - native array → element strings, unchanged;
/// - string that parses as a JSON array → its elements;
/// - string that parses as a JSON object → its values;
/// - plain string containing newlines or bullet markers → split and
///   stripped of leading markers;
/// - any other plain string → single-element list;
/// - null or anything else → the placeholder list.
///
/// Never errors, and is idempotent: feeding the output back in (as an
/// array) returns it unchanged.
pub fn normalize_objectives(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => non_empty(collect_strings(items)),
        Value::String(s) => normalize_from_string(s),
        _ => placeholder(),
    }
}

fn normalize_from_string(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return placeholder();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => non_empty(collect_strings(&items)),
        Ok(Value::Object(map)) => {
            let values: Vec<Value> = map.into_iter().map(|(_, v)| v).collect();
            non_empty(collect_strings(&values))
        }
        // Not JSON (or JSON of an unusable kind): treat as plain text.
        _ => non_empty(split_plain_text(trimmed)),
    }
}

fn split_plain_text(text: &str) -> Vec<String> {
    let parts: Vec<&str> = if text.contains('\n') {
        text.lines().collect()
    } else if text.contains('•') {
        text.split('•').collect()
    } else {
        return vec![text.to_string()];
    };
    parts
        .into_iter()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strip one leading bullet marker and surrounding whitespace.
fn strip_bullet(line: &str) -> String {
    let trimmed = line.trim();
    let stripped = trimmed
        .strip_prefix('•')
        .or_else(|| trimmed.strip_prefix('-'))
        .or_else(|| trimmed.strip_prefix('–'))
        .or_else(|| trimmed.strip_prefix('*'))
        .unwrap_or(trimmed);
    stripped.trim().to_string()
}

fn collect_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn non_empty(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        placeholder()
    } else {
        items
    }
}

fn placeholder() -> Vec<String> {
    vec![OBJECTIVE_PLACEHOLDER.to_string()]
}
