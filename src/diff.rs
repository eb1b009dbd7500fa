//! Changed-settings detection between two chart form data objects
//!
//! A saved chart and the form data currently being explored are compared
//! key by key. Values that are "empty-ish" (null, missing, empty string or
//! empty array) compare equal to each other, and the filter clauses are
//! ignored since they are reported elsewhere.

use serde::Serialize;
use serde_json::{Map, Value};

/// Form data keys that never count as altered settings
const IGNORED_KEYS: [&str; 3] = ["filters", "having", "where"];

/// One changed setting. `None` means the key is absent on that side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDiff {
    pub key: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

/// All settings that differ, ordered by key
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlteredSettings {
    pub diffs: Vec<SettingDiff>,
}

impl AlteredSettings {
    pub fn is_altered(&self) -> bool {
        !self.diffs.is_empty()
    }

    /// `(key, before, after)` rows with display-formatted values
    pub fn rows(&self) -> Vec<(String, String, String)> {
        self.diffs
            .iter()
            .map(|diff| {
                (
                    diff.key.clone(),
                    format_diff_value(diff.before.as_ref()),
                    format_diff_value(diff.after.as_ref()),
                )
            })
            .collect()
    }
}

/// Compare every key of `current` with the same key of `original`
pub fn diff_form_data(original: &Map<String, Value>, current: &Map<String, Value>) -> AlteredSettings {
    let diffs = current
        .iter()
        .filter(|(key, _)| !IGNORED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, after)| {
            let before = original.get(key);
            if is_falsy(before) && is_falsy(Some(after)) {
                return None;
            }
            if is_equalish(before, Some(after)) {
                return None;
            }
            Some(SettingDiff {
                key: key.clone(),
                before: before.cloned(),
                after: Some(after.clone()),
            })
        })
        .collect();
    AlteredSettings { diffs }
}

fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn is_emptyish(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn is_equalish(a: Option<&Value>, b: Option<&Value>) -> bool {
    if is_emptyish(a) && is_emptyish(b) {
        return true;
    }
    match (a, b) {
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| is_equalish(Some(a), Some(b)))
        }
        (Some(Value::Object(x)), Some(Value::Object(y))) => {
            x.keys()
                .chain(y.keys())
                .all(|k| is_equalish(x.get(k), y.get(k)))
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (a, b) => a == b,
    }
}

/// Display text of a form data value
pub fn format_diff_value(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) if items.iter().all(is_adhoc_filter) => items
            .iter()
            .map(format_adhoc_filter)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .map(format_array_item)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn is_adhoc_filter(value: &Value) -> bool {
    value.get("operator").is_some() && value.get("subject").is_some()
}

/// `subject operator comparator`, with list comparators in brackets
fn format_adhoc_filter(filter: &Value) -> String {
    let text = |v: Option<&Value>| match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "undefined".to_string(),
        Some(other) => other.to_string(),
    };
    let comparator = match filter.get("comparator") {
        Some(Value::Array(items)) => format!(
            "[{}]",
            items
                .iter()
                .map(|item| text(Some(item)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        other => text(other),
    };
    format!(
        "{} {} {}",
        text(filter.get("subject")),
        text(filter.get("operator")),
        comparator
    )
}

/// Array items show their `label` when they have one (metrics, columns)
fn format_array_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(object) => match object.get("label") {
            Some(Value::String(label)) => label.clone(),
            Some(label) => label.to_string(),
            None => item.to_string(),
        },
        other => other.to_string(),
    }
}
