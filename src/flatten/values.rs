//! Raw value extraction and column reduction.
//!
//! Stored field values arrive as a language map of delta lists, each delta an
//! object keyed by storage column. These helpers strip the language layer and
//! collapse single-column deltas to their bare values.

use serde_json::Value;

use crate::entity::{Entity, LANGUAGE_NONE};
use crate::metadata::FieldDef;

/// Extracts the delta list for the entity's language.
///
/// A top-level object is a language map: the entity's language is tried first,
/// then [`LANGUAGE_NONE`]. Bare lists and scalars are accepted as already
/// language-free.
pub(crate) fn language_items(entity: &Entity, field_name: &str) -> Vec<Value> {
    let Some(value) = entity.get(field_name) else {
        return Vec::new();
    };
    match value {
        Value::Null => Vec::new(),
        Value::Object(languages) => {
            let localized = languages
                .get(entity.effective_language())
                .or_else(|| languages.get(LANGUAGE_NONE));
            match localized {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other.clone()],
            }
        }
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Collapses one delta: single-column fields yield the bare column value,
/// multi-column fields keep the delta object.
pub(crate) fn reduce_delta(field: &FieldDef, delta: &Value) -> Value {
    match (delta, field.single_column()) {
        (Value::Object(columns), Some(column)) => {
            columns.get(column).cloned().unwrap_or(Value::Null)
        }
        _ => delta.clone(),
    }
}

/// Collapses a delta list according to cardinality: multi-value fields keep a
/// list, single-value fields yield the first delta or null.
pub(crate) fn reduce_items(field: &FieldDef, items: &[Value]) -> Value {
    if field.is_multiple() {
        Value::Array(items.iter().map(|delta| reduce_delta(field, delta)).collect())
    } else {
        items
            .first()
            .map(|delta| reduce_delta(field, delta))
            .unwrap_or(Value::Null)
    }
}
