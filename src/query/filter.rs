//! Filter parameter translation.
//!
//! Turns `filter[key]=value` / `filter_op[key]=operator` request parameters
//! into property and field conditions on an [`EntityQuery`]:
//!
//! - a key naming an entity property becomes a condition on its storage column
//! - any other key is resolved against the field list, longest field name
//!   first, as either a bare field name (single-column fields) or a
//!   `<field>_<column>` pair
//! - keys matching neither are skipped, so a stray parameter narrows nothing
//!
//! A missing or empty operator entry falls back to `=`; anything else must
//! parse as a known operator or the whole translation fails before any
//! condition is applied. List-taking operators split the value on commas
//! before the condition is added.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::metadata::{FieldType, MetadataRegistry};
use crate::query::builder::EntityQuery;
use crate::query::errors::QueryResult;
use crate::query::operator::FilterOperator;
use crate::query::resolve::resolve_field_column;

/// Adds filter conditions for every recognized key in `filters`.
///
/// Keys are applied in lexicographic order; conditions are all AND-combined,
/// ordering only keeps the translated output deterministic. A rejected
/// operator leaves `query` untouched.
pub fn apply_filters<Q: EntityQuery>(
    query: &mut Q,
    metadata: &MetadataRegistry,
    entity_type: &str,
    filters: &HashMap<String, String>,
    operators: &HashMap<String, String>,
) -> QueryResult<()> {
    let meta = metadata.entity_meta(entity_type)?;

    let mut entries: Vec<(&str, &str)> = filters
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    entries.sort_by_key(|(key, _)| *key);

    // Parse every operator first; a rejected entry must leave the query
    // untouched.
    let mut resolved = Vec::with_capacity(entries.len());
    for (key, raw) in entries {
        let operator = match operators.get(key).map(String::as_str).filter(|t| !t.is_empty()) {
            Some(token) => FilterOperator::parse(token)?,
            None => FilterOperator::default(),
        };
        resolved.push((key, raw, operator));
    }

    for (key, raw, operator) in resolved {
        let value = filter_value(raw, operator);

        if let Some(column) = meta.property_column(key) {
            query.property_condition(column, value, operator);
            continue;
        }
        if let Some((field, column)) = resolve_field_column(&meta, key) {
            let value = coerce_boolean(field.field_type, value);
            query.field_condition(&field.name, column, value, operator);
            continue;
        }
        debug!(entity_type, key, "unmatched filter key skipped");
    }
    Ok(())
}

/// Builds the condition value: a comma-split list for list-taking operators,
/// otherwise the raw string
fn filter_value(raw: &str, operator: FilterOperator) -> Value {
    if operator.takes_list() {
        Value::Array(
            raw.split(',')
                .map(|part| Value::String(part.to_string()))
                .collect(),
        )
    } else {
        Value::String(raw.to_string())
    }
}

/// Converts `true`/`false` strings to 1/0 for boolean list fields
fn coerce_boolean(field_type: FieldType, value: Value) -> Value {
    if field_type != FieldType::ListBoolean {
        return value;
    }
    match value.as_str() {
        Some("true") => Value::from(1),
        Some("false") => Value::from(0),
        _ => value,
    }
}
