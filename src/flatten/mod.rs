//! Entity field flattening
//!
//! Rewrites stored field structures into plain JSON shapes for API responses:
//!
//! - language maps collapse to the entity's language (neutral fallback)
//! - single-column deltas collapse to bare values; single-cardinality fields
//!   to one value or null, multi-cardinality fields to a list
//! - file and image fields gain a `<field>_url` companion holding resolved
//!   URLs (empty string where no URL can be produced)
//! - taxonomy references become `{id, name}` objects
//! - enumerated text becomes `{machine_name, label}` objects, the label
//!   falling back to the machine value when none is registered
//!
//! # Invariants
//!
//! - Flattening is destructive and not idempotent: a second pass would read
//!   already-flattened shapes as raw ones. Run it on a disposable copy
//!   ([`Flattener::flattened`] clones for you), never on a shared instance.
//! - Entity-level properties and unknown keys pass through untouched.
//! - Every field attached to the bundle is written, including fields the
//!   entity carried no value for (their empty shape).

mod values;

use serde_json::{json, Value};
use tracing::trace;

use crate::entity::Entity;
use crate::files::UrlResolver;
use crate::metadata::{FieldDef, FieldType, MetadataError, MetadataRegistry, MetadataResult};
use values::{language_items, reduce_delta, reduce_items};

/// Flattens entity fields using registered metadata and a URL resolver
pub struct Flattener<'a> {
    metadata: &'a MetadataRegistry,
    urls: &'a dyn UrlResolver,
}

impl<'a> Flattener<'a> {
    /// Creates a flattener over a registry and URL resolver
    pub fn new(metadata: &'a MetadataRegistry, urls: &'a dyn UrlResolver) -> Self {
        Self { metadata, urls }
    }

    /// Flattens every bundle field of the entity in place
    pub fn flatten(&self, entity: &mut Entity) -> MetadataResult<()> {
        let meta = self.metadata.entity_meta(entity.entity_type())?;
        let fields = meta
            .bundle_fields(entity.bundle())
            .ok_or_else(|| MetadataError::UnknownBundle {
                entity_type: entity.entity_type().to_string(),
                bundle: entity.bundle().to_string(),
            })?;

        for field in fields {
            let items = language_items(entity, &field.name);
            if field.field_type.is_file() {
                entity.set(format!("{}_url", field.name), self.url_values(field, &items));
            }
            entity.set(field.name.clone(), flatten_primary(field, &items));
        }

        trace!(
            entity_type = entity.entity_type(),
            bundle = entity.bundle(),
            fields = fields.len(),
            "flattened entity fields"
        );
        Ok(())
    }

    /// Returns a flattened copy, leaving the original untouched
    pub fn flattened(&self, entity: &Entity) -> MetadataResult<Entity> {
        let mut copy = entity.clone();
        self.flatten(&mut copy)?;
        Ok(copy)
    }

    /// Builds the `<field>_url` companion value for a file-backed field
    fn url_values(&self, field: &FieldDef, items: &[Value]) -> Value {
        if field.is_multiple() {
            Value::Array(
                items
                    .iter()
                    .map(|delta| Value::String(self.delta_url(delta)))
                    .collect(),
            )
        } else {
            Value::String(
                items
                    .first()
                    .map(|delta| self.delta_url(delta))
                    .unwrap_or_default(),
            )
        }
    }

    /// Resolves one delta's URI; empty string when nothing can be served
    fn delta_url(&self, delta: &Value) -> String {
        delta
            .get("uri")
            .and_then(Value::as_str)
            .filter(|uri| !uri.is_empty())
            .and_then(|uri| self.urls.url(uri))
            .unwrap_or_default()
    }
}

fn flatten_primary(field: &FieldDef, items: &[Value]) -> Value {
    match field.field_type {
        FieldType::TaxonomyTermReference => {
            if field.is_multiple() {
                Value::Array(items.iter().map(term_ref).collect())
            } else {
                items.first().map(term_ref).unwrap_or(Value::Null)
            }
        }
        FieldType::ListText => {
            if field.is_multiple() {
                Value::Array(items.iter().map(|delta| labeled_option(field, delta)).collect())
            } else {
                let raw = reduce_items(field, items);
                labeled_scalar(field, &raw).unwrap_or(raw)
            }
        }
        _ => reduce_items(field, items),
    }
}

/// Formats a term delta as `{id, name}`; the name defaults to empty
fn term_ref(delta: &Value) -> Value {
    match delta {
        Value::Object(columns) => {
            let id = columns.get("tid").cloned().unwrap_or(Value::Null);
            let name = columns.get("name").and_then(Value::as_str).unwrap_or("");
            json!({ "id": id, "name": name })
        }
        other => json!({ "id": other.clone(), "name": "" }),
    }
}

/// Formats one enumerated delta as `{machine_name, label}`
fn labeled_option(field: &FieldDef, delta: &Value) -> Value {
    let machine = reduce_delta(field, delta);
    let label = machine
        .as_str()
        .and_then(|value| field.option_label(value))
        .map(|label| Value::String(label.to_string()))
        .unwrap_or_else(|| machine.clone());
    json!({ "machine_name": machine, "label": label })
}

/// Labels a single enumerated value, if a non-empty label is registered
fn labeled_scalar(field: &FieldDef, raw: &Value) -> Option<Value> {
    let value = raw.as_str()?;
    let label = field.option_label(value)?;
    Some(json!({ "machine_name": value, "label": label }))
}
