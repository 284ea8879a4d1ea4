//! Sort parameter translation.
//!
//! Turns parallel `sort_by[]` / `sort_order[]` request parameters into
//! ordering clauses on an [`EntityQuery`]. Keys resolve exactly like filter
//! keys: property first, then longest-field-name-first against the field
//! list; unrecognized keys are skipped. Sort precedence follows the order of
//! `sort_by`.
//!
//! A missing or empty direction entry falls back to `DESC`; anything else
//! must parse as `ASC` or `DESC` (case-insensitive) or the whole translation
//! fails before any ordering is applied.

use tracing::debug;

use crate::metadata::MetadataRegistry;
use crate::query::builder::EntityQuery;
use crate::query::errors::QueryResult;
use crate::query::operator::SortDirection;
use crate::query::resolve::resolve_field_column;

/// Adds ordering clauses for every recognized key in `sort_by`.
///
/// A rejected direction leaves `query` untouched.
pub fn apply_sorts<Q: EntityQuery>(
    query: &mut Q,
    metadata: &MetadataRegistry,
    entity_type: &str,
    sort_by: &[String],
    sort_order: &[String],
) -> QueryResult<()> {
    let meta = metadata.entity_meta(entity_type)?;

    // Parse every direction first; a rejected entry must leave the query
    // untouched.
    let mut resolved = Vec::with_capacity(sort_by.len());
    for (index, key) in sort_by.iter().enumerate() {
        let direction = match sort_order
            .get(index)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
        {
            Some(token) => SortDirection::parse(token)?,
            None => SortDirection::default(),
        };
        resolved.push((key, direction));
    }

    for (key, direction) in resolved {
        if let Some(column) = meta.property_column(key) {
            query.property_order_by(column, direction);
            continue;
        }
        if let Some((field, column)) = resolve_field_column(&meta, key) {
            query.field_order_by(&field.name, column, direction);
            continue;
        }
        debug!(entity_type, key = key.as_str(), "unmatched sort key skipped");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{EntityTypeDef, FieldDef, FieldType, MetadataRegistry};
    use crate::query::builder::{OrderBy, RecordedQuery};
    use crate::query::errors::QueryError;

    fn registry() -> MetadataRegistry {
        let mut registry = MetadataRegistry::new();
        registry
            .register_field(FieldDef::new("body", FieldType::TextWithSummary))
            .unwrap();
        registry
            .register_field(FieldDef::new("field_weight", FieldType::NumberInteger))
            .unwrap();
        registry
            .register_entity_type(
                EntityTypeDef::new("node")
                    .with_property("created", "created")
                    .with_property("title", "title")
                    .with_bundle("article", &["body", "field_weight"]),
            )
            .unwrap();
        registry
    }

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_property_sort_defaults_to_descending() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        apply_sorts(&mut query, &registry, "node", &keys(&["created"]), &[]).unwrap();
        assert_eq!(
            query.orderings,
            vec![OrderBy::property("created", SortDirection::Desc)]
        );
    }

    #[test]
    fn test_sort_precedence_follows_key_order() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        apply_sorts(
            &mut query,
            &registry,
            "node",
            &keys(&["field_weight", "created", "title"]),
            &keys(&["asc", "", "ASC"]),
        )
        .unwrap();
        assert_eq!(
            query.orderings,
            vec![
                OrderBy::field("field_weight", "value", SortDirection::Asc),
                OrderBy::property("created", SortDirection::Desc),
                OrderBy::property("title", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_field_column_suffix_sort() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        apply_sorts(
            &mut query,
            &registry,
            "node",
            &keys(&["body_value"]),
            &keys(&["ASC"]),
        )
        .unwrap();
        assert_eq!(
            query.orderings,
            vec![OrderBy::field("body", "value", SortDirection::Asc)]
        );
    }

    #[test]
    fn test_unmatched_sort_key_skipped() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        apply_sorts(
            &mut query,
            &registry,
            "node",
            &keys(&["made_up", "created"]),
            &keys(&["ASC", "ASC"]),
        )
        .unwrap();
        assert_eq!(
            query.orderings,
            vec![OrderBy::property("created", SortDirection::Asc)]
        );
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        let err = apply_sorts(
            &mut query,
            &registry,
            "node",
            &keys(&["created"]),
            &keys(&["sideways"]),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidDirection("sideways".to_string()));
    }

    #[test]
    fn test_rejected_direction_applies_nothing() {
        let registry = registry();
        let mut query = RecordedQuery::new();
        // The first pair would translate on its own.
        let err = apply_sorts(
            &mut query,
            &registry,
            "node",
            &keys(&["created", "title"]),
            &keys(&["ASC", "sideways"]),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidDirection("sideways".to_string()));
        assert!(query.orderings.is_empty());
    }
}
