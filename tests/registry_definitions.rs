//! Registry Definition Tests
//!
//! Loading and interrogating entity metadata:
//! - JSON document and file loading, with rejection of bad input
//! - Property maps: stored columns, computed exclusion, revision markers
//! - Field maps scoped to a bundle or the union of bundles
//! - Derived value types
//! - One-time build of derived tables

use restfold::metadata::{
    EntityTypeDef, FieldDef, FieldType, MetadataError, MetadataRegistry, ValueType,
    CARDINALITY_UNLIMITED,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const DEFINITIONS: &str = r#"{
    "fields": [
        {"name": "body", "type": "text_with_summary"},
        {"name": "field_subtitle", "type": "text"},
        {"name": "field_tags", "type": "taxonomy_term_reference", "cardinality": -1},
        {"name": "field_featured", "type": "list_boolean"},
        {
            "name": "field_color",
            "type": "list_text",
            "options": {"red": "Red", "blue": "Blue"}
        }
    ],
    "entity_types": [
        {
            "name": "node",
            "description": "Content items",
            "revisioned": true,
            "properties": [
                {"name": "nid", "column": "nid"},
                {"name": "title", "column": "title"},
                {"name": "status", "column": "status"},
                {"name": "edit_url"}
            ],
            "bundles": {
                "article": {"fields": ["body", "field_subtitle", "field_tags", "field_color"]},
                "page": {"fields": ["body", "field_featured"]}
            }
        }
    ]
}"#;

fn setup_registry() -> MetadataRegistry {
    MetadataRegistry::from_json(DEFINITIONS).unwrap()
}

fn write_definitions(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.display().to_string()
}

// =============================================================================
// Loading Tests
// =============================================================================

/// A definitions document loads fields and entity types.
#[test]
fn test_from_json_loads_definitions() {
    let registry = setup_registry();

    let field = registry.field("field_tags").unwrap();
    assert_eq!(field.field_type, FieldType::TaxonomyTermReference);
    assert_eq!(field.cardinality, CARDINALITY_UNLIMITED);
    assert_eq!(field.columns, vec!["tid"]);

    let node = registry.entity_type("node").unwrap();
    assert_eq!(node.description.as_deref(), Some("Content items"));
    assert!(node.revisioned);
    assert_eq!(node.bundles.len(), 2);
}

/// The same definitions load from a file on disk.
#[test]
fn test_load_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_definitions(&tmp, "entities.json", DEFINITIONS);

    let registry = MetadataRegistry::load_file(&path).unwrap();
    assert!(registry.field("body").is_some());
    assert!(registry.entity_type("node").is_some());
}

/// A missing definitions file reports the path.
#[test]
fn test_load_file_missing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("absent.json").display().to_string();

    let err = MetadataRegistry::load_file(&path).unwrap_err();
    match err {
        MetadataError::DefinitionsFile { path: reported, .. } => {
            assert!(reported.contains("absent.json"))
        }
        other => panic!("expected DefinitionsFile error, got {other:?}"),
    }
}

/// Malformed JSON is rejected, from strings and files alike.
#[test]
fn test_invalid_definitions_rejected() {
    let err = MetadataRegistry::from_json("{not json").unwrap_err();
    assert!(matches!(err, MetadataError::InvalidDefinitions(_)));

    let tmp = TempDir::new().unwrap();
    let path = write_definitions(&tmp, "bad.json", "{not json");
    let err = MetadataRegistry::load_file(&path).unwrap_err();
    assert!(matches!(err, MetadataError::DefinitionsFile { .. }));
}

/// Duplicate registrations are rejected.
#[test]
fn test_duplicate_definitions_rejected() {
    let mut registry = setup_registry();

    let err = registry
        .register_field(FieldDef::new("body", FieldType::Text))
        .unwrap_err();
    assert_eq!(
        err,
        MetadataError::Duplicate {
            kind: "field",
            name: "body".to_string()
        }
    );

    let err = registry
        .register_entity_type(EntityTypeDef::new("node"))
        .unwrap_err();
    assert_eq!(
        err,
        MetadataError::Duplicate {
            kind: "entity type",
            name: "node".to_string()
        }
    );
}

/// A bundle referencing an unregistered field is rejected.
#[test]
fn test_unregistered_bundle_field_rejected() {
    let mut registry = MetadataRegistry::new();
    let err = registry
        .register_entity_type(EntityTypeDef::new("node").with_bundle("article", &["field_ghost"]))
        .unwrap_err();
    assert_eq!(
        err,
        MetadataError::UnknownField {
            bundle: "article".to_string(),
            field: "field_ghost".to_string()
        }
    );
}

/// A bundle listing the same field twice is rejected at registration.
#[test]
fn test_duplicate_bundle_field_rejected() {
    let err = MetadataRegistry::from_json(
        r#"{
            "fields": [{"name": "body", "type": "text_with_summary"}],
            "entity_types": [
                {"name": "node", "bundles": {"article": {"fields": ["body", "body"]}}}
            ]
        }"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        MetadataError::Duplicate {
            kind: "bundle field",
            name: "article.body".to_string()
        }
    );
}

// =============================================================================
// Property Map Tests
// =============================================================================

/// Stored properties map to their columns; computed ones are excluded.
#[test]
fn test_property_map() {
    let registry = setup_registry();
    let properties = registry.entity_type_properties("node").unwrap();

    assert_eq!(properties.get("nid"), Some(&"nid".to_string()));
    assert_eq!(properties.get("title"), Some(&"title".to_string()));
    assert_eq!(properties.get("status"), Some(&"status".to_string()));
    assert_eq!(properties.get("edit_url"), None);
}

/// Revisioned entity types gain revision and log property markers.
#[test]
fn test_revision_markers() {
    let registry = setup_registry();
    let properties = registry.entity_type_properties("node").unwrap();
    assert_eq!(properties.get("revision"), Some(&"revision".to_string()));
    assert_eq!(properties.get("log"), Some(&"log".to_string()));

    let mut plain = MetadataRegistry::new();
    plain
        .register_entity_type(EntityTypeDef::new("term").with_property("tid", "tid"))
        .unwrap();
    let properties = plain.entity_type_properties("term").unwrap();
    assert_eq!(properties.get("revision"), None);
    assert_eq!(properties.get("log"), None);
}

/// Unknown entity types are an error, not an empty map.
#[test]
fn test_unknown_entity_type() {
    let registry = setup_registry();
    assert_eq!(
        registry.entity_type_properties("taxonomy_term").unwrap_err(),
        MetadataError::UnknownEntityType("taxonomy_term".to_string())
    );
}

// =============================================================================
// Field Map Tests
// =============================================================================

/// Bundle-scoped field maps list only that bundle's fields.
#[test]
fn test_bundle_scoped_fields() {
    let registry = setup_registry();

    let page = registry.entity_type_fields("node", Some("page")).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.get("body"), Some(&ValueType::Text));
    assert_eq!(page.get("field_featured"), Some(&ValueType::Boolean));
    assert_eq!(page.get("field_tags"), None);
}

/// The unscoped field map is the union over all bundles.
#[test]
fn test_union_fields() {
    let registry = setup_registry();
    let union = registry.entity_type_fields("node", None).unwrap();

    assert_eq!(union.len(), 5);
    assert_eq!(
        union.get("field_tags"),
        Some(&ValueType::List(Box::new(ValueType::TaxonomyTerm)))
    );
    assert_eq!(union.get("field_subtitle"), Some(&ValueType::Text));
}

/// Unknown bundles are an error.
#[test]
fn test_unknown_bundle() {
    let registry = setup_registry();
    assert_eq!(
        registry.entity_type_fields("node", Some("webform")).unwrap_err(),
        MetadataError::UnknownBundle {
            entity_type: "node".to_string(),
            bundle: "webform".to_string()
        }
    );
}

/// Derived value types render in the `list<inner>` notation.
#[test]
fn test_value_type_notation() {
    let registry = setup_registry();
    let union = registry.entity_type_fields("node", None).unwrap();
    assert_eq!(
        union.get("field_tags").unwrap().to_string(),
        "list<taxonomy_term>"
    );
    assert_eq!(union.get("body").unwrap().to_string(), "text");
}

// =============================================================================
// Derived Table Caching Tests
// =============================================================================

/// Derived tables are built once and shared thereafter.
#[test]
fn test_derived_tables_cached() {
    let registry = setup_registry();
    let first = registry.entity_meta("node").unwrap();

    // Interrogation calls reuse the same derived tables.
    registry.entity_type_properties("node").unwrap();
    registry.entity_type_fields("node", None).unwrap();

    let second = registry.entity_meta("node").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
