//! Definition registry and derived lookup tables.
//!
//! The registry owns the raw field and entity-type definitions and lazily
//! builds one [`EntityTypeMeta`] per entity type: the property map, per-bundle
//! field lists and the prefix-ordered candidate list used to resolve
//! `<field>_<column>` keys. Derived tables are built once per process and
//! shared behind `Arc`, so repeated lookups never re-walk the definitions.
//!
//! Callers hold the registry explicitly and pass it to the flattener and the
//! query translators; there is no process-global instance.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::metadata::errors::{MetadataError, MetadataResult};
use crate::metadata::types::{EntityTypeDef, FieldDef, RegistryDoc, ValueType};

/// Derived lookup tables for one entity type
#[derive(Debug)]
pub struct EntityTypeMeta {
    /// Property name -> backing storage column (computed properties excluded)
    properties: HashMap<String, String>,
    /// Bundle name -> attached fields in declaration order
    bundle_fields: HashMap<String, Vec<FieldDef>>,
    /// Union of all bundles: field name -> derived value type
    union_fields: HashMap<String, ValueType>,
    /// Distinct fields ordered for longest-prefix resolution
    prefix_order: Vec<FieldDef>,
}

impl EntityTypeMeta {
    fn build(def: &EntityTypeDef, fields: &HashMap<String, FieldDef>) -> MetadataResult<Self> {
        let mut properties = HashMap::new();
        for property in &def.properties {
            if let Some(column) = &property.column {
                properties.insert(property.name.clone(), column.clone());
            }
        }
        if def.revisioned {
            // Declared columns win over the implicit revision markers.
            properties
                .entry("revision".to_string())
                .or_insert_with(|| "revision".to_string());
            properties
                .entry("log".to_string())
                .or_insert_with(|| "log".to_string());
        }

        let mut bundle_fields: HashMap<String, Vec<FieldDef>> = HashMap::new();
        let mut union_fields = HashMap::new();
        let mut prefix_order: Vec<FieldDef> = Vec::new();
        for (bundle_name, bundle) in &def.bundles {
            let mut attached = Vec::with_capacity(bundle.fields.len());
            for field_name in &bundle.fields {
                let field = fields
                    .get(field_name)
                    .ok_or_else(|| MetadataError::UnknownField {
                        bundle: bundle_name.clone(),
                        field: field_name.clone(),
                    })?;
                if !union_fields.contains_key(field_name) {
                    union_fields.insert(field_name.clone(), field.value_type());
                    prefix_order.push(field.clone());
                }
                attached.push(field.clone());
            }
            bundle_fields.insert(bundle_name.clone(), attached);
        }

        // Longest name first so `field_tags_tid` resolves against `field_tags`
        // even when a shorter field is also a prefix of the key. Names of equal
        // length stay in lexicographic order to keep resolution deterministic.
        prefix_order.sort_by(|a, b| {
            b.name
                .len()
                .cmp(&a.name.len())
                .then_with(|| a.name.cmp(&b.name))
        });

        trace!(
            entity_type = %def.name,
            properties = properties.len(),
            fields = union_fields.len(),
            "built derived metadata tables"
        );

        Ok(Self {
            properties,
            bundle_fields,
            union_fields,
            prefix_order,
        })
    }

    /// Returns the property -> storage column map
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Returns the storage column backing a property, if it has one
    pub fn property_column(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns the fields attached to a bundle, in declaration order
    pub fn bundle_fields(&self, bundle: &str) -> Option<&[FieldDef]> {
        self.bundle_fields.get(bundle).map(Vec::as_slice)
    }

    /// Returns the union of all bundles' fields with derived value types
    pub fn field_value_types(&self) -> &HashMap<String, ValueType> {
        &self.union_fields
    }

    /// Returns every distinct field, longest name first
    pub fn prefix_candidates(&self) -> &[FieldDef] {
        &self.prefix_order
    }
}

/// Registry of field and entity-type definitions
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    fields: HashMap<String, FieldDef>,
    entity_types: HashMap<String, EntityTypeDef>,
    derived: RwLock<HashMap<String, Arc<EntityTypeMeta>>>,
}

impl MetadataRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a registry from a JSON definitions file
    pub fn load_file(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MetadataError::DefinitionsFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text).map_err(|e| MetadataError::DefinitionsFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Builds a registry from a JSON definitions document
    pub fn from_json(json: &str) -> MetadataResult<Self> {
        let doc: RegistryDoc = serde_json::from_str(json)
            .map_err(|e| MetadataError::InvalidDefinitions(e.to_string()))?;
        let mut registry = Self::new();
        for field in doc.fields {
            registry.register_field(field)?;
        }
        for entity_type in doc.entity_types {
            registry.register_entity_type(entity_type)?;
        }
        Ok(registry)
    }

    /// Registers a field definition
    pub fn register_field(&mut self, mut field: FieldDef) -> MetadataResult<()> {
        if self.fields.contains_key(&field.name) {
            return Err(MetadataError::Duplicate {
                kind: "field",
                name: field.name,
            });
        }
        field.ensure_columns();
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    /// Registers an entity type; every bundle field must already be
    /// registered, and a bundle may list a field at most once
    pub fn register_entity_type(&mut self, def: EntityTypeDef) -> MetadataResult<()> {
        if self.entity_types.contains_key(&def.name) {
            return Err(MetadataError::Duplicate {
                kind: "entity type",
                name: def.name,
            });
        }
        for (bundle_name, bundle) in &def.bundles {
            let mut seen = HashSet::with_capacity(bundle.fields.len());
            for field_name in &bundle.fields {
                if !self.fields.contains_key(field_name) {
                    return Err(MetadataError::UnknownField {
                        bundle: bundle_name.clone(),
                        field: field_name.clone(),
                    });
                }
                // A field listed twice would be flattened twice, and
                // flattening is not idempotent.
                if !seen.insert(field_name.as_str()) {
                    return Err(MetadataError::Duplicate {
                        kind: "bundle field",
                        name: format!("{bundle_name}.{field_name}"),
                    });
                }
            }
        }
        self.entity_types.insert(def.name.clone(), def);
        Ok(())
    }

    /// Returns a registered field definition
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Returns a registered entity type definition
    pub fn entity_type(&self, name: &str) -> Option<&EntityTypeDef> {
        self.entity_types.get(name)
    }

    /// Returns the derived tables for an entity type, building them on first use
    pub fn entity_meta(&self, entity_type: &str) -> MetadataResult<Arc<EntityTypeMeta>> {
        {
            let derived = self
                .derived
                .read()
                .map_err(|_| MetadataError::Internal("metadata cache lock poisoned".to_string()))?;
            if let Some(meta) = derived.get(entity_type) {
                return Ok(Arc::clone(meta));
            }
        }

        let def = self
            .entity_types
            .get(entity_type)
            .ok_or_else(|| MetadataError::UnknownEntityType(entity_type.to_string()))?;
        let meta = EntityTypeMeta::build(def, &self.fields)?;

        let mut derived = self
            .derived
            .write()
            .map_err(|_| MetadataError::Internal("metadata cache lock poisoned".to_string()))?;
        let entry = derived
            .entry(entity_type.to_string())
            .or_insert_with(|| Arc::new(meta));
        Ok(Arc::clone(entry))
    }

    /// Returns the property -> storage column map for an entity type
    pub fn entity_type_properties(
        &self,
        entity_type: &str,
    ) -> MetadataResult<HashMap<String, String>> {
        Ok(self.entity_meta(entity_type)?.properties().clone())
    }

    /// Returns field name -> value type, scoped to one bundle or the union
    pub fn entity_type_fields(
        &self,
        entity_type: &str,
        bundle: Option<&str>,
    ) -> MetadataResult<HashMap<String, ValueType>> {
        let meta = self.entity_meta(entity_type)?;
        match bundle {
            Some(bundle_name) => {
                let fields =
                    meta.bundle_fields(bundle_name)
                        .ok_or_else(|| MetadataError::UnknownBundle {
                            entity_type: entity_type.to_string(),
                            bundle: bundle_name.to_string(),
                        })?;
                Ok(fields
                    .iter()
                    .map(|field| (field.name.clone(), field.value_type()))
                    .collect())
            }
            None => Ok(meta.field_value_types().clone()),
        }
    }
}
