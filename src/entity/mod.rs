//! Entity documents
//!
//! An [`Entity`] is a typed, bundled JSON object: entity-level properties and
//! per-field value structures keyed by machine name. The flattener rewrites
//! field keys in place; everything else passes through untouched.

use serde_json::{Map, Value};

/// Language code for language-neutral values
pub const LANGUAGE_NONE: &str = "und";

/// One entity instance
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    entity_type: String,
    bundle: String,
    /// `None` or a non-empty language code
    language: Option<String>,
    values: Map<String, Value>,
}

impl Entity {
    /// Creates an empty entity of the given type and bundle
    pub fn new(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            language: None,
            values: Map::new(),
        }
    }

    /// Wraps a JSON object, reading the language from its `language` key
    pub fn from_object(
        entity_type: impl Into<String>,
        bundle: impl Into<String>,
        values: Map<String, Value>,
    ) -> Self {
        let language = values
            .get("language")
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
            .map(str::to_string);
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            language,
            values,
        }
    }

    /// Wraps a JSON value; returns `None` unless it is an object
    pub fn from_value(
        entity_type: impl Into<String>,
        bundle: impl Into<String>,
        value: Value,
    ) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self::from_object(entity_type, bundle, values)),
            _ => None,
        }
    }

    /// Returns the entity type machine name
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the bundle machine name
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Returns the entity language, if one is set
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Sets the entity language; an empty code clears it
    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.language = if language.is_empty() {
            None
        } else {
            Some(language)
        };
    }

    /// Returns the language used to pick field values, falling back to
    /// [`LANGUAGE_NONE`]
    pub fn effective_language(&self) -> &str {
        self.language.as_deref().unwrap_or(LANGUAGE_NONE)
    }

    /// Returns a property or field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Sets a property or field value
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Removes a value, returning it if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns true if the entity carries the key
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the underlying value map
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns the entity body as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Consumes the entity, returning its body as a JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}
