//! Entity-type and field definition types.
//!
//! Definitions describe what the host's content model looks like:
//! - A field has a storage type, a cardinality, an ordered column list and
//!   (for enumerated types) an allowed-values map.
//! - An entity type has stored/computed properties and named bundles, each
//!   bundle attaching field instances by field name.
//!
//! The value type used for flattening and the `entity_type_fields` mapping is
//! derived from the storage type and cardinality, not declared separately.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Cardinality value meaning "unlimited deltas"
pub const CARDINALITY_UNLIMITED: i32 = -1;

/// Field storage types (machine names as the host declares them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Short text
    Text,
    /// Long text
    TextLong,
    /// Long text plus summary and format columns
    TextWithSummary,
    /// Enumerated text
    ListText,
    /// Enumerated integer
    ListInteger,
    /// Boolean stored as an on/off list
    ListBoolean,
    /// Integer number
    NumberInteger,
    /// Fixed-precision decimal number
    NumberDecimal,
    /// Floating point number
    NumberFloat,
    /// Date value
    Datetime,
    /// Generic file reference
    File,
    /// Image file reference
    Image,
    /// Taxonomy term reference
    TaxonomyTermReference,
}

impl FieldType {
    /// Returns the machine name for this storage type
    pub fn machine_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::TextLong => "text_long",
            FieldType::TextWithSummary => "text_with_summary",
            FieldType::ListText => "list_text",
            FieldType::ListInteger => "list_integer",
            FieldType::ListBoolean => "list_boolean",
            FieldType::NumberInteger => "number_integer",
            FieldType::NumberDecimal => "number_decimal",
            FieldType::NumberFloat => "number_float",
            FieldType::Datetime => "datetime",
            FieldType::File => "file",
            FieldType::Image => "image",
            FieldType::TaxonomyTermReference => "taxonomy_term_reference",
        }
    }

    /// Returns true for file-backed types that get a `<field>_url` companion
    pub fn is_file(&self) -> bool {
        matches!(self, FieldType::File | FieldType::Image)
    }

    /// Returns the storage columns this type declares by default, in schema order
    pub fn default_columns(&self) -> &'static [&'static str] {
        match self {
            FieldType::Text | FieldType::TextLong => &["value"],
            FieldType::TextWithSummary => &["value", "summary", "format"],
            FieldType::ListText | FieldType::ListInteger | FieldType::ListBoolean => &["value"],
            FieldType::NumberInteger | FieldType::NumberDecimal | FieldType::NumberFloat => {
                &["value"]
            }
            FieldType::Datetime => &["value"],
            FieldType::File => &["fid", "display", "description"],
            FieldType::Image => &["fid", "alt", "title", "width", "height"],
            FieldType::TaxonomyTermReference => &["tid"],
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.machine_name())
    }
}

/// Derived value types driving flattening and the field-type mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Plain or enumerated text
    Text,
    /// Whole number
    Integer,
    /// Decimal or floating point number
    Decimal,
    /// Boolean
    Boolean,
    /// Date value
    Date,
    /// File reference structure
    File,
    /// Taxonomy term reference
    TaxonomyTerm,
    /// Multi-value list of an inner type
    List(Box<ValueType>),
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => write!(f, "text"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Decimal => write!(f, "decimal"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Date => write!(f, "date"),
            ValueType::File => write!(f, "file"),
            ValueType::TaxonomyTerm => write!(f, "taxonomy_term"),
            ValueType::List(inner) => write!(f, "list<{}>", inner),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A field definition, shared by every bundle that attaches the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field machine name, e.g. `field_tags`
    pub name: String,

    /// Storage type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Number of deltas: 1, a fixed N, or [`CARDINALITY_UNLIMITED`]
    #[serde(default = "default_cardinality")]
    pub cardinality: i32,

    /// Storage columns in schema order; empty means "use the type's defaults"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Allowed values for enumerated types: machine value -> label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, String>>,
}

fn default_cardinality() -> i32 {
    1
}

impl FieldDef {
    /// Creates a single-value field with the type's default columns
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let mut def = Self {
            name: name.into(),
            field_type,
            cardinality: 1,
            columns: Vec::new(),
            options: None,
        };
        def.ensure_columns();
        def
    }

    /// Sets the cardinality
    pub fn with_cardinality(mut self, cardinality: i32) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Sets the cardinality to unlimited
    pub fn unlimited(self) -> Self {
        self.with_cardinality(CARDINALITY_UNLIMITED)
    }

    /// Replaces the column list
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Sets the allowed-values map
    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = Some(
            options
                .iter()
                .map(|(value, label)| ((*value).to_string(), (*label).to_string()))
                .collect(),
        );
        self
    }

    /// Fills an empty column list with the storage type's defaults
    pub fn ensure_columns(&mut self) {
        if self.columns.is_empty() {
            self.columns = self
                .field_type
                .default_columns()
                .iter()
                .map(|c| (*c).to_string())
                .collect();
        }
    }

    /// Returns true when the field stores more than one delta
    pub fn is_multiple(&self) -> bool {
        self.cardinality != 1
    }

    /// Returns the only column name, if the field has a single-column schema
    pub fn single_column(&self) -> Option<&str> {
        if self.columns.len() == 1 {
            self.columns.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Returns true if `column` is a declared storage column of this field
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the non-empty registered label for an allowed value
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|options| options.get(value))
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// Derives the value type from the storage type and cardinality
    pub fn value_type(&self) -> ValueType {
        let base = match self.field_type {
            FieldType::Text
            | FieldType::TextLong
            | FieldType::TextWithSummary
            | FieldType::ListText => ValueType::Text,
            FieldType::ListInteger | FieldType::NumberInteger => ValueType::Integer,
            FieldType::NumberDecimal | FieldType::NumberFloat => ValueType::Decimal,
            FieldType::ListBoolean => ValueType::Boolean,
            FieldType::Datetime => ValueType::Date,
            FieldType::File | FieldType::Image => ValueType::File,
            FieldType::TaxonomyTermReference => ValueType::TaxonomyTerm,
        };
        if self.is_multiple() {
            ValueType::List(Box::new(base))
        } else {
            base
        }
    }
}

/// An entity-level property and the storage column backing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Logical property name, e.g. `status`
    pub name: String,

    /// Backing storage column; `None` marks a computed property with no column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl PropertyDef {
    /// Creates a property backed by a storage column
    pub fn stored(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: Some(column.into()),
        }
    }

    /// Creates a computed property with no storage column
    pub fn computed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
        }
    }
}

/// A bundle: the field instances attached to one sub-type of an entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDef {
    /// Attached field names, in declaration order
    #[serde(default)]
    pub fields: Vec<String>,
}

impl BundleDef {
    /// Creates a bundle attaching the given fields
    pub fn with_fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

/// An entity type definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeDef {
    /// Entity type machine name, e.g. `node`
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entity-level properties
    #[serde(default)]
    pub properties: Vec<PropertyDef>,

    /// Whether the entity type keeps revisions (adds `revision`/`log` properties)
    #[serde(default)]
    pub revisioned: bool,

    /// Bundles by machine name
    #[serde(default)]
    pub bundles: HashMap<String, BundleDef>,
}

impl EntityTypeDef {
    /// Creates an empty entity type definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a stored property
    pub fn with_property(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.properties.push(PropertyDef::stored(name, column));
        self
    }

    /// Adds a computed property
    pub fn with_computed_property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(PropertyDef::computed(name));
        self
    }

    /// Marks the entity type as revisioned
    pub fn revisioned(mut self) -> Self {
        self.revisioned = true;
        self
    }

    /// Adds a bundle attaching the given fields
    pub fn with_bundle(mut self, name: impl Into<String>, fields: &[&str]) -> Self {
        self.bundles
            .insert(name.into(), BundleDef::with_fields(fields));
        self
    }
}

/// The serde document a registry can be loaded from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDoc {
    /// Global field definitions
    #[serde(default)]
    pub fields: Vec<FieldDef>,

    /// Entity type definitions
    #[serde(default)]
    pub entity_types: Vec<EntityTypeDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_fill_in() {
        let field = FieldDef::new("field_image", FieldType::Image);
        assert_eq!(field.columns, vec!["fid", "alt", "title", "width", "height"]);

        let field = FieldDef::new("field_subtitle", FieldType::Text);
        assert_eq!(field.columns, vec!["value"]);
        assert_eq!(field.single_column(), Some("value"));
    }

    #[test]
    fn test_explicit_columns_win() {
        let field = FieldDef::new("body", FieldType::TextWithSummary).with_columns(&["value"]);
        assert_eq!(field.columns, vec!["value"]);
    }

    #[test]
    fn test_value_type_derivation() {
        let single = FieldDef::new("field_category", FieldType::TaxonomyTermReference);
        assert_eq!(single.value_type(), ValueType::TaxonomyTerm);

        let list = FieldDef::new("field_tags", FieldType::TaxonomyTermReference).unlimited();
        assert_eq!(
            list.value_type(),
            ValueType::List(Box::new(ValueType::TaxonomyTerm))
        );

        let topics = FieldDef::new("field_topics", FieldType::ListText).with_cardinality(3);
        assert_eq!(topics.value_type(), ValueType::List(Box::new(ValueType::Text)));

        let flag = FieldDef::new("field_featured", FieldType::ListBoolean);
        assert_eq!(flag.value_type(), ValueType::Boolean);
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::TaxonomyTerm.to_string(), "taxonomy_term");
        assert_eq!(
            ValueType::List(Box::new(ValueType::Text)).to_string(),
            "list<text>"
        );
    }

    #[test]
    fn test_option_label_skips_empty() {
        let field = FieldDef::new("field_color", FieldType::ListText)
            .with_options(&[("red", "Red"), ("bare", "")]);
        assert_eq!(field.option_label("red"), Some("Red"));
        assert_eq!(field.option_label("bare"), None);
        assert_eq!(field.option_label("missing"), None);
    }

    #[test]
    fn test_multi_column_has_no_single_column() {
        let field = FieldDef::new("body", FieldType::TextWithSummary);
        assert_eq!(field.single_column(), None);
        assert!(field.has_column("summary"));
        assert!(!field.has_column("tid"));
    }

    #[test]
    fn test_field_def_round_trips_through_json() {
        let field = FieldDef::new("field_tags", FieldType::TaxonomyTermReference).unlimited();
        let json = serde_json::to_string(&field).unwrap();
        let back: FieldDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_field_def_json_defaults() {
        // Columns and cardinality may be omitted in definition documents.
        let field: FieldDef =
            serde_json::from_str(r#"{"name": "field_image", "type": "image"}"#).unwrap();
        assert_eq!(field.cardinality, 1);
        assert!(field.columns.is_empty());
    }
}
