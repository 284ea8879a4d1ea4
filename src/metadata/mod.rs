//! Entity metadata subsystem
//!
//! Field and entity-type definitions plus the derived lookup tables the
//! flattener and query translators consume.
//!
//! # Design
//!
//! - Definitions are registered once (programmatically or from JSON)
//! - Derived per-entity-type tables are built lazily and cached for the
//!   life of the registry
//! - The registry is passed explicitly; there is no global instance
//! - Structural problems are errors, missing values are `Option`

mod errors;
mod registry;
mod types;

pub use errors::{MetadataError, MetadataResult};
pub use registry::{EntityTypeMeta, MetadataRegistry};
pub use types::{
    BundleDef, EntityTypeDef, FieldDef, FieldType, PropertyDef, RegistryDoc, ValueType,
    CARDINALITY_UNLIMITED,
};
