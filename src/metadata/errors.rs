//! Metadata error types.
//!
//! Structural problems only: unknown entity types or bundles, bad definition
//! documents, duplicate registrations. Value-level lookups that merely find
//! nothing return `Option` instead.

use thiserror::Error;

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Metadata registry errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// Entity type is not registered
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Bundle is not declared on the entity type
    #[error("unknown bundle '{bundle}' on entity type '{entity_type}'")]
    UnknownBundle {
        entity_type: String,
        bundle: String,
    },

    /// A bundle references a field that was never registered
    #[error("bundle '{bundle}' references unregistered field '{field}'")]
    UnknownField { bundle: String, field: String },

    /// Field or entity type registered twice
    #[error("duplicate {kind} definition: {name}")]
    Duplicate { kind: &'static str, name: String },

    /// Definitions document did not parse or failed validation
    #[error("invalid definitions: {0}")]
    InvalidDefinitions(String),

    /// Definitions file could not be read or loaded
    #[error("failed to load definitions file '{path}': {reason}")]
    DefinitionsFile { path: String, reason: String },

    /// Internal failure (poisoned cache lock)
    #[error("internal metadata error: {0}")]
    Internal(String),
}
