//! Query translation error types.

use thiserror::Error;

use crate::metadata::MetadataError;

/// Result type for query translation
pub type QueryResult<T> = Result<T, QueryError>;

/// Query translation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Operator string is not one of the accepted comparison operators
    #[error("invalid filter operator: {0}")]
    InvalidOperator(String),

    /// Direction string is neither ASC nor DESC
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),

    /// Metadata lookup failed
    #[error("{0}")]
    Metadata(#[from] MetadataError),
}
