//! Filter operators and sort directions.
//!
//! Incoming parameter strings are validated here: an unrecognized token is an
//! error, never passed through to the query builder. Missing or empty tokens
//! are handled by the translators, which fall back to the defaults (`=` for
//! filters, `DESC` for sorts).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::errors::{QueryError, QueryResult};

/// Comparison operators accepted in filter parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equality (the default)
    #[default]
    #[serde(rename = "=")]
    Eq,
    /// Inequality
    #[serde(rename = "<>")]
    NotEq,
    /// Less than
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal
    #[serde(rename = "<=")]
    Lte,
    /// Greater than
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal
    #[serde(rename = ">=")]
    Gte,
    /// Membership in a value list
    #[serde(rename = "IN")]
    In,
    /// Exclusion from a value list
    #[serde(rename = "NOT IN")]
    NotIn,
    /// Pattern match
    #[serde(rename = "LIKE")]
    Like,
    /// Prefix match
    #[serde(rename = "STARTS_WITH")]
    StartsWith,
    /// Substring match
    #[serde(rename = "CONTAINS")]
    Contains,
    /// Inclusive range over a two-value list
    #[serde(rename = "BETWEEN")]
    Between,
}

impl FilterOperator {
    /// Parses an operator token; symbols are exact, words case-insensitive
    pub fn parse(token: &str) -> QueryResult<Self> {
        let token = token.trim();
        match token {
            "=" => Ok(Self::Eq),
            "<>" | "!=" => Ok(Self::NotEq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            _ => match token.to_ascii_uppercase().as_str() {
                "IN" => Ok(Self::In),
                "NOT IN" => Ok(Self::NotIn),
                "LIKE" => Ok(Self::Like),
                "STARTS_WITH" => Ok(Self::StartsWith),
                "CONTAINS" => Ok(Self::Contains),
                "BETWEEN" => Ok(Self::Between),
                _ => Err(QueryError::InvalidOperator(token.to_string())),
            },
        }
    }

    /// Returns the canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::StartsWith => "STARTS_WITH",
            Self::Contains => "CONTAINS",
            Self::Between => "BETWEEN",
        }
    }

    /// Returns true for operators taking a list of values
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn | Self::Between)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort directions accepted in sort parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending
    #[serde(rename = "ASC")]
    Asc,
    /// Descending (the default)
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// Parses a direction token, case-insensitively
    pub fn parse(token: &str) -> QueryResult<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidDirection(token.trim().to_string())),
        }
    }

    /// Returns the canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
