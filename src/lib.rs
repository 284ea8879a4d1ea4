//! restfold - entity flattening and index query translation for REST APIs
//!
//! Takes entities as stored (language maps, delta lists, column objects) and
//! produces the simplified JSON shapes a REST index endpoint serves, plus the
//! filter and sort clauses its query parameters imply. Entity metadata is
//! registered once and derived lookup tables are cached for the life of the
//! registry.

pub mod entity;
pub mod files;
pub mod flatten;
pub mod metadata;
pub mod query;
