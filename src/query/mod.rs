//! Index query translation subsystem
//!
//! Translates request filter and sort parameters into conditions and
//! orderings on a storage query builder, using registered entity metadata to
//! resolve parameter keys.
//!
//! # Resolution order (both translators)
//!
//! 1. Key names an entity property: clause on its storage column
//! 2. Key resolves against the field list, longest field name first, as a
//!    bare single-column field name or a `<field>_<column>` pair
//! 3. Anything else is skipped
//!
//! # Error policy
//!
//! Missing or empty operator and direction entries fall back to `=` and
//! `DESC`. Present but unrecognized tokens are rejected with a typed error
//! rather than passed through to the storage layer.

mod builder;
mod errors;
mod filter;
mod operator;
mod resolve;
mod sort;

pub use builder::{Condition, ConditionTarget, EntityQuery, OrderBy, RecordedQuery};
pub use errors::{QueryError, QueryResult};
pub use filter::apply_filters;
pub use operator::{FilterOperator, SortDirection};
pub use sort::apply_sorts;
