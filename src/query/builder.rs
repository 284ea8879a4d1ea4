//! Query builder seam.
//!
//! The translators emit clauses into any [`EntityQuery`] implementation. A
//! storage backend implements the trait on its native query builder;
//! [`RecordedQuery`] captures the clauses as plain data, for tests and for
//! callers that serialize the translated query instead of executing it.

use serde::Serialize;
use serde_json::Value;

use crate::query::operator::{FilterOperator, SortDirection};

/// Receiver for translated filter and sort clauses
pub trait EntityQuery {
    /// Adds a condition on an entity-level property column
    fn property_condition(&mut self, column: &str, value: Value, operator: FilterOperator);

    /// Adds a condition on one storage column of a field
    fn field_condition(
        &mut self,
        field: &str,
        column: &str,
        value: Value,
        operator: FilterOperator,
    );

    /// Orders results by an entity-level property column
    fn property_order_by(&mut self, column: &str, direction: SortDirection);

    /// Orders results by one storage column of a field
    fn field_order_by(&mut self, field: &str, column: &str, direction: SortDirection);
}

/// What a clause points at: a property column or a field column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionTarget {
    /// Entity-level property column
    Property { column: String },
    /// One storage column of a field
    Field { field: String, column: String },
}

/// One translated filter condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    /// Targeted column
    pub target: ConditionTarget,
    /// Comparison value (a list for membership operators)
    pub value: Value,
    /// Comparison operator
    pub operator: FilterOperator,
}

impl Condition {
    /// Creates a property condition
    pub fn property(column: impl Into<String>, value: Value, operator: FilterOperator) -> Self {
        Self {
            target: ConditionTarget::Property {
                column: column.into(),
            },
            value,
            operator,
        }
    }

    /// Creates a field condition
    pub fn field(
        field: impl Into<String>,
        column: impl Into<String>,
        value: Value,
        operator: FilterOperator,
    ) -> Self {
        Self {
            target: ConditionTarget::Field {
                field: field.into(),
                column: column.into(),
            },
            value,
            operator,
        }
    }
}

/// One translated ordering clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    /// Targeted column
    pub target: ConditionTarget,
    /// Sort direction
    pub direction: SortDirection,
}

impl OrderBy {
    /// Creates a property ordering
    pub fn property(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            target: ConditionTarget::Property {
                column: column.into(),
            },
            direction,
        }
    }

    /// Creates a field ordering
    pub fn field(
        field: impl Into<String>,
        column: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        Self {
            target: ConditionTarget::Field {
                field: field.into(),
                column: column.into(),
            },
            direction,
        }
    }
}

/// An [`EntityQuery`] that records clauses in arrival order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordedQuery {
    /// Recorded filter conditions
    pub conditions: Vec<Condition>,
    /// Recorded ordering clauses
    pub orderings: Vec<OrderBy>,
}

impl RecordedQuery {
    /// Creates an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.orderings.is_empty()
    }
}

impl EntityQuery for RecordedQuery {
    fn property_condition(&mut self, column: &str, value: Value, operator: FilterOperator) {
        self.conditions
            .push(Condition::property(column, value, operator));
    }

    fn field_condition(
        &mut self,
        field: &str,
        column: &str,
        value: Value,
        operator: FilterOperator,
    ) {
        self.conditions
            .push(Condition::field(field, column, value, operator));
    }

    fn property_order_by(&mut self, column: &str, direction: SortDirection) {
        self.orderings.push(OrderBy::property(column, direction));
    }

    fn field_order_by(&mut self, field: &str, column: &str, direction: SortDirection) {
        self.orderings.push(OrderBy::field(field, column, direction));
    }
}
