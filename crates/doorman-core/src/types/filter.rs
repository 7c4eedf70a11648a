//! Filter types for dynamic document queries.
//!
//! A query is a list of [`FilterField`] conditions AND-composed by the
//! store. The `In` operator forms a boolean-OR subclause over a set of
//! values ("field matches any of set S"), which is how batch name
//! resolution is expressed in a single round-trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality. Against an array field, matches when any element
    /// equals the value.
    Eq,
    /// Case-insensitive substring containment on string fields.
    Like,
    /// Membership of the field value in a value list. Against an array
    /// field, matches on any intersection.
    In,
}

/// A dynamic filter value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    /// The document field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for a substring filter.
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Like, FilterValue::String(pattern.into()))
    }

    /// Shorthand for an `In` subclause over a set of values.
    pub fn any_of(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOp::In, FilterValue::StringList(values))
    }

    /// Evaluate this condition against a document body.
    ///
    /// A missing or null field never matches. These semantics are shared
    /// by every store backend so that query behavior does not depend on
    /// the persistence engine.
    pub fn matches(&self, body: &Value) -> bool {
        let Some(field) = body.get(&self.field) else {
            return false;
        };
        match (&self.op, &self.value) {
            (FilterOp::Eq, FilterValue::String(expected)) => match field {
                Value::String(actual) => actual == expected,
                Value::Array(items) => items
                    .iter()
                    .any(|item| item.as_str() == Some(expected.as_str())),
                _ => false,
            },
            (FilterOp::Eq, FilterValue::Boolean(expected)) => field.as_bool() == Some(*expected),
            (FilterOp::Like, FilterValue::String(pattern)) => field
                .as_str()
                .is_some_and(|actual| actual.to_lowercase().contains(&pattern.to_lowercase())),
            (FilterOp::In, FilterValue::StringList(list)) => match field {
                Value::String(actual) => list.iter().any(|v| v == actual),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .any(|actual| list.iter().any(|v| v == actual)),
                _ => false,
            },
            _ => false,
        }
    }
}
