//! Caller-facing filter inputs.
//!
//! These are the shapes a transport layer deserializes from requests. Each
//! converts into a [`Filter`] for a specific column.

use serde::{Deserialize, Serialize};

use super::types::{Association, Filter};

/// Text filter input: `{ "equals": "…" }` or `{ "contains": "…" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringFilter {
    pub equals: Option<String>,
    pub contains: Option<String>,
}

impl StringFilter {
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            equals: Some(value.into()),
            contains: None,
        }
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            equals: None,
            contains: Some(value.into()),
        }
    }

    /// Exact match wins over substring when both are set.
    pub fn into_filter(self) -> Option<Filter> {
        match (self.equals, self.contains) {
            (Some(equals), _) => Some(Filter::equals_text(equals)),
            (None, Some(contains)) => Some(Filter::contains(contains)),
            (None, None) => None,
        }
    }
}

/// Identifier filter input: `{ "equals": "<id>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdFilter {
    pub equals: String,
}

impl IdFilter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { equals: id.into() }
    }

    /// Equality against an id column on the primary table.
    pub fn into_filter(self) -> Filter {
        Filter::equals_id(self.equals)
    }

    /// Equality evaluated through an association table.
    pub fn into_relation(self, association: &'static Association) -> Filter {
        Filter::relation(association, self.equals)
    }
}

/// Boolean filter input: `{ "equals": true }`.
///
/// Used as `Option<BoolFilter>`: `None` is "no constraint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoolFilter {
    pub equals: bool,
}

impl BoolFilter {
    pub const fn new(equals: bool) -> Self {
        Self { equals }
    }

    pub fn into_filter(self) -> Filter {
        Filter::Bool(self.equals)
    }
}

/// Default visibility for typed filter lists: active entities only.
pub fn active_only() -> Option<BoolFilter> {
    Some(BoolFilter::new(true))
}
