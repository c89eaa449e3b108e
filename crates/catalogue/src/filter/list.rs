//! Named filter collections.

use std::collections::BTreeMap;

use super::input::BoolFilter;
use super::types::Filter;

/// Named filters for one entity type plus the visibility (active) filter.
///
/// A `FilterList` is a value: the only way to change the active filter is
/// [`FilterList::with_active_filter`], which returns a new list and leaves
/// the original untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterList {
    filters: BTreeMap<String, Option<Filter>>,
    active: Option<BoolFilter>,
}

impl FilterList {
    /// Create an empty list with the given visibility filter.
    pub fn new(active: Option<BoolFilter>) -> Self {
        Self {
            filters: BTreeMap::new(),
            active,
        }
    }

    /// Add a named filter. `None` entries are kept and skipped at query time.
    pub fn with(mut self, field: impl Into<String>, filter: Option<Filter>) -> Self {
        self.filters.insert(field.into(), filter);
        self
    }

    /// All named filters, including unset ones, in field-name order.
    pub fn filters(&self) -> impl Iterator<Item = (&str, Option<&Filter>)> {
        self.filters
            .iter()
            .map(|(field, filter)| (field.as_str(), filter.as_ref()))
    }

    /// Filter for a single field, if set.
    pub fn filter(&self, field: &str) -> Option<&Filter> {
        self.filters.get(field).and_then(Option::as_ref)
    }

    /// The visibility filter.
    pub fn active(&self) -> Option<BoolFilter> {
        self.active
    }

    /// Copy of this list with only the active filter replaced.
    pub fn with_active_filter(&self, active: Option<BoolFilter>) -> Self {
        Self {
            filters: self.filters.clone(),
            active,
        }
    }
}
