//! Declarative filters.
//!
//! This module provides:
//! - Filter: closed set of single-field conditions (equality, substring,
//!   boolean, relation-id)
//! - FilterList: immutable named filter collection with a visibility filter
//! - Inputs: serde shapes (`StringFilter`, `IdFilter`, `BoolFilter`)

mod input;
mod list;
mod types;

pub use input::{BoolFilter, IdFilter, StringFilter, active_only};
pub use list::FilterList;
pub use types::{Association, Filter, FilterError, Scalar};
