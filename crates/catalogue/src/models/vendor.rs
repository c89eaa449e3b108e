//! Vendors: shops or suppliers a product is sold by.

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use crate::filter::{BoolFilter, FilterList, StringFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

pub const VENDOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("icon", FieldType::Text).nullable(),
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("short_description", FieldType::Text),
    FieldSpec::new("timestamp", FieldType::Timestamp).store_default(),
];

/// A row of the `vendor` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorRow {
    pub id: String,
    pub active: bool,
    pub icon: Option<String>,
    pub title: String,
    pub short_description: String,
    /// Unix timestamp of the last change; assigned by the store.
    pub timestamp: Option<i64>,
}

impl Model for VendorRow {
    const SCHEMA: Schema = Schema::new("vendor", VENDOR_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::flag(alias, "active")
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        self.active
    }
}

/// Read-only vendor view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vendor {
    row: VendorRow,
}

impl Vendor {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn is_active(&self) -> bool {
        self.row.active
    }

    pub fn icon(&self) -> Option<&str> {
        self.row.icon.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }

    pub fn short_description(&self) -> &str {
        &self.row.short_description
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.row.timestamp
    }
}

impl DataType for Vendor {
    type Model = VendorRow;

    fn from_model(row: VendorRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &VendorRow {
        &self.row
    }
}

/// Filters accepted when listing vendors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorFilterList {
    #[serde(default)]
    pub title: Option<StringFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for VendorFilterList {
    fn default() -> Self {
        Self {
            title: None,
            active: active_only(),
        }
    }
}

impl From<VendorFilterList> for FilterList {
    fn from(input: VendorFilterList) -> Self {
        FilterList::new(input.active)
            .with("title", input.title.and_then(StringFilter::into_filter))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn missing_active_defaults_to_true() {
        let input: VendorFilterList =
            serde_json::from_str(r#"{"title": {"contains": "city"}}"#).unwrap();
        let list = FilterList::from(input);
        assert_eq!(list.active(), Some(BoolFilter::new(true)));
        assert_eq!(list.filter("title"), Some(&Filter::contains("city")));
    }

    #[test]
    fn explicit_null_active_removes_constraint() {
        let input: VendorFilterList = serde_json::from_str(r#"{"active": null}"#).unwrap();
        assert_eq!(FilterList::from(input).active(), None);
    }
}
