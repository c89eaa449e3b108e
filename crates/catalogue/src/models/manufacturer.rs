//! Manufacturers (brands) products are made by.

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use crate::filter::{BoolFilter, FilterList, StringFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

pub const MANUFACTURER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("icon", FieldType::Text).nullable(),
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("short_description", FieldType::Text),
    FieldSpec::new("timestamp", FieldType::Timestamp).store_default(),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManufacturerRow {
    pub id: String,
    pub active: bool,
    pub icon: Option<String>,
    pub title: String,
    pub short_description: String,
    pub timestamp: Option<i64>,
}

impl Model for ManufacturerRow {
    const SCHEMA: Schema = Schema::new("manufacturer", MANUFACTURER_FIELDS);

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

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manufacturer {
    row: ManufacturerRow,
}

impl Manufacturer {
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

impl DataType for Manufacturer {
    type Model = ManufacturerRow;

    fn from_model(row: ManufacturerRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &ManufacturerRow {
        &self.row
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManufacturerFilterList {
    #[serde(default)]
    pub title: Option<StringFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for ManufacturerFilterList {
    fn default() -> Self {
        Self {
            title: None,
            active: active_only(),
        }
    }
}

impl From<ManufacturerFilterList> for FilterList {
    fn from(input: ManufacturerFilterList) -> Self {
        FilterList::new(input.active)
            .with("title", input.title.and_then(StringFilter::into_filter))
    }
}
