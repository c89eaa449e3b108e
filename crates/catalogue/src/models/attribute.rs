//! Product attributes.
//!
//! An attribute (`Colour`, `Size`) is shared across products; the value a
//! product carries for it lives in the `product_attribute` link table.

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use crate::filter::Association;
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

/// Attribute ↔ product links, keyed by the attribute.
pub static ATTRIBUTE_PRODUCT: Association = Association {
    table: "product_attribute",
    object_column: "attribute_id",
    id_columns: &["object_id"],
};

pub const ATTRIBUTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("title", FieldType::Text),
];

pub const PRODUCT_ATTRIBUTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("object_id", FieldType::Id),
    FieldSpec::new("attribute_id", FieldType::Id),
    FieldSpec::new("value", FieldType::Text),
    FieldSpec::new("position", FieldType::Integer),
];

/// A row of the `attribute` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRow {
    pub id: String,
    pub title: String,
}

impl Model for AttributeRow {
    const SCHEMA: Schema = Schema::new("attribute", ATTRIBUTE_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(_alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::always()
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        true
    }
}

/// Read-only attribute view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Attribute {
    row: AttributeRow,
}

impl Attribute {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }
}

impl DataType for Attribute {
    type Model = AttributeRow;

    fn from_model(row: AttributeRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &AttributeRow {
        &self.row
    }
}

/// A row of the `product_attribute` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductAttributeRow {
    pub id: String,
    /// Product carrying the value.
    pub object_id: String,
    pub attribute_id: String,
    pub value: String,
    pub position: i64,
}

impl Model for ProductAttributeRow {
    const SCHEMA: Schema = Schema::new("product_attribute", PRODUCT_ATTRIBUTE_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(_alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::always()
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        true
    }
}

/// One product's value for one attribute, before the attribute is resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeValue {
    row: ProductAttributeRow,
}

impl AttributeValue {
    pub fn product_id(&self) -> &str {
        &self.row.object_id
    }

    pub fn attribute_id(&self) -> &str {
        &self.row.attribute_id
    }

    pub fn value(&self) -> &str {
        &self.row.value
    }

    pub fn position(&self) -> i64 {
        self.row.position
    }
}

impl DataType for AttributeValue {
    type Model = ProductAttributeRow;

    fn from_model(row: ProductAttributeRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &ProductAttributeRow {
        &self.row
    }
}

/// An attribute together with the value a product carries for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAttribute {
    value: String,
    attribute: Attribute,
}

impl ProductAttribute {
    pub fn new(attribute: Attribute, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attribute,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }
}
