//! Products and their prices.
//!
//! A product is visible when it is flagged active, or when the current time
//! falls inside its `active_from`..=`active_to` window. Category membership
//! lives in the `product_category` association table and is filtered through
//! a join.

use sea_query::{Alias, Expr, ExprTrait, SimpleExpr};
use serde::{Deserialize, Serialize};

use crate::filter::{Association, BoolFilter, FilterList, IdFilter, StringFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

/// Product ↔ category links.
pub static PRODUCT_CATEGORY: Association = Association {
    table: "product_category",
    object_column: "product_id",
    id_columns: &["category_id"],
};

/// VAT rate (percent) applied when a product carries none of its own.
pub const DEFAULT_VAT: f64 = 19.0;

pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("active_from", FieldType::Timestamp).nullable(),
    FieldSpec::new("active_to", FieldType::Timestamp).nullable(),
    FieldSpec::new("sku", FieldType::Text),
    FieldSpec::new("ean", FieldType::Text),
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("short_description", FieldType::Text),
    FieldSpec::new("manufacturer_id", FieldType::Id).nullable(),
    FieldSpec::new("vendor_id", FieldType::Id).nullable(),
    FieldSpec::new("price", FieldType::Float),
    FieldSpec::new("vat", FieldType::Float).nullable(),
    FieldSpec::new("stock", FieldType::Integer),
    FieldSpec::new("inserted_at", FieldType::Timestamp).store_default(),
    FieldSpec::new("timestamp", FieldType::Timestamp).store_default(),
];

/// A row of the `product` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRow {
    pub id: String,
    pub active: bool,
    /// Start of the time-controlled visibility window (Unix seconds).
    pub active_from: Option<i64>,
    /// End of the time-controlled visibility window (Unix seconds).
    pub active_to: Option<i64>,
    pub sku: String,
    pub ean: String,
    pub title: String,
    pub short_description: String,
    pub manufacturer_id: Option<String>,
    pub vendor_id: Option<String>,
    /// Gross price.
    pub price: f64,
    /// VAT rate in percent.
    pub vat: Option<f64>,
    pub stock: i64,
    pub inserted_at: Option<i64>,
    pub timestamp: Option<i64>,
}

impl Model for ProductRow {
    const SCHEMA: Schema = Schema::new("product", PRODUCT_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(alias: &str, ctx: &ActiveContext) -> SimpleExpr {
        let column = |name: &str| Expr::col((Alias::new(alias), Alias::new(name)));
        super::flag(alias, "active").or(column("active_from")
            .lte(ctx.now)
            .and(column("active_to").gte(ctx.now)))
    }

    fn is_active(&self, ctx: &ActiveContext) -> bool {
        if self.active {
            return true;
        }
        match (self.active_from, self.active_to) {
            (Some(from), Some(to)) => from <= ctx.now && ctx.now <= to,
            _ => false,
        }
    }
}

/// Gross price with its VAT share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Price {
    price: f64,
    vat: f64,
}

impl Price {
    pub fn new(price: f64, vat: f64) -> Self {
        Self { price, vat }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// VAT rate in percent.
    pub fn vat(&self) -> f64 {
        self.vat
    }

    /// VAT contained in the gross price, rounded to cents.
    pub fn vat_value(&self) -> f64 {
        let value = self.price * self.vat / (100.0 + self.vat);
        (value * 100.0).round() / 100.0
    }

    /// Prices are stored gross.
    pub fn is_netto_price_mode(&self) -> bool {
        false
    }
}

/// Read-only product view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Product {
    row: ProductRow,
}

impl Product {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    /// Visible right now, either flagged active or inside its window.
    pub fn is_active(&self) -> bool {
        self.row.is_active(&ActiveContext::current())
    }

    pub fn active_from(&self) -> Option<i64> {
        self.row.active_from
    }

    pub fn active_to(&self) -> Option<i64> {
        self.row.active_to
    }

    pub fn sku(&self) -> &str {
        &self.row.sku
    }

    pub fn ean(&self) -> &str {
        &self.row.ean
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }

    pub fn short_description(&self) -> &str {
        &self.row.short_description
    }

    pub fn manufacturer_id(&self) -> Option<&str> {
        self.row.manufacturer_id.as_deref()
    }

    pub fn vendor_id(&self) -> Option<&str> {
        self.row.vendor_id.as_deref()
    }

    pub fn price(&self) -> Price {
        Price::new(self.row.price, self.row.vat.unwrap_or(DEFAULT_VAT))
    }

    pub fn stock(&self) -> i64 {
        self.row.stock
    }

    pub fn inserted_at(&self) -> Option<i64> {
        self.row.inserted_at
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.row.timestamp
    }
}

impl DataType for Product {
    type Model = ProductRow;

    fn from_model(row: ProductRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &ProductRow {
        &self.row
    }
}

/// Filters accepted when listing products.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFilterList {
    #[serde(default)]
    pub title: Option<StringFilter>,
    /// Matched through the `product_category` association.
    #[serde(default)]
    pub category: Option<IdFilter>,
    #[serde(default)]
    pub manufacturer: Option<IdFilter>,
    #[serde(default)]
    pub vendor: Option<IdFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for ProductFilterList {
    fn default() -> Self {
        Self {
            title: None,
            category: None,
            manufacturer: None,
            vendor: None,
            active: active_only(),
        }
    }
}

impl From<ProductFilterList> for FilterList {
    fn from(input: ProductFilterList) -> Self {
        FilterList::new(input.active)
            .with("title", input.title.and_then(StringFilter::into_filter))
            .with(
                "category_id",
                input
                    .category
                    .map(|category| category.into_relation(&PRODUCT_CATEGORY)),
            )
            .with("manufacturer_id", input.manufacturer.map(IdFilter::into_filter))
            .with("vendor_id", input.vendor.map(IdFilter::into_filter))
    }
}
