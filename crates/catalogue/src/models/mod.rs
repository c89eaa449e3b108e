//! Catalogue entities.
//!
//! Each entity has a backing `*Row` (one table row, decoded through its
//! schema), a read-only read-model wrapping it, and a typed filter input
//! that converts into a [`FilterList`](crate::filter::FilterList).
//! Attributes and selection lists have no activity flag and are only reached
//! through their product.

mod attribute;
mod category;
mod content;
mod manufacturer;
mod product;
mod review;
mod selection;
mod vendor;

use std::fmt;

use sea_query::{Alias, Expr, ExprTrait, SimpleExpr};

pub use attribute::{
    ATTRIBUTE_FIELDS, ATTRIBUTE_PRODUCT, Attribute, AttributeRow, AttributeValue,
    PRODUCT_ATTRIBUTE_FIELDS, ProductAttribute, ProductAttributeRow,
};
pub use category::{CATEGORY_FIELDS, Category, CategoryFilterList, CategoryRow};
pub use content::{CONTENT_FIELDS, Content, ContentFilterList, ContentRow};
pub use manufacturer::{MANUFACTURER_FIELDS, Manufacturer, ManufacturerFilterList, ManufacturerRow};
pub use product::{
    DEFAULT_VAT, PRODUCT_CATEGORY, PRODUCT_FIELDS, Price, Product, ProductFilterList, ProductRow,
};
pub use review::{REVIEW_FIELDS, Review, ReviewFilterList, ReviewRow};
pub use selection::{
    ProductSelectionList, SELECTION_FIELDS, SELECTION_LIST_FIELDS, SELECTION_LIST_PRODUCT,
    Selection, SelectionList, SelectionListRow, SelectionRow,
};
pub use vendor::{VENDOR_FIELDS, Vendor, VendorFilterList, VendorRow};

/// Entity kinds exposed by the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Content,
    Manufacturer,
    Product,
    Review,
    Vendor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Category,
        EntityKind::Content,
        EntityKind::Manufacturer,
        EntityKind::Product,
        EntityKind::Review,
        EntityKind::Vendor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Category => "Category",
            EntityKind::Content => "Content",
            EntityKind::Manufacturer => "Manufacturer",
            EntityKind::Product => "Product",
            EntityKind::Review => "Review",
            EntityKind::Vendor => "Vendor",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate for entities without an activity flag.
pub(crate) fn always() -> SimpleExpr {
    Expr::val(true).into()
}

/// `alias.column = TRUE`
pub(crate) fn flag(alias: &str, column: &str) -> SimpleExpr {
    Expr::col((Alias::new(alias), Alias::new(column))).eq(true)
}
