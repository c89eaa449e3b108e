//! Catalogue services.
//!
//! One [`EntityService`] per entity kind applies the inactive-entity
//! permission overlay on top of the [`Repository`](crate::repository::Repository).
//! Relation resolvers live on the concrete service types.

mod entity;
mod relations;

pub use entity::{CatalogueEntity, EntityService};

use crate::models::{Category, Content, Manufacturer, Product, Review, Vendor};

pub type CategoryService = EntityService<Category>;
pub type ContentService = EntityService<Content>;
pub type ManufacturerService = EntityService<Manufacturer>;
pub type ProductService = EntityService<Product>;
pub type ReviewService = EntityService<Review>;
pub type VendorService = EntityService<Vendor>;
