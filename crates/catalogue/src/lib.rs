//! Emporium catalogue library.
//!
//! Exposes catalogue entities (products, categories, manufacturers, vendors,
//! content pages, reviews) through a filtered repository and permission-aware
//! services. Transport layers sit on top of [`state::CatalogueState`].

pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod permissions;
pub mod repository;
pub mod services;
pub mod state;
pub mod store;

pub use error::{CatalogueError, CatalogueResult};
pub use state::CatalogueState;
