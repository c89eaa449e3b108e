#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory SQLite database with the real catalogue
//! schema, accessed through the real `SqliteStore`, repository, and services.

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;

use emporium_catalogue::config::CatalogueOptions;
use emporium_catalogue::db;
use emporium_catalogue::permissions::{CallerPermissions, PermissionRegistry};
use emporium_catalogue::repository::{DataType, Model, Repository};
use emporium_catalogue::state::CatalogueState;
use emporium_catalogue::store::{SqliteStore, Store};

/// Test catalogue wrapping a private database.
pub struct TestCatalogue {
    /// Raw pool for seeding fixtures.
    pub pool: SqlitePool,
    pub state: CatalogueState,
}

impl TestCatalogue {
    /// Fresh database with the built-in permission registry.
    pub async fn new() -> Self {
        Self::with_registry(PermissionRegistry::default()).await
    }

    pub async fn with_registry(registry: PermissionRegistry) -> Self {
        Self::with_options(registry, CatalogueOptions::default()).await
    }

    pub async fn with_options(registry: PermissionRegistry, options: CatalogueOptions) -> Self {
        let pool = emporium_test_utils::memory_pool()
            .await
            .expect("failed to open in-memory database");
        let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool.clone()));
        db::install_schema(store.as_ref())
            .await
            .expect("failed to install schema");

        Self {
            pool,
            state: CatalogueState::with_options(store, registry, options),
        }
    }

    pub fn repository(&self) -> &Repository {
        self.state.repository()
    }

    /// Caller holding every `VIEW_INACTIVE_*` permission.
    pub fn admin(&self) -> CallerPermissions {
        self.state.caller(&["admin"])
    }

    /// Caller without permissions.
    pub fn anonymous(&self) -> CallerPermissions {
        CallerPermissions::anonymous()
    }
}

/// Ids of a list of read-models, in result order.
pub fn ids<D: DataType>(entities: &[D]) -> Vec<String> {
    entities
        .iter()
        .map(|entity| entity.model().id().to_string())
        .collect()
}
