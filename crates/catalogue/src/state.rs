//! Catalogue state shared across callers.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{CatalogueOptions, Config};
use crate::db;
use crate::permissions::{CallerPermissions, PermissionRegistry};
use crate::repository::Repository;
use crate::services::{
    CategoryService, ContentService, ManufacturerService, ProductService, ReviewService,
    VendorService,
};
use crate::store::Store;

/// Shared catalogue state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct CatalogueState {
    inner: Arc<CatalogueStateInner>,
}

struct CatalogueStateInner {
    repository: Arc<Repository>,
    permissions: PermissionRegistry,
    categories: CategoryService,
    contents: ContentService,
    manufacturers: ManufacturerService,
    products: ProductService,
    reviews: ReviewService,
    vendors: VendorService,
}

impl CatalogueState {
    /// Connect to the configured database and load the permission registry.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = db::connect(config)
            .await
            .context("failed to connect to database")?;
        let permissions = config
            .permission_registry()
            .context("failed to load permission registry")?;
        Ok(Self::with_options(store, permissions, config.options()))
    }

    /// State with the default options.
    pub fn new(store: Arc<dyn Store>, permissions: PermissionRegistry) -> Self {
        Self::with_options(store, permissions, CatalogueOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn Store>,
        permissions: PermissionRegistry,
        options: CatalogueOptions,
    ) -> Self {
        let repository = Arc::new(Repository::new(store));
        Self {
            inner: Arc::new(CatalogueStateInner {
                categories: CategoryService::with_options(Arc::clone(&repository), options),
                contents: ContentService::with_options(Arc::clone(&repository), options),
                manufacturers: ManufacturerService::with_options(Arc::clone(&repository), options),
                products: ProductService::with_options(Arc::clone(&repository), options),
                reviews: ReviewService::with_options(Arc::clone(&repository), options),
                vendors: VendorService::with_options(Arc::clone(&repository), options),
                repository,
                permissions,
            }),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.inner.repository
    }

    pub fn store(&self) -> &dyn Store {
        self.inner.repository.store().as_ref()
    }

    pub fn permissions(&self) -> &PermissionRegistry {
        &self.inner.permissions
    }

    /// Resolve a caller's roles through the permission registry.
    pub fn caller<S: AsRef<str>>(&self, roles: &[S]) -> CallerPermissions {
        self.inner.permissions.authorize(roles)
    }

    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    pub fn contents(&self) -> &ContentService {
        &self.inner.contents
    }

    pub fn manufacturers(&self) -> &ManufacturerService {
        &self.inner.manufacturers
    }

    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    pub fn reviews(&self) -> &ReviewService {
        &self.inner.reviews
    }

    pub fn vendors(&self) -> &VendorService {
        &self.inner.vendors
    }
}
