//! Permission-aware access to one entity kind.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::CatalogueOptions;
use crate::error::{CatalogueError, CatalogueResult};
use crate::filter::FilterList;
use crate::models::{Category, Content, EntityKind, Manufacturer, Product, Review, Vendor};
use crate::permissions::{Authorization, view_inactive};
use crate::repository::{ActiveContext, DataType, Model, Page, Repository, RepositoryError};

/// A read-model the catalogue exposes through an [`EntityService`].
pub trait CatalogueEntity: DataType + Serialize {
    const KIND: EntityKind;
}

impl CatalogueEntity for Category {
    const KIND: EntityKind = EntityKind::Category;
}

impl CatalogueEntity for Content {
    const KIND: EntityKind = EntityKind::Content;
}

impl CatalogueEntity for Manufacturer {
    const KIND: EntityKind = EntityKind::Manufacturer;
}

impl CatalogueEntity for Product {
    const KIND: EntityKind = EntityKind::Product;
}

impl CatalogueEntity for Review {
    const KIND: EntityKind = EntityKind::Review;
}

impl CatalogueEntity for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;
}

/// Fetch and list entities of kind `D`, relaxing visibility for callers
/// holding `VIEW_INACTIVE_<KIND>`.
pub struct EntityService<D> {
    repository: Arc<Repository>,
    options: CatalogueOptions,
    _entity: PhantomData<fn() -> D>,
}

impl<D> Clone for EntityService<D> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            options: self.options,
            _entity: PhantomData,
        }
    }
}

impl<D: CatalogueEntity> EntityService<D> {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self::with_options(repository, CatalogueOptions::default())
    }

    pub fn with_options(repository: Arc<Repository>, options: CatalogueOptions) -> Self {
        Self {
            repository,
            options,
            _entity: PhantomData,
        }
    }

    pub(crate) fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn options(&self) -> CatalogueOptions {
        self.options
    }

    /// Fetch one entity by id.
    ///
    /// Inactive entities are returned only to callers allowed to view them;
    /// everyone else gets [`CatalogueError::Unauthorized`].
    pub async fn get(&self, id: &str, caller: &dyn Authorization) -> CatalogueResult<D> {
        let entity = match self.repository.get_by_id::<D>(id).await {
            Ok(entity) => entity,
            Err(RepositoryError::NotFound { .. }) => {
                return Err(CatalogueError::NotFound {
                    kind: D::KIND,
                    id: id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if entity.model().is_active(&ActiveContext::current())
            || caller.is_allowed(view_inactive(D::KIND))
        {
            return Ok(entity);
        }

        info!(kind = %D::KIND, id = %id, "inactive entity hidden from caller");
        Err(CatalogueError::Unauthorized)
    }

    /// List entities matching `filters`.
    ///
    /// Callers allowed to view inactive entities get the active filter
    /// dropped, so they see active and inactive entities alike.
    pub async fn list(
        &self,
        filters: impl Into<FilterList>,
        page: Page,
        caller: &dyn Authorization,
    ) -> CatalogueResult<Vec<D>> {
        let mut filters = filters.into();
        if caller.is_allowed(view_inactive(D::KIND)) {
            filters = filters.with_active_filter(None);
        }

        Ok(self.repository.get_by_filter::<D>(&filters, page).await?)
    }

    /// Persist `entity` and return the stored representation.
    pub async fn save(&self, entity: &D) -> CatalogueResult<D> {
        Ok(self.repository.save(entity).await?)
    }
}
