//! Filtered repository over typed entity models.
//!
//! This module provides:
//! - Schema: explicit per-entity table metadata and row decoding
//! - Model/DataType: backing rows and their typed read-models
//! - FilterQueryBuilder: SeaQuery statement generation
//! - Repository: get by id, list by filter, save-and-reload

mod entity;
mod query_builder;
mod schema;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use entity::{ActiveContext, DataType, Model};
pub use query_builder::{FilterQueryBuilder, Page};
pub use schema::{FieldSpec, FieldType, Schema};

use crate::filter::{FilterError, FilterList};
use crate::store::{Store, StoreError};

/// Repository failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no `{table}` row with id `{id}`")]
    NotFound { table: &'static str, id: String },

    #[error("failed to persist `{id}`: {source}")]
    Persistence {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("unexpected row shape in `{table}`: {reason}")]
    RowShape { table: &'static str, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Generic data access for every catalogue entity.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn Store>,
}

impl Repository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Load a single entity by primary key.
    pub async fn get_by_id<D: DataType>(&self, id: &str) -> Result<D, RepositoryError> {
        let schema = D::Model::SCHEMA;
        let query = FilterQueryBuilder::new(schema).build_by_id(id);
        let records = self.store.fetch_all(&query).await?;

        let Some(record) = records.into_iter().next() else {
            tracing::debug!(table = schema.table, id = %id, "entity not found");
            return Err(RepositoryError::NotFound {
                table: schema.table,
                id: id.to_string(),
            });
        };

        decode::<D>(record)
    }

    /// Load every entity matching `filters`, ordered by primary key.
    ///
    /// An active filter of `true` applies the model's visibility predicate.
    /// `false` and unset both leave visibility unconstrained.
    pub async fn get_by_filter<D: DataType>(
        &self,
        filters: &FilterList,
        page: Page,
    ) -> Result<Vec<D>, RepositoryError> {
        let schema = D::Model::SCHEMA;
        let active = match filters.active() {
            Some(active) if active.equals => Some(D::Model::active_condition(
                schema.table,
                &ActiveContext::current(),
            )),
            _ => None,
        };

        let query = FilterQueryBuilder::new(schema).build(filters, active, page)?;
        let records = self.store.fetch_all(&query).await?;
        tracing::debug!(table = schema.table, rows = records.len(), "filtered fetch");

        records.into_iter().map(decode::<D>).collect()
    }

    /// Upsert the backing row and return the stored representation.
    pub async fn save<D: DataType>(&self, entity: &D) -> Result<D, RepositoryError> {
        let model = entity.model();
        let id = model.id().to_string();
        let persistence = |source| RepositoryError::Persistence {
            id: id.clone(),
            source,
        };

        let record = match serde_json::to_value(model) {
            Ok(Value::Object(record)) => record,
            Ok(other) => {
                return Err(persistence(StoreError::Build(format!(
                    "model serialized to {other}, expected an object"
                ))));
            }
            Err(e) => return Err(persistence(StoreError::Build(e.to_string()))),
        };

        let statement = FilterQueryBuilder::new(D::Model::SCHEMA)
            .build_upsert(&record)
            .map_err(|e| persistence(StoreError::Build(e)))?;

        if let Err(e) = self.store.execute(&statement).await {
            tracing::warn!(table = D::Model::SCHEMA.table, id = %id, error = %e, "save failed");
            return Err(persistence(e));
        }

        tracing::info!(table = D::Model::SCHEMA.table, id = %id, "entity saved");
        self.get_by_id(&id).await
    }
}

fn decode<D: DataType>(record: crate::store::Record) -> Result<D, RepositoryError> {
    let schema = D::Model::SCHEMA;
    schema
        .decode::<D::Model>(record)
        .map(D::from_model)
        .map_err(|reason| {
            tracing::warn!(table = schema.table, reason = %reason, "row rejected");
            RepositoryError::RowShape {
                table: schema.table,
                reason,
            }
        })
}
