//! Backing store abstraction.
//!
//! The repository talks to the database only through [`Store`]. Statements
//! arrive as sea-query ASTs and are rendered for the store's own dialect;
//! parameter values are always bound, never inlined.

mod postgres;
mod sqlite;

use async_trait::async_trait;
use sea_query::{InsertStatement, SelectStatement};
use serde_json::{Map, Value};
use thiserror::Error;

pub use postgres::PgStore;
pub use sqlite::SqliteStore;

/// One result row keyed by column name.
pub type Record = Map<String, Value>;

/// SQL dialect spoken by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Store-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode row: {0}")]
    Decode(String),

    #[error("failed to build statement: {0}")]
    Build(String),
}

/// Query execution against a relational store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Dialect used to render statements.
    fn dialect(&self) -> Dialect;

    /// Run a select and return every row as a [`Record`].
    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<Record>, StoreError>;

    /// Run an insert/upsert and return the number of affected rows.
    async fn execute(&self, statement: &InsertStatement) -> Result<u64, StoreError>;

    /// Run a multi-statement script (schema installation).
    async fn execute_script(&self, script: &str) -> Result<(), StoreError>;
}
