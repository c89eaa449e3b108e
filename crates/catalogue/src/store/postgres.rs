//! PostgreSQL store.

use async_trait::async_trait;
use sea_query::{InsertStatement, PostgresQueryBuilder, SelectStatement};
use sea_query_binder::SqlxBinder;
use serde_json::Value;
use sqlx::PgPool;

use super::{Dialect, Record, Store, StoreError};

/// Store backed by a PostgreSQL pool.
///
/// Rows come back as `row_to_json` objects, so column types map onto JSON
/// without per-column decoding.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<Record>, StoreError> {
        let (sql, values) = query.build_sqlx(PostgresQueryBuilder);
        tracing::debug!(sql = %sql, "postgres select");

        let rows: Vec<Value> =
            sqlx::query_scalar_with(&format!("SELECT row_to_json(t) FROM ({sql}) t"), values)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| match row {
                Value::Object(record) => Ok(record),
                other => Err(StoreError::Decode(format!(
                    "expected a JSON object row, got {other}"
                ))),
            })
            .collect()
    }

    async fn execute(&self, statement: &InsertStatement) -> Result<u64, StoreError> {
        let (sql, values) = statement.build_sqlx(PostgresQueryBuilder);
        tracing::debug!(sql = %sql, "postgres execute");

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn execute_script(&self, script: &str) -> Result<(), StoreError> {
        sqlx::raw_sql(script).execute(&self.pool).await?;
        Ok(())
    }
}
