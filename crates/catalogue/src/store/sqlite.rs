//! SQLite store.

use async_trait::async_trait;
use sea_query::{InsertStatement, SelectStatement, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, ValueRef};

use super::{Dialect, Record, Store, StoreError};

/// Store backed by a SQLite pool.
///
/// SQLite has no row-to-JSON projection, so each column is decoded by its
/// storage class. Booleans arrive as integers and are normalized later by the
/// entity schema.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn decode_row(row: &SqliteRow) -> Result<Record, StoreError> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, StoreError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(value) = row.try_get::<i64, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<f64, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<String, _>(index) {
        return Ok(Value::String(value));
    }
    Err(StoreError::Decode(format!(
        "unsupported value in column {index}"
    )))
}

#[async_trait]
impl Store for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn fetch_all(&self, query: &SelectStatement) -> Result<Vec<Record>, StoreError> {
        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        tracing::debug!(sql = %sql, "sqlite select");

        let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, statement: &InsertStatement) -> Result<u64, StoreError> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        tracing::debug!(sql = %sql, "sqlite execute");

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn execute_script(&self, script: &str) -> Result<(), StoreError> {
        sqlx::raw_sql(script).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sea_query::{Alias, Query};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn decodes_storage_classes() {
        let store = store().await;
        store
            .execute_script(
                "CREATE TABLE t (id TEXT PRIMARY KEY, flag BOOLEAN, n INTEGER, x REAL, note TEXT);
                 INSERT INTO t VALUES ('a', 1, 42, 2.5, NULL);",
            )
            .await
            .unwrap();

        let mut query = Query::select();
        query
            .columns([
                Alias::new("id"),
                Alias::new("flag"),
                Alias::new("n"),
                Alias::new("x"),
                Alias::new("note"),
            ])
            .from(Alias::new("t"));

        let rows = store.fetch_all(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["id"], Value::from("a"));
        assert_eq!(row["flag"], Value::from(1));
        assert_eq!(row["n"], Value::from(42));
        assert_eq!(row["x"], Value::from(2.5));
        assert_eq!(row["note"], Value::Null);
    }

    #[tokio::test]
    async fn execute_reports_affected_rows() {
        let store = store().await;
        store
            .execute_script("CREATE TABLE t (id TEXT PRIMARY KEY, title TEXT NOT NULL);")
            .await
            .unwrap();

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new("t"))
            .columns([Alias::new("id"), Alias::new("title")])
            .values_panic(["a".into(), "Kite".into()]);

        assert_eq!(store.execute(&insert).await.unwrap(), 1);
        assert!(matches!(
            store.execute(&insert).await,
            Err(StoreError::Database(_))
        ));
    }
}
