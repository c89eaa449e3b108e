//! Database connections and schema installation.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::config::Config;
use crate::store::{Dialect, PgStore, SqliteStore, Store, StoreError};

/// Open a store for `config.database_url`.
///
/// `postgres://` and `postgresql://` URLs open a PostgreSQL pool; `sqlite:`
/// URLs open (and create if missing) a SQLite database.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>> {
    let url = config.database_url.as_str();

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(url)
            .await
            .context("failed to connect to PostgreSQL")?;
        return Ok(Arc::new(PgStore::new(pool)));
    }

    if url.starts_with("sqlite:") {
        let options = SqliteConnectOptions::from_str(url)
            .context("invalid SQLite URL")?
            .create_if_missing(true);
        // every in-memory connection is its own database
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            config.database_max_connections
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open SQLite database")?;
        return Ok(Arc::new(SqliteStore::new(pool)));
    }

    bail!("unsupported DATABASE_URL scheme: expected postgres:// or sqlite:")
}

/// Create the catalogue tables if they do not exist yet.
pub async fn install_schema(store: &dyn Store) -> Result<(), StoreError> {
    let script = match store.dialect() {
        Dialect::Postgres => POSTGRES_SCHEMA,
        Dialect::Sqlite => SQLITE_SCHEMA,
    };
    store.execute_script(script).await?;
    tracing::info!(dialect = ?store.dialect(), "catalogue schema installed");
    Ok(())
}

/// Check if the store answers queries.
pub async fn check_health(store: &dyn Store) -> bool {
    store.execute_script("SELECT 1").await.is_ok()
}

pub const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS vendor (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    icon TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    "timestamp" BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE TABLE IF NOT EXISTS manufacturer (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    icon TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    "timestamp" BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE TABLE IF NOT EXISTS category (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    hidden BOOLEAN NOT NULL DEFAULT FALSE,
    parent_id TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    sort BIGINT NOT NULL DEFAULT 0,
    "timestamp" BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE INDEX IF NOT EXISTS category_parent_idx ON category (parent_id);

CREATE TABLE IF NOT EXISTS content (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    load_id TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    folder TEXT NOT NULL DEFAULT '',
    category_id TEXT,
    "timestamp" BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE UNIQUE INDEX IF NOT EXISTS content_load_id_idx ON content (load_id);

CREATE TABLE IF NOT EXISTS product (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    active_from BIGINT,
    active_to BIGINT,
    sku TEXT NOT NULL DEFAULT '',
    ean TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    manufacturer_id TEXT,
    vendor_id TEXT,
    price DOUBLE PRECISION NOT NULL DEFAULT 0,
    vat DOUBLE PRECISION,
    stock BIGINT NOT NULL DEFAULT 0,
    inserted_at BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT),
    "timestamp" BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE INDEX IF NOT EXISTS product_manufacturer_idx ON product (manufacturer_id);
CREATE INDEX IF NOT EXISTS product_vendor_idx ON product (vendor_id);

CREATE TABLE IF NOT EXISTS product_category (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    position BIGINT NOT NULL DEFAULT 0,
    UNIQUE (product_id, category_id)
);

CREATE INDEX IF NOT EXISTS product_category_category_idx ON product_category (category_id);

CREATE TABLE IF NOT EXISTS attribute (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS product_attribute (
    id TEXT PRIMARY KEY,
    object_id TEXT NOT NULL,
    attribute_id TEXT NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    position BIGINT NOT NULL DEFAULT 0,
    UNIQUE (object_id, attribute_id)
);

CREATE INDEX IF NOT EXISTS product_attribute_attribute_idx ON product_attribute (attribute_id);

CREATE TABLE IF NOT EXISTS selection_list (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS selection (
    id TEXT PRIMARY KEY,
    list_id TEXT NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    position BIGINT NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS selection_list_idx ON selection (list_id);

CREATE TABLE IF NOT EXISTS product_selection_list (
    id TEXT PRIMARY KEY,
    object_id TEXT NOT NULL,
    selection_list_id TEXT NOT NULL,
    position BIGINT NOT NULL DEFAULT 0,
    UNIQUE (object_id, selection_list_id)
);

CREATE INDEX IF NOT EXISTS product_selection_list_list_idx ON product_selection_list (selection_list_id);

CREATE TABLE IF NOT EXISTS review (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    object_id TEXT NOT NULL,
    user_id TEXT,
    text TEXT NOT NULL DEFAULT '',
    rating BIGINT NOT NULL CHECK (rating BETWEEN 0 AND 5),
    created_at BIGINT NOT NULL DEFAULT (EXTRACT(EPOCH FROM now())::BIGINT)
);

CREATE INDEX IF NOT EXISTS review_object_idx ON review (object_id);
"#;

pub const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS vendor (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    icon TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    "timestamp" INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE TABLE IF NOT EXISTS manufacturer (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    icon TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    "timestamp" INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE TABLE IF NOT EXISTS category (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    hidden BOOLEAN NOT NULL DEFAULT 0,
    parent_id TEXT,
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    sort INTEGER NOT NULL DEFAULT 0,
    "timestamp" INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE INDEX IF NOT EXISTS category_parent_idx ON category (parent_id);

CREATE TABLE IF NOT EXISTS content (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    load_id TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    folder TEXT NOT NULL DEFAULT '',
    category_id TEXT,
    "timestamp" INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE UNIQUE INDEX IF NOT EXISTS content_load_id_idx ON content (load_id);

CREATE TABLE IF NOT EXISTS product (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    active_from INTEGER,
    active_to INTEGER,
    sku TEXT NOT NULL DEFAULT '',
    ean TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    short_description TEXT NOT NULL DEFAULT '',
    manufacturer_id TEXT,
    vendor_id TEXT,
    price REAL NOT NULL DEFAULT 0,
    vat REAL,
    stock INTEGER NOT NULL DEFAULT 0,
    inserted_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER)),
    "timestamp" INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE INDEX IF NOT EXISTS product_manufacturer_idx ON product (manufacturer_id);
CREATE INDEX IF NOT EXISTS product_vendor_idx ON product (vendor_id);

CREATE TABLE IF NOT EXISTS product_category (
    id TEXT PRIMARY KEY,
    product_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (product_id, category_id)
);

CREATE INDEX IF NOT EXISTS product_category_category_idx ON product_category (category_id);

CREATE TABLE IF NOT EXISTS attribute (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS product_attribute (
    id TEXT PRIMARY KEY,
    object_id TEXT NOT NULL,
    attribute_id TEXT NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (object_id, attribute_id)
);

CREATE INDEX IF NOT EXISTS product_attribute_attribute_idx ON product_attribute (attribute_id);

CREATE TABLE IF NOT EXISTS selection_list (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS selection (
    id TEXT PRIMARY KEY,
    list_id TEXT NOT NULL,
    value TEXT NOT NULL DEFAULT '',
    position INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS selection_list_idx ON selection (list_id);

CREATE TABLE IF NOT EXISTS product_selection_list (
    id TEXT PRIMARY KEY,
    object_id TEXT NOT NULL,
    selection_list_id TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE (object_id, selection_list_id)
);

CREATE INDEX IF NOT EXISTS product_selection_list_list_idx ON product_selection_list (selection_list_id);

CREATE TABLE IF NOT EXISTS review (
    id TEXT PRIMARY KEY,
    active BOOLEAN NOT NULL DEFAULT 1,
    object_id TEXT NOT NULL,
    user_id TEXT,
    text TEXT NOT NULL DEFAULT '',
    rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 5),
    created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
);

CREATE INDEX IF NOT EXISTS review_object_idx ON review (object_id);
"#;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn config(url: &str) -> Config {
        Config {
            database_url: url.to_string(),
            database_max_connections: 4,
            permissions_file: None,
            reviews_moderated: true,
        }
    }

    #[tokio::test]
    async fn sqlite_schema_installs_idempotently() {
        let store = connect(&config("sqlite::memory:")).await.unwrap();
        assert_eq!(store.dialect(), Dialect::Sqlite);

        install_schema(store.as_ref()).await.unwrap();
        install_schema(store.as_ref()).await.unwrap();
        assert!(check_health(store.as_ref()).await);
    }

    #[tokio::test]
    async fn rejects_unknown_scheme() {
        let err = connect(&config("mysql://localhost/shop")).await.err().unwrap();
        assert!(err.to_string().contains("unsupported"), "{err}");
    }
}
