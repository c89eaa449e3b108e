//! Emporium test utilities.
//!
//! Helpers for integration testing: an in-memory SQLite pool, fixture
//! builders that insert catalogue rows directly, and link helpers for the
//! association tables.
//! Fixtures write plain SQL so they do not depend on the code under test.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

/// Open a private in-memory SQLite database.
///
/// A single, never-recycled connection keeps the database alive for the
/// lifetime of the pool.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// A fresh 32-character hex id.
pub fn hex_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Create a test vendor.
pub fn test_vendor(title: &str) -> TestBrand {
    TestBrand::new("vendor", title)
}

/// Create a test manufacturer.
pub fn test_manufacturer(title: &str) -> TestBrand {
    TestBrand::new("manufacturer", title)
}

/// Vendor or manufacturer fixture; both tables share one shape.
#[derive(Debug, Clone)]
pub struct TestBrand {
    pub table: &'static str,
    pub id: String,
    pub active: bool,
    pub title: String,
    pub short_description: String,
}

impl TestBrand {
    fn new(table: &'static str, title: &str) -> Self {
        Self {
            table,
            id: hex_id(),
            active: true,
            title: title.to_string(),
            short_description: String::new(),
        }
    }

    /// Set a custom ID.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (id, active, title, short_description) VALUES (?, ?, ?, ?)",
            self.table
        );
        sqlx::query(&sql)
            .bind(&self.id)
            .bind(self.active)
            .bind(&self.title)
            .bind(&self.short_description)
            .execute(pool)
            .await?;
        Ok(self.id.clone())
    }
}

/// Create a test category.
pub fn test_category(title: &str) -> TestCategory {
    TestCategory {
        id: hex_id(),
        active: true,
        hidden: false,
        parent_id: None,
        title: title.to_string(),
        sort: 0,
    }
}

#[derive(Debug, Clone)]
pub struct TestCategory {
    pub id: String,
    pub active: bool,
    pub hidden: bool,
    pub parent_id: Option<String>,
    pub title: String,
    pub sort: i64,
}

impl TestCategory {
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query(
            "INSERT INTO category (id, active, hidden, parent_id, title, short_description, sort)
             VALUES (?, ?, ?, ?, ?, '', ?)",
        )
        .bind(&self.id)
        .bind(self.active)
        .bind(self.hidden)
        .bind(&self.parent_id)
        .bind(&self.title)
        .bind(self.sort)
        .execute(pool)
        .await?;
        Ok(self.id.clone())
    }
}

/// Create a test content page.
pub fn test_content(load_id: &str, title: &str) -> TestContent {
    TestContent {
        id: hex_id(),
        active: true,
        load_id: load_id.to_string(),
        title: title.to_string(),
        content: String::new(),
        folder: String::new(),
        category_id: None,
    }
}

#[derive(Debug, Clone)]
pub struct TestContent {
    pub id: String,
    pub active: bool,
    pub load_id: String,
    pub title: String,
    pub content: String,
    pub folder: String,
    pub category_id: Option<String>,
}

impl TestContent {
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn in_folder(mut self, folder: &str) -> Self {
        self.folder = folder.to_string();
        self
    }

    pub fn for_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query(
            "INSERT INTO content (id, active, load_id, title, content, folder, category_id)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(self.active)
        .bind(&self.load_id)
        .bind(&self.title)
        .bind(&self.content)
        .bind(&self.folder)
        .bind(&self.category_id)
        .execute(pool)
        .await?;
        Ok(self.id.clone())
    }
}

/// Create a test product.
pub fn test_product(title: &str) -> TestProduct {
    TestProduct {
        id: hex_id(),
        active: true,
        active_from: None,
        active_to: None,
        title: title.to_string(),
        manufacturer_id: None,
        vendor_id: None,
        price: 0.0,
        vat: None,
        stock: 0,
    }
}

#[derive(Debug, Clone)]
pub struct TestProduct {
    pub id: String,
    pub active: bool,
    pub active_from: Option<i64>,
    pub active_to: Option<i64>,
    pub title: String,
    pub manufacturer_id: Option<String>,
    pub vendor_id: Option<String>,
    pub price: f64,
    pub vat: Option<f64>,
    pub stock: i64,
}

impl TestProduct {
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Inactive flag, but visible between `from` and `to` (Unix seconds).
    pub fn active_between(mut self, from: i64, to: i64) -> Self {
        self.active = false;
        self.active_from = Some(from);
        self.active_to = Some(to);
        self
    }

    pub fn with_manufacturer(mut self, manufacturer_id: &str) -> Self {
        self.manufacturer_id = Some(manufacturer_id.to_string());
        self
    }

    pub fn with_vendor(mut self, vendor_id: &str) -> Self {
        self.vendor_id = Some(vendor_id.to_string());
        self
    }

    pub fn with_price(mut self, price: f64, vat: Option<f64>) -> Self {
        self.price = price;
        self.vat = vat;
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query(
            "INSERT INTO product (id, active, active_from, active_to, sku, ean, title,
                                  short_description, manufacturer_id, vendor_id, price, vat, stock)
             VALUES (?, ?, ?, ?, '', '', ?, '', ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(self.active)
        .bind(self.active_from)
        .bind(self.active_to)
        .bind(&self.title)
        .bind(&self.manufacturer_id)
        .bind(&self.vendor_id)
        .bind(self.price)
        .bind(self.vat)
        .bind(self.stock)
        .execute(pool)
        .await?;
        Ok(self.id.clone())
    }
}

/// Link a product to a category.
pub async fn link_category(
    pool: &SqlitePool,
    product_id: &str,
    category_id: &str,
    position: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_category (id, product_id, category_id, position) VALUES (?, ?, ?, ?)",
    )
    .bind(hex_id())
    .bind(product_id)
    .bind(category_id)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(())
}

/// Create a test review of `product_id`.
pub fn test_review(product_id: &str, text: &str, rating: i64) -> TestReview {
    TestReview {
        id: hex_id(),
        active: true,
        object_id: product_id.to_string(),
        user_id: None,
        text: text.to_string(),
        rating,
    }
}

#[derive(Debug, Clone)]
pub struct TestReview {
    pub id: String,
    pub active: bool,
    pub object_id: String,
    pub user_id: Option<String>,
    pub text: String,
    pub rating: i64,
}

impl TestReview {
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn by_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query(
            "INSERT INTO review (id, active, object_id, user_id, text, rating)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(self.active)
        .bind(&self.object_id)
        .bind(&self.user_id)
        .bind(&self.text)
        .bind(self.rating)
        .execute(pool)
        .await?;
        Ok(self.id.clone())
    }
}

/// Create a test attribute.
pub fn test_attribute(title: &str) -> TestAttribute {
    TestAttribute {
        id: hex_id(),
        title: title.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TestAttribute {
    pub id: String,
    pub title: String,
}

impl TestAttribute {
    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query("INSERT INTO attribute (id, title) VALUES (?, ?)")
            .bind(&self.id)
            .bind(&self.title)
            .execute(pool)
            .await?;
        Ok(self.id.clone())
    }
}

/// Give a product a value for an attribute.
pub async fn link_attribute(
    pool: &SqlitePool,
    product_id: &str,
    attribute_id: &str,
    value: &str,
    position: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_attribute (id, object_id, attribute_id, value, position)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(hex_id())
    .bind(product_id)
    .bind(attribute_id)
    .bind(value)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(())
}

/// Create a test selection list.
pub fn test_selection_list(title: &str) -> TestSelectionList {
    TestSelectionList {
        id: hex_id(),
        title: title.to_string(),
        values: Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct TestSelectionList {
    pub id: String,
    pub title: String,
    /// Choices, stored with their index as position.
    pub values: Vec<String>,
}

impl TestSelectionList {
    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Insert the list and its choices.
    pub async fn insert(&self, pool: &SqlitePool) -> Result<String, sqlx::Error> {
        sqlx::query("INSERT INTO selection_list (id, title) VALUES (?, ?)")
            .bind(&self.id)
            .bind(&self.title)
            .execute(pool)
            .await?;
        for (position, value) in (0_i64..).zip(&self.values) {
            sqlx::query("INSERT INTO selection (id, list_id, value, position) VALUES (?, ?, ?, ?)")
                .bind(hex_id())
                .bind(&self.id)
                .bind(value)
                .bind(position)
                .execute(pool)
                .await?;
        }
        Ok(self.id.clone())
    }
}

/// Offer a selection list on a product.
pub async fn link_selection_list(
    pool: &SqlitePool,
    product_id: &str,
    list_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_selection_list (id, object_id, selection_list_id) VALUES (?, ?, ?)",
    )
    .bind(hex_id())
    .bind(product_id)
    .bind(list_id)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_ids_are_unique() {
        let a = hex_id();
        let b = hex_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn product_builder() {
        let product = test_product("Kite")
            .with_manufacturer("m1")
            .with_price(359.0, Some(19.0))
            .active_between(100, 200);

        assert_eq!(product.title, "Kite");
        assert!(!product.active);
        assert_eq!(product.active_from, Some(100));
        assert_eq!(product.manufacturer_id.as_deref(), Some("m1"));
        assert_eq!(product.vat, Some(19.0));
    }

    #[test]
    fn brand_builders_target_their_tables() {
        assert_eq!(test_vendor("a").table, "vendor");
        assert_eq!(test_manufacturer("b").inactive().table, "manufacturer");
        assert!(!test_manufacturer("b").inactive().active);
    }

    #[test]
    fn selection_list_builder() {
        let list = test_selection_list("Size").with_values(&["S", "M"]);
        assert_eq!(list.values, vec!["S".to_string(), "M".to_string()]);
    }

    #[tokio::test]
    async fn memory_pool_keeps_state() {
        let pool = memory_pool().await.unwrap();
        sqlx::query("CREATE TABLE t (id TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t VALUES ('x')")
            .execute(&pool)
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM t")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
