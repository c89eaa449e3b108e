//! Product categories.
//!
//! Categories form a tree through `parent_id`. A category is visible when it
//! is active and not hidden; hidden categories stay reachable by id for
//! callers allowed to see inactive categories.

use sea_query::{Alias, Expr, ExprTrait, SimpleExpr};
use serde::{Deserialize, Serialize};

use crate::filter::{BoolFilter, FilterList, IdFilter, StringFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

pub const CATEGORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("hidden", FieldType::Bool),
    FieldSpec::new("parent_id", FieldType::Id).nullable(),
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("short_description", FieldType::Text),
    FieldSpec::new("sort", FieldType::Integer),
    FieldSpec::new("timestamp", FieldType::Timestamp).store_default(),
];

/// A row of the `category` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRow {
    pub id: String,
    pub active: bool,
    pub hidden: bool,
    /// Parent category; `None` for root categories.
    pub parent_id: Option<String>,
    pub title: String,
    pub short_description: String,
    /// Sort weight among siblings.
    pub sort: i64,
    pub timestamp: Option<i64>,
}

impl Model for CategoryRow {
    const SCHEMA: Schema = Schema::new("category", CATEGORY_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::flag(alias, "active")
            .and(Expr::col((Alias::new(alias), Alias::new("hidden"))).eq(false))
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        self.active && !self.hidden
    }
}

/// Read-only category view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Category {
    row: CategoryRow,
}

impl Category {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    /// Visible to everyone: active and not hidden.
    pub fn is_active(&self) -> bool {
        self.row.is_active(&ActiveContext::current())
    }

    pub fn is_hidden(&self) -> bool {
        self.row.hidden
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.row.parent_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }

    pub fn short_description(&self) -> &str {
        &self.row.short_description
    }

    pub fn sort(&self) -> i64 {
        self.row.sort
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.row.timestamp
    }
}

impl DataType for Category {
    type Model = CategoryRow;

    fn from_model(row: CategoryRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &CategoryRow {
        &self.row
    }
}

/// Filters accepted when listing categories.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryFilterList {
    #[serde(default)]
    pub title: Option<StringFilter>,
    #[serde(default)]
    pub parent: Option<IdFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for CategoryFilterList {
    fn default() -> Self {
        Self {
            title: None,
            parent: None,
            active: active_only(),
        }
    }
}

impl From<CategoryFilterList> for FilterList {
    fn from(input: CategoryFilterList) -> Self {
        FilterList::new(input.active)
            .with("title", input.title.and_then(StringFilter::into_filter))
            .with("parent_id", input.parent.map(IdFilter::into_filter))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sea_query::{PostgresQueryBuilder, Query};

    #[test]
    fn hidden_categories_are_not_active() {
        let row = CategoryRow {
            id: "c1".to_string(),
            active: true,
            hidden: true,
            parent_id: None,
            title: "Kites".to_string(),
            short_description: String::new(),
            sort: 0,
            timestamp: None,
        };
        assert!(!Category::from_model(row).is_active());
    }

    #[test]
    fn active_condition_checks_hidden_flag() {
        let mut query = Query::select();
        query
            .column(Alias::new("id"))
            .from(Alias::new("category"))
            .and_where(CategoryRow::active_condition(
                "category",
                &ActiveContext::current(),
            ));
        let sql = query.to_string(PostgresQueryBuilder);
        assert!(
            sql.contains(r#""category"."active" = TRUE AND "category"."hidden" = FALSE"#),
            "{sql}"
        );
    }
}
