//! Product reviews.

use chrono::{DateTime, Utc};
use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{BoolFilter, FilterList, IdFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

pub const REVIEW_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("object_id", FieldType::Id),
    FieldSpec::new("user_id", FieldType::Id).nullable(),
    FieldSpec::new("text", FieldType::Text),
    FieldSpec::new("rating", FieldType::Integer),
    FieldSpec::new("created_at", FieldType::Timestamp).store_default(),
];

/// A row of the `review` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewRow {
    pub id: String,
    pub active: bool,
    /// Reviewed product.
    pub object_id: String,
    pub user_id: Option<String>,
    pub text: String,
    /// Star rating, 0 to 5.
    pub rating: i64,
    pub created_at: Option<i64>,
}

impl Model for ReviewRow {
    const SCHEMA: Schema = Schema::new("review", REVIEW_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::flag(alias, "active")
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        self.active
    }
}

/// Read-only review view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Review {
    row: ReviewRow,
}

impl Review {
    /// A new, active review of `product_id` with a generated id.
    ///
    /// Nothing is stored until the review is saved.
    pub fn new(product_id: impl Into<String>, text: impl Into<String>, rating: i64) -> Self {
        Self {
            row: ReviewRow {
                id: Uuid::now_v7().simple().to_string(),
                active: true,
                object_id: product_id.into(),
                user_id: None,
                text: text.into(),
                rating,
                created_at: None,
            },
        }
    }

    /// Attribute the review to a user.
    pub fn by_user(mut self, user_id: impl Into<String>) -> Self {
        self.row.user_id = Some(user_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn is_active(&self) -> bool {
        self.row.active
    }

    pub fn product_id(&self) -> &str {
        &self.row.object_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.row.user_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.row.text
    }

    pub fn rating(&self) -> i64 {
        self.row.rating
    }

    /// Creation time; `None` until the review has been stored.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.row
            .created_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl DataType for Review {
    type Model = ReviewRow;

    fn from_model(row: ReviewRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &ReviewRow {
        &self.row
    }
}

/// Filters accepted when listing reviews.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewFilterList {
    #[serde(default)]
    pub product: Option<IdFilter>,
    #[serde(default)]
    pub user: Option<IdFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for ReviewFilterList {
    fn default() -> Self {
        Self {
            product: None,
            user: None,
            active: active_only(),
        }
    }
}

impl From<ReviewFilterList> for FilterList {
    fn from(input: ReviewFilterList) -> Self {
        FilterList::new(input.active)
            .with("object_id", input.product.map(IdFilter::into_filter))
            .with("user_id", input.user.map(IdFilter::into_filter))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn new_review_has_fresh_hex_id() {
        let a = Review::new("p1", "Great kite", 5);
        let b = Review::new("p1", "Great kite", 5);

        assert_eq!(a.id().len(), 32);
        assert!(a.id().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.id(), b.id());
        assert!(a.is_active());
        assert_eq!(a.product_id(), "p1");
        assert_eq!(a.created_at(), None);
    }
}
