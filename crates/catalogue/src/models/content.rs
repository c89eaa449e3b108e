//! CMS content pages.

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use crate::filter::{BoolFilter, FilterList, IdFilter, StringFilter, active_only};
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

pub const CONTENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("active", FieldType::Bool),
    FieldSpec::new("load_id", FieldType::Text),
    FieldSpec::new("title", FieldType::Text),
    FieldSpec::new("content", FieldType::Text),
    FieldSpec::new("folder", FieldType::Text),
    FieldSpec::new("category_id", FieldType::Id).nullable(),
    FieldSpec::new("timestamp", FieldType::Timestamp).store_default(),
];

/// A row of the `content` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentRow {
    pub id: String,
    pub active: bool,
    /// Stable ident used by templates to load a snippet.
    pub load_id: String,
    pub title: String,
    pub content: String,
    pub folder: String,
    /// Category page this content is attached to, if any.
    pub category_id: Option<String>,
    pub timestamp: Option<i64>,
}

impl Model for ContentRow {
    const SCHEMA: Schema = Schema::new("content", CONTENT_FIELDS);

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

/// Read-only content view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Content {
    row: ContentRow,
}

impl Content {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn is_active(&self) -> bool {
        self.row.active
    }

    pub fn load_id(&self) -> &str {
        &self.row.load_id
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }

    pub fn content(&self) -> &str {
        &self.row.content
    }

    pub fn folder(&self) -> &str {
        &self.row.folder
    }

    pub fn category_id(&self) -> Option<&str> {
        self.row.category_id.as_deref()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.row.timestamp
    }
}

impl DataType for Content {
    type Model = ContentRow;

    fn from_model(row: ContentRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &ContentRow {
        &self.row
    }
}

/// Filters accepted when listing content pages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentFilterList {
    #[serde(default)]
    pub folder: Option<StringFilter>,
    #[serde(default)]
    pub category: Option<IdFilter>,
    #[serde(default = "active_only")]
    pub active: Option<BoolFilter>,
}

impl Default for ContentFilterList {
    fn default() -> Self {
        Self {
            folder: None,
            category: None,
            active: active_only(),
        }
    }
}

impl From<ContentFilterList> for FilterList {
    fn from(input: ContentFilterList) -> Self {
        FilterList::new(input.active)
            .with("folder", input.folder.and_then(StringFilter::into_filter))
            .with("category_id", input.category.map(IdFilter::into_filter))
    }
}
