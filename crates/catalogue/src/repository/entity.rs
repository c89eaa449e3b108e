//! Backing models and the typed read-models wrapping them.

use sea_query::SimpleExpr;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::schema::Schema;

/// Point in time against which activity windows are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveContext {
    /// Unix timestamp in seconds.
    pub now: i64,
}

impl ActiveContext {
    /// Context for the current wall-clock time.
    pub fn current() -> Self {
        Self {
            now: chrono::Utc::now().timestamp(),
        }
    }

    pub fn at(now: i64) -> Self {
        Self { now }
    }
}

/// A backing record: one row of an entity table.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Table, primary key, and typed columns.
    const SCHEMA: Schema;

    /// Primary identifier.
    fn id(&self) -> &str;

    /// SQL predicate selecting rows that are currently visible.
    fn active_condition(alias: &str, ctx: &ActiveContext) -> SimpleExpr;

    /// In-memory counterpart of [`Model::active_condition`].
    fn is_active(&self, ctx: &ActiveContext) -> bool;
}

/// A read-only typed view over a backing model.
pub trait DataType: Send + Sync + Sized {
    type Model: Model;

    fn from_model(model: Self::Model) -> Self;

    fn model(&self) -> &Self::Model;
}
