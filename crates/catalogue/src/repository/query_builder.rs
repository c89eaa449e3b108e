//! Repository query builder using SeaQuery.
//!
//! Generates dialect-neutral statements from a [`Schema`] and a
//! [`FilterList`] with support for:
//! - Direct and relation-id (join) filters
//! - Entity-specific active predicates
//! - Deterministic ordering by primary key
//! - Offset/limit pagination
//! - Upserts that leave store-defaulted columns to the store

use sea_query::{
    Alias, Expr, ExprTrait, InsertStatement, OnConflict, Order, Query, SelectStatement, SimpleExpr,
};
use serde_json::Value;

use super::schema::{FieldSpec, FieldType, Schema};
use crate::filter::{FilterError, FilterList};
use crate::store::Record;

/// Offset/limit window for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Page {
    /// No window: every matching row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(offset: Option<u64>, limit: Option<u64>) -> Self {
        Self { offset, limit }
    }
}

/// Largest LIMIT/OFFSET both backends bind (a signed 64-bit integer).
const MAX_BOUND: u64 = i64::MAX as u64;

fn clamp_bound(bound: u64) -> u64 {
    bound.min(MAX_BOUND)
}

/// Statement builder for one entity table.
///
/// The table name doubles as the primary alias.
pub struct FilterQueryBuilder {
    schema: Schema,
}

impl FilterQueryBuilder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    fn alias(&self) -> Alias {
        Alias::new(self.schema.table)
    }

    /// `SELECT <schema columns> FROM <table>`.
    fn base_select(&self) -> SelectStatement {
        let mut query = Query::select();
        query
            .columns(
                self.schema
                    .fields
                    .iter()
                    .map(|f| (self.alias(), Alias::new(f.name))),
            )
            .from(self.alias());
        query
    }

    /// Build the list query.
    ///
    /// Unset filters are skipped. `active` is the entity's visibility
    /// predicate, already resolved by the caller.
    pub fn build(
        &self,
        filters: &FilterList,
        active: Option<SimpleExpr>,
        page: Page,
    ) -> Result<SelectStatement, FilterError> {
        let mut query = self.base_select();

        for (field, filter) in filters.filters() {
            let Some(filter) = filter else {
                continue;
            };
            filter.add_to_query(&mut query, &self.schema, field, self.schema.table)?;
        }

        if let Some(condition) = active {
            query.and_where(condition);
        }

        query.order_by(
            (self.alias(), Alias::new(self.schema.primary_key)),
            Order::Asc,
        );

        match (page.offset, page.limit) {
            (offset, Some(limit)) => {
                query.limit(clamp_bound(limit));
                if let Some(offset) = offset {
                    query.offset(clamp_bound(offset));
                }
            }
            // SQLite rejects OFFSET without LIMIT
            (Some(offset), None) => {
                query.limit(MAX_BOUND);
                query.offset(clamp_bound(offset));
            }
            (None, None) => {}
        }

        Ok(query)
    }

    /// Build the single-row lookup by primary key.
    pub fn build_by_id(&self, id: &str) -> SelectStatement {
        let mut query = self.base_select();
        query
            .and_where(Expr::col((self.alias(), Alias::new(self.schema.primary_key))).eq(id))
            .limit(1);
        query
    }

    /// Build an insert-or-update of `record` keyed by the primary key.
    ///
    /// Null values for store-defaulted columns are omitted from both the
    /// insert and the update so the store keeps or assigns its own value.
    pub fn build_upsert(&self, record: &Record) -> Result<InsertStatement, String> {
        let mut columns = Vec::with_capacity(self.schema.fields.len());
        let mut values = Vec::with_capacity(self.schema.fields.len());

        for spec in self.schema.fields {
            let value = record.get(spec.name).cloned().unwrap_or(Value::Null);
            if value.is_null() && spec.store_default {
                continue;
            }
            columns.push(spec.name);
            values.push(SimpleExpr::Value(bind_value(spec, value)?));
        }

        let updates: Vec<Alias> = columns
            .iter()
            .filter(|name| **name != self.schema.primary_key)
            .map(|name| Alias::new(*name))
            .collect();

        let mut on_conflict = OnConflict::column(Alias::new(self.schema.primary_key));
        if updates.is_empty() {
            on_conflict.do_nothing();
        } else {
            on_conflict.update_columns(updates);
        }

        let mut insert = Query::insert();
        insert
            .into_table(self.alias())
            .columns(columns.into_iter().map(Alias::new))
            .values(values)
            .map_err(|e| e.to_string())?;
        insert.on_conflict(on_conflict);

        Ok(insert)
    }
}

/// Convert a model's JSON value into a typed bind value.
fn bind_value(spec: &FieldSpec, value: Value) -> Result<sea_query::Value, String> {
    let value = match (spec.ty, value) {
        (ty, Value::Null) if spec.nullable => match ty {
            FieldType::Id | FieldType::Text => None::<String>.into(),
            FieldType::Bool => None::<bool>.into(),
            FieldType::Integer | FieldType::Timestamp => None::<i64>.into(),
            FieldType::Float => None::<f64>.into(),
        },
        (FieldType::Id | FieldType::Text, Value::String(s)) => s.into(),
        (FieldType::Bool, Value::Bool(b)) => b.into(),
        (FieldType::Integer | FieldType::Timestamp, Value::Number(n)) if n.is_i64() => {
            n.as_i64().unwrap_or_default().into()
        }
        (FieldType::Float, Value::Number(n)) => n.as_f64().unwrap_or_default().into(),
        (ty, other) => {
            return Err(format!(
                "column `{}`: expected {ty}, got {other}",
                spec.name
            ));
        }
    };
    Ok(value)
}
