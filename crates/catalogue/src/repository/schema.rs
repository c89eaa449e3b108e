//! Explicit per-entity schemas and schema-checked row decoding.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::store::Record;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Primary or foreign identifier (text).
    Id,
    /// Free text.
    Text,
    /// Boolean flag (stored as `BOOLEAN` or `0`/`1`).
    Bool,
    /// Integer.
    Integer,
    /// Floating point.
    Float,
    /// Unix timestamp in seconds.
    Timestamp,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Id => "id",
            FieldType::Text => "text",
            FieldType::Bool => "bool",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

impl FieldType {
    /// Normalize a raw store value to the JSON shape serde expects.
    fn normalize(self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (FieldType::Id | FieldType::Text, value @ Value::String(_)) => Ok(value),
            (FieldType::Bool, value @ Value::Bool(_)) => Ok(value),
            (FieldType::Bool, Value::Number(n)) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(format!("expected bool, got {n}")),
            },
            (FieldType::Integer | FieldType::Timestamp, Value::Number(n)) if n.is_i64() => {
                Ok(Value::Number(n))
            }
            (FieldType::Float, Value::Number(n)) => n
                .as_f64()
                .map(Value::from)
                .ok_or_else(|| format!("expected float, got {n}")),
            (ty, other) => Err(format!("expected {ty}, got {other}")),
        }
    }
}

/// One column of an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub nullable: bool,
    /// The store fills this column when the write omits it.
    pub store_default: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            store_default: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column as store-defaulted. Implies nullable on the model side.
    pub const fn store_default(mut self) -> Self {
        self.nullable = true;
        self.store_default = true;
        self
    }
}

/// Table metadata for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub table: &'static str,
    pub primary_key: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Schema keyed by an `id` primary key.
    pub const fn new(table: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            table,
            primary_key: "id",
            fields,
        }
    }

    /// Look up a column by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Decode a store record into `T`.
    ///
    /// Every schema column must be present, no other column may be, and each
    /// value must fit its declared type.
    pub fn decode<T: DeserializeOwned>(&self, record: Record) -> Result<T, String> {
        let mut normalized = Map::with_capacity(self.fields.len());

        for (column, value) in record {
            let Some(spec) = self.field(&column) else {
                return Err(format!("unexpected column `{column}`"));
            };
            let value = if value.is_null() {
                if !spec.nullable {
                    return Err(format!("column `{column}` is not nullable"));
                }
                Value::Null
            } else {
                spec.ty
                    .normalize(value)
                    .map_err(|e| format!("column `{column}`: {e}"))?
            };
            normalized.insert(column, value);
        }

        if let Some(missing) = self
            .fields
            .iter()
            .find(|f| !normalized.contains_key(f.name))
        {
            return Err(format!("missing column `{}`", missing.name));
        }

        serde_json::from_value(Value::Object(normalized)).map_err(|e| e.to_string())
    }
}
