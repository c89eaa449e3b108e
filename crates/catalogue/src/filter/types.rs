//! Filter values and their translation into SQL conditions.
//!
//! A [`Filter`] is a single comparison against one named field. The variant
//! set is closed: equality, case-insensitive substring, boolean, and
//! relation-id (matched through a join to an association table).

use sea_query::{Alias, Expr, ExprTrait, JoinType, SelectStatement};
use thiserror::Error;

use crate::repository::{FieldType, Schema};

/// Association table linking a primary entity to related ids.
///
/// Relation-id filters join the primary table to this table on
/// `primary.<primary key> = association.<object_column>` and constrain one of
/// the `id_columns`.
#[derive(Debug, PartialEq, Eq)]
pub struct Association {
    /// Association table name.
    pub table: &'static str,

    /// Column holding the primary entity's id.
    pub object_column: &'static str,

    /// Columns a relation-id filter may match against.
    pub id_columns: &'static [&'static str],
}

/// Scalar operand for equality filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Free text.
    Text(String),
    /// Entity identifier.
    Id(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Id(_) => "id",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
        }
    }

    fn accepts(&self, ty: FieldType) -> bool {
        matches!(
            (self, ty),
            (Scalar::Text(_), FieldType::Text)
                | (Scalar::Id(_), FieldType::Id)
                | (Scalar::Integer(_), FieldType::Integer | FieldType::Timestamp)
                | (Scalar::Float(_), FieldType::Float)
        )
    }

    fn into_value(self) -> sea_query::Value {
        match self {
            Scalar::Text(s) | Scalar::Id(s) => s.into(),
            Scalar::Integer(i) => i.into(),
            Scalar::Float(f) => f.into(),
        }
    }
}

/// Single-field comparison condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact match on a scalar or identifier column.
    Equals(Scalar),
    /// Case-insensitive substring match (`LIKE %value%`).
    Contains(String),
    /// Boolean column match.
    Bool(bool),
    /// Id match evaluated through a join to an association table.
    RelationId {
        association: &'static Association,
        id: String,
    },
}

/// Errors raised when a filter does not fit the entity it is applied to.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter field `{field}` on `{table}`")]
    UnknownField { table: String, field: String },

    #[error("{filter} filter cannot be applied to {expected} field `{field}`")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        filter: &'static str,
    },

    #[error("association `{table}` has no id column `{field}`")]
    UnknownRelationColumn { table: String, field: String },
}

impl Filter {
    /// Equality against a text column.
    pub fn equals_text(value: impl Into<String>) -> Self {
        Filter::Equals(Scalar::Text(value.into()))
    }

    /// Equality against an identifier column.
    pub fn equals_id(id: impl Into<String>) -> Self {
        Filter::Equals(Scalar::Id(id.into()))
    }

    /// Substring match.
    pub fn contains(value: impl Into<String>) -> Self {
        Filter::Contains(value.into())
    }

    /// Relation-id match through `association`.
    pub fn relation(association: &'static Association, id: impl Into<String>) -> Self {
        Filter::RelationId {
            association,
            id: id.into(),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::Equals(scalar) => scalar.kind(),
            Filter::Contains(_) => "contains",
            Filter::Bool(_) => "bool",
            Filter::RelationId { .. } => "relation id",
        }
    }

    /// Append this filter's condition to `query`.
    ///
    /// Direct filters constrain `from_alias.field`; relation-id filters join
    /// the association table first and constrain the joined alias instead.
    /// Every operand is bound as a parameter.
    pub fn add_to_query(
        &self,
        query: &mut SelectStatement,
        schema: &Schema,
        field: &str,
        from_alias: &str,
    ) -> Result<(), FilterError> {
        if let Filter::RelationId { association, id } = self {
            if !association.id_columns.contains(&field) {
                return Err(FilterError::UnknownRelationColumn {
                    table: association.table.to_string(),
                    field: field.to_string(),
                });
            }

            let alias = format!("{}_{field}", association.table);
            query
                .join_as(
                    JoinType::InnerJoin,
                    Alias::new(association.table),
                    Alias::new(&alias),
                    Expr::col((Alias::new(from_alias), Alias::new(schema.primary_key)))
                        .equals((Alias::new(&alias), Alias::new(association.object_column))),
                )
                .and_where(Expr::col((Alias::new(&alias), Alias::new(field))).eq(id.as_str()));
            return Ok(());
        }

        let spec = schema.field(field).ok_or_else(|| FilterError::UnknownField {
            table: schema.table.to_string(),
            field: field.to_string(),
        })?;
        let column = Expr::col((Alias::new(from_alias), Alias::new(field)));

        let condition = match self {
            Filter::Equals(scalar) if scalar.accepts(spec.ty) => {
                column.eq(scalar.clone().into_value())
            }
            // both sides fold in SQL so the store's LOWER() applies to each
            Filter::Contains(value) if spec.ty == FieldType::Text => {
                let pattern = format!("%{}%", escape_like_wildcards(value));
                Expr::cust_with_exprs(
                    "LOWER($1) LIKE LOWER($2) ESCAPE '\\'",
                    [column.into(), Expr::val(pattern).into()],
                )
            }
            Filter::Bool(value) if spec.ty == FieldType::Bool => column.eq(*value),
            _ => {
                return Err(FilterError::TypeMismatch {
                    field: field.to_string(),
                    expected: spec.ty,
                    filter: self.kind(),
                });
            }
        };

        query.and_where(condition);
        Ok(())
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
pub(crate) fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::repository::FieldSpec;
    use sea_query::{PostgresQueryBuilder, Query};

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::new("id", FieldType::Id),
        FieldSpec::new("active", FieldType::Bool),
        FieldSpec::new("title", FieldType::Text),
        FieldSpec::new("stock", FieldType::Integer),
    ];
    const SCHEMA: Schema = Schema::new("product", FIELDS);

    static TAGS: Association = Association {
        table: "product_tag",
        object_column: "product_id",
        id_columns: &["tag_id"],
    };

    fn render(filter: &Filter, field: &str) -> Result<String, FilterError> {
        let mut query = Query::select();
        query.column(Alias::new("id")).from(Alias::new("product"));
        filter.add_to_query(&mut query, &SCHEMA, field, "product")?;
        Ok(query.to_string(PostgresQueryBuilder))
    }

    #[test]
    fn equality_filter_targets_primary_alias() {
        let sql = render(&Filter::equals_text("Kite"), "title").unwrap();
        assert!(sql.contains(r#""product"."title" = 'Kite'"#), "{sql}");
    }

    #[test]
    fn contains_filter_is_case_insensitive() {
        let sql = render(&Filter::contains("CiTy"), "title").unwrap();
        assert!(
            sql.contains(r#"LOWER("product"."title") LIKE LOWER('%CiTy%') ESCAPE"#),
            "{sql}"
        );
    }

    #[test]
    fn relation_filter_joins_association() {
        let sql = render(&Filter::relation(&TAGS, "t1"), "tag_id").unwrap();
        assert!(
            sql.contains(r#"INNER JOIN "product_tag" AS "product_tag_tag_id""#),
            "{sql}"
        );
        assert!(
            sql.contains(r#""product"."id" = "product_tag_tag_id"."product_id""#),
            "{sql}"
        );
        assert!(sql.contains(r#""product_tag_tag_id"."tag_id" = 't1'"#), "{sql}");
    }

    #[test]
    fn relation_filter_rejects_foreign_column() {
        let err = render(&Filter::relation(&TAGS, "t1"), "title").unwrap_err();
        assert!(matches!(err, FilterError::UnknownRelationColumn { .. }));
    }

    #[test]
    fn mismatched_operand_is_rejected() {
        let err = render(&Filter::contains("3"), "stock").unwrap_err();
        assert_eq!(
            err,
            FilterError::TypeMismatch {
                field: "stock".to_string(),
                expected: FieldType::Integer,
                filter: "contains",
            }
        );

        let err = render(&Filter::Bool(true), "title").unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));

        let err = render(&Filter::equals_id("x"), "title").unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = render(&Filter::equals_text("x"), "colour").unwrap_err();
        assert!(matches!(err, FilterError::UnknownField { .. }));
    }

    #[test]
    fn escape_like_wildcards_function() {
        assert_eq!(escape_like_wildcards("hello"), "hello");
        assert_eq!(escape_like_wildcards("100%"), "100\\%");
        assert_eq!(escape_like_wildcards("a_b"), "a\\_b");
        assert_eq!(escape_like_wildcards("a\\b"), "a\\\\b");
    }
}
