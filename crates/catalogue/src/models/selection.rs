//! Selection lists: named sets of choices (sizes, colours) offered on a
//! product page.

use sea_query::SimpleExpr;
use serde::{Deserialize, Serialize};

use crate::filter::Association;
use crate::repository::{ActiveContext, DataType, FieldSpec, FieldType, Model, Schema};

/// Selection list ↔ product links, keyed by the list.
pub static SELECTION_LIST_PRODUCT: Association = Association {
    table: "product_selection_list",
    object_column: "selection_list_id",
    id_columns: &["object_id"],
};

pub const SELECTION_LIST_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("title", FieldType::Text),
];

pub const SELECTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldType::Id),
    FieldSpec::new("list_id", FieldType::Id),
    FieldSpec::new("value", FieldType::Text),
    FieldSpec::new("position", FieldType::Integer),
];

/// A row of the `selection_list` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionListRow {
    pub id: String,
    pub title: String,
}

impl Model for SelectionListRow {
    const SCHEMA: Schema = Schema::new("selection_list", SELECTION_LIST_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(_alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::always()
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectionList {
    row: SelectionListRow,
}

impl SelectionList {
    pub fn id(&self) -> &str {
        &self.row.id
    }

    pub fn title(&self) -> &str {
        &self.row.title
    }
}

impl DataType for SelectionList {
    type Model = SelectionListRow;

    fn from_model(row: SelectionListRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &SelectionListRow {
        &self.row
    }
}

/// A row of the `selection` table: one choice of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionRow {
    pub id: String,
    pub list_id: String,
    pub value: String,
    pub position: i64,
}

impl Model for SelectionRow {
    const SCHEMA: Schema = Schema::new("selection", SELECTION_FIELDS);

    fn id(&self) -> &str {
        &self.id
    }

    fn active_condition(_alias: &str, _ctx: &ActiveContext) -> SimpleExpr {
        super::always()
    }

    fn is_active(&self, _ctx: &ActiveContext) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    row: SelectionRow,
}

impl Selection {
    pub fn list_id(&self) -> &str {
        &self.row.list_id
    }

    pub fn value(&self) -> &str {
        &self.row.value
    }

    pub fn position(&self) -> i64 {
        self.row.position
    }
}

impl DataType for Selection {
    type Model = SelectionRow;

    fn from_model(row: SelectionRow) -> Self {
        Self { row }
    }

    fn model(&self) -> &SelectionRow {
        &self.row
    }
}

/// A selection list with its choices in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSelectionList {
    #[serde(flatten)]
    list: SelectionList,
    fields: Vec<Selection>,
}

impl ProductSelectionList {
    /// Pair `list` with its choices, ordering them by position.
    pub fn new(list: SelectionList, mut fields: Vec<Selection>) -> Self {
        fields.sort_by_key(Selection::position);
        Self { list, fields }
    }

    pub fn id(&self) -> &str {
        self.list.id()
    }

    pub fn title(&self) -> &str {
        self.list.title()
    }

    pub fn fields(&self) -> &[Selection] {
        &self.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn selection(id: &str, value: &str, position: i64) -> Selection {
        Selection::from_model(SelectionRow {
            id: id.to_string(),
            list_id: "l1".to_string(),
            value: value.to_string(),
            position,
        })
    }

    #[test]
    fn fields_are_ordered_by_position() {
        let list = SelectionList::from_model(SelectionListRow {
            id: "l1".to_string(),
            title: "Size".to_string(),
        });
        let resolved = ProductSelectionList::new(
            list,
            vec![selection("s1", "L", 2), selection("s2", "S", 0)],
        );

        let values: Vec<&str> = resolved.fields().iter().map(Selection::value).collect();
        assert_eq!(values, vec!["S", "L"]);
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({
                "id": "l1",
                "title": "Size",
                "fields": [
                    {"id": "s2", "list_id": "l1", "value": "S", "position": 0},
                    {"id": "s1", "list_id": "l1", "value": "L", "position": 2}
                ]
            })
        );
    }
}
