//! FILENAME: grid-engine/src/pipeline.rs
//! Type Pipeline Builder.
//!
//! Turns declarative column and edit-field type tags into per-column
//! display formatters, alignment, and editor descriptors. Built once per
//! schema/edit-config identity; pure.

use grid_model::{
    format_boolean, format_currency, format_date, format_number_cell, Column, ColumnType,
    DatePattern, TrueFalseValues, Value,
};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::definition::EditConfig;
use crate::editors::EditorDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// How a column renders its cell values.
#[derive(Debug, Clone, PartialEq)]
pub enum CellFormatter {
    Plain,
    Number,
    Currency,
    Date(DatePattern),
    Boolean(TrueFalseValues),
}

impl CellFormatter {
    pub fn for_column(column: &Column) -> Self {
        match column.column_type {
            Some(ColumnType::Currency) => CellFormatter::Currency,
            Some(ColumnType::Number) => CellFormatter::Number,
            Some(ColumnType::Date) => CellFormatter::Date(
                column
                    .format
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .map(DatePattern::new)
                    .unwrap_or_default(),
            ),
            Some(ColumnType::Boolean) => {
                CellFormatter::Boolean(column.custom_true_false_values.clone().unwrap_or_default())
            }
            Some(ColumnType::Text) | Some(ColumnType::Dropdown) | None => CellFormatter::Plain,
        }
    }

    pub fn format(&self, value: &Value) -> String {
        match self {
            CellFormatter::Plain => value.display_value(),
            CellFormatter::Number => format_number_cell(value),
            CellFormatter::Currency => format_currency(value),
            CellFormatter::Date(pattern) => format_date(value, pattern),
            CellFormatter::Boolean(values) => format_boolean(value, values),
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            CellFormatter::Number | CellFormatter::Currency => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

/// Everything the pipeline derived for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPipeline {
    pub name: String,
    pub column_type: Option<ColumnType>,
    pub formatter: CellFormatter,
    pub alignment: Alignment,
    pub editor: Option<EditorDescriptor>,
    pub editable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TypePipeline {
    columns: Vec<ColumnPipeline>,
    index: FxHashMap<String, usize>,
    /// Edit fields with an editor that name no schema column.
    extra_editors: FxHashMap<String, EditorDescriptor>,
}

impl TypePipeline {
    /// Build the pipeline for a schema and optional edit configuration.
    ///
    /// With an edit-field configuration present, only fields it names with a
    /// usable type are editable. Without one, every column is editable.
    pub fn build(columns: &[Column], edit_config: Option<&EditConfig>) -> Self {
        let fields = edit_config.map(|c| &c.fields).filter(|f| !f.is_empty());

        let mut index = FxHashMap::default();
        let pipelines = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                index.insert(column.name.clone(), i);

                let formatter = CellFormatter::for_column(column);
                let editor = fields
                    .and_then(|f| f.get(&column.name))
                    .and_then(EditorDescriptor::from_field);
                let editable = match fields {
                    Some(_) => editor.is_some(),
                    None => !column.is_tree_expander(),
                };

                ColumnPipeline {
                    name: column.name.clone(),
                    column_type: column.column_type,
                    alignment: formatter.alignment(),
                    formatter,
                    editor,
                    editable,
                }
            })
            .collect();

        let extra_editors = fields
            .map(|f| {
                f.iter()
                    .filter(|(name, _)| !index.contains_key(name.as_str()))
                    .filter_map(|(name, field)| {
                        EditorDescriptor::from_field(field).map(|e| (name.clone(), e))
                    })
                    .collect()
            })
            .unwrap_or_default();

        TypePipeline {
            columns: pipelines,
            index,
            extra_editors,
        }
    }

    pub fn columns(&self) -> &[ColumnPipeline] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnPipeline> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Display text of a cell. Unknown columns render plain text.
    pub fn format_cell(&self, name: &str, value: &Value) -> String {
        match self.column(name) {
            Some(column) => column.formatter.format(value),
            None => value.display_value(),
        }
    }

    pub fn alignment(&self, name: &str) -> Alignment {
        self.column(name).map(|c| c.alignment).unwrap_or_default()
    }

    pub fn is_editable(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.editable)
    }

    pub fn editor(&self, name: &str) -> Option<&EditorDescriptor> {
        self.column(name)
            .and_then(|c| c.editor.as_ref())
            .or_else(|| self.extra_editors.get(name))
    }

    /// Names of columns whose display type is `column_type`.
    pub fn display_bucket(&self, column_type: ColumnType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.column_type == Some(column_type))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of fields whose editor is of kind `column_type`, schema order first.
    pub fn edit_bucket(&self, column_type: ColumnType) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.editor.as_ref().is_some_and(|e| e.kind() == column_type))
            .map(|c| c.name.as_str())
            .collect();
        let mut extra: Vec<&str> = self
            .extra_editors
            .iter()
            .filter(|(_, e)| e.kind() == column_type)
            .map(|(n, _)| n.as_str())
            .collect();
        extra.sort_unstable();
        names.extend(extra);
        names
    }

    pub fn right_aligned(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.alignment == Alignment::Right)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn non_editable(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| !c.editable)
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::EditField;
    use grid_model::TREE_EXPANDER_COLUMN;

    fn schema() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::typed("amt", "Amount", ColumnType::Currency),
            Column::typed("qty", "Qty", ColumnType::Number),
            Column::typed("due", "Due", ColumnType::Date).with_format("YYYY-MM-DD"),
            Column::typed("ok", "OK", ColumnType::Boolean)
                .with_true_false_values(TrueFalseValues::new("Y", "N")),
        ]
    }

    #[test]
    fn test_display_formatting() {
        let pipeline = TypePipeline::build(&schema(), None);
        assert_eq!(pipeline.format_cell("amt", &Value::Number(5.0)), "$5.00");
        assert_eq!(pipeline.format_cell("amt", &Value::text("oops")), "$0.00");
        assert_eq!(pipeline.format_cell("qty", &Value::Number(3.0)), "3");
        assert_eq!(pipeline.format_cell("due", &Value::text("2020-02-29")), "2020-02-29");
        assert_eq!(pipeline.format_cell("due", &Value::text("never")), "");
        assert_eq!(pipeline.format_cell("ok", &Value::text("N")), "N");
        assert_eq!(pipeline.format_cell("ok", &Value::Boolean(true)), "");
        assert_eq!(pipeline.format_cell("name", &Value::text("Ann")), "Ann");
    }

    #[test]
    fn test_alignment_buckets() {
        let pipeline = TypePipeline::build(&schema(), None);
        assert_eq!(pipeline.right_aligned(), vec!["amt", "qty"]);
        assert_eq!(pipeline.alignment("name"), Alignment::Left);
        assert_eq!(pipeline.display_bucket(ColumnType::Date), vec!["due"]);
    }

    #[test]
    fn test_everything_editable_without_fields() {
        let mut columns = schema();
        columns.push(Column::new(TREE_EXPANDER_COLUMN, ""));
        let pipeline = TypePipeline::build(&columns, None);
        assert!(pipeline.is_editable("name"));
        assert!(pipeline.editor("name").is_none());
        assert_eq!(pipeline.non_editable(), vec![TREE_EXPANDER_COLUMN]);
    }

    #[test]
    fn test_only_configured_fields_are_editable() {
        let config = EditConfig::default()
            .with_field("amt", EditField::tagged(ColumnType::Currency))
            .with_field("name", EditField::tagged(ColumnType::Text))
            .with_field("ok", EditField::default())
            .with_field("note", EditField::tagged(ColumnType::Text));
        let pipeline = TypePipeline::build(&schema(), Some(&config));

        assert!(pipeline.is_editable("amt"));
        assert!(pipeline.is_editable("name"));
        assert!(!pipeline.is_editable("ok"));
        assert!(!pipeline.is_editable("qty"));
        assert_eq!(pipeline.edit_bucket(ColumnType::Currency), vec!["amt"]);
        assert_eq!(pipeline.edit_bucket(ColumnType::Text), vec!["name", "note"]);
        assert_eq!(pipeline.editor("note"), Some(&EditorDescriptor::Text));
    }
}
