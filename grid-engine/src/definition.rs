//! FILENAME: grid-engine/src/definition.rs
//! Grid Definition - The caller-supplied configuration.
//!
//! This module contains all the types needed to DESCRIBE a grid:
//! - the column schema and row set (shared by `Arc`, never mutated)
//! - behavior toggles for layout, grouping, selection, editing, paging
//!   and sorting
//! - caller callbacks and non-serializable extension points
//!
//! Data options load from JSON with the original camelCase option names.
//! Comparators, dropdown providers, detail renderers and callbacks are set
//! programmatically.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use grid_model::{Column, ColumnType, CommitPayload, Row, TrueFalseValues, Value};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Default message shown when a commit that deletes rows needs confirmation.
pub const DEFAULT_DELETE_CONFIRMATION_MESSAGE: &str = "Are you sure you want to delete this data?";

/// Default search panel placeholder.
pub const DEFAULT_FILTER_PLACEHOLDER: &str = "Filter...";

/// Default height of inline edit fields.
pub const DEFAULT_FIELDS_HEIGHT: &str = "25px";

// ============================================================================
// CALLBACK TYPES
// ============================================================================

pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;
pub type CommitHandler = Arc<dyn Fn(&CommitPayload) + Send + Sync>;
pub type SelectionHandler = Arc<dyn Fn(&[usize]) + Send + Sync>;
pub type PageHandler = Arc<dyn Fn(usize) + Send + Sync>;
pub type SortingHandler = Arc<dyn Fn(&[Sorting]) + Send + Sync>;
pub type ActionHandler = Arc<dyn Fn() + Send + Sync>;
pub type RowDetailRenderer = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// Caller callbacks. Each is optional; a missing handler turns the matching
/// effect into a no-op (and, for `on_commit_changes`, disables editing).
#[derive(Clone, Default)]
pub struct GridCallbacks {
    pub on_commit_changes: Option<CommitHandler>,
    pub change_selections: Option<SelectionHandler>,
    pub change_current_page: Option<PageHandler>,
    pub change_page_size: Option<PageHandler>,
    pub change_sorting: Option<SortingHandler>,
    pub refresh_data: Option<ActionHandler>,
    pub export_data: Option<ActionHandler>,
    /// Renders the detail panel of an expanded row (`rowDetailContent`).
    pub row_detail_content: Option<RowDetailRenderer>,
}

impl fmt::Debug for GridCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCallbacks")
            .field("on_commit_changes", &self.on_commit_changes.is_some())
            .field("change_selections", &self.change_selections.is_some())
            .field("change_current_page", &self.change_current_page.is_some())
            .field("change_page_size", &self.change_page_size.is_some())
            .field("change_sorting", &self.change_sorting.is_some())
            .field("refresh_data", &self.refresh_data.is_some())
            .field("export_data", &self.export_data.is_some())
            .field("row_detail_content", &self.row_detail_content.is_some())
            .finish()
    }
}

/// A caller comparator for one column.
#[derive(Clone)]
pub struct ColumnComparator {
    pub column_name: String,
    pub compare: CompareFn,
}

impl ColumnComparator {
    pub fn new(
        column_name: impl Into<String>,
        compare: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        ColumnComparator {
            column_name: column_name.into(),
            compare: Arc::new(compare),
        }
    }
}

impl fmt::Debug for ColumnComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnComparator")
            .field("column_name", &self.column_name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SORTING AND SUMMARIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// One entry of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sorting {
    pub column_name: String,
    pub direction: SortDirection,
}

impl Sorting {
    pub fn asc(column_name: impl Into<String>) -> Self {
        Sorting {
            column_name: column_name.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_name: impl Into<String>) -> Self {
        Sorting {
            column_name: column_name.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    Sum,
    Max,
    Min,
    Avg,
    Count,
}

impl SummaryType {
    pub fn key(&self) -> &'static str {
        match self {
            SummaryType::Sum => "sum",
            SummaryType::Max => "max",
            SummaryType::Min => "min",
            SummaryType::Avg => "avg",
            SummaryType::Count => "count",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            SummaryType::Sum => "Sum",
            SummaryType::Max => "Max",
            SummaryType::Min => "Min",
            SummaryType::Avg => "Avg",
            SummaryType::Count => "Count",
        }
    }
}

/// A total summary requested for a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub column_name: String,
    #[serde(rename = "type")]
    pub summary_type: SummaryType,
}

// ============================================================================
// EDIT CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditFormat {
    #[default]
    Row,
    Cell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StartEditAction {
    Click,
    #[default]
    DoubleClick,
}

/// One selectable entry of a dropdown editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub value: Value,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        DropdownOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Caller-supplied option source for dropdown editors.
pub trait DropdownProvider: Send + Sync {
    /// Options offered while editing a cell currently holding `current`.
    fn options(&self, current: &Value) -> Vec<DropdownOption>;
}

#[derive(Clone)]
pub enum DropdownSource {
    Static(Vec<DropdownOption>),
    Provider(Arc<dyn DropdownProvider>),
}

impl DropdownSource {
    pub fn options(&self, current: &Value) -> Vec<DropdownOption> {
        match self {
            DropdownSource::Static(options) => options.clone(),
            DropdownSource::Provider(provider) => provider.options(current),
        }
    }
}

impl fmt::Debug for DropdownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropdownSource::Static(options) => f.debug_tuple("Static").field(options).finish(),
            DropdownSource::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

impl PartialEq for DropdownSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DropdownSource::Static(a), DropdownSource::Static(b)) => a == b,
            (DropdownSource::Provider(a), DropdownSource::Provider(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// Only static option lists can come from JSON.
impl<'de> Deserialize<'de> for DropdownSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DropdownOption>::deserialize(deserializer).map(DropdownSource::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropdownSpec {
    pub dropdown: DropdownSource,
}

/// Declared type of an edit field: a plain tag, or `{ "dropdown": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EditFieldType {
    Tag(ColumnType),
    Dropdown(DropdownSpec),
}

impl EditFieldType {
    pub fn dropdown(source: DropdownSource) -> Self {
        EditFieldType::Dropdown(DropdownSpec { dropdown: source })
    }
}

fn default_true() -> bool {
    true
}

/// Per-field editor configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditField {
    #[serde(default, rename = "type")]
    pub field_type: Option<EditFieldType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub custom_true_false_values: Option<TrueFalseValues>,
    #[serde(default = "default_true")]
    pub is_clearable: bool,
    #[serde(default)]
    pub menu_width: Option<Value>,
}

impl EditField {
    pub fn of_type(field_type: EditFieldType) -> Self {
        EditField {
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    pub fn tagged(column_type: ColumnType) -> Self {
        EditField::of_type(EditFieldType::Tag(column_type))
    }
}

impl Default for EditField {
    fn default() -> Self {
        EditField {
            field_type: None,
            format: None,
            custom_true_false_values: None,
            is_clearable: true,
            menu_width: None,
        }
    }
}

/// Editing surface configuration (`editConfig`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditConfig {
    pub edit_format: EditFormat,
    pub fields: BTreeMap<String, EditField>,
    pub fields_height: Option<Value>,
    pub select_text_on_edit_start: bool,
    pub start_edit_action: StartEditAction,
}

impl EditConfig {
    pub fn with_field(mut self, name: impl Into<String>, field: EditField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// `fieldsHeight` rendered as a CSS length; numbers are taken as pixels.
    pub fn fields_height(&self) -> String {
        match &self.fields_height {
            Some(Value::Number(n)) => format!("{}px", n),
            Some(Value::Text(s)) if !s.is_empty() => s.clone(),
            _ => DEFAULT_FIELDS_HEIGHT.to_string(),
        }
    }
}

// ============================================================================
// GRID CONFIG
// ============================================================================

/// The complete grid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    // Data
    pub columns: Arc<Vec<Column>>,
    pub rows: Arc<Vec<Row>>,
    pub is_tree_data: bool,

    // Column formatting
    /// Width overrides by column name. Non-numeric entries are ignored.
    pub column_widths: Option<Arc<BTreeMap<String, Value>>>,
    pub allow_column_reorder: bool,
    pub hidden_columns: Vec<String>,

    // Row detail
    pub allow_row_detail: bool,

    // Filtering
    pub allow_filtering: bool,
    pub filter_placeholder: Option<String>,

    // Grouping
    pub allow_grouping: bool,
    pub grouping: Option<String>,
    pub expand_groups_by_default: bool,
    pub hide_column_name_in_grouping: bool,
    pub show_group_count: bool,

    // Summarizing
    pub allow_summarizing: bool,
    pub summary_items: Vec<SummaryItem>,
    pub summary_item_labels: BTreeMap<String, String>,
    pub custom_summaries: Option<Vec<f64>>,

    // Selecting
    pub allow_selections: bool,
    pub selections: Vec<usize>,
    pub show_select_all: bool,
    pub select_by_row_click: bool,
    pub select_by_group: bool,

    // Data modifications
    pub allow_creating: bool,
    pub allow_editing: bool,
    pub allow_deleting: bool,
    pub edit_config: Option<Arc<EditConfig>>,
    pub show_delete_confirmation: bool,
    pub delete_confirmation_message: Option<String>,

    // Paging
    pub show_paging_panel: Option<bool>,
    pub page_sizes: Vec<usize>,
    pub allow_remote_paging: bool,
    pub current_page: usize,
    pub page_size: Option<usize>,
    pub total_count: Option<usize>,

    // Sorting
    pub allow_sorting: bool,
    pub allow_remote_sorting: bool,
    pub sorting: Vec<Sorting>,
    #[serde(skip)]
    pub columns_sorting: Vec<ColumnComparator>,

    // Toolbar
    pub allow_refreshing: bool,
    pub allow_exporting: bool,
    pub show_total_count: Option<bool>,

    #[serde(skip)]
    pub callbacks: GridCallbacks,
}

impl GridConfig {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        GridConfig {
            columns: Arc::new(columns),
            rows: Arc::new(rows),
            ..Default::default()
        }
    }

    /// Parse the data portion of a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the data portion of a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let text = std::fs::read_to_string(path)?;
        GridConfig::from_json_str(&text)
    }

    /// Replace the row set. The new `Arc` is a new identity.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = Arc::new(rows);
        self
    }

    pub fn with_edit_config(mut self, edit_config: EditConfig) -> Self {
        self.edit_config = Some(Arc::new(edit_config));
        self
    }

    pub fn with_callbacks(mut self, callbacks: GridCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn delete_confirmation_message(&self) -> &str {
        self.delete_confirmation_message
            .as_deref()
            .unwrap_or(DEFAULT_DELETE_CONFIRMATION_MESSAGE)
    }

    pub fn filter_placeholder(&self) -> &str {
        self.filter_placeholder
            .as_deref()
            .unwrap_or(DEFAULT_FILTER_PLACEHOLDER)
    }

    /// Label of a summary type, honoring `summaryItemLabels`.
    pub fn summary_label(&self, summary_type: SummaryType) -> String {
        self.summary_item_labels
            .get(summary_type.key())
            .cloned()
            .unwrap_or_else(|| summary_type.default_label().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_json() {
        let config = GridConfig::from_json_str(
            r#"{
                "columns": [{"name": "amt", "title": "Amount", "type": "currency"}],
                "rows": [{"amt": 5}],
                "columnWidths": {"amt": 120, "bogus": "wide"},
                "pageSizes": [25, 50],
                "allowGrouping": true,
                "grouping": "dept",
                "sorting": [{"columnName": "amt", "direction": "desc"}],
                "summaryItems": [{"columnName": "amt", "type": "sum"}],
                "editConfig": {
                    "editFormat": "cell",
                    "fields": {
                        "amt": {"type": "currency"},
                        "kind": {"type": {"dropdown": [{"value": 1, "label": "One"}]}, "isClearable": false}
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.columns.len(), 1);
        assert_eq!(config.rows[0].get("amt"), &Value::Number(5.0));
        assert_eq!(config.page_sizes, vec![25, 50]);
        assert_eq!(config.grouping.as_deref(), Some("dept"));
        assert_eq!(config.sorting, vec![Sorting::desc("amt")]);
        assert_eq!(config.summary_items[0].summary_type, SummaryType::Sum);

        let edit = config.edit_config.as_ref().unwrap();
        assert_eq!(edit.edit_format, EditFormat::Cell);
        assert_eq!(edit.start_edit_action, StartEditAction::DoubleClick);
        assert_eq!(edit.fields["amt"].field_type, Some(EditFieldType::Tag(ColumnType::Currency)));
        assert!(edit.fields["amt"].is_clearable);

        let kind = &edit.fields["kind"];
        assert!(!kind.is_clearable);
        match &kind.field_type {
            Some(EditFieldType::Dropdown(spec)) => {
                assert_eq!(spec.dropdown.options(&Value::Null), vec![DropdownOption::new(1i64, "One")]);
            }
            other => panic!("expected dropdown, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let err = GridConfig::from_json_str(r#"{"columns": 3}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.delete_confirmation_message(), DEFAULT_DELETE_CONFIRMATION_MESSAGE);
        assert_eq!(config.filter_placeholder(), "Filter...");
        assert_eq!(config.summary_label(SummaryType::Avg), "Avg");
        assert_eq!(EditConfig::default().fields_height(), "25px");
    }

    #[test]
    fn test_summary_labels_override() {
        let mut config = GridConfig::default();
        config.summary_item_labels.insert("sum".into(), "Total".into());
        assert_eq!(config.summary_label(SummaryType::Sum), "Total");
        assert_eq!(config.summary_label(SummaryType::Count), "Count");
    }

    #[test]
    fn test_fields_height_number() {
        let config = EditConfig {
            fields_height: Some(Value::Number(30.0)),
            ..Default::default()
        };
        assert_eq!(config.fields_height(), "30px");
    }
}
