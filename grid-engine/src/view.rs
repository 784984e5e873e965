//! FILENAME: grid-engine/src/view.rs
//! Grid View - the fully derived, renderable state.
//!
//! `derive_view` runs the local pipeline over the caller's rows:
//! filter -> sort -> group / tree expansion -> page. Every concern that is
//! in remote mode is skipped here because the caller already applied it.

use grid_model::{Row, TreeCoord, Value};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::capabilities::{Capabilities, Mode};
use crate::definition::{EditFormat, GridConfig, SortDirection, Sorting, StartEditAction};
use crate::editing::PendingConfirmation;
use crate::filtering::{normalize_search, row_matches, tree_row_matches};
use crate::grouping::{group_label, group_rows, is_expanded};
use crate::log_trace;
use crate::modes::{PagingPlan, SortSpec, SortingPlan};
use crate::pipeline::{Alignment, TypePipeline};
use crate::state::GridState;
use crate::summary::{compute_totals, SummaryValue};

// ============================================================================
// VIEW TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewColumn {
    pub name: String,
    pub title: String,
    pub width: f64,
    pub alignment: Alignment,
    pub editable: bool,
    /// Hosts the tree expander toggle.
    pub tree_toggle: bool,
    pub sortable: bool,
    pub sort_direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    /// Index used by selection and edits: flat tree index for tree data,
    /// else the index into the row set.
    pub row_index: usize,
    pub tree_coord: Option<TreeCoord>,
    pub depth: u8,
    /// Display text per visible column.
    pub cells: Vec<String>,
    pub selected: bool,
    pub expandable: bool,
    pub expanded: bool,
    /// Cells of this row can be edited in place.
    pub inline_editable: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRow {
    pub key: Value,
    pub label: String,
    pub count: Option<usize>,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViewRow {
    Data(DataRow),
    Group(GroupRow),
}

impl ViewRow {
    pub fn as_data(&self) -> Option<&DataRow> {
        match self {
            ViewRow::Data(row) => Some(row),
            ViewRow::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupRow> {
        match self {
            ViewRow::Group(row) => Some(row),
            ViewRow::Data(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingView {
    pub mode: Mode,
    pub current_page: usize,
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortingView {
    pub mode: Mode,
    pub sorting: Vec<Sorting>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub selection: Vec<usize>,
    pub cascade_by_group: bool,
    pub show_select_all: bool,
    pub select_by_row_click: bool,
    pub all_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub placeholder: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineCellEditing {
    pub start_edit_action: StartEditAction,
    pub select_text_on_edit_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingView {
    pub edit_format: EditFormat,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub inline_cell_editing: Option<InlineCellEditing>,
    pub fields_height: String,
    pub non_editable_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarView {
    pub refresh: bool,
    pub export: bool,
    pub total_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub columns: Vec<ViewColumn>,
    pub rows: Vec<ViewRow>,
    pub total_summaries: Vec<SummaryValue>,
    pub paging: Option<PagingView>,
    pub sorting: Option<SortingView>,
    pub selection: Option<SelectionView>,
    pub search: Option<SearchView>,
    pub editing: Option<EditingView>,
    pub confirmation: Option<PendingConfirmation>,
    pub toolbar: Option<ToolbarView>,
}

impl GridView {
    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter().filter_map(ViewRow::as_data)
    }

    pub fn group_rows(&self) -> impl Iterator<Item = &GroupRow> {
        self.rows.iter().filter_map(ViewRow::as_group)
    }

    /// Display text of a cell by row position and column name.
    pub fn cell(&self, row: usize, column_name: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c.name == column_name)?;
        self.rows.get(row)?.as_data()?.cells.get(col).map(String::as_str)
    }
}

// ============================================================================
// DERIVATION
// ============================================================================

struct RowBuilder<'a> {
    config: &'a GridConfig,
    caps: &'a Capabilities,
    pipeline: &'a TypePipeline,
    state: &'a GridState,
    columns: &'a [&'a str],
    selected: FxHashSet<usize>,
    inline_editing: bool,
}

impl RowBuilder<'_> {
    fn data_row(&self, row: &Row, row_index: usize, tree_coord: Option<TreeCoord>) -> DataRow {
        let depth = match tree_coord {
            Some(TreeCoord {
                child_index: Some(_), ..
            }) => 1,
            _ => 0,
        };
        let expandable = tree_coord.is_some() && depth == 0 && row.child_count() > 0;
        let expanded = expandable
            && tree_coord.is_some_and(|c| self.state.expanded_tree_rows.contains(&c.parent_index));

        let detail = self
            .config
            .callbacks
            .row_detail_content
            .as_ref()
            .filter(|_| self.caps.row_detail && self.state.expanded_details.contains(&row_index))
            .map(|render| render(row));

        DataRow {
            row_index,
            tree_coord,
            depth,
            cells: self
                .columns
                .iter()
                .map(|name| self.pipeline.format_cell(name, row.get(name)))
                .collect(),
            selected: self.selected.contains(&row_index),
            expandable,
            expanded,
            inline_editable: self.inline_editing && !row.has_children(),
            detail,
        }
    }
}

fn parent_offsets(rows: &[Row]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(rows.len());
    let mut c = 0;
    for row in rows {
        offsets.push(c);
        c += 1 + row.child_count();
    }
    offsets
}

fn visible_columns<'a>(config: &'a GridConfig, state: &'a GridState) -> Vec<&'a str> {
    state
        .layout
        .visible_order(&config.hidden_columns)
        .map(String::as_str)
        .collect()
}

fn inline_editing_on(config: &GridConfig, caps: &Capabilities) -> bool {
    caps.editing.as_ref().is_some_and(|e| e.can_edit) && edit_format_of(config) == EditFormat::Cell
}

fn edit_format_of(config: &GridConfig) -> EditFormat {
    config.edit_config.as_ref().map(|e| e.edit_format).unwrap_or_default()
}

/// Rows of the current page plus what was derived on the way there.
struct RowPass {
    rows: Vec<ViewRow>,
    sort_plan: SortingPlan,
    total_summaries: Vec<SummaryValue>,
    paging: Option<PagingView>,
}

/// filter -> sort -> group / tree expansion -> page.
fn derive_rows(
    config: &GridConfig,
    caps: &Capabilities,
    pipeline: &TypePipeline,
    state: &GridState,
    visible: &[&str],
) -> RowPass {
    let rows = config.rows.as_slice();

    // Filter
    let needle = if caps.filtering {
        normalize_search(&state.search)
    } else {
        None
    };
    let mut top: Vec<usize> = (0..rows.len())
        .filter(|&i| match &needle {
            None => true,
            Some(n) if caps.tree => tree_row_matches(&rows[i], n, visible, pipeline),
            Some(n) => row_matches(&rows[i], n, visible, pipeline),
        })
        .collect();

    // Sort
    let sort_spec: SortSpec = match caps.sorting {
        Some(Mode::Remote) => config.sorting.iter().cloned().collect(),
        Some(Mode::Local) => state.sorting.clone(),
        None => SortSpec::new(),
    };
    let sort_plan = SortingPlan::compose(
        caps.sorting.unwrap_or(Mode::Local),
        &config.columns,
        &config.columns_sorting,
        sort_spec,
    );
    sort_plan.sort_indices(&mut top, rows);

    let total_summaries = if caps.summaries {
        compute_totals(config, top.iter().map(|&i| &rows[i]))
    } else {
        Vec::new()
    };

    // Group / expand
    let builder = RowBuilder {
        config,
        caps,
        pipeline,
        state,
        columns: visible,
        selected: state.selection.iter().copied().collect(),
        inline_editing: inline_editing_on(config, caps),
    };

    let mut out: Vec<ViewRow> = Vec::new();
    if caps.tree {
        let offsets = parent_offsets(rows);
        for &p in &top {
            let parent = &rows[p];
            let data = builder.data_row(parent, offsets[p], Some(TreeCoord::parent(p)));
            let expanded = data.expanded;
            out.push(ViewRow::Data(data));

            if let Some(children) = parent.children.as_deref().filter(|_| expanded) {
                let mut order: Vec<usize> = (0..children.len()).collect();
                sort_plan.sort_indices(&mut order, children);
                for c in order {
                    let flat = offsets[p] + 1 + c;
                    out.push(ViewRow::Data(builder.data_row(&children[c], flat, Some(TreeCoord::child(p, c)))));
                }
            }
        }
    } else if let Some(field) = caps.grouping.as_deref() {
        let title = config.column(field).map(|c| c.title.as_str()).unwrap_or(field);
        for block in group_rows(&top, rows, field) {
            let expanded = is_expanded(&state.expanded_groups, &block.key);
            let value_text = pipeline.format_cell(field, &block.key);
            out.push(ViewRow::Group(GroupRow {
                label: group_label(title, &value_text, config.hide_column_name_in_grouping),
                count: caps.group_count.then_some(block.members.len()),
                key: block.key,
                expanded,
            }));
            if expanded {
                out.extend(block.members.iter().map(|&i| ViewRow::Data(builder.data_row(&rows[i], i, None))));
            }
        }
    } else {
        out.extend(top.iter().map(|&i| ViewRow::Data(builder.data_row(&rows[i], i, None))));
    }

    // Page
    let derived_len = out.len();
    log_trace!("VIEW", "{} of {} rows kept, {} view rows", top.len(), rows.len(), derived_len);
    let paging = caps.paging.map(|mode| {
        let plan = PagingPlan::compose(mode, config, &state.paging);
        let range = plan.page_range(derived_len);
        out.truncate(range.end);
        out.drain(..range.start);
        PagingView {
            mode,
            current_page: match mode {
                Mode::Local => plan.clamped_page(derived_len),
                Mode::Remote => plan.current_page,
            },
            page_size: plan.page_size,
            page_count: plan.page_count(derived_len),
            page_sizes: plan.page_sizes,
        }
    });

    RowPass {
        rows: out,
        sort_plan,
        total_summaries,
        paging,
    }
}

/// Indices of the data rows on the current page, after filtering, sorting
/// and expansion. This is the set "select all" acts on.
pub fn page_row_indices(config: &GridConfig, caps: &Capabilities, pipeline: &TypePipeline, state: &GridState) -> Vec<usize> {
    let visible = visible_columns(config, state);
    derive_rows(config, caps, pipeline, state, &visible)
        .rows
        .iter()
        .filter_map(ViewRow::as_data)
        .map(|r| r.row_index)
        .collect()
}

/// Derive the complete renderable view.
pub fn derive_view(config: &GridConfig, caps: &Capabilities, pipeline: &TypePipeline, state: &GridState) -> GridView {
    let rows = config.rows.as_slice();
    let visible = visible_columns(config, state);
    let RowPass {
        rows: out,
        sort_plan,
        total_summaries,
        paging,
    } = derive_rows(config, caps, pipeline, state, &visible);

    let columns = visible
        .iter()
        .enumerate()
        .map(|(i, &name)| ViewColumn {
            name: name.to_string(),
            title: config.column(name).map(|c| c.title.clone()).unwrap_or_default(),
            width: state.layout.width_of(name).unwrap_or_default(),
            alignment: pipeline.alignment(name),
            editable: pipeline.is_editable(name),
            tree_toggle: caps.tree && i == 0,
            sortable: caps.sorting.is_some(),
            sort_direction: sort_plan
                .sorting
                .iter()
                .find(|s| s.column_name == name)
                .map(|s| s.direction),
        })
        .collect();

    let selection = caps.selection.then(|| {
        let mut page = out.iter().filter_map(ViewRow::as_data).peekable();
        let has_rows = page.peek().is_some();
        SelectionView {
            selection: state.selection.clone(),
            cascade_by_group: caps.selection_cascade,
            show_select_all: caps.select_all,
            select_by_row_click: caps.select_by_row_click,
            all_selected: has_rows && page.all(|r| r.selected),
        }
    });

    let edit_caps = caps.editing.as_ref();
    let edit_format = edit_format_of(config);
    let inline_editing = inline_editing_on(config, caps);
    let editing = edit_caps.map(|e| {
        let edit_config = config.edit_config.as_deref();
        EditingView {
            edit_format,
            can_create: e.can_create,
            can_edit: e.can_edit,
            can_delete: e.can_delete,
            inline_cell_editing: inline_editing.then(|| InlineCellEditing {
                start_edit_action: edit_config.map(|c| c.start_edit_action).unwrap_or_default(),
                select_text_on_edit_start: edit_config.is_some_and(|c| c.select_text_on_edit_start),
            }),
            fields_height: edit_config.map(|c| c.fields_height()).unwrap_or_else(|| {
                crate::definition::DEFAULT_FIELDS_HEIGHT.to_string()
            }),
            non_editable_columns: pipeline.non_editable().into_iter().map(String::from).collect(),
        }
    });

    let toolbar = caps.toolbar().then(|| ToolbarView {
        refresh: caps.refresh,
        export: caps.export,
        total_count: caps.total_count.then(|| config.total_count.unwrap_or(rows.len())),
    });

    GridView {
        columns,
        rows: out,
        total_summaries,
        paging,
        sorting: caps.sorting.map(|mode| SortingView {
            mode,
            sorting: sort_plan.sorting.to_vec(),
        }),
        selection,
        search: caps.filtering.then(|| SearchView {
            placeholder: config.filter_placeholder().to_string(),
            text: state.search.clone(),
        }),
        editing,
        confirmation: state.editing.pending().cloned(),
        toolbar,
    }
}
