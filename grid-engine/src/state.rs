//! FILENAME: grid-engine/src/state.rs
//! Grid State - explicit interaction state plus the pure reducers.
//!
//! Every user interaction is a `GridEvent`. `reduce` takes the current
//! state, the event and the configuration, and returns the next state plus
//! the `Effect`s the caller must be told about. Nothing here invokes a
//! callback; the `DataGrid` shell does that after the reducer returns.

use std::sync::Arc;

use grid_model::{CommitPayload, EditChangeSet, Row, Value};
use serde::Serialize;

use crate::capabilities::{Capabilities, Mode};
use crate::definition::{GridConfig, Sorting};
use crate::editing::{self, EditContext, EditEvent, EditPhase};
use crate::grouping::{distinct_group_keys, toggle_expanded};
use crate::layout::{ColumnLayout, ColumnWidth};
use crate::modes::{toggle_sort, PagingState, SortSpec};
use crate::pipeline::TypePipeline;
use crate::selection;
use crate::tree;
use crate::view::page_row_indices;
use crate::{log_debug, log_warn};

// ============================================================================
// EVENTS AND EFFECTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    // Layout
    ReorderColumns(Vec<String>),
    ResizeColumn { column_name: String, width: f64 },
    SetColumnWidths(Vec<ColumnWidth>),

    // Selection
    SetSelection(Vec<usize>),
    ToggleRowSelection(usize),
    SelectAll(bool),

    // Grouping, tree and detail expansion
    ToggleGroup(Value),
    SetExpandedGroups(Vec<Value>),
    ToggleTreeRow(usize),
    ToggleRowDetail(usize),

    // Filtering
    SetSearch(String),

    // Editing
    CommitChanges(EditChangeSet),
    ConfirmPending,
    CancelPending,

    // Paging and sorting
    SetCurrentPage(usize),
    SetPageSize(usize),
    SetSorting(Vec<Sorting>),
    ToggleSort { column_name: String, keep_others: bool },

    // Toolbar
    Refresh,
    Export,
}

/// Something the caller has to be told about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Effect {
    CommitChanges(CommitPayload),
    ChangeSelections(Vec<usize>),
    ChangeCurrentPage(usize),
    ChangePageSize(usize),
    ChangeSorting(Vec<Sorting>),
    RefreshData,
    ExportData,
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct GridState {
    pub layout: ColumnLayout,
    pub selection: Vec<usize>,
    pub expanded_groups: Vec<Value>,
    /// Parent indices of expanded tree rows.
    pub expanded_tree_rows: Vec<usize>,
    /// Row indices with an open detail panel.
    pub expanded_details: Vec<usize>,
    pub search: String,
    /// Local paging (ignored in remote mode).
    pub paging: PagingState,
    /// Local sort spec (ignored in remote mode).
    pub sorting: SortSpec,
    pub editing: EditPhase,

    rows_source: Option<Arc<Vec<Row>>>,
    selections_source: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Reduction {
    pub state: GridState,
    pub effects: Vec<Effect>,
}

impl Reduction {
    fn unchanged(state: GridState) -> Self {
        Reduction {
            state,
            effects: Vec::new(),
        }
    }
}

impl GridState {
    pub fn new(config: &GridConfig) -> Self {
        let state = GridState {
            sorting: config.sorting.iter().cloned().collect(),
            ..Default::default()
        };
        sync_config(state, config)
    }
}

/// Column-change and row-change reducer: re-derive whatever depends on the
/// identity of configuration inputs that changed.
pub fn sync_config(mut state: GridState, config: &GridConfig) -> GridState {
    state.layout = state.layout.sync(&config.columns, config.column_widths.as_ref());

    let rows_changed = !state
        .rows_source
        .as_ref()
        .is_some_and(|r| Arc::ptr_eq(r, &config.rows));
    if rows_changed {
        state.rows_source = Some(Arc::clone(&config.rows));
        if config.expand_groups_by_default {
            if let Some(field) = config.grouping.as_deref().filter(|_| config.allow_grouping) {
                state.expanded_groups = distinct_group_keys(&config.rows, field);
                log_debug!("GROUP", "expanded {} groups by default", state.expanded_groups.len());
            }
        }
    }

    if state.selections_source != config.selections {
        state.selections_source = config.selections.clone();
        state.selection = config.selections.clone();
    }
    state
}

/// Inputs every reducer reads.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext<'a> {
    pub config: &'a GridConfig,
    pub caps: &'a Capabilities,
    pub pipeline: &'a TypePipeline,
}

// ============================================================================
// REDUCER
// ============================================================================

pub fn reduce(state: GridState, event: &GridEvent, ctx: &ReduceContext<'_>) -> Reduction {
    match event {
        GridEvent::ReorderColumns(order) => reduce_reorder(state, order, ctx),
        GridEvent::ResizeColumn { column_name, width } => {
            let mut state = state;
            state.layout = state.layout.resize(column_name, *width);
            Reduction::unchanged(state)
        }
        GridEvent::SetColumnWidths(widths) => {
            let mut state = state;
            for w in widths {
                state.layout = state.layout.resize(&w.column_name, w.width);
            }
            Reduction::unchanged(state)
        }

        GridEvent::SetSelection(proposed) => reduce_selection(state, proposed.clone(), ctx),
        GridEvent::ToggleRowSelection(index) => {
            let proposed = selection::toggle(&state.selection, *index);
            reduce_selection(state, proposed, ctx)
        }
        GridEvent::SelectAll(select) => {
            if !ctx.caps.select_all {
                return Reduction::unchanged(state);
            }
            let page = page_row_indices(ctx.config, ctx.caps, ctx.pipeline, &state);
            let proposed: Vec<usize> = if *select {
                let mut all = state.selection.clone();
                all.extend(page.iter().copied().filter(|i| !state.selection.contains(i)));
                all
            } else {
                state.selection.iter().copied().filter(|i| !page.contains(i)).collect()
            };
            reduce_selection(state, proposed, ctx)
        }

        GridEvent::ToggleGroup(key) => {
            if ctx.caps.grouping.is_none() {
                return Reduction::unchanged(state);
            }
            let mut state = state;
            state.expanded_groups = toggle_expanded(std::mem::take(&mut state.expanded_groups), key);
            Reduction::unchanged(state)
        }
        GridEvent::SetExpandedGroups(keys) => {
            let mut state = state;
            state.expanded_groups = keys.clone();
            Reduction::unchanged(state)
        }
        GridEvent::ToggleTreeRow(flat_index) => reduce_tree_toggle(state, *flat_index, ctx),
        GridEvent::ToggleRowDetail(index) => {
            if !ctx.caps.row_detail {
                return Reduction::unchanged(state);
            }
            let mut state = state;
            toggle_member(&mut state.expanded_details, *index);
            Reduction::unchanged(state)
        }

        GridEvent::SetSearch(text) => {
            if !ctx.caps.filtering {
                return Reduction::unchanged(state);
            }
            let mut state = state;
            state.search = text.clone();
            Reduction::unchanged(state)
        }

        GridEvent::CommitChanges(changes) => reduce_edit(state, &EditEvent::Commit(changes.clone()), ctx),
        GridEvent::ConfirmPending => reduce_edit(state, &EditEvent::Confirm, ctx),
        GridEvent::CancelPending => reduce_edit(state, &EditEvent::Cancel, ctx),

        GridEvent::SetCurrentPage(page) => reduce_page(state, PageChange::Page(*page), ctx),
        GridEvent::SetPageSize(size) => reduce_page(state, PageChange::Size(*size), ctx),
        GridEvent::SetSorting(sorting) => reduce_sorting(state, sorting.iter().cloned().collect(), ctx),
        GridEvent::ToggleSort {
            column_name,
            keep_others,
        } => {
            let current = current_sorting(&state, ctx);
            let next = toggle_sort(&current, column_name, *keep_others);
            reduce_sorting(state, next, ctx)
        }

        GridEvent::Refresh => toolbar_action(state, ctx.caps.refresh, Effect::RefreshData),
        GridEvent::Export => toolbar_action(state, ctx.caps.export, Effect::ExportData),
    }
}

fn toggle_member(set: &mut Vec<usize>, index: usize) {
    match set.iter().position(|&i| i == index) {
        Some(pos) => {
            set.remove(pos);
        }
        None => set.push(index),
    }
}

fn selectable_len(config: &GridConfig) -> usize {
    if config.is_tree_data {
        tree::flat_len(&config.rows)
    } else {
        config.rows.len()
    }
}

fn reduce_reorder(state: GridState, order: &[String], ctx: &ReduceContext<'_>) -> Reduction {
    if !ctx.caps.column_reorder {
        log_warn!("LAYOUT", "column reorder is disabled");
        return Reduction::unchanged(state);
    }
    match state.layout.clone().reorder(order) {
        Ok(layout) => Reduction::unchanged(GridState { layout, ..state }),
        Err(err) => {
            log_warn!("LAYOUT", "rejected column order: {}", err);
            Reduction::unchanged(state)
        }
    }
}

/// Selection-change reducer.
fn reduce_selection(state: GridState, proposed: Vec<usize>, ctx: &ReduceContext<'_>) -> Reduction {
    if !ctx.caps.selection {
        return Reduction::unchanged(state);
    }
    let len = selectable_len(ctx.config);
    let (proposed, dropped): (Vec<usize>, Vec<usize>) = proposed.into_iter().partition(|&i| i < len);
    if !dropped.is_empty() {
        log_warn!("SELECT", "ignoring out-of-range rows {:?} (row count {})", dropped, len);
    }

    let grouping = ctx.caps.grouping.as_deref().filter(|_| ctx.caps.selection_cascade);
    let resolved = selection::cascade(&state.selection, &proposed, &ctx.config.rows, grouping);
    log_debug!("SELECT", "selection {:?} -> {:?}", state.selection, resolved);

    Reduction {
        effects: vec![Effect::ChangeSelections(resolved.clone())],
        state: GridState {
            selection: resolved,
            ..state
        },
    }
}

fn reduce_tree_toggle(state: GridState, flat_index: usize, ctx: &ReduceContext<'_>) -> Reduction {
    if !ctx.caps.tree {
        return Reduction::unchanged(state);
    }
    match tree::resolve(&ctx.config.rows, flat_index) {
        Ok(coord) if coord.child_index.is_none() => {
            let mut state = state;
            toggle_member(&mut state.expanded_tree_rows, coord.parent_index);
            Reduction::unchanged(state)
        }
        Ok(_) => Reduction::unchanged(state),
        Err(err) => {
            log_warn!("TREE", "cannot toggle row: {}", err);
            Reduction::unchanged(state)
        }
    }
}

/// Edit-change reducer.
fn reduce_edit(state: GridState, event: &EditEvent, ctx: &ReduceContext<'_>) -> Reduction {
    let edit_ctx = EditContext {
        caps: ctx.caps.editing.as_ref(),
        tree_rows: ctx.caps.tree.then(|| ctx.config.rows.as_slice()),
        confirmation_message: ctx.config.delete_confirmation_message(),
    };
    let mut state = state;
    let (phase, payloads) = editing::reduce(std::mem::take(&mut state.editing), event, &edit_ctx);
    state.editing = phase;

    Reduction {
        state,
        effects: payloads.into_iter().map(Effect::CommitChanges).collect(),
    }
}

enum PageChange {
    Page(usize),
    Size(usize),
}

/// Page-change reducer. Requests are ignored while there are no rows.
fn reduce_page(state: GridState, change: PageChange, ctx: &ReduceContext<'_>) -> Reduction {
    let Some(mode) = ctx.caps.paging else {
        return Reduction::unchanged(state);
    };
    if ctx.config.rows.is_empty() {
        log_debug!("PAGING", "ignoring page change on an empty grid");
        return Reduction::unchanged(state);
    }

    match (mode, change) {
        (Mode::Local, PageChange::Page(page)) => {
            let mut state = state;
            state.paging.current_page = page;
            Reduction::unchanged(state)
        }
        (Mode::Local, PageChange::Size(size)) => {
            let mut state = state;
            state.paging.page_size = Some(size);
            Reduction::unchanged(state)
        }
        (Mode::Remote, PageChange::Page(page)) => Reduction {
            state,
            effects: vec![Effect::ChangeCurrentPage(page)],
        },
        (Mode::Remote, PageChange::Size(size)) => Reduction {
            state,
            effects: vec![Effect::ChangePageSize(size)],
        },
    }
}

fn current_sorting(state: &GridState, ctx: &ReduceContext<'_>) -> Vec<Sorting> {
    match ctx.caps.sorting {
        Some(Mode::Remote) => ctx.config.sorting.clone(),
        _ => state.sorting.to_vec(),
    }
}

/// Sort-change reducer.
fn reduce_sorting(state: GridState, sorting: SortSpec, ctx: &ReduceContext<'_>) -> Reduction {
    match ctx.caps.sorting {
        None => Reduction::unchanged(state),
        Some(Mode::Local) => Reduction::unchanged(GridState { sorting, ..state }),
        Some(Mode::Remote) => Reduction {
            state,
            effects: vec![Effect::ChangeSorting(sorting.into_vec())],
        },
    }
}

fn toolbar_action(state: GridState, allowed: bool, effect: Effect) -> Reduction {
    if !allowed {
        return Reduction::unchanged(state);
    }
    Reduction {
        state,
        effects: vec![effect],
    }
}
