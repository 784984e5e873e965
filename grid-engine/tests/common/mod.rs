//! FILENAME: grid-engine/tests/common/mod.rs
//! Test harness and fixtures for grid-engine integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use grid_engine::{
    Column, ColumnType, CommitPayload, DataGrid, Effect, GridCallbacks, GridConfig, GridEvent,
    GridView, Row, Sorting,
};

/// Records every callback invocation.
#[derive(Default)]
pub struct Recorder {
    pub commits: Mutex<Vec<CommitPayload>>,
    pub selections: Mutex<Vec<Vec<usize>>>,
    pub pages: Mutex<Vec<usize>>,
    pub page_sizes: Mutex<Vec<usize>>,
    pub sortings: Mutex<Vec<Vec<Sorting>>>,
    pub refreshes: AtomicUsize,
    pub exports: AtomicUsize,
}

impl Recorder {
    /// Callbacks that write into this recorder. `row_detail_content` is kept
    /// from `existing`.
    pub fn callbacks(self: &Arc<Self>, existing: &GridCallbacks) -> GridCallbacks {
        let commits = Arc::clone(self);
        let selections = Arc::clone(self);
        let pages = Arc::clone(self);
        let page_sizes = Arc::clone(self);
        let sortings = Arc::clone(self);
        let refreshes = Arc::clone(self);
        let exports = Arc::clone(self);

        GridCallbacks {
            on_commit_changes: Some(Arc::new(move |p: &CommitPayload| commits.commits.lock().unwrap().push(p.clone()))),
            change_selections: Some(Arc::new(move |s: &[usize]| selections.selections.lock().unwrap().push(s.to_vec()))),
            change_current_page: Some(Arc::new(move |p: usize| pages.pages.lock().unwrap().push(p))),
            change_page_size: Some(Arc::new(move |s: usize| page_sizes.page_sizes.lock().unwrap().push(s))),
            change_sorting: Some(Arc::new(move |s: &[Sorting]| sortings.sortings.lock().unwrap().push(s.to_vec()))),
            refresh_data: Some(Arc::new(move || {
                refreshes.refreshes.fetch_add(1, Ordering::SeqCst);
            })),
            export_data: Some(Arc::new(move || {
                exports.exports.fetch_add(1, Ordering::SeqCst);
            })),
            row_detail_content: existing.row_detail_content.clone(),
        }
    }

    pub fn commit_count(&self) -> usize {
        self.commits.lock().unwrap().len()
    }
}

/// A grid wired to a recorder.
pub struct GridHarness {
    pub grid: DataGrid,
    pub recorder: Arc<Recorder>,
}

impl GridHarness {
    pub fn new(mut config: GridConfig) -> Self {
        let recorder = Arc::new(Recorder::default());
        config.callbacks = recorder.callbacks(&config.callbacks);
        GridHarness {
            grid: DataGrid::new(config),
            recorder,
        }
    }

    /// Harness whose config has no commit handler (editing inactive).
    pub fn without_callbacks(config: GridConfig) -> Self {
        GridHarness {
            grid: DataGrid::new(config),
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn dispatch(&mut self, event: GridEvent) -> Vec<Effect> {
        self.grid.dispatch(event)
    }

    pub fn view(&self) -> GridView {
        self.grid.view()
    }

    /// Feed the last reported selection back into the config, the way a
    /// controlling caller would.
    pub fn apply_reported_selection(&mut self) {
        let last = self.recorder.selections.lock().unwrap().last().cloned();
        if let Some(selection) = last {
            let mut config = self.grid.config().clone();
            config.selections = selection;
            self.grid.set_config(config);
        }
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn dept_rows(depts: &[&str]) -> Vec<Row> {
    depts
        .iter()
        .enumerate()
        .map(|(i, d)| Row::new().with("id", i as i64).with("dept", *d))
        .collect()
}

/// Tree rows: one parent per entry, each with the given number of children.
/// Ids are assigned in flattened order.
pub fn tree_rows(child_counts: &[usize]) -> Vec<Row> {
    let mut next_id = 0i64;
    let mut rows = Vec::new();
    for &k in child_counts {
        let parent_id = next_id;
        next_id += 1;
        let children: Vec<Row> = (0..k)
            .map(|_| {
                let id = next_id;
                next_id += 1;
                Row::new().with("id", id)
            })
            .collect();
        let parent = Row::new().with("id", parent_id);
        rows.push(if k == 0 { parent } else { parent.with_children(children) });
    }
    rows
}

pub fn sample_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("dept", "Dept"),
        Column::typed("salary", "Salary", ColumnType::Currency),
        Column::typed("hired", "Hired", ColumnType::Date),
        Column::typed("active", "Active", ColumnType::Boolean),
    ]
}

pub fn sample_rows() -> Vec<Row> {
    vec![
        Row::new()
            .with("name", "Ann")
            .with("dept", "Eng")
            .with("salary", 120000.0)
            .with("hired", "2019-04-16")
            .with("active", true),
        Row::new()
            .with("name", "Bob")
            .with("dept", "Ops")
            .with("salary", 85000.5)
            .with("hired", "2021-01-02")
            .with("active", false),
        Row::new()
            .with("name", "Cy")
            .with("dept", "Eng")
            .with("salary", 99000.0)
            .with("hired", "2018-11-30"),
    ]
}

pub fn sample_config() -> GridConfig {
    GridConfig::new(sample_columns(), sample_rows())
}
