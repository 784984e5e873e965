//! FILENAME: grid-engine/src/grid.rs
//! DataGrid - the stateful shell around the pure reducers.
//!
//! Holds the current configuration, its capability matrix and type
//! pipeline, and the interaction state. `dispatch` runs the reducer and then
//! invokes the caller callbacks for the emitted effects, synchronously.

use std::sync::Arc;

use grid_model::Column;

use crate::capabilities::Capabilities;
use crate::definition::{EditConfig, GridCallbacks, GridConfig};
use crate::log_info;
use crate::pipeline::TypePipeline;
use crate::state::{reduce, sync_config, Effect, GridEvent, GridState, ReduceContext};
use crate::view::{derive_view, GridView};

pub struct DataGrid {
    config: GridConfig,
    caps: Capabilities,
    pipeline: TypePipeline,
    pipeline_sources: (Arc<Vec<Column>>, Option<Arc<EditConfig>>),
    state: GridState,
}

fn same_edit_config(a: &Option<Arc<EditConfig>>, b: &Option<Arc<EditConfig>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl DataGrid {
    pub fn new(config: GridConfig) -> Self {
        log_info!(
            "GRID",
            "new grid: {} columns, {} rows",
            config.columns.len(),
            config.rows.len()
        );
        let caps = Capabilities::from_config(&config);
        let pipeline = TypePipeline::build(&config.columns, config.edit_config.as_deref());
        let state = GridState::new(&config);
        DataGrid {
            pipeline_sources: (Arc::clone(&config.columns), config.edit_config.clone()),
            config,
            caps,
            pipeline,
            state,
        }
    }

    /// Replace the configuration. Derived state is rebuilt only for inputs
    /// whose identity changed.
    pub fn set_config(&mut self, config: GridConfig) {
        let (columns, edit_config) = &self.pipeline_sources;
        if !Arc::ptr_eq(columns, &config.columns) || !same_edit_config(edit_config, &config.edit_config) {
            self.pipeline = TypePipeline::build(&config.columns, config.edit_config.as_deref());
            self.pipeline_sources = (Arc::clone(&config.columns), config.edit_config.clone());
        }
        self.caps = Capabilities::from_config(&config);
        self.state = sync_config(std::mem::take(&mut self.state), &config);
        self.config = config;
    }

    /// Run one event through the reducer and notify the caller.
    pub fn dispatch(&mut self, event: GridEvent) -> Vec<Effect> {
        let ctx = ReduceContext {
            config: &self.config,
            caps: &self.caps,
            pipeline: &self.pipeline,
        };
        let reduction = reduce(std::mem::take(&mut self.state), &event, &ctx);
        self.state = reduction.state;

        for effect in &reduction.effects {
            notify(&self.config.callbacks, effect);
        }
        reduction.effects
    }

    pub fn view(&self) -> GridView {
        derive_view(&self.config, &self.caps, &self.pipeline, &self.state)
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn pipeline(&self) -> &TypePipeline {
        &self.pipeline
    }
}

fn notify(callbacks: &GridCallbacks, effect: &Effect) {
    match effect {
        Effect::CommitChanges(payload) => {
            if let Some(f) = &callbacks.on_commit_changes {
                f(payload);
            }
        }
        Effect::ChangeSelections(selection) => {
            if let Some(f) = &callbacks.change_selections {
                f(selection.as_slice());
            }
        }
        Effect::ChangeCurrentPage(page) => {
            if let Some(f) = &callbacks.change_current_page {
                f(*page);
            }
        }
        Effect::ChangePageSize(size) => {
            if let Some(f) = &callbacks.change_page_size {
                f(*size);
            }
        }
        Effect::ChangeSorting(sorting) => {
            if let Some(f) = &callbacks.change_sorting {
                f(sorting.as_slice());
            }
        }
        Effect::RefreshData => {
            if let Some(f) = &callbacks.refresh_data {
                f();
            }
        }
        Effect::ExportData => {
            if let Some(f) = &callbacks.export_data {
                f();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_model::{ColumnType, Row};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pipeline_rebuilt_only_on_identity_change() {
        let config = GridConfig::new(
            vec![Column::typed("amt", "Amount", ColumnType::Currency)],
            vec![Row::new().with("amt", 5.0)],
        );
        let mut grid = DataGrid::new(config.clone());
        assert_eq!(grid.view().cell(0, "amt"), Some("$5.00"));

        let rows_only = config.clone().with_rows(vec![Row::new().with("amt", 7.5)]);
        grid.set_config(rows_only);
        assert!(Arc::ptr_eq(&grid.pipeline_sources.0, &config.columns));
        assert_eq!(grid.view().cell(0, "amt"), Some("$7.50"));
    }

    #[test]
    fn test_refresh_invokes_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut config = GridConfig::new(vec![Column::new("a", "A")], vec![Row::new().with("a", 1.0)]);
        config.allow_refreshing = true;
        config.callbacks.refresh_data = Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let mut grid = DataGrid::new(config);
        assert_eq!(grid.dispatch(GridEvent::Refresh), vec![Effect::RefreshData]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
