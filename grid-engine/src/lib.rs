//! FILENAME: grid-engine/src/lib.rs
//! PURPOSE: Configuration-driven data-grid state engine.
//! CONTEXT: Given a column schema, a row set and behavior toggles, derives
//! everything needed to render and interact with a tabular or tree view,
//! and reconciles user edits back into change records for the caller.
//! Caller data is never mutated.

pub mod logging;

pub mod capabilities;
pub mod definition;
pub mod editing;
pub mod editors;
pub mod error;
pub mod filtering;
pub mod grid;
pub mod grouping;
pub mod layout;
pub mod modes;
pub mod pipeline;
pub mod selection;
pub mod state;
pub mod summary;
pub mod tree;
pub mod view;

// Re-export commonly used types at the crate root
pub use capabilities::{Capabilities, EditingCaps, Mode};
pub use definition::{
    ColumnComparator, DropdownOption, DropdownProvider, DropdownSource, EditConfig, EditField,
    EditFieldType, EditFormat, GridCallbacks, GridConfig, SortDirection, Sorting, StartEditAction,
    SummaryItem, SummaryType,
};
pub use editing::{EditPhase, PendingConfirmation};
pub use editors::{normalize_currency, EditorDescriptor, EditorInput};
pub use error::GridError;
pub use grid::DataGrid;
pub use layout::{ColumnLayout, ColumnWidth};
pub use modes::{effective_page_size, DEFAULT_PAGE_SIZE};
pub use pipeline::{Alignment, CellFormatter, TypePipeline};
pub use state::{reduce, sync_config, Effect, GridEvent, GridState, ReduceContext, Reduction};
pub use view::{derive_view, page_row_indices, DataRow, GridView, GroupRow, ViewColumn, ViewRow};

// Model types callers need alongside the engine
pub use grid_model::{
    Column, ColumnType, CommitPayload, EditChangeSet, Row, RowPatch, TreeChange, TreeCoord,
    TrueFalseValues, Value,
};
