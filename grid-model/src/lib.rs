//! FILENAME: grid-model/src/lib.rs
//! PURPOSE: Main library entry point for the grid data model.
//! CONTEXT: Re-exports the shared types used by `grid-engine` and by callers
//! that build columns, rows and change records.

pub mod changes;
pub mod column;
pub mod date_format;
pub mod number_format;
pub mod row;
pub mod value;

// Re-export commonly used types at the crate root
pub use changes::{CommitPayload, EditChangeSet, TreeChange, TreeCoord};
pub use column::{Column, ColumnType, TrueFalseValues, TREE_EXPANDER_COLUMN};
pub use date_format::{format_date, parse_date_value, DatePattern, DEFAULT_DATE_FORMAT};
pub use number_format::{
    format_boolean, format_currency, format_general, format_number_cell, parse_number_prefix,
};
pub use row::{Row, RowPatch};
pub use value::Value;
