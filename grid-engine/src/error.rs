//! FILENAME: grid-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid grid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Flat index {index} is outside the flattened tree (length {len})")]
    TreeIndexOutOfRange { index: usize, len: usize },

    #[error("Column order is not a permutation of the schema: {0}")]
    InvalidColumnOrder(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
