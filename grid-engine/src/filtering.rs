//! FILENAME: grid-engine/src/filtering.rs
//! Search-panel filtering.
//!
//! A row matches when any visible column's display text contains the
//! search text, ignoring case. Hidden columns never match.

use grid_model::Row;

use crate::pipeline::TypePipeline;

/// Lowercased search text, or `None` when there is nothing to filter by.
pub fn normalize_search(search: &str) -> Option<String> {
    let trimmed = search.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

pub fn row_matches(row: &Row, needle: &str, columns: &[&str], pipeline: &TypePipeline) -> bool {
    columns.iter().any(|name| {
        let value = row.get(name);
        !value.is_null() && pipeline.format_cell(name, value).to_lowercase().contains(needle)
    })
}

/// Tree variant: a parent is kept when it or any of its children matches.
pub fn tree_row_matches(row: &Row, needle: &str, columns: &[&str], pipeline: &TypePipeline) -> bool {
    row_matches(row, needle, columns, pipeline)
        || row
            .children
            .iter()
            .flatten()
            .any(|child| row_matches(child, needle, columns, pipeline))
}
