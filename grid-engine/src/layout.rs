//! FILENAME: grid-engine/src/layout.rs
//! Column Layout Resolver.
//!
//! Normalizes the column schema and width overrides into an ordered list of
//! column names plus exactly one width entry per column. User reorders and
//! resizes live here until the schema identity changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use grid_model::{Column, Value, TREE_EXPANDER_COLUMN};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::{log_debug, log_warn};

/// Width of an ordinary column without an override.
pub const DEFAULT_COLUMN_WIDTH: f64 = 180.0;

/// Width of the synthetic tree-expander column without an override.
pub const TREE_EXPANDER_WIDTH: f64 = 40.0;

pub type WidthOverrides = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidth {
    pub column_name: String,
    pub width: f64,
}

fn default_width(name: &str) -> f64 {
    if name == TREE_EXPANDER_COLUMN {
        TREE_EXPANDER_WIDTH
    } else {
        DEFAULT_COLUMN_WIDTH
    }
}

fn usable_width(width: f64) -> bool {
    width.is_finite() && width >= 0.0
}

/// Resolve the initial column order and widths.
///
/// Order follows the schema. Each column gets its override when one is
/// present and numeric, 40 for `treeDropdown`, else 180. Override entries
/// naming unknown columns or holding non-numeric values are ignored.
pub fn resolve(columns: &[Column], overrides: Option<&WidthOverrides>) -> (Vec<String>, Vec<ColumnWidth>) {
    let order = columns.iter().map(|c| c.name.clone()).collect();
    let widths = columns
        .iter()
        .map(|c| {
            let width = overrides
                .and_then(|o| o.get(&c.name))
                .and_then(Value::as_number)
                .filter(|w| usable_width(*w))
                .unwrap_or_else(|| default_width(&c.name));
            ColumnWidth {
                column_name: c.name.clone(),
                width,
            }
        })
        .collect();
    (order, widths)
}

/// Live column layout plus the identities it was derived from.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    order: Vec<String>,
    widths: Vec<ColumnWidth>,
    columns_source: Option<Arc<Vec<Column>>>,
    widths_source: Option<Arc<WidthOverrides>>,
}

fn same_source<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl ColumnLayout {
    pub fn new(columns: &Arc<Vec<Column>>, overrides: Option<&Arc<WidthOverrides>>) -> Self {
        let (order, widths) = resolve(columns, overrides.map(|o| o.as_ref()));
        ColumnLayout {
            order,
            widths,
            columns_source: Some(Arc::clone(columns)),
            widths_source: overrides.cloned(),
        }
    }

    /// Column-change reducer. Re-derives only on identity change.
    ///
    /// A new schema resets both order and widths. New width overrides reset
    /// widths and keep the user's column order.
    pub fn sync(self, columns: &Arc<Vec<Column>>, overrides: Option<&Arc<WidthOverrides>>) -> Self {
        let columns_changed = !same_source(&self.columns_source, &Some(Arc::clone(columns)));
        let widths_changed = !same_source(&self.widths_source, &overrides.cloned());

        if columns_changed {
            log_debug!("LAYOUT", "schema changed, resetting layout for {} columns", columns.len());
            return ColumnLayout::new(columns, overrides);
        }
        if widths_changed {
            log_debug!("LAYOUT", "width overrides changed");
            let (_, widths) = resolve(columns, overrides.map(|o| o.as_ref()));
            return ColumnLayout {
                widths,
                widths_source: overrides.cloned(),
                ..self
            };
        }
        self
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn widths(&self) -> &[ColumnWidth] {
        &self.widths
    }

    pub fn width_of(&self, name: &str) -> Option<f64> {
        self.widths
            .iter()
            .find(|w| w.column_name == name)
            .map(|w| w.width)
    }

    /// Ordered names minus hidden columns.
    pub fn visible_order<'a>(&'a self, hidden: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        self.order.iter().filter(move |n| !hidden.contains(n))
    }

    /// Apply a user reorder. The proposal must be a permutation of the
    /// current order.
    pub fn reorder(mut self, proposed: &[String]) -> Result<Self, GridError> {
        if proposed.len() != self.order.len() {
            return Err(GridError::InvalidColumnOrder(format!(
                "expected {} columns, got {}",
                self.order.len(),
                proposed.len()
            )));
        }

        let current: FxHashSet<&str> = self.order.iter().map(String::as_str).collect();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for name in proposed {
            if !current.contains(name.as_str()) {
                return Err(GridError::UnknownColumn(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(GridError::InvalidColumnOrder(format!("duplicate column '{}'", name)));
            }
        }

        self.order = proposed.to_vec();
        Ok(self)
    }

    /// Apply a user resize. Unknown names and unusable widths are ignored.
    pub fn resize(mut self, name: &str, width: f64) -> Self {
        if !usable_width(width) {
            log_warn!("LAYOUT", "ignoring width {} for '{}'", width, name);
            return self;
        }
        match self.widths.iter_mut().find(|w| w.column_name == name) {
            Some(entry) => entry.width = width,
            None => log_warn!("LAYOUT", "resize of unknown column '{}'", name),
        }
        self
    }
}
