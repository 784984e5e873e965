//! FILENAME: grid-engine/src/modes.rs
//! Paging/Sorting Mode Composer.
//!
//! Decides, per concern, whether the engine owns the state (local) or only
//! forwards change requests to the caller (remote), and derives the
//! effective page size, page count and sort comparators.

use std::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

use grid_model::{parse_date_value, Column, ColumnType, DatePattern, Row, Value};
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

use crate::capabilities::Mode;
use crate::definition::{ColumnComparator, CompareFn, GridConfig, SortDirection, Sorting};

/// Page size used when neither `pageSize` nor `pageSizes` is set.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page-size options offered when `pageSizes` is empty.
pub const DEFAULT_PAGE_SIZES: [usize; 3] = [10, 50, 100];

pub type SortSpec = SmallVec<[Sorting; 2]>;

// ============================================================================
// PAGING
// ============================================================================

/// Explicit size, else the first offered size, else 10.
pub fn effective_page_size(explicit: Option<usize>, page_sizes: &[usize]) -> usize {
    explicit
        .or_else(|| page_sizes.first().copied())
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

pub fn page_size_options(page_sizes: &[usize]) -> Vec<usize> {
    if page_sizes.is_empty() {
        DEFAULT_PAGE_SIZES.to_vec()
    } else {
        page_sizes.to_vec()
    }
}

/// Number of pages for `total` rows. A page size of 0 shows everything.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        1
    } else {
        total.div_ceil(page_size).max(1)
    }
}

/// Local paging state owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingState {
    pub current_page: usize,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingPlan {
    pub mode: Mode,
    pub current_page: usize,
    pub page_size: usize,
    pub page_sizes: Vec<usize>,
    /// Remote mode: the caller's `totalCount`. Local: filled in from the
    /// derived row count.
    pub total_count: Option<usize>,
}

impl PagingPlan {
    pub fn compose(mode: Mode, config: &GridConfig, local: &PagingState) -> Self {
        let (current_page, explicit, total_count) = match mode {
            Mode::Local => (local.current_page, local.page_size.or(config.page_size), None),
            Mode::Remote => (config.current_page, config.page_size, config.total_count),
        };
        PagingPlan {
            mode,
            current_page,
            page_size: effective_page_size(explicit, &config.page_sizes),
            page_sizes: page_size_options(&config.page_sizes),
            total_count,
        }
    }

    pub fn page_count(&self, derived_rows: usize) -> usize {
        page_count(self.total_count.unwrap_or(derived_rows), self.page_size)
    }

    /// The current page clamped to the last existing page.
    pub fn clamped_page(&self, derived_rows: usize) -> usize {
        self.current_page.min(self.page_count(derived_rows) - 1)
    }

    /// Slice of the derived rows shown on the current page. Remote pages
    /// arrive already sliced.
    pub fn page_range(&self, derived_rows: usize) -> Range<usize> {
        if self.mode == Mode::Remote || self.page_size == 0 {
            return 0..derived_rows;
        }
        let start = (self.clamped_page(derived_rows) * self.page_size).min(derived_rows);
        let end = (start + self.page_size).min(derived_rows);
        start..end
    }
}

// ============================================================================
// SORTING
// ============================================================================

/// Compare two date-column values chronologically. Unparseable dates sort
/// before valid ones.
pub fn compare_dates(a: &Value, b: &Value, pattern: &DatePattern) -> Ordering {
    let a = parse_date_value(a, Some(pattern));
    let b = parse_date_value(b, Some(pattern));
    a.cmp(&b)
}

fn date_comparator(column: &Column) -> CompareFn {
    let pattern = column
        .format
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(DatePattern::new)
        .unwrap_or_default();
    Arc::new(move |a: &Value, b: &Value| compare_dates(a, b, &pattern))
}

/// The active sort specification plus the comparator for every column.
#[derive(Clone)]
pub struct SortingPlan {
    pub mode: Mode,
    pub sorting: SortSpec,
    comparators: FxHashMap<String, CompareFn>,
}

impl std::fmt::Debug for SortingPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.comparators.keys().collect();
        names.sort();
        f.debug_struct("SortingPlan")
            .field("mode", &self.mode)
            .field("sorting", &self.sorting)
            .field("comparators", &names)
            .finish()
    }
}

impl SortingPlan {
    /// Caller comparators are kept; date columns always get the date
    /// comparator.
    pub fn compose(mode: Mode, columns: &[Column], caller: &[ColumnComparator], sorting: SortSpec) -> Self {
        let mut comparators: FxHashMap<String, CompareFn> = caller
            .iter()
            .map(|c| (c.column_name.clone(), Arc::clone(&c.compare)))
            .collect();
        for column in columns {
            if column.column_type == Some(ColumnType::Date) {
                comparators.insert(column.name.clone(), date_comparator(column));
            }
        }
        SortingPlan {
            mode,
            sorting,
            comparators,
        }
    }

    pub fn has_comparator(&self, column_name: &str) -> bool {
        self.comparators.contains_key(column_name)
    }

    pub fn compare_values(&self, column_name: &str, a: &Value, b: &Value) -> Ordering {
        match self.comparators.get(column_name) {
            Some(compare) => compare(a, b),
            None => a.compare(b),
        }
    }

    pub fn compare_rows(&self, a: &Row, b: &Row) -> Ordering {
        for sort in &self.sorting {
            let ord = self.compare_values(&sort.column_name, a.get(&sort.column_name), b.get(&sort.column_name));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Stable sort of row indices. Remote plans leave the order alone.
    pub fn sort_indices(&self, indices: &mut [usize], rows: &[Row]) {
        if self.mode == Mode::Remote || self.sorting.is_empty() {
            return;
        }
        indices.sort_by(|&a, &b| match (rows.get(a), rows.get(b)) {
            (Some(ra), Some(rb)) => self.compare_rows(ra, rb),
            _ => a.cmp(&b),
        });
    }
}

/// Next sort spec after a header click: a new column starts ascending, the
/// same column flips direction.
pub fn toggle_sort(current: &[Sorting], column_name: &str, keep_others: bool) -> SortSpec {
    let direction = current
        .iter()
        .find(|s| s.column_name == column_name)
        .map(|s| s.direction.toggled())
        .unwrap_or(SortDirection::Asc);

    let mut next: SortSpec = if keep_others {
        current
            .iter()
            .filter(|s| s.column_name != column_name)
            .cloned()
            .collect()
    } else {
        SortSpec::new()
    };
    next.push(Sorting {
        column_name: column_name.to_string(),
        direction,
    });
    next
}
