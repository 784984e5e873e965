//! FILENAME: grid-engine/src/tree.rs
//! Tree Index Resolver.
//!
//! Tree data is depth 2: top-level parents, each optionally carrying
//! `children`. Flattened, a parent occupies one slot followed by one slot
//! per child. Edit commits address rows by flat index; this module maps a
//! flat index back to its (parent, child) coordinate and forward again.

use grid_model::{Row, TreeCoord};

use crate::error::GridError;

/// Number of slots in the flattened tree.
pub fn flat_len(rows: &[Row]) -> usize {
    rows.iter().map(|r| 1 + r.child_count()).sum()
}

/// Map a flat index to its tree coordinate.
///
/// Walks parents with a running slot count `c`; the parent whose range
/// `[c, c + 1 + k)` holds `t` owns it. `t == c` is the parent itself.
pub fn resolve(rows: &[Row], t: usize) -> Result<TreeCoord, GridError> {
    let mut c = 0;
    for (parent_index, row) in rows.iter().enumerate() {
        let k = row.child_count();
        if t < c + 1 + k {
            return Ok(if t == c {
                TreeCoord::parent(parent_index)
            } else {
                TreeCoord::child(parent_index, t - c - 1)
            });
        }
        c += 1 + k;
    }
    Err(GridError::TreeIndexOutOfRange { index: t, len: c })
}

/// Map a tree coordinate to its flat index.
pub fn flat_index_of(rows: &[Row], coord: TreeCoord) -> Option<usize> {
    let parent = rows.get(coord.parent_index)?;
    let start: usize = rows[..coord.parent_index].iter().map(|r| 1 + r.child_count()).sum();
    match coord.child_index {
        None => Some(start),
        Some(child) if child < parent.child_count() => Some(start + 1 + child),
        Some(_) => None,
    }
}

/// One slot of the flattened tree.
#[derive(Debug, Clone, Copy)]
pub struct FlatTreeRow<'a> {
    pub flat_index: usize,
    pub coord: TreeCoord,
    pub row: &'a Row,
}

impl FlatTreeRow<'_> {
    pub fn depth(&self) -> u8 {
        if self.coord.child_index.is_some() {
            1
        } else {
            0
        }
    }
}

/// Depth-2 linearization: each parent followed by its children.
pub fn flatten(rows: &[Row]) -> Vec<FlatTreeRow<'_>> {
    let mut out = Vec::with_capacity(flat_len(rows));
    for (parent_index, parent) in rows.iter().enumerate() {
        out.push(FlatTreeRow {
            flat_index: out.len(),
            coord: TreeCoord::parent(parent_index),
            row: parent,
        });
        for (child_index, child) in parent.children.iter().flatten().enumerate() {
            out.push(FlatTreeRow {
                flat_index: out.len(),
                coord: TreeCoord::child(parent_index, child_index),
                row: child,
            });
        }
    }
    out
}
