//! FILENAME: grid-engine/src/selection.rs
//! Selection Cascade.
//!
//! With grouping and select-by-group on, a selection is always a union of
//! whole groups: deselecting a row drops its whole group, selecting a row
//! selects exactly its group. Indices address the row set.

use grid_model::{Row, Value};
use rustc_hash::FxHashSet;

use crate::grouping::GroupKey;
use crate::log_warn;

fn group_key(rows: &[Row], index: usize, field: &str) -> Option<GroupKey> {
    rows.get(index).map(|r| GroupKey::from(r.get(field)))
}

/// Resolve a proposed selection against the current one.
///
/// Without a grouping field the proposal passes through unchanged.
pub fn cascade(current: &[usize], proposed: &[usize], rows: &[Row], grouping: Option<&str>) -> Vec<usize> {
    let Some(field) = grouping else {
        return proposed.to_vec();
    };

    let proposed_set: FxHashSet<usize> = proposed.iter().copied().collect();
    let current_set: FxHashSet<usize> = current.iter().copied().collect();
    let removed: Vec<usize> = current.iter().copied().filter(|i| !proposed_set.contains(i)).collect();
    let first_added = proposed.iter().copied().find(|i| !current_set.contains(i));

    if !removed.is_empty() && first_added.is_none() {
        if removed.len() > 1 {
            log_warn!("SELECT", "{} rows deselected at once; dropping each of their groups", removed.len());
        }
        let dropped: FxHashSet<GroupKey> = removed
            .iter()
            .filter_map(|&i| group_key(rows, i, field))
            .collect();
        return current
            .iter()
            .copied()
            .filter(|&i| group_key(rows, i, field).is_some_and(|k| !dropped.contains(&k)))
            .collect();
    }

    match first_added.and_then(|i| group_key(rows, i, field)) {
        Some(key) => rows
            .iter()
            .enumerate()
            .filter(|(_, r)| GroupKey::from(r.get(field)) == key)
            .map(|(i, _)| i)
            .collect(),
        None => proposed.to_vec(),
    }
}

/// Proposed selection after clicking a row's checkbox.
pub fn toggle(current: &[usize], index: usize) -> Vec<usize> {
    if current.contains(&index) {
        current.iter().copied().filter(|&i| i != index).collect()
    } else {
        let mut next = current.to_vec();
        next.push(index);
        next
    }
}

/// True when no group has both selected and unselected members.
pub fn is_group_closed(selection: &[usize], rows: &[Row], field: &str) -> bool {
    let selected: FxHashSet<usize> = selection.iter().copied().collect();
    let mut partial: rustc_hash::FxHashMap<GroupKey, (bool, bool)> = Default::default();
    for (i, row) in rows.iter().enumerate() {
        let entry = partial.entry(GroupKey::from(row.get(field))).or_default();
        if selected.contains(&i) {
            entry.0 = true;
        } else {
            entry.1 = true;
        }
    }
    partial.values().all(|(some_in, some_out)| !(*some_in && *some_out))
}

/// The grouping value of the row at `index`, if it exists.
pub fn group_value<'a>(rows: &'a [Row], index: usize, field: &str) -> Option<&'a Value> {
    rows.get(index).map(|r| r.get(field))
}
