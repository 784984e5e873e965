//! FILENAME: grid-engine/src/grouping.rs
//! Single-column grouping: hashable group keys, group blocks in first-seen
//! order, and the expanded-group key set.

use grid_model::{Row, Value};
use rustc_hash::FxHashMap;

// ============================================================================
// GROUP KEYS
// ============================================================================

/// A normalized, hashable form of a grouping value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Null,
    Boolean(bool),
    Number(OrderedFloat),
    Text(String),
    Date(chrono::NaiveDateTime),
}

impl From<&Value> for GroupKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => GroupKey::Null,
            Value::Boolean(b) => GroupKey::Boolean(*b),
            Value::Number(n) => GroupKey::Number(OrderedFloat(*n)),
            Value::Text(s) => GroupKey::Text(s.clone()),
            Value::Date(d) => GroupKey::Date(*d),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as map keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

// ============================================================================
// GROUP BLOCKS
// ============================================================================

/// Rows sharing one grouping value, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBlock {
    pub key: Value,
    pub members: Vec<usize>,
}

/// Group the given row indices by `field`. Blocks appear in the order their
/// value is first seen.
pub fn group_rows(indices: &[usize], rows: &[Row], field: &str) -> Vec<GroupBlock> {
    let mut blocks: Vec<GroupBlock> = Vec::new();
    let mut lookup: FxHashMap<GroupKey, usize> = FxHashMap::default();

    for &i in indices {
        let Some(row) = rows.get(i) else { continue };
        let value = row.get(field);
        let slot = *lookup.entry(GroupKey::from(value)).or_insert_with(|| {
            blocks.push(GroupBlock {
                key: value.clone(),
                members: Vec::new(),
            });
            blocks.len() - 1
        });
        blocks[slot].members.push(i);
    }
    blocks
}

/// Distinct grouping values in first-seen order.
pub fn distinct_group_keys(rows: &[Row], field: &str) -> Vec<Value> {
    let indices: Vec<usize> = (0..rows.len()).collect();
    group_rows(&indices, rows, field)
        .into_iter()
        .map(|b| b.key)
        .collect()
}

pub fn is_expanded(expanded: &[Value], key: &Value) -> bool {
    let key = GroupKey::from(key);
    expanded.iter().any(|v| GroupKey::from(v) == key)
}

/// Flip one group's expansion.
pub fn toggle_expanded(mut expanded: Vec<Value>, key: &Value) -> Vec<Value> {
    let target = GroupKey::from(key);
    match expanded.iter().position(|v| GroupKey::from(v) == target) {
        Some(pos) => {
            expanded.remove(pos);
        }
        None => expanded.push(key.clone()),
    }
    expanded
}

/// Group header text: `Title: value`, or just the value when column names
/// are hidden.
pub fn group_label(title: &str, value_text: &str, hide_column_name: bool) -> String {
    if hide_column_name || title.is_empty() {
        value_text.to_string()
    } else {
        format!("{}: {}", title, value_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("dept", "B").with("n", 1.0),
            Row::new().with("dept", "A").with("n", 2.0),
            Row::new().with("dept", "B").with("n", 0.0),
            Row::new().with("n", -0.0),
        ]
    }

    #[test]
    fn test_first_seen_order() {
        let rows = rows();
        assert_eq!(
            distinct_group_keys(&rows, "dept"),
            vec![Value::text("B"), Value::text("A"), Value::Null]
        );
        let blocks = group_rows(&[2, 1, 0], &rows, "dept");
        assert_eq!(blocks[0].members, vec![2, 0]);
        assert_eq!(blocks[1].members, vec![1]);
    }

    #[test]
    fn test_signed_zero_groups_together() {
        let blocks = group_rows(&[0, 1, 2, 3], &rows(), "n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].members, vec![2, 3]);
    }

    #[test]
    fn test_toggle_expanded() {
        let expanded = toggle_expanded(vec![Value::text("A")], &Value::text("B"));
        assert!(is_expanded(&expanded, &Value::text("B")));
        let expanded = toggle_expanded(expanded, &Value::text("A"));
        assert_eq!(expanded, vec![Value::text("B")]);
    }

    #[test]
    fn test_group_label() {
        assert_eq!(group_label("Dept", "A", false), "Dept: A");
        assert_eq!(group_label("Dept", "A", true), "A");
    }
}
