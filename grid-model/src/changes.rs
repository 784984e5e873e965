//! FILENAME: grid-model/src/changes.rs
//! PURPOSE: Change records handed to the caller when edits are committed.
//! CONTEXT: The engine never applies edits itself. It describes them with
//! these types and the caller applies them to its own store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::row::{Row, RowPatch};

/// Pending, uncommitted edits keyed by flat row index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditChangeSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Row>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub changed: BTreeMap<usize, RowPatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<usize>,
}

impl EditChangeSet {
    pub fn added(rows: Vec<Row>) -> Self {
        EditChangeSet {
            added: rows,
            ..Default::default()
        }
    }

    pub fn changed(index: usize, patch: RowPatch) -> Self {
        let mut changed = BTreeMap::new();
        changed.insert(index, patch);
        EditChangeSet {
            changed,
            ..Default::default()
        }
    }

    pub fn deleted(indices: Vec<usize>) -> Self {
        EditChangeSet {
            deleted: indices,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }

    pub fn has_deletions(&self) -> bool {
        !self.deleted.is_empty()
    }
}

/// Structural position of a row inside a depth-2 tree.
/// `child_index == None` addresses the parent row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeCoord {
    pub parent_index: usize,
    pub child_index: Option<usize>,
}

impl TreeCoord {
    pub fn parent(parent_index: usize) -> Self {
        TreeCoord {
            parent_index,
            child_index: None,
        }
    }

    pub fn child(parent_index: usize, child_index: usize) -> Self {
        TreeCoord {
            parent_index,
            child_index: Some(child_index),
        }
    }

    /// Looks the addressed row up in a tree row set.
    pub fn locate<'a>(&self, rows: &'a [Row]) -> Option<&'a Row> {
        let parent = rows.get(self.parent_index)?;
        match self.child_index {
            None => Some(parent),
            Some(child) => parent.children.as_ref()?.get(child),
        }
    }
}

/// A single tree-mode edit: the target row plus its changed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeChange {
    pub target_index: TreeCoord,
    pub changed: RowPatch,
}

/// What `onCommitChanges` receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommitPayload {
    Flat(EditChangeSet),
    Tree(TreeChange),
}
