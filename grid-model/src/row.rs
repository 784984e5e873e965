//! FILENAME: grid-model/src/row.rs
//! PURPOSE: Defines the caller-owned row record.
//! CONTEXT: A row is an open mapping from column name to `Value`. In tree
//! mode a top-level row may additionally carry `children`. The engine only
//! ever reads rows; edits are expressed as separate change records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Partial row used by change records (column name -> new value).
pub type RowPatch = BTreeMap<String, Value>;

/// One data row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,

    /// Child rows (tree data only). `None` means the row is a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Row>>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder-style field setter, handy for fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = Some(children);
        self
    }

    /// Returns the field value, or `Value::Null` when the field is absent.
    pub fn get(&self, name: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.fields.get(name).unwrap_or(NULL)
    }

    /// Number of child rows (0 for leaves).
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}
