//! FILENAME: grid-model/src/column.rs
//! PURPOSE: Column schema types.
//! CONTEXT: `name` is the join key between columns, row fields, width
//! entries and order entries. A schema version is immutable; callers
//! replace it wholesale.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the synthetic column that hosts the tree expander toggle.
pub const TREE_EXPANDER_COLUMN: &str = "treeDropdown";

/// Declared column/edit-field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Currency,
    Date,
    Boolean,
    Text,
    Dropdown,
}

/// The pair of raw values that represent `true` and `false` in a boolean column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueFalseValues {
    #[serde(rename = "true")]
    pub true_value: Value,
    #[serde(rename = "false")]
    pub false_value: Value,
}

impl TrueFalseValues {
    pub fn new(true_value: impl Into<Value>, false_value: impl Into<Value>) -> Self {
        TrueFalseValues {
            true_value: true_value.into(),
            false_value: false_value.into(),
        }
    }

    /// Decodes a raw value into the tri-state flag (`None` = neither value).
    pub fn decode(&self, value: &Value) -> Option<bool> {
        if *value == self.true_value {
            Some(true)
        } else if *value == self.false_value {
            Some(false)
        } else {
            None
        }
    }

    /// Encodes the tri-state flag back to a raw value (`None` commits null).
    pub fn encode(&self, flag: Option<bool>) -> Value {
        match flag {
            Some(true) => self.true_value.clone(),
            Some(false) => self.false_value.clone(),
            None => Value::Null,
        }
    }
}

impl Default for TrueFalseValues {
    fn default() -> Self {
        TrueFalseValues::new(true, false)
    }
}

/// One column of the grid schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub title: String,
    #[serde(default, rename = "type")]
    pub column_type: Option<ColumnType>,
    /// Display pattern (date columns), moment-style tokens.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub custom_true_false_values: Option<TrueFalseValues>,
}

impl Column {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            title: title.into(),
            column_type: None,
            format: None,
            custom_true_false_values: None,
        }
    }

    pub fn typed(name: impl Into<String>, title: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            column_type: Some(column_type),
            ..Column::new(name, title)
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_true_false_values(mut self, values: TrueFalseValues) -> Self {
        self.custom_true_false_values = Some(values);
        self
    }

    pub fn is_tree_expander(&self) -> bool {
        self.name == TREE_EXPANDER_COLUMN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_json() {
        let col: Column = serde_json::from_str(
            r#"{"name": "paid", "title": "Paid", "type": "boolean",
                "customTrueFalseValues": {"true": "Y", "false": "N"}}"#,
        )
        .unwrap();

        assert_eq!(col.column_type, Some(ColumnType::Boolean));
        let pair = col.custom_true_false_values.unwrap();
        assert_eq!(pair.decode(&Value::text("Y")), Some(true));
        assert_eq!(pair.decode(&Value::text("?")), None);
    }

    #[test]
    fn test_true_false_encode() {
        let pair = TrueFalseValues::default();
        assert_eq!(pair.encode(Some(false)), Value::Boolean(false));
        assert_eq!(pair.encode(None), Value::Null);
    }
}
