//! FILENAME: grid-engine/src/editors.rs
//! Editor descriptors for editable fields.
//!
//! A descriptor says which kind of editor a field gets, which live input it
//! accepts, and how the final draft converts back to a field value. The
//! rendering layer owns the widget; everything here is pure.

use grid_model::number_format::{format_general, numeric_prefix};
use grid_model::{parse_date_value, ColumnType, DatePattern, TrueFalseValues, Value};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::definition::{DropdownOption, DropdownSource, EditField, EditFieldType};
use crate::log_debug;

static CURRENCY_DRAFT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*\.?\d{0,2}$").expect("currency draft pattern is valid"));

/// Dropdown editor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownEditor {
    pub source: DropdownSource,
    pub is_clearable: bool,
    pub menu_width: Option<Value>,
}

impl DropdownEditor {
    pub fn options(&self, current: &Value) -> Vec<DropdownOption> {
        self.source.options(current)
    }

    /// Label of the option holding `value`, if any.
    pub fn label_for(&self, value: &Value) -> Option<String> {
        self.options(value)
            .into_iter()
            .find(|o| o.value == *value)
            .map(|o| o.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorDescriptor {
    Text,
    Number,
    Currency,
    Date { pattern: DatePattern },
    Boolean { values: TrueFalseValues },
    Dropdown(DropdownEditor),
}

/// The draft an editor holds while a cell is being edited.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorInput {
    /// Typed text (text, number, currency and date editors).
    Text(String),
    /// Tri-state checkbox (boolean editor). `None` is unset.
    Toggle(Option<bool>),
    /// Picked option value (dropdown editor). `None` is cleared.
    Choice(Option<Value>),
}

impl EditorDescriptor {
    /// Builds the descriptor for an edit field. Fields without a type get no
    /// editor.
    pub fn from_field(field: &EditField) -> Option<Self> {
        let descriptor = match field.field_type.as_ref()? {
            EditFieldType::Tag(ColumnType::Text) => EditorDescriptor::Text,
            EditFieldType::Tag(ColumnType::Number) => EditorDescriptor::Number,
            EditFieldType::Tag(ColumnType::Currency) => EditorDescriptor::Currency,
            EditFieldType::Tag(ColumnType::Date) => EditorDescriptor::Date {
                pattern: field
                    .format
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .map(DatePattern::new)
                    .unwrap_or_default(),
            },
            EditFieldType::Tag(ColumnType::Boolean) => EditorDescriptor::Boolean {
                values: field.custom_true_false_values.clone().unwrap_or_default(),
            },
            // A bare "dropdown" tag carries no options
            EditFieldType::Tag(ColumnType::Dropdown) => EditorDescriptor::Dropdown(DropdownEditor {
                source: DropdownSource::Static(Vec::new()),
                is_clearable: field.is_clearable,
                menu_width: field.menu_width.clone(),
            }),
            EditFieldType::Dropdown(spec) => EditorDescriptor::Dropdown(DropdownEditor {
                source: spec.dropdown.clone(),
                is_clearable: field.is_clearable,
                menu_width: field.menu_width.clone(),
            }),
        };
        Some(descriptor)
    }

    pub fn kind(&self) -> ColumnType {
        match self {
            EditorDescriptor::Text => ColumnType::Text,
            EditorDescriptor::Number => ColumnType::Number,
            EditorDescriptor::Currency => ColumnType::Currency,
            EditorDescriptor::Date { .. } => ColumnType::Date,
            EditorDescriptor::Boolean { .. } => ColumnType::Boolean,
            EditorDescriptor::Dropdown(_) => ColumnType::Dropdown,
        }
    }

    /// Whether a single typed character is let through. Number editors take
    /// digits only, currency editors digits and the decimal point (a second
    /// point is rejected by `accepts_draft`).
    pub fn accepts_keystroke(&self, c: char) -> bool {
        match self {
            EditorDescriptor::Number => c.is_ascii_digit() || c.is_control(),
            EditorDescriptor::Currency => c.is_ascii_digit() || c == '.' || c.is_control(),
            _ => true,
        }
    }

    /// Whether a whole draft is acceptable as live input.
    pub fn accepts_draft(&self, draft: &str) -> bool {
        match self {
            EditorDescriptor::Number => draft.chars().all(|c| c.is_ascii_digit()),
            EditorDescriptor::Currency => CURRENCY_DRAFT.is_match(draft),
            _ => true,
        }
    }

    /// The draft an editor starts from for a cell value.
    pub fn initial_input(&self, value: &Value) -> EditorInput {
        match self {
            EditorDescriptor::Text => EditorInput::Text(value.display_value()),
            EditorDescriptor::Number | EditorDescriptor::Currency => {
                EditorInput::Text(value.as_number().map(format_general).unwrap_or_default())
            }
            EditorDescriptor::Date { pattern } => EditorInput::Text(
                parse_date_value(value, Some(pattern))
                    .map(|d| pattern.format(&d))
                    .unwrap_or_default(),
            ),
            EditorDescriptor::Boolean { values } => EditorInput::Toggle(values.decode(value)),
            EditorDescriptor::Dropdown(_) => {
                EditorInput::Choice((!value.is_null()).then(|| value.clone()))
            }
        }
    }

    /// Convert the final draft into the committed field value.
    ///
    /// Unparseable drafts commit `Value::Null`.
    pub fn commit(&self, input: &EditorInput) -> Value {
        match (self, input) {
            (EditorDescriptor::Text, EditorInput::Text(s)) => Value::text(s.as_str()),
            (EditorDescriptor::Number, EditorInput::Text(s)) => {
                match numeric_prefix(s.trim()).and_then(|p| p.parse::<f64>().ok()) {
                    Some(n) => Value::Number(n),
                    None => Value::Null,
                }
            }
            (EditorDescriptor::Currency, EditorInput::Text(s)) => normalize_currency(s)
                .and_then(|n| n.parse::<f64>().ok())
                .map(Value::Number)
                .unwrap_or(Value::Null),
            (EditorDescriptor::Date { pattern }, EditorInput::Text(s)) => {
                match parse_date_value(&Value::text(s.as_str()), Some(pattern)) {
                    Some(d) => Value::Date(d),
                    None => Value::Null,
                }
            }
            (EditorDescriptor::Boolean { values }, EditorInput::Toggle(flag)) => values.encode(*flag),
            (EditorDescriptor::Dropdown(_), EditorInput::Choice(choice)) => {
                choice.clone().unwrap_or(Value::Null)
            }
            (descriptor, input) => {
                log_debug!("EDIT", "{:?} editor cannot commit {:?}", descriptor.kind(), input);
                Value::Null
            }
        }
    }
}

/// Normalize a currency draft to exactly two decimals.
///
/// `"12"` -> `"12.00"`, `"12.3"` -> `"12.30"`, `"12."` -> `"12.00"`,
/// `".5"` -> `"0.50"`. Extra decimals are truncated. Returns `None` for
/// drafts without a leading number (including `""`).
pub fn normalize_currency(draft: &str) -> Option<String> {
    let number = numeric_prefix(draft.trim())?;

    let (negative, unsigned) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number.trim_start_matches('+')),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let mut cents: String = frac_part.chars().take(2).collect();
    while cents.len() < 2 {
        cents.push('0');
    }

    let sign = if negative { "-" } else { "" };
    Some(format!("{}{}.{}", sign, int_part, cents))
}

/// Next state of a tri-state checkbox click.
pub fn toggle_next(flag: Option<bool>) -> Option<bool> {
    match flag {
        Some(b) => Some(!b),
        None => Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DropdownProvider;
    use std::sync::Arc;

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("12").as_deref(), Some("12.00"));
        assert_eq!(normalize_currency("12.3").as_deref(), Some("12.30"));
        assert_eq!(normalize_currency("12.").as_deref(), Some("12.00"));
        assert_eq!(normalize_currency(".5").as_deref(), Some("0.50"));
        assert_eq!(normalize_currency("12.345").as_deref(), Some("12.34"));
        assert_eq!(normalize_currency("-3.1").as_deref(), Some("-3.10"));
        assert_eq!(normalize_currency(""), None);
        assert_eq!(normalize_currency("abc"), None);
    }

    #[test]
    fn test_normalize_currency_idempotent() {
        for input in ["0", "007", "12.3", "1.", "99.999", "-0.5", "+4", "  8 "] {
            let once = normalize_currency(input);
            assert_eq!(once.as_deref().and_then(normalize_currency), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_currency_draft_filter() {
        let editor = EditorDescriptor::Currency;
        assert!(editor.accepts_draft(""));
        assert!(editor.accepts_draft("12."));
        assert!(editor.accepts_draft("12.34"));
        assert!(!editor.accepts_draft("12.345"));
        assert!(!editor.accepts_draft("1a"));
    }

    #[test]
    fn test_number_editor() {
        let editor = EditorDescriptor::Number;
        assert!(editor.accepts_keystroke('7'));
        assert!(!editor.accepts_keystroke('.'));
        assert!(!editor.accepts_draft("1.5"));
        assert_eq!(editor.commit(&EditorInput::Text("42".into())), Value::Number(42.0));
        assert_eq!(editor.commit(&EditorInput::Text("".into())), Value::Null);
        assert_eq!(editor.commit(&EditorInput::Text("x".into())), Value::Null);
    }

    #[test]
    fn test_currency_commit() {
        let editor = EditorDescriptor::Currency;
        assert_eq!(editor.commit(&EditorInput::Text("12.3".into())), Value::Number(12.3));
        assert_eq!(editor.commit(&EditorInput::Text("".into())), Value::Null);
        assert_eq!(editor.initial_input(&Value::Number(5.5)), EditorInput::Text("5.5".into()));
    }

    #[test]
    fn test_currency_keystrokes_limited_to_digits_and_point() {
        let editor = EditorDescriptor::Currency;
        assert!(editor.accepts_keystroke('4'));
        assert!(editor.accepts_keystroke('.'));
        assert!(editor.accepts_keystroke('\u{8}'));
        assert!(!editor.accepts_keystroke('a'));
        assert!(!editor.accepts_keystroke('-'));
        assert!(!editor.accepts_draft("1.2.3"));
    }

    #[test]
    fn test_date_editor_round_trip() {
        let field = EditField {
            format: Some("DD/MM/YYYY".into()),
            ..EditField::tagged(ColumnType::Date)
        };
        let editor = EditorDescriptor::from_field(&field).unwrap();
        let committed = editor.commit(&EditorInput::Text("16/04/2019".into()));
        assert!(matches!(committed, Value::Date(_)));
        assert_eq!(editor.initial_input(&committed), EditorInput::Text("16/04/2019".into()));
        assert_eq!(editor.commit(&EditorInput::Text("garbage".into())), Value::Null);
    }

    #[test]
    fn test_boolean_editor_maps_through_pair() {
        let field = EditField {
            custom_true_false_values: Some(TrueFalseValues::new("yes", "no")),
            ..EditField::tagged(ColumnType::Boolean)
        };
        let editor = EditorDescriptor::from_field(&field).unwrap();
        assert_eq!(editor.initial_input(&Value::text("no")), EditorInput::Toggle(Some(false)));
        assert_eq!(editor.initial_input(&Value::Null), EditorInput::Toggle(None));
        assert_eq!(editor.commit(&EditorInput::Toggle(Some(true))), Value::text("yes"));
        assert_eq!(editor.commit(&EditorInput::Toggle(None)), Value::Null);
        assert_eq!(toggle_next(None), Some(true));
        assert_eq!(toggle_next(Some(true)), Some(false));
    }

    struct Sizes;

    impl DropdownProvider for Sizes {
        fn options(&self, _current: &Value) -> Vec<DropdownOption> {
            vec![DropdownOption::new("s", "Small"), DropdownOption::new("l", "Large")]
        }
    }

    #[test]
    fn test_dropdown_editor() {
        let field = EditField::of_type(EditFieldType::dropdown(DropdownSource::Provider(Arc::new(Sizes))));
        let editor = EditorDescriptor::from_field(&field).unwrap();
        match &editor {
            EditorDescriptor::Dropdown(dropdown) => {
                assert!(dropdown.is_clearable);
                assert_eq!(dropdown.options(&Value::Null).len(), 2);
                assert_eq!(dropdown.label_for(&Value::text("l")).as_deref(), Some("Large"));
            }
            other => panic!("expected dropdown, got {:?}", other),
        }
        assert_eq!(editor.commit(&EditorInput::Choice(Some(Value::text("s")))), Value::text("s"));
        assert_eq!(editor.commit(&EditorInput::Choice(None)), Value::Null);
    }

    #[test]
    fn test_untyped_field_has_no_editor() {
        assert_eq!(EditorDescriptor::from_field(&EditField::default()), None);
    }
}
