//! FILENAME: grid-model/src/number_format.rs
//! PURPOSE: Number formatting utilities for displaying cell values.
//! CONTEXT: Converts raw numeric field values into the display strings used
//! by number and currency columns. All functions are total: values that are
//! not numbers degrade to a safe rendering instead of failing.

use crate::value::Value;

/// Format a value as US-dollar currency (`$1,234.56`, `-$1,234.56`).
/// Non-numeric values render as `$0.00`.
pub fn format_currency(value: &Value) -> String {
    let amount = value.as_number().unwrap_or(0.0);
    format_currency_amount(amount, 2, "$")
}

/// Format an amount with a leading symbol, fixed decimals and thousands separators.
pub fn format_currency_amount(value: f64, decimal_places: u8, symbol: &str) -> String {
    let formatted = add_thousands_separator(&format!(
        "{:.prec$}",
        value.abs(),
        prec = decimal_places as usize
    ));

    // -0.00 should not carry a sign
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}{}", symbol, formatted)
    } else {
        format!("{}{}", symbol, formatted)
    }
}

/// Render a number-column value. Numbers use general formatting; anything
/// else falls back to its plain text.
pub fn format_number_cell(value: &Value) -> String {
    match value {
        Value::Number(n) => format_general(*n),
        other => other.display_value(),
    }
}

/// Format a number in general format (auto-detect best representation).
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs_value = value.abs();

    // Use scientific notation for very large or very small numbers
    if abs_value >= 1e21 || abs_value < 1e-7 {
        return format!("{:e}", value);
    }

    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }

    let formatted = format!("{:.10}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Add thousands separators to a numeric string.
pub fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Parse the leading decimal number of a string, the way a lenient
/// float parser does: `"12abc"` -> 12, `".5"` -> 0.5, `"abc"` -> None.
pub fn parse_number_prefix(s: &str) -> Option<f64> {
    numeric_prefix(s.trim()).and_then(|p| p.parse::<f64>().ok())
}

/// Returns the longest prefix of `s` that looks like `[+-]?digits[.digits]`.
pub fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            frac_digits += 1;
        }
        if frac_digits == 0 {
            // "12." keeps the integer part, "." alone is not a number
            end = dot;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        None
    } else {
        Some(&s[..end])
    }
}

/// Render a boolean-column value as "Y"/"N" using the column's value pair.
/// Values outside the pair render empty.
pub fn format_boolean(value: &Value, pair: &crate::column::TrueFalseValues) -> String {
    match pair.decode(value) {
        Some(true) => "Y".to_string(),
        Some(false) => "N".to_string(),
        None => String::new(),
    }
}
