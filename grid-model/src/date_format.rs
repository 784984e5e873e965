//! FILENAME: grid-model/src/date_format.rs
//! PURPOSE: Date parsing and formatting for date-typed columns.
//! CONTEXT: Column formats are written with moment-style tokens
//! (`MM/DD/YYYY`). They are translated into chrono strftime items here.
//! Invalid or missing dates never fail: formatting yields "" and parsing
//! yields `None`.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::value::Value;

/// Display pattern used when a date column has no `format`.
pub const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";

/// Moment token -> (display specifier, parse specifier). Longest tokens first.
const TOKENS: &[(&str, &str, &str)] = &[
    ("YYYY", "%Y", "%Y"),
    ("YY", "%y", "%y"),
    ("MMMM", "%B", "%B"),
    ("MMM", "%b", "%b"),
    ("MM", "%m", "%m"),
    ("M", "%-m", "%m"),
    ("dddd", "%A", "%A"),
    ("ddd", "%a", "%a"),
    ("DD", "%d", "%d"),
    ("D", "%-d", "%d"),
    ("HH", "%H", "%H"),
    ("H", "%-H", "%H"),
    ("hh", "%I", "%I"),
    ("h", "%-I", "%I"),
    ("mm", "%M", "%M"),
    ("m", "%-M", "%M"),
    ("ss", "%S", "%S"),
    ("s", "%-S", "%S"),
    ("A", "%p", "%p"),
    ("a", "%P", "%p"),
];

const TIME_TOKENS: &[&str] = &["HH", "H", "hh", "h", "mm", "m", "ss", "s"];

/// A moment-style pattern compiled to chrono format strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    display: String,
    parse: String,
    has_time: bool,
}

impl DatePattern {
    pub fn new(pattern: &str) -> Self {
        let mut display = String::new();
        let mut parse = String::new();
        let mut has_time = false;
        let mut rest = pattern;

        'outer: while !rest.is_empty() {
            // [literal] escapes
            if let Some(stripped) = rest.strip_prefix('[') {
                if let Some(close) = stripped.find(']') {
                    push_literal(&mut display, &mut parse, &stripped[..close]);
                    rest = &stripped[close + 1..];
                    continue;
                }
            }

            for (token, disp, prs) in TOKENS {
                if let Some(stripped) = rest.strip_prefix(token) {
                    display.push_str(disp);
                    parse.push_str(prs);
                    has_time |= TIME_TOKENS.contains(token);
                    rest = stripped;
                    continue 'outer;
                }
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                let mut buf = [0u8; 4];
                push_literal(&mut display, &mut parse, c.encode_utf8(&mut buf));
            }
            rest = chars.as_str();
        }

        DatePattern {
            source: pattern.to_string(),
            display,
            parse,
            has_time,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Format a date with this pattern. Returns "" if the pattern cannot render it.
    pub fn format(&self, date: &NaiveDateTime) -> String {
        let items: Vec<Item<'_>> = StrftimeItems::new(&self.display).collect();
        if items.iter().any(|i| matches!(i, Item::Error)) {
            return String::new();
        }

        let mut out = String::new();
        match write!(out, "{}", date.format_with_items(items.iter())) {
            Ok(()) => out,
            Err(_) => String::new(),
        }
    }

    /// Parse text written in this pattern.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.has_time {
            NaiveDateTime::parse_from_str(text, &self.parse).ok()
        } else {
            NaiveDate::parse_from_str(text, &self.parse)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    }
}

impl Default for DatePattern {
    fn default() -> Self {
        DatePattern::new(DEFAULT_DATE_FORMAT)
    }
}

fn push_literal(display: &mut String, parse: &mut String, literal: &str) {
    let escaped = literal.replace('%', "%%");
    display.push_str(&escaped);
    parse.push_str(&escaped);
}

/// Interpret a field value as a date.
///
/// Accepts `Value::Date`, epoch milliseconds, ISO-8601/RFC 3339 text, and
/// text written in `pattern` (when given).
pub fn parse_date_value(value: &Value, pattern: Option<&DatePattern>) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).map(|d| d.naive_utc())
        }
        Value::Text(s) => parse_date_text(s, pattern),
        _ => None,
    }
}

fn parse_date_text(text: &str, pattern: Option<&DatePattern>) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(d) = DateTime::parse_from_rfc3339(text) {
        return Some(d.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(d) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    pattern
        .and_then(|p| p.parse(text))
        .or_else(|| DatePattern::default().parse(text))
}

/// Render a date-column value; invalid or missing dates render "".
pub fn format_date(value: &Value, pattern: &DatePattern) -> String {
    parse_date_value(value, Some(pattern))
        .map(|d| pattern.format(&d))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_default_pattern() {
        let pattern = DatePattern::default();
        assert_eq!(format_date(&Value::Date(ymd(2019, 4, 16)), &pattern), "04/16/2019");
        assert_eq!(format_date(&Value::text("2019-04-16"), &pattern), "04/16/2019");
    }

    #[test]
    fn test_invalid_dates_render_empty() {
        let pattern = DatePattern::default();
        assert_eq!(format_date(&Value::text("not a date"), &pattern), "");
        assert_eq!(format_date(&Value::Null, &pattern), "");
        assert_eq!(format_date(&Value::Boolean(true), &pattern), "");
    }

    #[test]
    fn test_custom_pattern_round_trip() {
        let pattern = DatePattern::new("YYYY.MM.DD [at] HH:mm");
        let date = NaiveDate::from_ymd_opt(2020, 1, 2)
            .and_then(|d| d.and_hms_opt(13, 5, 0))
            .unwrap();

        let text = pattern.format(&date);
        assert_eq!(text, "2020.01.02 at 13:05");
        assert_eq!(pattern.parse(&text), Some(date));
    }

    #[test]
    fn test_short_tokens_and_percent_literal() {
        let pattern = DatePattern::new("M/D/YY %");
        assert_eq!(pattern.format(&ymd(2021, 3, 7)), "3/7/21 %");
    }

    #[test]
    fn test_epoch_millis() {
        let parsed = parse_date_value(&Value::Number(0.0), None).unwrap();
        assert_eq!(parsed, ymd(1970, 1, 1));
    }

    #[test]
    fn test_text_in_column_pattern() {
        let pattern = DatePattern::new("DD-MM-YYYY");
        assert_eq!(parse_date_value(&Value::text("16-04-2019"), Some(&pattern)), Some(ymd(2019, 4, 16)));
    }
}
