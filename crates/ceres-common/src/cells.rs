//! Polars cell and column helpers.
//!
//! Enrichments compare and key rows by the textual rendering of their cells,
//! so every crate needs the same `AnyValue` to `String` conversion. Nulls are
//! kept explicit as `None` rather than collapsing into empty strings.

use polars::prelude::{AnyValue, Column, DataFrame};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, and formats floats without trailing
/// zeros so that `1.0` and `1` render the same way.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use ceres_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(2.0)), "2");
/// assert_eq!(any_to_string(AnyValue::String("pepe")), "pepe");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Renders a cell as text, keeping nulls distinct from empty strings.
///
/// ```
/// use polars::prelude::AnyValue;
/// use ceres_common::cell_text;
///
/// assert_eq!(cell_text(AnyValue::Null), None);
/// assert_eq!(cell_text(AnyValue::String("")), Some(String::new()));
/// ```
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use ceres_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Returns true when `df` declares a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Returns the subset of `names` that `df` does not declare, in input order.
pub fn missing_columns<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !has_column(df, name))
        .map(str::to_string)
        .collect()
}

/// Extracts every cell of a column as optional text.
///
/// Returns `None` if the column does not exist.
pub fn column_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    df.column(name).ok().map(column_texts)
}

/// Renders every cell of `column` with [`cell_text`].
pub fn column_texts(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| cell_text(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_integers() {
        assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::UInt32(0)), "0");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(1.5)), "1.5");
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
    }

    #[test]
    fn test_any_to_string_boolean() {
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
        assert_eq!(any_to_string(AnyValue::Boolean(false)), "false");
    }

    #[test]
    fn test_cell_text_keeps_null_distinct() {
        assert_eq!(cell_text(AnyValue::Null), None);
        assert_eq!(cell_text(AnyValue::String("")), Some(String::new()));
        assert_eq!(cell_text(AnyValue::Int64(7)), Some("7".to_string()));
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-2.50), "-2.5");
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("-"), None);
        assert_eq!(parse_i64(""), None);
    }

    #[test]
    fn test_column_presence() {
        let df = DataFrame::new(vec![
            Series::new("author".into(), vec!["a", "b"]).into_column(),
        ])
        .unwrap();

        assert!(has_column(&df, "author"));
        assert!(!has_column(&df, "committer"));
        assert_eq!(
            missing_columns(&df, &["committer", "author", "date"]),
            vec!["committer".to_string(), "date".to_string()]
        );
    }

    #[test]
    fn test_column_values() {
        let df = DataFrame::new(vec![
            Series::new("n".into(), vec![Some(1i64), None, Some(3)]).into_column(),
        ])
        .unwrap();

        assert_eq!(
            column_values(&df, "n"),
            Some(vec![Some("1".to_string()), None, Some("3".to_string())])
        );
        assert_eq!(column_values(&df, "missing"), None);
    }
}
