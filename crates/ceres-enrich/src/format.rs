//! Column normalization that runs before enrichment.
//!
//! Raw commit logs carry dates as free-form strings in whatever format the
//! source tool emitted. [`format_dates`] rewrites them into a `Datetime`
//! column in UTC so that [`crate::TimeDifference`] can subtract them.

use ceres_common::{cell_text, has_column};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{AnyValue, DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::debug;

use crate::error::{EnrichError, Result};

/// Formats with an explicit UTC offset. The first is git's default log format.
const OFFSET_FORMATS: &[&str] = &[
    "%a %b %e %H:%M:%S %Y %z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%a %b %e %H:%M:%S %Y",
];

/// Parse a date string into a UTC timestamp.
///
/// Values with an offset are converted to UTC. Values without one are taken
/// to be in UTC already. Returns `None` for blank or unrecognised input.
///
/// # Examples
///
/// ```
/// use ceres_enrich::format::parse_timestamp;
///
/// let git = parse_timestamp("Tue Aug 14 14:30:13 2012 -0300").unwrap();
/// assert_eq!(git.to_string(), "2012-08-14 17:30:13");
///
/// let iso = parse_timestamp("2016-03-01T10:00:00Z").unwrap();
/// assert_eq!(iso.to_string(), "2016-03-01 10:00:00");
///
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Rewrite each listed column into a `Datetime[ms]` column in UTC.
///
/// Absent columns are skipped and columns that are already `Date` or
/// `Datetime` are left alone. Null and blank cells become null.
///
/// # Errors
///
/// [`EnrichError::InvalidDate`] for the first non-blank cell that cannot be
/// parsed.
pub fn format_dates<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let mut formatted = df.clone();
    for name in columns.iter().map(AsRef::as_ref) {
        let Ok(column) = df.column(name) else {
            debug!(column = name, "date column absent, skipping");
            continue;
        };
        if matches!(column.dtype(), DataType::Date | DataType::Datetime(_, _)) {
            continue;
        }

        let mut millis = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let text = cell_text(column.get(row).unwrap_or(AnyValue::Null));
            let value = match text {
                Some(text) if !text.trim().is_empty() => {
                    let parsed =
                        parse_timestamp(&text).ok_or_else(|| EnrichError::InvalidDate {
                            column: name.to_string(),
                            row,
                            value: text.clone(),
                        })?;
                    Some(parsed.and_utc().timestamp_millis())
                }
                _ => None,
            };
            millis.push(value);
        }

        let series = Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        formatted.with_column(series)?;
        debug!(column = name, rows = df.height(), "normalized date column");
    }
    Ok(formatted)
}

/// Declare every listed column that `df` lacks as an all-null string column.
///
/// Existing columns are never touched. New columns are appended in the
/// order given.
pub fn fill_missing_fields<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let mut filled = df.clone();
    for name in columns.iter().map(AsRef::as_ref) {
        if has_column(&filled, name) {
            continue;
        }
        filled.with_column(Series::full_null(name.into(), df.height(), &DataType::String))?;
        debug!(column = name, "added missing column");
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    #[test]
    fn parses_git_dates_to_utc() {
        let parsed = parse_timestamp("Mon Feb 3 09:15:00 2014 +0100").unwrap();
        assert_eq!(parsed.to_string(), "2014-02-03 08:15:00");
    }

    #[test]
    fn parses_naive_formats() {
        assert_eq!(
            parse_timestamp("2016-01-05 12:00:00").unwrap().to_string(),
            "2016-01-05 12:00:00"
        );
        assert_eq!(
            parse_timestamp("2016-01-05").unwrap().to_string(),
            "2016-01-05 00:00:00"
        );
    }

    #[test]
    fn parses_rfc2822() {
        let parsed = parse_timestamp("Tue, 1 Jul 2003 10:52:37 +0200").unwrap();
        assert_eq!(parsed.to_string(), "2003-07-01 08:52:37");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("2016-13-45").is_none());
    }

    #[test]
    fn format_dates_converts_and_keeps_nulls() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), vec![Some("2016-01-01"), None, Some("  ")]).into_column(),
        ])
        .unwrap();

        let formatted = format_dates(&df, &["date", "absent"]).unwrap();
        let column = formatted.column("date").unwrap();

        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(column.null_count(), 2);
    }

    #[test]
    fn format_dates_reports_bad_cell() {
        let df = DataFrame::new(vec![
            Series::new("date".into(), vec!["2016-01-01", "soon"]).into_column(),
        ])
        .unwrap();

        match format_dates(&df, &["date"]) {
            Err(EnrichError::InvalidDate { row, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "soon");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn fill_missing_fields_appends_null_columns() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), vec!["x", "y"]).into_column(),
        ])
        .unwrap();

        let filled = fill_missing_fields(&df, &["a", "b"]).unwrap();

        assert_eq!(filled.width(), 2);
        assert_eq!(filled.column("a").unwrap().str().unwrap().get(0), Some("x"));
        assert_eq!(filled.column("b").unwrap().null_count(), 2);
    }

    #[test]
    fn fill_missing_fields_declares_columns_on_empty_table() {
        let filled = fill_missing_fields(&DataFrame::empty(), &["test1"]).unwrap();

        assert_eq!(filled.height(), 0);
        assert_eq!(filled.width(), 1);
    }
}
