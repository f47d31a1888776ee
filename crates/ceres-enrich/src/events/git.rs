//! Git commit items.

use ceres_common::parse_i64;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{EventRows, Granularity};
use crate::error::Result;
use crate::format::parse_timestamp;

pub const EVENT_COMMIT: &str = "COMMIT";
pub const FILE_EVENT_PREFIX: &str = "FILE_";

pub const FILE_EVENT: &str = "fileaction";
pub const FILE_PATH: &str = "filepath";
pub const FILE_ADDED_LINES: &str = "addedlines";
pub const FILE_REMOVED_LINES: &str = "removedlines";

/// Placeholder for file fields the item does not carry.
const NOT_AVAILABLE: &str = "-";

#[derive(Debug, Deserialize)]
struct CommitItem {
    data: CommitData,
}

#[derive(Debug, Deserialize)]
struct CommitData {
    commit: Option<String>,
    #[serde(rename = "Author")]
    author: Option<String>,
    #[serde(rename = "AuthorDate")]
    author_date: Option<String>,
    #[serde(default)]
    files: Vec<FileData>,
}

#[derive(Debug, Deserialize)]
struct FileData {
    action: Option<String>,
    file: Option<String>,
    added: Option<Value>,
    removed: Option<Value>,
}

/// Line counts come as strings, with `-` for binary files.
fn line_count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::String(text)) => parse_i64(text).unwrap_or(0),
        Some(Value::Number(number)) => number.as_i64().unwrap_or(0),
        _ => 0,
    }
}

#[derive(Debug, Default)]
struct FileColumns {
    action: Vec<String>,
    path: Vec<String>,
    added: Vec<i64>,
    removed: Vec<i64>,
}

impl FileColumns {
    fn push(&mut self, file: &FileData) {
        let action = match file.action.as_deref() {
            Some(action) => format!("{FILE_EVENT_PREFIX}{action}"),
            None => NOT_AVAILABLE.to_string(),
        };
        self.action.push(action);
        self.path.push(
            file.file
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
        self.added.push(line_count(file.added.as_ref()));
        self.removed.push(line_count(file.removed.as_ref()));
    }
}

/// Splits raw git commit items into commit or file events.
#[derive(Debug, Clone, Copy)]
pub struct GitEvents<'a> {
    items: &'a [Value],
}

impl<'a> GitEvents<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    /// Build the event table for `granularity`.
    ///
    /// Items without a commit hash, author or parseable author date are
    /// skipped with a warning. At file granularity a commit without files
    /// produces no events.
    pub fn eventize(&self, granularity: Granularity) -> Result<DataFrame> {
        let mut rows = EventRows::default();
        let mut files = FileColumns::default();
        let mut skipped = 0usize;

        for (idx, item) in self.items.iter().enumerate() {
            let commit = match CommitItem::deserialize(item) {
                Ok(item) => item.data,
                Err(error) => {
                    warn!(item = idx, %error, "skipping malformed commit item");
                    skipped += 1;
                    continue;
                }
            };
            let date = commit
                .author_date
                .as_deref()
                .and_then(parse_timestamp)
                .map(|dt| dt.and_utc().timestamp_millis());
            let (Some(id), Some(owner), Some(date)) =
                (commit.commit.as_deref(), commit.author.as_deref(), date)
            else {
                warn!(item = idx, "skipping commit item without hash, author or date");
                skipped += 1;
                continue;
            };

            match granularity {
                Granularity::Commit => rows.push(id, EVENT_COMMIT, date, owner),
                Granularity::File => {
                    for file in &commit.files {
                        rows.push(id, EVENT_COMMIT, date, owner);
                        files.push(file);
                    }
                }
            }
        }

        let event_count = rows.len();
        let mut columns = rows.into_columns()?;
        if granularity == Granularity::File {
            columns.push(Series::new(FILE_EVENT.into(), files.action).into_column());
            columns.push(Series::new(FILE_PATH.into(), files.path).into_column());
            columns.push(Series::new(FILE_ADDED_LINES.into(), files.added).into_column());
            columns.push(Series::new(FILE_REMOVED_LINES.into(), files.removed).into_column());
        }
        let events = DataFrame::new(columns)?;
        debug!(
            items = self.items.len(),
            events = event_count,
            skipped,
            ?granularity,
            "eventized git items"
        );
        Ok(events)
    }
}
