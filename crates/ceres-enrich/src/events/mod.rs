//! Turning raw activity items into event tables.
//!
//! Items are the JSON documents emitted by repository retrieval tools, one
//! per commit, issue, changeset or message, with the payload under a `data`
//! key. Eventizing flattens them into a table that the enrichments can work
//! on. Every source produces the same four leading columns:
//! - **id**: the item identifier
//! - **eventtype**: what happened, e.g. `COMMIT` or `ISSUE_OPEN`
//! - **date**: when it happened, as `Datetime[ms]` in UTC
//! - **owner**: who did it

pub mod bugzilla;
pub mod email;
pub mod gerrit;
pub mod git;

pub use bugzilla::BugzillaEvents;
pub use email::EmailEvents;
pub use gerrit::GerritEvents;
pub use git::GitEvents;

use std::fmt;

use ceres_common::parse_i64;
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};
use serde_json::Value;

use crate::error::{EnrichError, Result};

pub const EVENT_ID: &str = "id";
pub const EVENT_TYPE: &str = "eventtype";
pub const EVENT_DATE: &str = "date";
pub const EVENT_OWNER: &str = "owner";

/// How finely items are split into events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One event per item lifecycle step (commit, issue status, changeset
    /// state, message).
    Commit,
    /// One event per file touched by a commit. Only git items carry files.
    File,
}

/// The tool an item was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Git,
    Bugzilla,
    Gerrit,
    Email,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventSource::Git => "git",
            EventSource::Bugzilla => "bugzilla",
            EventSource::Gerrit => "gerrit",
            EventSource::Email => "email",
        };
        f.write_str(name)
    }
}

/// Eventize `items` from `source` at `granularity`.
///
/// # Errors
///
/// [`EnrichError::UnsupportedGranularity`] for file granularity on a source
/// other than git.
pub fn eventize(
    source: EventSource,
    items: &[Value],
    granularity: Granularity,
) -> Result<DataFrame> {
    if source != EventSource::Git && granularity != Granularity::Commit {
        return Err(EnrichError::UnsupportedGranularity {
            source_name: source.to_string(),
        });
    }
    match source {
        EventSource::Git => GitEvents::new(items).eventize(granularity),
        EventSource::Bugzilla => BugzillaEvents::new(items).eventize(),
        EventSource::Gerrit => GerritEvents::new(items).eventize(),
        EventSource::Email => EmailEvents::new(items).eventize(),
    }
}

/// The leading columns shared by every event table.
#[derive(Debug, Default)]
struct EventRows {
    id: Vec<String>,
    event: Vec<String>,
    date: Vec<i64>,
    owner: Vec<String>,
}

impl EventRows {
    fn push(&mut self, id: &str, event: &str, date: i64, owner: &str) {
        self.id.push(id.to_string());
        self.event.push(event.to_string());
        self.date.push(date);
        self.owner.push(owner.to_string());
    }

    fn len(&self) -> usize {
        self.id.len()
    }

    fn into_columns(self) -> Result<Vec<Column>> {
        let date = Series::new(EVENT_DATE.into(), self.date)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        Ok(vec![
            Series::new(EVENT_ID.into(), self.id).into_column(),
            Series::new(EVENT_TYPE.into(), self.event).into_column(),
            date.into_column(),
            Series::new(EVENT_OWNER.into(), self.owner).into_column(),
        ])
    }
}

/// Render a JSON scalar that may arrive as a string or a number.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Milliseconds since the epoch from a seconds value given as a string or
/// a number.
fn epoch_seconds_millis(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::String(text) => parse_i64(text)?,
        Value::Number(number) => number.as_i64()?,
        _ => return None,
    };
    seconds.checked_mul(1_000)
}
