//! Bugzilla issue items.
//!
//! Bugzilla fields arrive as XML converted to JSON, so scalar fields are
//! single-element lists of `{"__text__": ...}` nodes.

use polars::prelude::DataFrame;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::EventRows;
use crate::error::Result;
use crate::format::parse_timestamp;

pub const EVENT_OPEN: &str = "ISSUE_OPEN";
pub const ISSUE_EVENT_PREFIX: &str = "ISSUE_";

/// Activity field whose changes become events.
const STATUS_FIELD: &str = "Status";

#[derive(Debug, Deserialize)]
struct BugItem {
    data: BugData,
}

#[derive(Debug, Deserialize)]
struct BugData {
    #[serde(default)]
    bug_id: Vec<TextNode>,
    #[serde(default)]
    creation_ts: Vec<TextNode>,
    #[serde(default)]
    reporter: Vec<TextNode>,
    #[serde(default)]
    activity: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "__text__")]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Activity {
    #[serde(rename = "What")]
    what: Option<String>,
    #[serde(rename = "Added")]
    added: Option<String>,
    #[serde(rename = "When")]
    when: Option<String>,
    #[serde(rename = "Who")]
    who: Option<String>,
}

fn first_text(nodes: &[TextNode]) -> Option<&str> {
    nodes.first().map(|node| node.text.as_str())
}

/// Activity dates may end in a zone abbreviation such as `CEST`, which is
/// dropped and the remaining local time taken as UTC.
fn parse_bug_date(value: &str) -> Option<i64> {
    let parsed = parse_timestamp(value).or_else(|| {
        let (head, zone) = value.trim().rsplit_once(' ')?;
        if zone.chars().all(|c| c.is_ascii_alphabetic()) {
            parse_timestamp(head)
        } else {
            None
        }
    })?;
    Some(parsed.and_utc().timestamp_millis())
}

/// Splits Bugzilla items into an open event plus one event per status change.
#[derive(Debug, Clone, Copy)]
pub struct BugzillaEvents<'a> {
    items: &'a [Value],
}

impl<'a> BugzillaEvents<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    /// Build the issue event table.
    ///
    /// Each issue yields `ISSUE_OPEN` at its creation date by its reporter,
    /// then `ISSUE_<status>` for every status change in its activity log.
    /// Issues without id, creation date or reporter are skipped, as are
    /// activity entries without a parseable date or author.
    pub fn eventize(&self) -> Result<DataFrame> {
        let mut rows = EventRows::default();
        let mut skipped = 0usize;

        for (idx, item) in self.items.iter().enumerate() {
            let bug = match BugItem::deserialize(item) {
                Ok(item) => item.data,
                Err(error) => {
                    warn!(item = idx, %error, "skipping malformed bugzilla item");
                    skipped += 1;
                    continue;
                }
            };
            let (Some(id), Some(opened), Some(reporter)) = (
                first_text(&bug.bug_id),
                first_text(&bug.creation_ts).and_then(parse_bug_date),
                first_text(&bug.reporter),
            ) else {
                warn!(item = idx, "skipping issue without id, creation date or reporter");
                skipped += 1;
                continue;
            };

            rows.push(id, EVENT_OPEN, opened, reporter);
            for change in &bug.activity {
                if change.what.as_deref() != Some(STATUS_FIELD) {
                    continue;
                }
                let (Some(status), Some(when), Some(who)) = (
                    change.added.as_deref(),
                    change.when.as_deref().and_then(parse_bug_date),
                    change.who.as_deref(),
                ) else {
                    warn!(item = idx, issue = id, "skipping incomplete status change");
                    continue;
                };
                rows.push(id, &format!("{ISSUE_EVENT_PREFIX}{status}"), when, who);
            }
        }

        let event_count = rows.len();
        let events = DataFrame::new(rows.into_columns()?)?;
        debug!(
            items = self.items.len(),
            events = event_count,
            skipped,
            "eventized bugzilla items"
        );
        Ok(events)
    }
}
