//! Gerrit changeset items.

use polars::prelude::DataFrame;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{EventRows, epoch_seconds_millis, scalar_text};
use crate::error::Result;

pub const EVENT_OPEN: &str = "CHANGESET_SENT";
pub const CHANGESET_EVENT_PREFIX: &str = "CHANGESET_";

/// Final states that produce a closing event.
const CLOSING_STATUSES: &[&str] = &["MERGED", "ABANDONED"];

#[derive(Debug, Deserialize)]
struct ChangesetItem {
    data: ChangesetData,
}

#[derive(Debug, Deserialize)]
struct ChangesetData {
    number: Option<Value>,
    #[serde(rename = "createdOn")]
    created_on: Option<Value>,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<Value>,
    status: Option<String>,
    owner: Option<Owner>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    username: Option<String>,
}

/// Splits Gerrit changesets into submission and closing events.
#[derive(Debug, Clone, Copy)]
pub struct GerritEvents<'a> {
    items: &'a [Value],
}

impl<'a> GerritEvents<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    /// Build the changeset event table.
    ///
    /// Each changeset yields `CHANGESET_SENT` at `createdOn`. Merged and
    /// abandoned changesets add `CHANGESET_MERGED` or `CHANGESET_ABANDONED`
    /// at `lastUpdated`. Both dates are epoch seconds. The owner of every
    /// event is the changeset owner's username.
    pub fn eventize(&self) -> Result<DataFrame> {
        let mut rows = EventRows::default();
        let mut skipped = 0usize;

        for (idx, item) in self.items.iter().enumerate() {
            let change = match ChangesetItem::deserialize(item) {
                Ok(item) => item.data,
                Err(error) => {
                    warn!(item = idx, %error, "skipping malformed gerrit item");
                    skipped += 1;
                    continue;
                }
            };
            let id = change.number.as_ref().and_then(scalar_text);
            let created = change.created_on.as_ref().and_then(epoch_seconds_millis);
            let owner = change.owner.and_then(|owner| owner.username);
            let (Some(id), Some(created), Some(owner)) = (id, created, owner) else {
                warn!(item = idx, "skipping changeset without number, creation date or owner");
                skipped += 1;
                continue;
            };

            rows.push(&id, EVENT_OPEN, created, &owner);
            let Some(status) = change
                .status
                .as_deref()
                .filter(|status| CLOSING_STATUSES.contains(status))
            else {
                continue;
            };
            match change.last_updated.as_ref().and_then(epoch_seconds_millis) {
                Some(closed) => rows.push(
                    &id,
                    &format!("{CHANGESET_EVENT_PREFIX}{status}"),
                    closed,
                    &owner,
                ),
                None => warn!(item = idx, changeset = %id, "closed changeset without update date"),
            }
        }

        let event_count = rows.len();
        let events = DataFrame::new(rows.into_columns()?)?;
        debug!(
            items = self.items.len(),
            events = event_count,
            skipped,
            "eventized gerrit items"
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EVENT_ID, EVENT_OWNER, EVENT_TYPE};
    use polars::prelude::{DataType, TimeUnit};
    use serde_json::json;

    fn changesets() -> Vec<Value> {
        vec![
            json!({"data": {
                "number": 101,
                "createdOn": 1_420_070_400,
                "lastUpdated": 1_420_074_000,
                "status": "MERGED",
                "owner": {"username": "pepe"}
            }}),
            json!({"data": {
                "number": "102",
                "createdOn": "1420070400",
                "lastUpdated": "1420156800",
                "status": "NEW",
                "owner": {"username": "ana"}
            }}),
            json!({"data": {
                "number": 103,
                "createdOn": 1_420_070_400,
                "lastUpdated": 1_420_080_000,
                "status": "ABANDONED",
                "owner": {"username": "luis"}
            }}),
        ]
    }

    #[test]
    fn sent_plus_closing_events() {
        let items = changesets();
        let events = GerritEvents::new(&items).eventize().unwrap();

        assert_eq!(events.height(), 5);
        let kinds = events.column(EVENT_TYPE).unwrap().str().unwrap();
        assert_eq!(kinds.get(0), Some(EVENT_OPEN));
        assert_eq!(kinds.get(1), Some("CHANGESET_MERGED"));
        assert_eq!(kinds.get(2), Some(EVENT_OPEN));
        assert_eq!(kinds.get(4), Some("CHANGESET_ABANDONED"));
        let ids = events.column(EVENT_ID).unwrap().str().unwrap();
        assert_eq!(ids.get(1), Some("101"));
        assert_eq!(ids.get(2), Some("102"));
        let owners = events.column(EVENT_OWNER).unwrap().str().unwrap();
        assert_eq!(owners.get(4), Some("luis"));
    }

    #[test]
    fn epoch_dates_become_utc_datetimes() {
        let items = changesets();
        let events = GerritEvents::new(&items).eventize().unwrap();

        let dates = events
            .column("date")
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let dates = dates.i64().unwrap();
        assert_eq!(dates.get(0), Some(1_420_070_400_000));
        assert_eq!(dates.get(1), Some(1_420_074_000_000));
        assert_eq!(
            events.column("date").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
    }

    #[test]
    fn changeset_without_owner_is_skipped() {
        let items = vec![json!({"data": {"number": 1, "createdOn": 0, "status": "NEW"}})];

        let events = GerritEvents::new(&items).eventize().unwrap();

        assert_eq!(events.height(), 0);
    }
}
