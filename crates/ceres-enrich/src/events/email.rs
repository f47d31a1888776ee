//! Mailing list message items.

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::EventRows;
use crate::error::Result;
use crate::format::parse_timestamp;

pub const EVENT_SENT: &str = "EMAIL_SENT";

pub const EMAIL_SUBJECT: &str = "subject";
pub const EMAIL_BODY: &str = "body";

#[derive(Debug, Deserialize)]
struct MessageItem {
    data: MessageData,
}

#[derive(Debug, Deserialize)]
struct MessageData {
    #[serde(rename = "Message-ID")]
    message_id: Option<String>,
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "From")]
    from: Option<String>,
    #[serde(rename = "Subject")]
    subject: Option<String>,
    body: Option<Value>,
}

/// Turns mailing list messages into one `EMAIL_SENT` event each.
#[derive(Debug, Clone, Copy)]
pub struct EmailEvents<'a> {
    items: &'a [Value],
}

impl<'a> EmailEvents<'a> {
    pub fn new(items: &'a [Value]) -> Self {
        Self { items }
    }

    /// Build the message event table, with `subject` and `body` columns
    /// after the shared ones.
    ///
    /// A missing or unparseable `Date` falls back to the epoch
    /// (1970-01-01). The body is the plain-text part; messages without one
    /// get a null body. Messages without `Message-ID` or `From` are skipped.
    pub fn eventize(&self) -> Result<DataFrame> {
        let mut rows = EventRows::default();
        let mut subjects: Vec<Option<String>> = Vec::new();
        let mut bodies: Vec<Option<String>> = Vec::new();
        let mut skipped = 0usize;
        let mut undated = 0usize;

        for (idx, item) in self.items.iter().enumerate() {
            let message = match MessageItem::deserialize(item) {
                Ok(item) => item.data,
                Err(error) => {
                    warn!(item = idx, %error, "skipping malformed email item");
                    skipped += 1;
                    continue;
                }
            };
            let (Some(id), Some(from)) = (message.message_id.as_deref(), message.from.as_deref())
            else {
                warn!(item = idx, "skipping message without Message-ID or From");
                skipped += 1;
                continue;
            };
            let sent = match message.date.as_deref().and_then(parse_timestamp) {
                Some(sent) => sent.and_utc().timestamp_millis(),
                None => {
                    undated += 1;
                    0
                }
            };

            rows.push(id, EVENT_SENT, sent, from);
            subjects.push(message.subject);
            bodies.push(
                message
                    .body
                    .as_ref()
                    .and_then(|body| body.get("plain"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            );
        }

        let event_count = rows.len();
        let mut columns = rows.into_columns()?;
        columns.push(Series::new(EMAIL_SUBJECT.into(), subjects).into_column());
        columns.push(Series::new(EMAIL_BODY.into(), bodies).into_column());
        let events = DataFrame::new(columns)?;
        debug!(
            items = self.items.len(),
            events = event_count,
            skipped,
            undated,
            "eventized email items"
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EVENT_DATE, EVENT_OWNER, EVENT_TYPE};
    use polars::prelude::DataType;
    use serde_json::json;

    fn messages() -> Vec<Value> {
        vec![
            json!({"data": {
                "Message-ID": "<1@x.org>",
                "Date": "Tue, 1 Jul 2003 10:52:37 +0200",
                "From": "pepe <p@x.org>",
                "Subject": "Release plan",
                "body": {"plain": "Let's ship it."}
            }}),
            json!({"data": {
                "Message-ID": "<2@x.org>",
                "Date": "someday",
                "From": "ana <a@x.org>",
                "Subject": "Re: Release plan"
            }}),
        ]
    }

    #[test]
    fn one_event_per_message() {
        let items = messages();
        let events = EmailEvents::new(&items).eventize().unwrap();

        assert_eq!(events.height(), 2);
        assert_eq!(events.width(), 6);
        let kinds = events.column(EVENT_TYPE).unwrap().str().unwrap();
        assert_eq!(kinds.get(1), Some(EVENT_SENT));
        let owners = events.column(EVENT_OWNER).unwrap().str().unwrap();
        assert_eq!(owners.get(0), Some("pepe <p@x.org>"));
        let subjects = events.column(EMAIL_SUBJECT).unwrap().str().unwrap();
        assert_eq!(subjects.get(1), Some("Re: Release plan"));
        let bodies = events.column(EMAIL_BODY).unwrap().str().unwrap();
        assert_eq!(bodies.get(0), Some("Let's ship it."));
        assert_eq!(bodies.get(1), None);
    }

    #[test]
    fn unparseable_date_falls_back_to_epoch() {
        let items = messages();
        let events = EmailEvents::new(&items).eventize().unwrap();

        let dates = events
            .column(EVENT_DATE)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap();
        let dates = dates.i64().unwrap();
        assert_eq!(dates.get(0), Some(1_057_049_557_000));
        assert_eq!(dates.get(1), Some(0));
    }

    #[test]
    fn message_without_sender_is_skipped() {
        let items = vec![json!({"data": {"Message-ID": "<3@x.org>"}})];

        let events = EmailEvents::new(&items).eventize().unwrap();

        assert_eq!(events.height(), 0);
        assert_eq!(events.width(), 6);
    }
}
