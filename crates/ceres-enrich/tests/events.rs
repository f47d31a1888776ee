use std::fs;

use ceres_enrich::events::{EVENT_ID, EVENT_TYPE};
use ceres_enrich::{EventSource, Granularity, eventize};
use ceres_ingest::read_json_items;

fn load(contents: &str) -> Vec<serde_json::Value> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    fs::write(&path, contents).unwrap();
    read_json_items(&path).unwrap()
}

#[test]
fn gerrit_lines_file_eventizes() {
    let items = load(concat!(
        r#"{"data": {"number": 7, "createdOn": 1420070400, "lastUpdated": 1420074000, "#,
        r#""status": "MERGED", "owner": {"username": "pepe"}}}"#,
        "\n",
        r#"{"data": {"number": 8, "createdOn": 1420070400, "status": "NEW", "#,
        r#""owner": {"username": "ana"}}}"#,
        "\n",
    ));

    let events = eventize(EventSource::Gerrit, &items, Granularity::Commit).unwrap();

    assert_eq!(events.height(), 3);
    let ids = events.column(EVENT_ID).unwrap().str().unwrap();
    assert_eq!(ids.get(2), Some("8"));
}

#[test]
fn bugzilla_array_file_eventizes() {
    let items = load(
        r#"[{"data": {
            "bug_id": [{"__text__": "12"}],
            "creation_ts": [{"__text__": "2013-06-25 11:55:46 +0200"}],
            "reporter": [{"__text__": "pepe@x.org"}],
            "activity": [{"What": "Status", "Added": "CLOSED",
                          "When": "2013-07-01 08:00:00", "Who": "ana@x.org"}]
        }}]"#,
    );

    let events = eventize(EventSource::Bugzilla, &items, Granularity::Commit).unwrap();

    let kinds = events.column(EVENT_TYPE).unwrap().str().unwrap();
    assert_eq!(kinds.get(0), Some("ISSUE_OPEN"));
    assert_eq!(kinds.get(1), Some("ISSUE_CLOSED"));
}

#[test]
fn email_file_granularity_is_rejected() {
    let items = load(r#"[{"data": {"Message-ID": "<1@x.org>", "From": "pepe"}}]"#);

    let error = eventize(EventSource::Email, &items, Granularity::File).unwrap_err();

    assert!(error.to_string().contains("email"));
}
