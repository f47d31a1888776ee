//! Commit table enrichment.
//!
//! Every enrichment borrows a Polars `DataFrame` and returns a new one with
//! derived rows or columns:
//!
//! - **pair_programming**: duplicate commits whose author and committer differ
//! - **time_difference**: elapsed seconds between two date columns
//! - **uuid**: canonical contributor identifiers from an identity map
//! - **file_type**: code / other classification of file paths
//!
//! Supporting modules prepare tables for them: **format** normalizes date
//! columns and declares missing fields, **filter** drops placeholder rows,
//! and **events** flattens raw git, Bugzilla, Gerrit and mailing list items
//! into event tables.

pub mod enrichment;
pub mod error;
pub mod events;
pub mod file_type;
pub mod filter;
pub mod format;
pub mod pair_programming;
pub mod time_difference;
pub mod uuid;

pub use enrichment::Enrichment;
pub use error::{EnrichError, KeySide, Result};
pub use events::{
    BugzillaEvents, EmailEvents, EventSource, GerritEvents, GitEvents, Granularity, eventize,
};
pub use file_type::{FILE_TYPE_COLUMN, FileKind, FileType};
pub use filter::FilterRows;
pub use format::{fill_missing_fields, format_dates, parse_timestamp};
pub use pair_programming::PairProgramming;
pub use time_difference::{TIME_DIFFERENCE_COLUMN, TimeDifference};
pub use uuid::{UUID_COLUMN, UuidEnrichment, UuidMap};
