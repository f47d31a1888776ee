//! Table ingestion for the ceres enrichment toolkit.
//!
//! Enrichments operate on in-memory Polars tables; this crate is the only
//! place that touches the filesystem to build or persist them.

pub mod csv;
pub mod error;
pub mod items;

pub use csv::{read_csv_table, write_csv_table};
pub use error::{IngestError, Result};
pub use items::read_json_items;
