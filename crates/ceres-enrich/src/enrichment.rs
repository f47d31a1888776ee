//! The contract shared by every enrichment.
//!
//! An enrichment borrows the table it works on and hands back a new owned
//! table; the borrowed input is never modified. Each one checks the columns
//! it needs before doing anything and, where its contract says so, returns
//! the input unchanged when they are missing.

use ceres_common::missing_columns;
use polars::prelude::DataFrame;
use tracing::debug;

pub trait Enrichment {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// The table this enrichment reads from.
    fn data(&self) -> &DataFrame;

    /// Returns true if every column in `columns` is declared by the table.
    ///
    /// Logs the missing names when the check fails.
    fn supports(&self, columns: &[&str]) -> bool {
        let missing = missing_columns(self.data(), columns);
        if missing.is_empty() {
            return true;
        }
        debug!(
            enrichment = self.name(),
            ?missing,
            "required columns absent, returning input unchanged"
        );
        false
    }

    /// A copy of the input table, used for every no-op outcome.
    fn unchanged(&self) -> DataFrame {
        self.data().clone()
    }
}
