//! Elapsed time between two temporal columns.

use polars::prelude::{DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::debug;

use crate::enrichment::Enrichment;
use crate::error::{EnrichError, Result};

/// Name of the column added by [`TimeDifference::enrich`].
pub const TIME_DIFFERENCE_COLUMN: &str = "timedifference";

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_DAY: i128 = 86_400 * NANOS_PER_SECOND;

/// Adds a `timedifference` column holding `column1 - column2` in seconds.
#[derive(Debug, Clone, Copy)]
pub struct TimeDifference<'a> {
    data: &'a DataFrame,
}

impl<'a> TimeDifference<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }

    /// Compute `column1 - column2` for every row, in seconds.
    ///
    /// Both columns must already be `Date` or `Datetime` typed (see
    /// [`crate::format::format_dates`]). Positive values mean `column1` is
    /// later. A null in either column gives a null difference. If either
    /// column is absent the input is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`EnrichError::TypeMismatch`] when a column holds non-temporal values.
    pub fn enrich(&self, column1: &str, column2: &str) -> Result<DataFrame> {
        if !self.supports(&[column1, column2]) {
            return Ok(self.unchanged());
        }
        let left = epoch_nanos(self.data, column1)?;
        let right = epoch_nanos(self.data, column2)?;

        // Subtract at full precision, then scale once.
        let seconds: Vec<Option<f64>> = left
            .iter()
            .zip(&right)
            .map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some((a - b) as f64 / NANOS_PER_SECOND as f64),
                _ => None,
            })
            .collect();
        let nulls = seconds.iter().filter(|v| v.is_none()).count();

        let mut enriched = self.data.clone();
        enriched.with_column(Series::new(TIME_DIFFERENCE_COLUMN.into(), seconds))?;
        debug!(
            column1,
            column2,
            rows = enriched.height(),
            nulls,
            "computed time differences"
        );
        Ok(enriched)
    }
}

impl Enrichment for TimeDifference<'_> {
    fn name(&self) -> &'static str {
        "time_difference"
    }

    fn data(&self) -> &DataFrame {
        self.data
    }
}

/// Read a `Date` or `Datetime` column as nanoseconds since the epoch.
///
/// Every unit widens exactly into `i128` nanoseconds, so columns of
/// different units compare without rounding.
fn epoch_nanos(df: &DataFrame, name: &str) -> Result<Vec<Option<i128>>> {
    let column = df.column(name)?;
    let nanos_per_tick: i128 = match column.dtype() {
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 1,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1_000,
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1_000_000,
        DataType::Date => NANOS_PER_DAY,
        // An all-null column carries no type information to reject.
        DataType::Null => return Ok(vec![None; df.height()]),
        other => {
            return Err(EnrichError::TypeMismatch {
                column: name.to_string(),
                dtype: other.to_string(),
            });
        }
    };
    let physical = column.cast(&DataType::Int64)?;
    Ok(physical
        .i64()?
        .into_iter()
        .map(|value| value.map(|ticks| i128::from(ticks) * nanos_per_tick))
        .collect())
}
