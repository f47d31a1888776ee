//! Splitting commits with two distinct contributors.
//!
//! When the author and committer of a commit differ, both people took part
//! in it. This enrichment appends a copy of every such row with the first
//! role column overwritten by the second, so that counting contributions by
//! the first column credits both people.

use ceres_common::column_texts;
use polars::prelude::{BooleanChunked, DataFrame, DataType, NewChunkedArray};
use tracing::debug;

use crate::enrichment::Enrichment;
use crate::error::{EnrichError, Result};

/// Duplicates rows whose two role columns disagree.
#[derive(Debug, Clone, Copy)]
pub struct PairProgramming<'a> {
    data: &'a DataFrame,
}

impl<'a> PairProgramming<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }

    /// Append one derived row per row where `column1` differs from `column2`.
    ///
    /// Original rows keep their positions and values. Each derived row is a
    /// copy of its source with `column1` set to the source's `column2` value,
    /// appended in source order. If either column is absent the input is
    /// returned unchanged.
    ///
    /// Cells are compared by their textual rendering. Two nulls are equal;
    /// a null and a value are not.
    ///
    /// The copied `column2` values must be representable in `column1`'s
    /// type; an all-null `column1` is first widened to `column2`'s type.
    ///
    /// Applying this twice to the same column pair duplicates the still
    /// differing rows again, so callers apply it once per pair.
    ///
    /// # Errors
    ///
    /// [`EnrichError::IncompatibleColumns`] when a differing `column2` value
    /// cannot be stored in `column1`.
    pub fn enrich(&self, column1: &str, column2: &str) -> Result<DataFrame> {
        if !self.supports(&[column1, column2]) {
            return Ok(self.unchanged());
        }
        let data = self.data;
        let left = column_texts(data.column(column1)?);
        let right = column_texts(data.column(column2)?);

        let mask: Vec<bool> = left
            .iter()
            .zip(&right)
            .map(|(a, b)| values_differ(a.as_deref(), b.as_deref()))
            .collect();
        let pair_count = mask.iter().filter(|differs| **differs).count();
        if pair_count == 0 {
            debug!(column1, column2, rows = data.height(), "no pair commits found");
            return Ok(self.unchanged());
        }

        // An all-null first column takes the second column's type.
        let mut base = data.clone();
        if base.column(column1)?.dtype() == &DataType::Null {
            let widened = base
                .column(column1)?
                .cast(data.column(column2)?.dtype())?;
            base.with_column(widened)?;
        }
        let target_dtype = base.column(column1)?.dtype().clone();

        let mask = BooleanChunked::from_slice("pair".into(), &mask);
        let mut pairs = base.filter(&mask)?;
        let replacement = pairs
            .column(column2)?
            .clone()
            .with_name(column1.into())
            .strict_cast(&target_dtype)
            .map_err(|_| EnrichError::IncompatibleColumns {
                column1: column1.to_string(),
                column2: column2.to_string(),
                dtype: target_dtype.to_string(),
            })?;
        pairs.with_column(replacement)?;

        let mut enriched = base;
        enriched.vstack_mut(&pairs)?;
        debug!(
            column1,
            column2,
            rows_in = data.height(),
            rows_out = enriched.height(),
            "appended pair commits"
        );
        Ok(enriched)
    }
}

impl Enrichment for PairProgramming<'_> {
    fn name(&self) -> &'static str {
        "pair_programming"
    }

    fn data(&self) -> &DataFrame {
        self.data
    }
}

fn values_differ(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (None, None) => false,
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}
