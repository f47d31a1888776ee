//! Sequencing enrichments over one commit table.
//!
//! Steps run in a fixed order, each consuming the previous step's output:
//! fill-missing, filter, format-dates, pair-programming, time-difference,
//! uuid, file-type. Steps without configuration are skipped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use ceres_enrich::{
    FileType, FilterRows, PairProgramming, TimeDifference, UuidEnrichment, UuidMap,
    fill_missing_fields, format_dates,
};

/// Identity resolution settings.
#[derive(Debug, Clone)]
pub struct IdentityStep {
    pub map_path: PathBuf,
    pub keys: Vec<String>,
}

/// Which enrichments to apply and with which columns.
#[derive(Debug, Clone, Default)]
pub struct EnrichPlan {
    pub fill_missing: Vec<String>,
    /// `(column, value)` pairs; rows matching any of them are dropped.
    pub filters: Vec<(String, String)>,
    pub date_columns: Vec<String>,
    pub pair_programming: Vec<(String, String)>,
    pub time_difference: Option<(String, String)>,
    pub identities: Option<IdentityStep>,
    pub file_type: Option<String>,
}

/// Row and column counts around one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSummary {
    pub step: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns: usize,
}

struct StepRunner {
    table: DataFrame,
    summaries: Vec<StepSummary>,
}

impl StepRunner {
    fn apply<F>(&mut self, step: String, enrich: F) -> Result<()>
    where
        F: FnOnce(&DataFrame) -> Result<DataFrame>,
    {
        let span = info_span!("step", step = %step);
        let _guard = span.enter();
        let start = Instant::now();
        let rows_in = self.table.height();
        let next = enrich(&self.table)?;
        info!(
            rows_in,
            rows_out = next.height(),
            columns = next.width(),
            duration_ms = start.elapsed().as_millis(),
            "step complete"
        );
        self.summaries.push(StepSummary {
            step,
            rows_in,
            rows_out: next.height(),
            columns: next.width(),
        });
        self.table = next;
        Ok(())
    }
}

/// Apply every configured step of `plan` to `table`.
///
/// The identity map, if any, is loaded before the first step runs so that a
/// bad map file fails the run without partial work.
pub fn run_plan(table: DataFrame, plan: &EnrichPlan) -> Result<(DataFrame, Vec<StepSummary>)> {
    let identity_map = match &plan.identities {
        Some(identities) => Some(Arc::new(
            UuidMap::load(&identities.map_path).with_context(|| {
                format!("load identity map {}", identities.map_path.display())
            })?,
        )),
        None => None,
    };

    let mut runner = StepRunner {
        table,
        summaries: Vec::new(),
    };

    if !plan.fill_missing.is_empty() {
        runner.apply("fill-missing".to_string(), |df| {
            fill_missing_fields(df, &plan.fill_missing).context("fill missing fields")
        })?;
    }
    for (column, value) in &plan.filters {
        runner.apply(format!("filter {column}={value}"), |df| {
            FilterRows::new(df)
                .filter(std::slice::from_ref(column), value)
                .with_context(|| format!("filter {column}"))
        })?;
    }
    if !plan.date_columns.is_empty() {
        runner.apply("format-dates".to_string(), |df| {
            format_dates(df, &plan.date_columns).context("format dates")
        })?;
    }
    for (column1, column2) in &plan.pair_programming {
        runner.apply(format!("pair-programming {column1},{column2}"), |df| {
            PairProgramming::new(df)
                .enrich(column1, column2)
                .with_context(|| format!("pair programming on {column1},{column2}"))
        })?;
    }
    if let Some((column1, column2)) = &plan.time_difference {
        runner.apply(format!("time-difference {column1},{column2}"), |df| {
            TimeDifference::new(df)
                .enrich(column1, column2)
                .with_context(|| format!("time difference on {column1},{column2}"))
        })?;
    }
    if let (Some(identities), Some(map)) = (&plan.identities, identity_map) {
        runner.apply(format!("uuid {}", identities.keys.join(",")), |df| {
            UuidEnrichment::with_map(df, map)
                .enrich(&identities.keys)
                .context("resolve identities")
        })?;
    }
    if let Some(column) = &plan.file_type {
        runner.apply(format!("file-type {column}"), |df| {
            FileType::new(df)
                .enrich(column)
                .with_context(|| format!("file type on {column}"))
        })?;
    }

    Ok((runner.table, runner.summaries))
}

/// Parse `COLUMN1,COLUMN2` into two non-empty column names.
pub fn parse_column_pair(value: &str) -> Result<(String, String), String> {
    let (first, second) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN1,COLUMN2, got `{value}`"))?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() || second.contains(',') {
        return Err(format!("expected COLUMN1,COLUMN2, got `{value}`"));
    }
    Ok((first.to_string(), second.to_string()))
}

/// Parse `COLUMN=VALUE`. The value may be empty or contain `=`.
pub fn parse_filter(value: &str) -> Result<(String, String), String> {
    let (column, filter_value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got `{value}`"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("expected COLUMN=VALUE, got `{value}`"));
    }
    Ok((column.to_string(), filter_value.to_string()))
}
