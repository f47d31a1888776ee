use std::path::PathBuf;

use ceres_cli::pipeline::StepSummary;
use polars::prelude::DataFrame;

#[derive(Debug)]
pub struct EnrichResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub rows_in: usize,
    pub steps: Vec<StepSummary>,
    pub table: DataFrame,
    pub preview: usize,
}

#[derive(Debug)]
pub struct EventizeResult {
    pub items: usize,
    pub output: Option<PathBuf>,
    pub table: DataFrame,
    pub preview: usize,
}
