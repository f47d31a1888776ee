use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
    #[error("invalid JSON in {} at line {line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
