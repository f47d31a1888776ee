use std::fmt;

use ceres_ingest::IngestError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Which side of an identity join a key column was expected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySide {
    Table,
    IdentityMap,
}

impl fmt::Display for KeySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySide::Table => f.write_str("input table"),
            KeySide::IdentityMap => f.write_str("identity map"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("identity map has no `{column}` column")]
    MissingIdentifierColumn { column: String },
    #[error("key column `{column}` not found in {side}")]
    MissingKeyColumn { column: String, side: KeySide },
    #[error("no key columns given for identity resolution")]
    NoKeyColumns,
    #[error("identity map assigns both `{first}` and `{second}` to key ({key})")]
    ConflictingIdentity {
        key: String,
        first: String,
        second: String,
    },
    #[error("column `{column}` already exists in the input table")]
    ColumnExists { column: String },
    #[error("values of `{column2}` cannot be written into `{column1}` ({dtype})")]
    IncompatibleColumns {
        column1: String,
        column2: String,
        dtype: String,
    },
    #[error("column `{column}` has type {dtype}, expected a date or datetime")]
    TypeMismatch { column: String, dtype: String },
    #[error("{source_name} items only support commit granularity")]
    UnsupportedGranularity { source_name: String },
    #[error("column `{column}` row {row}: unrecognised date `{value}`")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, EnrichError>;
