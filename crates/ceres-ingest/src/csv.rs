//! Delimited-file tables.
//!
//! The first record of a file is always its header row. Column types are
//! inferred by Polars; enrichments never rely on a particular inferred type
//! for identity or comparison work.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use crate::error::{IngestError, Result};

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> IngestError {
    if source.kind() == ErrorKind::NotFound {
        IngestError::NotFound(path.to_path_buf())
    } else {
        IngestError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a CSV file with a header row into a `DataFrame`.
///
/// A zero-byte file is an empty table with no columns. A header-only file
/// yields the declared columns and no rows.
///
/// # Errors
///
/// Returns [`IngestError::NotFound`] when the file does not exist, and a
/// Polars error when the content cannot be parsed.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;
    if metadata.len() == 0 {
        debug!(path = %path.display(), "empty csv file, returning empty table");
        return Ok(DataFrame::empty());
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv table"
    );
    Ok(df)
}

/// Write a `DataFrame` to `path` as CSV with a header row.
pub fn write_csv_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| io_error(path, source))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        "wrote csv table"
    );
    Ok(())
}
