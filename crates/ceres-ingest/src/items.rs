//! Raw JSON items as produced by repository retrieval tools.
//!
//! Two layouts are accepted: a single JSON array of items, or JSON lines
//! with one item per line. Blank lines are ignored in the latter.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::csv::io_error;
use crate::error::{IngestError, Result};

/// Load every item from a JSON array file or a JSON-lines file.
pub fn read_json_items(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path).map_err(|source| io_error(path, source))?;

    let items = if contents.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Value>>(&contents).map_err(|source| IngestError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?
    } else {
        let mut items = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let item = serde_json::from_str(line).map_err(|source| IngestError::Json {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
            items.push(item);
        }
        items
    };

    debug!(path = %path.display(), items = items.len(), "read json items");
    Ok(items)
}
