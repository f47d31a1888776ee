//! Source-code classification of file paths.

use std::path::Path;

use ceres_common::column_texts;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::enrichment::Enrichment;
use crate::error::Result;

/// Name of the column added by [`FileType::enrich`].
pub const FILE_TYPE_COLUMN: &str = "filetype";

/// Extensions counted as source code, lowercase.
const CODE_EXTENSIONS: &[&str] = &[
    "c", "h", "cc", "cpp", "cxx", "c++", "cp", "hh", "hpp", "hxx", "py", "js", "jsx", "ts", "tsx",
    "java", "rs", "go", "rb", "php", "cs", "scala", "kt", "swift", "m", "mm", "sh", "pl", "pm",
    "lua", "erl", "ex", "exs", "hs", "clj", "groovy", "r", "sql", "vb",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Code,
    Other,
}

impl FileKind {
    /// Classify a path by its extension.
    ///
    /// ```
    /// use ceres_enrich::file_type::FileKind;
    ///
    /// assert_eq!(FileKind::of_path("src/main.rs"), FileKind::Code);
    /// assert_eq!(FileKind::of_path("lib/Parser.JAVA"), FileKind::Code);
    /// assert_eq!(FileKind::of_path("README.md"), FileKind::Other);
    /// assert_eq!(FileKind::of_path("Makefile"), FileKind::Other);
    /// ```
    pub fn of_path(path: &str) -> Self {
        let extension = Path::new(path.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension {
            Some(ext) if CODE_EXTENSIONS.contains(&ext.as_str()) => FileKind::Code,
            _ => FileKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Code => "Code",
            FileKind::Other => "Other",
        }
    }
}

/// Adds a `filetype` column classifying a path column as code or other.
#[derive(Debug, Clone, Copy)]
pub struct FileType<'a> {
    data: &'a DataFrame,
}

impl<'a> FileType<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }

    /// Classify every path in `column`. Null paths are `Other`.
    ///
    /// An absent column leaves the table unchanged.
    pub fn enrich(&self, column: &str) -> Result<DataFrame> {
        if !self.supports(&[column]) {
            return Ok(self.unchanged());
        }
        let paths = column_texts(self.data.column(column)?);
        let kinds: Vec<&str> = paths
            .iter()
            .map(|path| {
                path.as_deref()
                    .map_or(FileKind::Other, FileKind::of_path)
                    .as_str()
            })
            .collect();
        let code_files = kinds.iter().filter(|kind| **kind == "Code").count();

        let mut enriched = self.data.clone();
        enriched.with_column(Series::new(FILE_TYPE_COLUMN.into(), kinds))?;
        debug!(column, rows = enriched.height(), code_files, "classified file types");
        Ok(enriched)
    }
}

impl Enrichment for FileType<'_> {
    fn name(&self) -> &'static str {
        "file_type"
    }

    fn data(&self) -> &DataFrame {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    #[test]
    fn classifies_paths() {
        let df = DataFrame::new(vec![
            Series::new(
                "filepath".into(),
                vec![Some("src/lib.rs"), Some("docs/index.html"), None, Some("a/b.c")],
            )
            .into_column(),
        ])
        .unwrap();

        let enriched = FileType::new(&df).enrich("filepath").unwrap();
        let kinds = enriched.column(FILE_TYPE_COLUMN).unwrap().str().unwrap();

        assert_eq!(kinds.get(0), Some("Code"));
        assert_eq!(kinds.get(1), Some("Other"));
        assert_eq!(kinds.get(2), Some("Other"));
        assert_eq!(kinds.get(3), Some("Code"));
    }

    #[test]
    fn absent_column_is_noop() {
        let df = DataFrame::new(vec![
            Series::new("owner".into(), vec!["pepe"]).into_column(),
        ])
        .unwrap();

        let enriched = FileType::new(&df).enrich("filepath").unwrap();

        assert!(enriched.equals_missing(&df));
    }
}
