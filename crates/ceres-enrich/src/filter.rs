//! Row filtering on placeholder values.

use ceres_common::column_values;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::debug;

use crate::error::Result;

/// Drops rows holding a given value in any of a set of columns.
#[derive(Debug, Clone, Copy)]
pub struct FilterRows<'a> {
    data: &'a DataFrame,
}

impl<'a> FilterRows<'a> {
    pub fn new(data: &'a DataFrame) -> Self {
        Self { data }
    }

    /// Remove every row where a listed column renders exactly as `value`.
    ///
    /// Absent columns are ignored. Nulls never match. Surviving rows keep
    /// their relative order.
    pub fn filter<S: AsRef<str>>(&self, columns: &[S], value: &str) -> Result<DataFrame> {
        let present: Vec<Vec<Option<String>>> = columns
            .iter()
            .filter_map(|name| column_values(self.data, name.as_ref()))
            .collect();
        if present.is_empty() {
            debug!("no filter columns present, returning input unchanged");
            return Ok(self.data.clone());
        }

        let keep: Vec<bool> = (0..self.data.height())
            .map(|idx| {
                !present
                    .iter()
                    .any(|values| values[idx].as_deref() == Some(value))
            })
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let filtered = self.data.filter(&mask)?;
        debug!(
            value,
            rows_in = self.data.height(),
            rows_out = filtered.height(),
            "filtered rows"
        );
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn events() -> DataFrame {
        DataFrame::new(vec![
            Series::new("filepath".into(), vec!["a.rs", "-", "b.py", "-"]).into_column(),
            Series::new("fileaction".into(), vec!["FILE_M", "FILE_A", "-", "FILE_D"]).into_column(),
            Series::new("owner".into(), vec!["w", "x", "y", "z"]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn drops_matching_rows() {
        let df = events();
        let filtered = FilterRows::new(&df).filter(&["filepath"], "-").unwrap();

        assert_eq!(filtered.height(), 2);
        let owner = filtered.column("owner").unwrap().str().unwrap();
        assert_eq!(owner.get(0), Some("w"));
        assert_eq!(owner.get(1), Some("y"));
    }

    #[test]
    fn any_listed_column_matches() {
        let df = events();
        let filtered = FilterRows::new(&df)
            .filter(&["filepath", "fileaction"], "-")
            .unwrap();

        assert_eq!(filtered.height(), 1);
    }

    #[test]
    fn absent_columns_are_noop() {
        let df = events();
        let filtered = FilterRows::new(&df).filter(&["missing"], "-").unwrap();

        assert!(filtered.equals_missing(&df));
    }
}
