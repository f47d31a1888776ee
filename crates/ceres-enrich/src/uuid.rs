//! Identity resolution against a precomputed identity map.
//!
//! The identity map is a table with one canonical identifier per identity
//! (for example a name and email pair). It is loaded once and shared
//! read-only between enrichments through an `Arc`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ceres_common::{column_values, has_column, missing_columns};
use ceres_ingest::read_csv_table;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::{debug, info};

use crate::enrichment::Enrichment;
use crate::error::{EnrichError, KeySide, Result};

/// Identifier column expected in the identity map and added to enriched tables.
pub const UUID_COLUMN: &str = "uuid";

/// Composite identity key, one rendered value per key column.
pub type IdentityKey = Vec<String>;

/// Read-only identity map loaded from a side file.
#[derive(Debug, Clone)]
pub struct UuidMap {
    table: DataFrame,
}

impl UuidMap {
    /// Load an identity map from a CSV file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or has no `uuid` column.
    pub fn load(path: &Path) -> Result<Self> {
        let table = read_csv_table(path)?;
        let map = Self::from_table(table)?;
        info!(
            path = %path.display(),
            identities = map.len(),
            "loaded identity map"
        );
        Ok(map)
    }

    /// Wrap an already loaded table as an identity map.
    pub fn from_table(table: DataFrame) -> Result<Self> {
        if !has_column(&table, UUID_COLUMN) {
            return Err(EnrichError::MissingIdentifierColumn {
                column: UUID_COLUMN.to_string(),
            });
        }
        Ok(Self { table })
    }

    /// Number of rows in the map.
    pub fn len(&self) -> usize {
        self.table.height()
    }

    pub fn is_empty(&self) -> bool {
        self.table.height() == 0
    }

    /// Build a lookup from composite key to identifier for `keys`.
    ///
    /// Map rows with a null key component or a null identifier are skipped.
    /// Repeated keys are accepted when they carry the same identifier.
    ///
    /// # Errors
    ///
    /// Fails if a key column is not in the map, or if one key is assigned
    /// two different identifiers.
    pub fn index<S: AsRef<str>>(&self, keys: &[S]) -> Result<HashMap<IdentityKey, String>> {
        if let Some(column) = missing_columns(&self.table, keys).into_iter().next() {
            return Err(EnrichError::MissingKeyColumn {
                column,
                side: KeySide::IdentityMap,
            });
        }
        let key_columns = key_values(&self.table, keys);
        let uuids = column_values(&self.table, UUID_COLUMN).unwrap_or_default();

        let mut index: HashMap<IdentityKey, String> = HashMap::with_capacity(uuids.len());
        let mut skipped = 0usize;
        for (idx, uuid) in uuids.into_iter().enumerate() {
            let (Some(key), Some(uuid)) = (row_key(&key_columns, idx), uuid) else {
                skipped += 1;
                continue;
            };
            match index.get(&key) {
                Some(existing) if *existing != uuid => {
                    return Err(EnrichError::ConflictingIdentity {
                        key: key.join(", "),
                        first: existing.clone(),
                        second: uuid,
                    });
                }
                Some(_) => {}
                None => {
                    index.insert(key, uuid);
                }
            }
        }
        debug!(identities = index.len(), skipped, "indexed identity map");
        Ok(index)
    }
}

/// Attaches a canonical `uuid` to every row by a left join on key columns.
#[derive(Debug, Clone)]
pub struct UuidEnrichment<'a> {
    data: &'a DataFrame,
    map: Arc<UuidMap>,
}

impl<'a> UuidEnrichment<'a> {
    /// Load the identity map at `file_path` and prepare to enrich `data`.
    ///
    /// # Errors
    ///
    /// Fails if the identity map is unreadable or malformed.
    pub fn new(data: &'a DataFrame, file_path: &Path) -> Result<Self> {
        let map = UuidMap::load(file_path)?;
        Ok(Self::with_map(data, Arc::new(map)))
    }

    /// Reuse an identity map that is already loaded.
    pub fn with_map(data: &'a DataFrame, map: Arc<UuidMap>) -> Self {
        Self { data, map }
    }

    /// Left-join the table against the identity map on `keys`.
    ///
    /// Every input row appears exactly once and in its original position,
    /// with a `uuid` column appended. Rows whose key is not in the map, or
    /// that have a null key component, get a null `uuid`. An empty input
    /// table is returned as is.
    ///
    /// # Errors
    ///
    /// Fails if `keys` is empty, a key column is missing on either side, the
    /// table already has a `uuid` column, or the map is inconsistent for
    /// these keys.
    pub fn enrich<S: AsRef<str>>(&self, keys: &[S]) -> Result<DataFrame> {
        if self.data.height() == 0 {
            debug!("empty input table, nothing to resolve");
            return Ok(self.unchanged());
        }
        if keys.is_empty() {
            return Err(EnrichError::NoKeyColumns);
        }
        if let Some(column) = missing_columns(self.data, keys).into_iter().next() {
            return Err(EnrichError::MissingKeyColumn {
                column,
                side: KeySide::Table,
            });
        }
        if has_column(self.data, UUID_COLUMN) {
            return Err(EnrichError::ColumnExists {
                column: UUID_COLUMN.to_string(),
            });
        }

        let index = self.map.index(keys)?;
        let key_columns = key_values(self.data, keys);
        let uuids: Vec<Option<String>> = (0..self.data.height())
            .map(|idx| row_key(&key_columns, idx).and_then(|key| index.get(&key).cloned()))
            .collect();
        let unresolved = uuids.iter().filter(|uuid| uuid.is_none()).count();

        let mut enriched = self.data.clone();
        enriched.with_column(Series::new(UUID_COLUMN.into(), uuids))?;
        debug!(
            rows = enriched.height(),
            unresolved,
            "resolved identities"
        );
        Ok(enriched)
    }
}

impl Enrichment for UuidEnrichment<'_> {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn data(&self) -> &DataFrame {
        self.data
    }
}

fn key_values<S: AsRef<str>>(df: &DataFrame, keys: &[S]) -> Vec<Vec<Option<String>>> {
    keys.iter()
        .map(|key| column_values(df, key.as_ref()).unwrap_or_default())
        .collect()
}

fn row_key(key_columns: &[Vec<Option<String>>], idx: usize) -> Option<IdentityKey> {
    key_columns
        .iter()
        .map(|values| values.get(idx).cloned().flatten())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::IntoColumn;

    fn identity_map() -> UuidMap {
        let table = DataFrame::new(vec![
            Series::new("name".into(), vec!["pepe", "pepe", "ana"]).into_column(),
            Series::new("email".into(), vec!["p@x.org", "p@x.org", "a@x.org"]).into_column(),
            Series::new(UUID_COLUMN.into(), vec!["u1", "u1", "u2"]).into_column(),
        ])
        .unwrap();
        UuidMap::from_table(table).unwrap()
    }

    #[test]
    fn map_requires_identifier_column() {
        let table = DataFrame::new(vec![
            Series::new("name".into(), vec!["pepe"]).into_column(),
        ])
        .unwrap();

        assert!(matches!(
            UuidMap::from_table(table),
            Err(EnrichError::MissingIdentifierColumn { .. })
        ));
    }

    #[test]
    fn index_accepts_consistent_duplicates() {
        let index = identity_map().index(&["name", "email"]).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get(&vec!["pepe".to_string(), "p@x.org".to_string()]),
            Some(&"u1".to_string())
        );
    }

    #[test]
    fn index_rejects_conflicting_identifiers() {
        let table = DataFrame::new(vec![
            Series::new("name".into(), vec!["pepe", "pepe"]).into_column(),
            Series::new(UUID_COLUMN.into(), vec!["u1", "u9"]).into_column(),
        ])
        .unwrap();
        let map = UuidMap::from_table(table).unwrap();

        assert!(matches!(
            map.index(&["name"]),
            Err(EnrichError::ConflictingIdentity { .. })
        ));
    }

    #[test]
    fn index_rejects_unknown_key_column() {
        let result = identity_map().index(&["username"]);

        assert!(matches!(
            result,
            Err(EnrichError::MissingKeyColumn {
                side: KeySide::IdentityMap,
                ..
            })
        ));
    }

    #[test]
    fn null_key_components_stay_unresolved() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec![Some("pepe"), Some("ana")]).into_column(),
            Series::new("email".into(), vec![Some("p@x.org"), None]).into_column(),
        ])
        .unwrap();

        let enriched = UuidEnrichment::with_map(&df, Arc::new(identity_map()))
            .enrich(&["name", "email"])
            .unwrap();
        let uuid = enriched.column(UUID_COLUMN).unwrap().str().unwrap();

        assert_eq!(uuid.get(0), Some("u1"));
        assert_eq!(uuid.get(1), None);
    }

    #[test]
    fn existing_uuid_column_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec!["pepe"]).into_column(),
            Series::new(UUID_COLUMN.into(), vec!["old"]).into_column(),
        ])
        .unwrap();

        let result = UuidEnrichment::with_map(&df, Arc::new(identity_map())).enrich(&["name"]);

        assert!(matches!(result, Err(EnrichError::ColumnExists { .. })));
    }

    #[test]
    fn empty_key_list_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec!["pepe"]).into_column(),
        ])
        .unwrap();
        let keys: [&str; 0] = [];

        let result = UuidEnrichment::with_map(&df, Arc::new(identity_map())).enrich(&keys);

        assert!(matches!(result, Err(EnrichError::NoKeyColumns)));
    }
}
