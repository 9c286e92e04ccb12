//! Persisted per-database name mappings.
//!
//! The on-disk format is a JSON object keyed by database identifier, each
//! value holding a `mapping` object with `tables` and `columns` maps:
//!
//! ```json
//! { "175": { "mapping": { "tables": { "USERS": "t1" }, "columns": { "ID": "c1" } } } }
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SqlMaskError;
use crate::mapper::IdentifierMapping;
use crate::schema::AnonymizedSchema;

/// The table and column mappings recorded for one database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMappingRecord {
    pub tables: IndexMap<String, String>,
    pub columns: IndexMap<String, String>,
}

impl From<&AnonymizedSchema> for SchemaMappingRecord {
    fn from(anonymized: &AnonymizedSchema) -> Self {
        Self {
            tables: anonymized.tables.clone(),
            columns: anonymized.columns.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreEntry {
    mapping: SchemaMappingRecord,
}

/// All known per-database mappings, keyed by database identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingStore {
    entries: IndexMap<String, StoreEntry>,
}

impl MappingStore {
    pub fn load(path: &Path) -> Result<Self, SqlMaskError> {
        let text = fs::read_to_string(path).map_err(|source| SqlMaskError::StoreReadError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SqlMaskError::StoreFormatError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an existing store, or start an empty one if the file does not
    /// exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, SqlMaskError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SqlMaskError> {
        let text = serde_json::to_string_pretty(&self).map_err(|source| {
            SqlMaskError::StoreFormatError {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, text).map_err(|source| SqlMaskError::StoreWriteError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Record the mapping for a database, replacing any existing entry.
    pub fn insert(&mut self, database_id: impl Into<String>, record: SchemaMappingRecord) {
        self.entries
            .insert(database_id.into(), StoreEntry { mapping: record });
    }

    pub fn get(&self, database_id: &str) -> Option<&SchemaMappingRecord> {
        self.entries.get(database_id).map(|entry| &entry.mapping)
    }

    pub fn contains(&self, database_id: &str) -> bool {
        self.entries.contains_key(database_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the identifier mapping for a database; an unknown identifier
    /// yields an empty mapping, which degrades every rewrite to identity.
    pub fn mapping_for(&self, database_id: &str) -> IdentifierMapping {
        match self.get(database_id) {
            Some(record) => IdentifierMapping::new(
                record.tables.clone().into_iter(),
                record.columns.clone().into_iter(),
            ),
            None => IdentifierMapping::default(),
        }
    }
}
