//! Identifier mapping tables shared by both rewrite strategies.

use std::collections::HashMap;

/// A table-name mapping and a column-name mapping, case-insensitive on the
/// original side.
///
/// Keys are upper-cased at construction; values keep the caller's casing.
/// If the caller supplies duplicates differing only in case, the last one
/// wins.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMapping {
    tables: HashMap<String, String>,
    columns: HashMap<String, String>,
}

impl IdentifierMapping {
    pub fn new<T, C>(tables: T, columns: C) -> Self
    where
        T: IntoIterator<Item = (String, String)>,
        C: IntoIterator<Item = (String, String)>,
    {
        Self {
            tables: tables
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
            columns: columns
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
        }
    }

    /// Look up the replacement for a table name (case-insensitive).
    pub fn table(&self, name: &str) -> Option<&str> {
        self.tables.get(&name.to_uppercase()).map(String::as_str)
    }

    /// Look up the replacement for a column name (case-insensitive).
    pub fn column(&self, name: &str) -> Option<&str> {
        self.columns.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.columns.is_empty()
    }

    /// Table entries sorted by original-name length descending, so a longer
    /// identifier is substituted before any shorter prefix of it.
    pub fn tables_by_length(&self) -> Vec<(&str, &str)> {
        by_length_desc(&self.tables)
    }

    /// Column entries under the same length-descending ordering.
    pub fn columns_by_length(&self) -> Vec<(&str, &str)> {
        by_length_desc(&self.columns)
    }
}

fn by_length_desc(map: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    // Tie-break on the name itself so the ordering is deterministic.
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
    entries
}
