//! Identifier-aware SQL rewriting

mod mapping;
mod structural;
mod textual;

pub use mapping::IdentifierMapping;
pub use structural::extract_tables_and_columns;

use crate::error::SqlMaskError;

/// Which rewrite strategy the batch driver applies to each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStrategy {
    /// Parse the statement, rewrite identifier nodes, re-serialize.
    #[default]
    Structural,
    /// Regex word-boundary substitution directly on the raw text.
    Textual,
}

/// Facade over both rewrite strategies for a single identifier mapping.
#[derive(Debug, Clone, Default)]
pub struct SqlMapper {
    mapping: IdentifierMapping,
}

impl SqlMapper {
    pub fn new(mapping: IdentifierMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &IdentifierMapping {
        &self.mapping
    }

    /// Structural rewrite. Fails if the statement does not parse under the
    /// SQLite grammar; the caller decides whether to fall back.
    pub fn map_query(&self, sql: &str, pretty: bool) -> Result<String, SqlMaskError> {
        structural::map_statement(sql, &self.mapping, pretty)
    }

    /// Textual rewrite. Never fails, but has no structural awareness.
    pub fn map_query_textual(&self, sql: &str) -> String {
        textual::map_statement(sql, &self.mapping)
    }

    pub fn map_query_with(
        &self,
        sql: &str,
        strategy: MapStrategy,
        pretty: bool,
    ) -> Result<String, SqlMaskError> {
        match strategy {
            MapStrategy::Structural => self.map_query(sql, pretty),
            MapStrategy::Textual => Ok(self.map_query_textual(sql)),
        }
    }

    /// Structural rewrite with the textual strategy as fallback on parse
    /// failure.
    pub fn map_query_or_fallback(&self, sql: &str, pretty: bool) -> String {
        self.map_query(sql, pretty)
            .unwrap_or_else(|_| self.map_query_textual(sql))
    }
}
