//! Schema anonymization: replace real table and column names with short
//! synthetic ones (`t1`, `t2`, … and `c1`, `c2`, …).

use indexmap::IndexMap;
use regex::{NoExpand, Regex};
use sqlparser::ast::{CreateTable, Statement};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::error::SqlMaskError;

/// Result of anonymizing one schema: the rewritten text plus the
/// discovery-order name mappings.
#[derive(Debug, Clone)]
pub struct AnonymizedSchema {
    /// The schema text with every discovered name substituted.
    pub schema: String,
    /// Original table name -> `t<N>`, in first-encounter order.
    pub tables: IndexMap<String, String>,
    /// Original column name -> `c<N>`, one shared counter across all tables.
    pub columns: IndexMap<String, String>,
}

impl AnonymizedSchema {
    /// Single merged view of both mappings; table entries and column entries
    /// are distinguishable by their `t`/`c` value prefix.
    pub fn merged(&self) -> IndexMap<String, String> {
        let mut merged = self.tables.clone();
        merged.extend(self.columns.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

/// Discover every table and column name in `schema_sql` and rewrite the text.
///
/// Only CREATE TABLE statements are scanned; indexes, triggers, and views are
/// ignored. Names are deduplicated by exact string match (schema identifiers
/// are assumed to already be in canonical case), counters are locals of this
/// call, and discovery order is a single left-to-right scan of the statements
/// with column definitions in declared order.
pub fn anonymize_schema(schema_sql: &str) -> Result<AnonymizedSchema, SqlMaskError> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, schema_sql)?;

    let mut tables: IndexMap<String, String> = IndexMap::new();
    let mut columns: IndexMap<String, String> = IndexMap::new();
    let mut table_counter = 1usize;
    let mut column_counter = 1usize;

    for statement in &statements {
        let Statement::CreateTable(create) = statement else {
            continue;
        };

        let table_name = table_name_of(create);
        if !table_name.is_empty() && !tables.contains_key(&table_name) {
            tables.insert(table_name, format!("t{table_counter}"));
            table_counter += 1;
        }

        for column in &create.columns {
            let column_name = column.name.value.clone();
            if !column_name.is_empty() && !columns.contains_key(&column_name) {
                columns.insert(column_name, format!("c{column_counter}"));
                column_counter += 1;
            }
        }
    }

    // Substitute on the original text: tables first, then columns, longest
    // name first within each, case-sensitive whole-token matches.
    let mut rewritten = schema_sql.to_string();
    for (original, replacement) in by_length_desc(&tables) {
        rewritten = substitute_exact(&rewritten, original, replacement);
    }
    for (original, replacement) in by_length_desc(&columns) {
        rewritten = substitute_exact(&rewritten, original, replacement);
    }

    Ok(AnonymizedSchema {
        schema: rewritten,
        tables,
        columns,
    })
}

/// Extract the table's own name with a three-tier precedence:
/// 1. the final identifier part of the structural object name,
/// 2. the whole rendered object name,
/// 3. the first whitespace-delimited token of the rendered name.
fn table_name_of(create: &CreateTable) -> String {
    if let Some(ident) = create.name.0.last() {
        if !ident.value.is_empty() {
            return ident.value.clone();
        }
    }
    let rendered = create.name.to_string();
    match rendered.split_whitespace().next() {
        Some(token) => token.to_string(),
        None => rendered,
    }
}

fn by_length_desc(map: &IndexMap<String, String>) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = map
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
    entries
}

fn substitute_exact(text: &str, original: &str, replacement: &str) -> String {
    let pattern = format!(r"\b{}\b", regex::escape(original));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, NoExpand(replacement)).into_owned(),
        Err(_) => text.to_string(),
    }
}
