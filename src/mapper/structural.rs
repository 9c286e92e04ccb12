//! Structural rewrite strategy: parse, walk the AST, re-serialize.
//!
//! Table references are rewritten through `visit_relations_mut`, column
//! references through `visit_expressions_mut`. The table pass runs over the
//! whole tree before the column pass; qualifier idents in compound column
//! references are separate nodes from relation names, so qualifier lookups
//! always see the original table name.

use std::collections::HashSet;
use std::ops::ControlFlow;

use sqlparser::ast::{
    visit_expressions, visit_expressions_mut, visit_relations, visit_relations_mut, Expr, Ident,
    ObjectName, Statement,
};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::mapping::IdentifierMapping;
use crate::error::SqlMaskError;

fn parse(sql: &str) -> Result<Vec<Statement>, SqlMaskError> {
    Ok(Parser::parse_sql(&SQLiteDialect {}, sql)?)
}

/// Rewrite every mapped table and column reference in `sql`.
///
/// An empty mapping short-circuits to the input text unchanged, so a
/// database with no known mapping degrades to identity. `pretty` only
/// affects how multiple statements are joined; it has no semantic effect.
pub fn map_statement(
    sql: &str,
    mapping: &IdentifierMapping,
    pretty: bool,
) -> Result<String, SqlMaskError> {
    if mapping.is_empty() {
        return Ok(sql.to_string());
    }

    let mut statements = parse(sql)?;

    let _ = visit_relations_mut(&mut statements, |name: &mut ObjectName| {
        rewrite_relation(name, mapping);
        ControlFlow::<()>::Continue(())
    });

    let _ = visit_expressions_mut(&mut statements, |expr: &mut Expr| {
        rewrite_column_expr(expr, mapping);
        ControlFlow::<()>::Continue(())
    });

    Ok(render(&statements, pretty))
}

fn render(statements: &[Statement], pretty: bool) -> String {
    let separator = if pretty { ";\n" } else { "; " };
    statements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// A relation name may be qualified (`schema.table`); only the final part is
/// the table name.
fn rewrite_relation(name: &mut ObjectName, mapping: &IdentifierMapping) {
    if let Some(ident) = name.0.last_mut() {
        if let Some(mapped) = mapping.table(&ident.value) {
            *ident = Ident::new(mapped);
        }
    }
}

fn rewrite_column_expr(expr: &mut Expr, mapping: &IdentifierMapping) {
    match expr {
        Expr::Identifier(ident) => {
            if let Some(mapped) = mapping.column(&ident.value) {
                *ident = Ident::new(mapped);
            }
        }
        Expr::CompoundIdentifier(parts) => {
            // Qualifier and column map independently of each other.
            let len = parts.len();
            if len >= 2 {
                let qualifier = &mut parts[len - 2];
                if let Some(mapped) = mapping.table(&qualifier.value) {
                    *qualifier = Ident::new(mapped);
                }
            }
            if let Some(column) = parts.last_mut() {
                if let Some(mapped) = mapping.column(&column.value) {
                    *column = Ident::new(mapped);
                }
            }
        }
        _ => {}
    }
}

/// Collect the upper-cased name of every table reference and every column
/// reference anywhere in the tree, including subqueries and join conditions.
///
/// Parse failure returns two empty sets, never an error.
pub fn extract_tables_and_columns(sql: &str) -> (HashSet<String>, HashSet<String>) {
    let Ok(statements) = parse(sql) else {
        return (HashSet::new(), HashSet::new());
    };

    let mut tables = HashSet::new();
    let mut columns = HashSet::new();

    let _ = visit_relations(&statements, |name: &ObjectName| {
        if let Some(ident) = name.0.last() {
            tables.insert(ident.value.to_uppercase());
        }
        ControlFlow::<()>::Continue(())
    });

    let _ = visit_expressions(&statements, |expr: &Expr| {
        match expr {
            Expr::Identifier(ident) => {
                columns.insert(ident.value.to_uppercase());
            }
            Expr::CompoundIdentifier(parts) => {
                if let Some(ident) = parts.last() {
                    columns.insert(ident.value.to_uppercase());
                }
            }
            _ => {}
        }
        ControlFlow::<()>::Continue(())
    });

    (tables, columns)
}
