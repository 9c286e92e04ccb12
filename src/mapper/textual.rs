//! Textual rewrite strategy: regex word-boundary substitution on raw text.
//!
//! The fallback for input the parser rejects. It has no structural
//! awareness: it cannot tell a string literal's contents from a real
//! identifier position, so it is a best-effort approximation rather than a
//! correctness-proven rewrite. Tables are substituted before columns, and
//! within each mapping longer names go first so a shorter name never
//! corrupts a longer one that contains it.

use regex::{NoExpand, Regex};

use super::mapping::IdentifierMapping;

/// Rewrite `sql` by direct pattern substitution, case-insensitively.
///
/// Each name is matched as a whole token (non-identifier boundaries on both
/// sides) or wrapped in backtick or double-quote quoting. Replacements are
/// inserted verbatim and accumulate into a single working copy, so later
/// patterns match the already-substituted text.
pub fn map_statement(sql: &str, mapping: &IdentifierMapping) -> String {
    let mut mapped = sql.to_string();

    for (original, replacement) in mapping.tables_by_length() {
        mapped = substitute(&mapped, original, replacement);
    }
    for (original, replacement) in mapping.columns_by_length() {
        mapped = substitute(&mapped, original, replacement);
    }

    mapped
}

fn substitute(text: &str, original: &str, replacement: &str) -> String {
    let escaped = regex::escape(original);
    let patterns = [
        format!(r"(?i)\b{escaped}\b"),
        format!("(?i)`{escaped}`"),
        format!("(?i)\"{escaped}\""),
    ];

    let mut mapped = text.to_string();
    for pattern in &patterns {
        // Escaped identifier text always forms a valid pattern.
        if let Ok(re) = Regex::new(pattern) {
            mapped = re.replace_all(&mapped, NoExpand(replacement)).into_owned();
        }
    }
    mapped
}
