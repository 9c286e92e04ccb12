//! Error types for sqlmask

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while anonymizing schemas or mapping datasets
#[derive(Error, Debug)]
pub enum SqlMaskError {
    #[error("Failed to read schema file: {path}")]
    SchemaReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL parse error: {message}")]
    SqlParseError { message: String },

    #[error("Failed to read mapping store: {path}")]
    StoreReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mapping store format: {path}")]
    StoreFormatError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write mapping store: {path}")]
    StoreWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write schema file: {path}")]
    SchemaWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read dataset: {path}")]
    DatasetReadError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write dataset: {path}")]
    DatasetWriteError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Dataset is missing required column: {name}")]
    MissingColumn { name: String },
}

impl From<sqlparser::parser::ParserError> for SqlMaskError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        SqlMaskError::SqlParseError {
            message: err.to_string(),
        }
    }
}
