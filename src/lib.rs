//! sqlmask: schema anonymization and identifier-aware SQL rewriting
//!
//! This library anonymizes SQL schema definitions (assigning short synthetic
//! table and column names), persists the resulting name mappings keyed by
//! database identifier, and batch-applies those mappings to the SQL query
//! columns of CSV datasets.

pub mod dataset;
pub mod error;
pub mod mapper;
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

pub use error::SqlMaskError;

/// Options for anonymizing one database schema
#[derive(Debug, Clone)]
pub struct AnonymizeOptions {
    /// Path to the schema SQL file
    pub schema_path: PathBuf,
    /// Database identifier the mapping is recorded under
    pub database_id: String,
    /// Path to the JSON mapping store (created if missing)
    pub store_path: PathBuf,
    /// Where to write the anonymized schema text, if anywhere
    pub schema_output_path: Option<PathBuf>,
    /// Enable verbose output
    pub verbose: bool,
}

/// Anonymize a schema and record its mapping in the store.
///
/// Re-running for the same database identifier overwrites the previous
/// entry, it never merges.
pub fn anonymize_database(options: AnonymizeOptions) -> Result<PathBuf> {
    if options.verbose {
        println!("Anonymizing schema: {}", options.schema_path.display());
    }

    let schema_sql =
        fs::read_to_string(&options.schema_path).map_err(|source| SqlMaskError::SchemaReadError {
            path: options.schema_path.clone(),
            source,
        })?;

    let anonymized = schema::anonymize_schema(&schema_sql)?;

    if options.verbose {
        println!(
            "Discovered {} tables and {} columns",
            anonymized.tables.len(),
            anonymized.columns.len()
        );
    }

    let mut store = schema::MappingStore::load_or_default(&options.store_path)?;
    store.insert(
        options.database_id.clone(),
        schema::SchemaMappingRecord::from(&anonymized),
    );
    store.save(&options.store_path)?;

    if let Some(schema_output_path) = &options.schema_output_path {
        fs::write(schema_output_path, &anonymized.schema).map_err(|source| {
            SqlMaskError::SchemaWriteError {
                path: schema_output_path.clone(),
                source,
            }
        })?;
        if options.verbose {
            println!("Wrote anonymized schema: {}", schema_output_path.display());
        }
    }

    if options.verbose {
        println!(
            "Recorded mapping for '{}' in {}",
            options.database_id,
            options.store_path.display()
        );
    }

    Ok(options.store_path)
}

/// Options for mapping a dataset
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Path to the input CSV dataset
    pub dataset_path: PathBuf,
    /// Path to the JSON mapping store
    pub store_path: PathBuf,
    /// Output path (defaults to `<input stem>_mapped.csv` next to the input)
    pub output_path: Option<PathBuf>,
    /// Driver configuration
    pub dataset: dataset::DatasetOptions,
}

/// Map every configured query column of a CSV dataset.
pub fn map_dataset(options: MapOptions) -> Result<PathBuf> {
    let verbose = options.dataset.verbose;
    if verbose {
        println!("Mapping dataset: {}", options.dataset_path.display());
    }

    let store = schema::MappingStore::load(&options.store_path)?;
    if verbose {
        println!("Loaded mappings for {} databases", store.len());
    }

    let output_path = options.output_path.unwrap_or_else(|| {
        let stem = options
            .dataset_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset");
        options
            .dataset_path
            .with_file_name(format!("{stem}_mapped.csv"))
    });

    let summary = dataset::process_dataset(
        &options.dataset_path,
        &output_path,
        &store,
        &options.dataset,
    )?;

    if verbose {
        println!(
            "Processed {} rows: {} fields mapped, {} failed",
            summary.rows, summary.mapped, summary.failed
        );
        println!("Results saved to {}", output_path.display());
    }

    Ok(output_path)
}
