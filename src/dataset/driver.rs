//! Batch driver: map every query field of a CSV dataset.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use csv::StringRecord;
use rayon::prelude::*;

use crate::error::SqlMaskError;
use crate::mapper::{MapStrategy, SqlMapper};
use crate::schema::MappingStore;

/// Rows between progress reports.
pub const PROGRESS_INTERVAL: usize = 1000;

/// Options for a dataset mapping run
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    /// Name of the database-identifier column
    pub dbid_column: String,
    /// Names of the SQL-text columns to map
    pub query_columns: Vec<String>,
    /// Rewrite strategy applied to each query
    pub strategy: MapStrategy,
    /// Pretty-print re-serialized statements (structural strategy only)
    pub pretty: bool,
    /// Enable progress output
    pub verbose: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            dbid_column: "dbid".to_string(),
            query_columns: vec!["q1".to_string(), "q2".to_string()],
            strategy: MapStrategy::Structural,
            pretty: false,
            verbose: false,
        }
    }
}

/// Outcome counts for one dataset run
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetSummary {
    /// Rows scanned
    pub rows: usize,
    /// Non-empty query fields that produced mapped output
    pub mapped: usize,
    /// Non-empty query fields whose mapping failed
    pub failed: usize,
}

/// Map every configured query column of `input` and write the result to
/// `output`, with `<column>_mapped` fields alongside the originals.
///
/// Rows whose database identifier is unknown to `store` pass through with
/// identity mapping. Per-field failures leave the derived field empty and
/// never abort the batch. Output row order matches input row order.
pub fn process_dataset(
    input: &Path,
    output: &Path,
    store: &MappingStore,
    options: &DatasetOptions,
) -> Result<DatasetSummary, SqlMaskError> {
    let read_err = |source| SqlMaskError::DatasetReadError {
        path: input.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(input).map_err(read_err)?;
    let headers = reader.headers().map_err(read_err)?.clone();
    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(read_err)?;

    let dbid_index = headers
        .iter()
        .position(|h| h == options.dbid_column)
        .ok_or_else(|| SqlMaskError::MissingColumn {
            name: options.dbid_column.clone(),
        })?;

    // Query columns absent from the header are skipped; derived columns are
    // written in place when the input already carries them, appended
    // otherwise.
    let mut output_headers: Vec<String> = headers.iter().map(str::to_string).collect();
    let mut query_indices: Vec<(usize, usize)> = Vec::new();
    for column in &options.query_columns {
        let Some(source_index) = headers.iter().position(|h| h == column) else {
            continue;
        };
        let derived_name = format!("{column}_mapped");
        let derived_index = match output_headers.iter().position(|h| *h == derived_name) {
            Some(index) => index,
            None => {
                output_headers.push(derived_name);
                output_headers.len() - 1
            }
        };
        query_indices.push((source_index, derived_index));
    }

    // One mapper per distinct database identifier.
    let mut mappers: HashMap<String, SqlMapper> = HashMap::new();
    for record in &records {
        let dbid = record.get(dbid_index).unwrap_or("");
        if !mappers.contains_key(dbid) {
            mappers.insert(dbid.to_string(), SqlMapper::new(store.mapping_for(dbid)));
        }
    }

    // Each row is independent; the parallel scan preserves input order.
    let progress = AtomicUsize::new(0);
    let results: Vec<(Vec<String>, usize, usize)> = records
        .par_iter()
        .map(|record| {
            let dbid = record.get(dbid_index).unwrap_or("");
            let mapper = &mappers[dbid];

            let mut derived = Vec::with_capacity(query_indices.len());
            let mut mapped = 0usize;
            let mut failed = 0usize;
            for &(source_index, _) in &query_indices {
                let query = record.get(source_index).unwrap_or("");
                if query.is_empty() {
                    derived.push(String::new());
                    continue;
                }
                match mapper.map_query_with(query, options.strategy, options.pretty) {
                    Ok(text) => {
                        mapped += 1;
                        derived.push(text);
                    }
                    Err(_) => {
                        failed += 1;
                        derived.push(String::new());
                    }
                }
            }

            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            if options.verbose && done % PROGRESS_INTERVAL == 0 {
                println!("Processed {} rows...", done);
            }

            (derived, mapped, failed)
        })
        .collect();

    let write_err = |source| SqlMaskError::DatasetWriteError {
        path: output.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(output).map_err(write_err)?;
    writer.write_record(&output_headers).map_err(write_err)?;

    let mut summary = DatasetSummary::default();
    for (record, (derived, mapped, failed)) in records.iter().zip(&results) {
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(output_headers.len(), String::new());
        for (&(_, derived_index), value) in query_indices.iter().zip(derived) {
            row[derived_index] = value.clone();
        }
        writer.write_record(&row).map_err(write_err)?;

        summary.rows += 1;
        summary.mapped += mapped;
        summary.failed += failed;
    }
    writer
        .flush()
        .map_err(|source| write_err(csv::Error::from(source)))?;

    Ok(summary)
}
