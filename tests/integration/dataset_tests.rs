//! Batch driver tests over real CSV files

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use sqlmask::dataset::{process_dataset, DatasetOptions};
use sqlmask::mapper::MapStrategy;
use sqlmask::schema::{anonymize_schema, MappingStore, SchemaMappingRecord};

fn store_with(entries: &[(&str, &str)]) -> MappingStore {
    let mut store = MappingStore::default();
    for (dbid, schema) in entries {
        let anonymized = anonymize_schema(schema).unwrap();
        store.insert(dbid.to_string(), SchemaMappingRecord::from(&anonymized));
    }
    store
}

fn read_rows(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_end_to_end_mapping() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let output = dir.path().join("dataset_mapped.csv");

    let mut writer = csv::Writer::from_path(&input).unwrap();
    writer.write_record(["dbid", "q1", "q2"]).unwrap();
    writer
        .write_record(["db1", "SELECT id FROM users", "SELECT name FROM users"])
        .unwrap();
    writer
        .write_record(["nope", "SELECT x FROM y", ""])
        .unwrap();
    writer
        .write_record(["db1", "SELECT ((( FROM users", "SELECT id FROM users"])
        .unwrap();
    writer.flush().unwrap();
    drop(writer);

    let store = store_with(&[("db1", "CREATE TABLE USERS (ID INT, NAME TEXT);")]);
    let options = DatasetOptions::default();
    let summary = process_dataset(&input, &output, &store, &options).unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.failed, 1);

    let (headers, rows) = read_rows(&output);
    assert_eq!(headers, vec!["dbid", "q1", "q2", "q1_mapped", "q2_mapped"]);

    // Mapped row.
    assert_eq!(rows[0][3], "SELECT c1 FROM t1");
    assert_eq!(rows[0][4], "SELECT c2 FROM t1");

    // Unknown database: identity passthrough; empty source stays empty.
    assert_eq!(rows[1][3], "SELECT x FROM y");
    assert_eq!(rows[1][4], "");

    // Parse failure leaves the derived field empty, and the batch kept going:
    // the second field on the same row still mapped.
    assert_eq!(rows[2][3], "");
    assert_eq!(rows[2][4], "SELECT c1 FROM t1");
}

#[test]
fn test_original_columns_round_trip_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let output = dir.path().join("out.csv");

    let mut writer = csv::Writer::from_path(&input).unwrap();
    writer
        .write_record(["dbid", "index", "q1", "err"])
        .unwrap();
    writer
        .write_record(["db1", "7", "SELECT id FROM users", "some, quoted \"err\""])
        .unwrap();
    writer.flush().unwrap();
    drop(writer);

    let store = store_with(&[("db1", "CREATE TABLE USERS (ID INT);")]);
    let options = DatasetOptions {
        query_columns: vec!["q1".to_string()],
        ..DatasetOptions::default()
    };
    process_dataset(&input, &output, &store, &options).unwrap();

    let (headers, rows) = read_rows(&output);
    assert_eq!(headers, vec!["dbid", "index", "q1", "err", "q1_mapped"]);
    assert_eq!(rows[0][0], "db1");
    assert_eq!(rows[0][1], "7");
    assert_eq!(rows[0][3], "some, quoted \"err\"");
    assert_eq!(rows[0][4], "SELECT c1 FROM t1");
}

#[test]
fn test_existing_derived_column_is_overwritten_in_place() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let output = dir.path().join("out.csv");

    let mut writer = csv::Writer::from_path(&input).unwrap();
    writer.write_record(["dbid", "q1", "q1_mapped"]).unwrap();
    writer
        .write_record(["db1", "SELECT id FROM users", "stale"])
        .unwrap();
    writer.flush().unwrap();
    drop(writer);

    let store = store_with(&[("db1", "CREATE TABLE USERS (ID INT);")]);
    let options = DatasetOptions {
        query_columns: vec!["q1".to_string()],
        ..DatasetOptions::default()
    };
    process_dataset(&input, &output, &store, &options).unwrap();

    let (headers, rows) = read_rows(&output);
    assert_eq!(headers, vec!["dbid", "q1", "q1_mapped"]);
    assert_eq!(rows[0][2], "SELECT c1 FROM t1");
}

#[test]
fn test_textual_strategy_maps_unparseable_text() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let output = dir.path().join("out.csv");

    let mut writer = csv::Writer::from_path(&input).unwrap();
    writer.write_record(["dbid", "q1"]).unwrap();
    writer.write_record(["db1", "SELEKT id FROM users"]).unwrap();
    writer.flush().unwrap();
    drop(writer);

    let store = store_with(&[("db1", "CREATE TABLE USERS (ID INT);")]);
    let options = DatasetOptions {
        query_columns: vec!["q1".to_string()],
        strategy: MapStrategy::Textual,
        ..DatasetOptions::default()
    };
    let summary = process_dataset(&input, &output, &store, &options).unwrap();
    assert_eq!(summary.failed, 0);

    let (_, rows) = read_rows(&output);
    assert_eq!(rows[0][1], "SELEKT c1 FROM t1");
}

#[test]
fn test_missing_dbid_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    fs::write(&input, "q1\nSELECT 1\n").unwrap();

    let store = MappingStore::default();
    let result = process_dataset(
        &input,
        &dir.path().join("out.csv"),
        &store,
        &DatasetOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_absent_query_columns_are_skipped() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("dataset.csv");
    let output = dir.path().join("out.csv");
    fs::write(&input, "dbid,q1\ndb1,SELECT id FROM users\n").unwrap();

    let store = store_with(&[("db1", "CREATE TABLE USERS (ID INT);")]);
    // q2 is configured but missing from the header.
    let summary = process_dataset(&input, &output, &store, &DatasetOptions::default()).unwrap();
    assert_eq!(summary.mapped, 1);

    let (headers, _) = read_rows(&output);
    assert_eq!(headers, vec!["dbid", "q1", "q1_mapped"]);
}
