//! Integration tests that load the shipped 2025 rate tables from disk and
//! run estimates against them.

use std::path::Path;

use forge_core::{
    Province, RateTables, TableConfig, TableSourceError, TableSourceRegistry, TaxEstimator,
};
use forge_data::{CsvTableFactory, RateTableLoader, RateTableLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const TEST_CSV_2025: &str = include_str!("../test-data/rate_tables_2025.csv");

fn fixture_path() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join("rate_tables_2025.csv")
        .display()
        .to_string()
}

fn registry() -> TableSourceRegistry {
    let mut registry = TableSourceRegistry::with_builtin();
    registry.register(Box::new(CsvTableFactory));
    registry
}

#[test]
fn test_parse_all_2025_rows() {
    let records = RateTableLoader::parse(TEST_CSV_2025.as_bytes()).expect("Failed to parse CSV");

    // 5 federal + 47 provincial brackets
    assert_eq!(records.len(), 52);
}

#[test]
fn test_csv_tables_match_builtin_tables() {
    let records = RateTableLoader::parse(TEST_CSV_2025.as_bytes()).unwrap();

    let tables = RateTableLoader::build(&records).expect("Failed to build tables");

    assert_eq!(tables, RateTables::builtin());
}

#[test]
fn test_load_file_from_disk() {
    let tables = RateTableLoader::load_file(Path::new(&fixture_path())).unwrap();

    assert_eq!(tables.provinces().len(), 10);
    assert_eq!(tables.federal().len(), 5);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = RateTableLoader::load_file(Path::new("/this/path/does/not/exist.csv"));

    assert!(matches!(result, Err(RateTableLoaderError::Io { .. })));
}

#[test]
fn test_registry_dispatches_to_csv_source() {
    let config = TableConfig {
        source: "csv".to_string(),
        location: fixture_path(),
    };

    let tables = registry().load(&config).unwrap();

    assert_eq!(tables, RateTables::builtin());
    assert_eq!(registry().available_sources(), vec!["builtin", "csv"]);
}

#[test]
fn test_estimate_against_csv_tables() {
    let config = TableConfig {
        source: "csv".to_string(),
        location: fixture_path(),
    };
    let tables = registry().load(&config).unwrap();

    let estimate = TaxEstimator::new(&tables)
        .estimate(dec!(85000), Province::Ontario)
        .unwrap();

    assert_eq!(estimate.total_tax, dec!(19937.589));
    assert_eq!(estimate.after_tax_income, dec!(65062.411));
}

#[test]
fn test_partial_csv_refuses_missing_province() {
    let csv = "\
jurisdiction,min_income,max_income,rate
FED,0,57375,0.15
FED,57375,,0.205
ON,0,,0.0505
";
    let records = RateTableLoader::parse(csv.as_bytes()).unwrap();
    let tables = RateTableLoader::build(&records).unwrap();
    let estimator = TaxEstimator::new(&tables);

    assert!(estimator.estimate(dec!(50000), Province::Ontario).is_ok());
    assert!(estimator.estimate(dec!(50000), Province::Quebec).is_err());
}

#[test]
fn test_csv_without_federal_maps_to_missing_federal() {
    let dir = std::env::temp_dir().join("forge-data-missing-federal");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("provincial_only.csv");
    std::fs::write(&path, "jurisdiction,min_income,max_income,rate\nON,0,,0.0505\n").unwrap();

    let config = TableConfig {
        source: "csv".to_string(),
        location: path.display().to_string(),
    };

    assert!(matches!(
        registry().load(&config),
        Err(TableSourceError::MissingFederal)
    ));
}
