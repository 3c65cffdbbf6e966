//! Batch estimates from a CSV file.
//!
//! ## CSV Format
//!
//! | Column     | Required | Notes                                        |
//! |------------|----------|----------------------------------------------|
//! | `province` | yes      | Two-letter code, e.g. `ON`, case-insensitive |
//! | `income`   | yes      | Form text: `85000`, `$85,000`                |
//!
//! ```csv
//! province,income
//! ON,85000
//! BC,"$120,000"
//! ```
//!
//! Cells are read as text and go through the same parsing as the
//! interactive calculator, so a bad cell or a record with the wrong number
//! of fields rejects only its own row. Only an unreadable file or a header
//! without both columns fails the whole batch.

use std::path::{Path, PathBuf};

use forge_core::{Province, RateTables, TaxEstimate, TaxEstimator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::parse_decimal;

const REQUIRED_COLUMNS: [&str; 2] = ["province", "income"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    province: String,
    income: String,
}

/// One input row, numbered from 1 (the header is row 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    pub row: usize,
    pub province: String,
    pub income: String,
}

/// A record that could not be read as a `province,income` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    pub row: usize,
    pub reason: String,
}

pub type BatchRecord = Result<BatchRow, MalformedRow>;

#[derive(Debug, thiserror::Error)]
pub enum BatchLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV header has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of estimating one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Estimated { row: usize, estimate: TaxEstimate },
    Rejected { row: usize, reason: String },
}

/// Parses CSV text into records, in file order.
pub fn load_from_str(input: &str) -> Result<Vec<BatchRecord>, BatchLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(BatchLoadError::MissingColumn(*missing));
    }

    let records = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let row = idx + 1;
            let malformed = |reason: String| MalformedRow { row, reason };

            let record = result.map_err(|e| malformed(e.to_string()))?;
            if record.len() != headers.len() {
                return Err(malformed(format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                )));
            }
            let fields: CsvRow = record
                .deserialize(Some(&headers))
                .map_err(|e| malformed(e.to_string()))?;

            Ok(BatchRow {
                row,
                province: fields.province,
                income: fields.income,
            })
        })
        .collect();

    Ok(records)
}

pub fn load_from_file(path: &Path) -> Result<Vec<BatchRecord>, BatchLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BatchLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// Estimates every row. Rows that cannot be read or estimated are
/// reported, not skipped silently.
pub fn estimate_rows(
    tables: &RateTables,
    records: &[BatchRecord],
) -> Vec<BatchOutcome> {
    let estimator = TaxEstimator::new(tables);
    records
        .iter()
        .map(|record| {
            let (row, outcome) = match record {
                Ok(row) => (row.row, estimate_row(&estimator, row)),
                Err(malformed) => (malformed.row, Err(malformed.reason.clone())),
            };
            match outcome {
                Ok(estimate) => BatchOutcome::Estimated { row, estimate },
                Err(reason) => {
                    debug!(row, %reason, "batch row rejected");
                    BatchOutcome::Rejected { row, reason }
                }
            }
        })
        .collect()
}

fn estimate_row(
    estimator: &TaxEstimator<'_>,
    row: &BatchRow,
) -> Result<TaxEstimate, String> {
    let province = Province::parse(&row.province)
        .ok_or_else(|| format!("unknown province '{}'", row.province))?;
    let income = parse_decimal("income", &row.income).map_err(|e| e.to_string())?;
    estimator
        .estimate(income, province)
        .map_err(|e| e.to_string())
}
