//! Rate tables from CSV.
//!
//! | Column         | Type    | Notes                                         |
//! |----------------|---------|-----------------------------------------------|
//! | `jurisdiction` | string  | `FED` or a province code (`ON`, `BC`, …)      |
//! | `min_income`   | decimal | Lower bound of the bracket                    |
//! | `max_income`   | decimal | Upper bound; leave empty for the top bracket  |
//! | `rate`         | decimal | Marginal rate as a fraction, e.g. `0.205`     |
//!
//! ```csv
//! jurisdiction,min_income,max_income,rate
//! FED,0,57375,0.15
//! FED,57375,,0.205
//! AB,0,,0.10
//! ```
//!
//! Rows may appear in any order; each jurisdiction's rows are sorted by
//! `min_income` before validation.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use forge_core::{
    BracketTable, BracketTableError, Province, RateTables, TableConfig, TableSourceError,
    TableSourceFactory, TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

const FEDERAL_CODE: &str = "FED";

/// Errors that can occur when loading rate tables.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown jurisdiction '{jurisdiction}' on row {row}")]
    InvalidJurisdiction { jurisdiction: String, row: usize },

    #[error("Invalid bracket table for {jurisdiction}: {source}")]
    InvalidTable {
        jurisdiction: String,
        #[source]
        source: BracketTableError,
    },

    #[error("No federal (FED) brackets found")]
    MissingFederal,
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the rate table CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RateTableRecord {
    pub jurisdiction: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

// Parse from the cell text so values like `0.0505` never pass through f64.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Jurisdiction a CSV row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Jurisdiction {
    Federal,
    Provincial(Province),
}

impl Jurisdiction {
    fn parse(code: &str) -> Option<Self> {
        if code.trim().eq_ignore_ascii_case(FEDERAL_CODE) {
            Some(Self::Federal)
        } else {
            Province::parse(code).map(Self::Provincial)
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Federal => FEDERAL_CODE,
            Self::Provincial(p) => p.as_str(),
        }
    }
}

/// Loader for rate tables stored as CSV.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse rate table records from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RateTableRecord>, RateTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: RateTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by jurisdiction and validate each group into a
    /// [`BracketTable`].
    ///
    /// A federal table is required. Provinces without rows are simply
    /// absent from the result, and estimates for them are refused.
    pub fn build(records: &[RateTableRecord]) -> Result<RateTables, RateTableLoaderError> {
        let mut groups: HashMap<Jurisdiction, Vec<TaxBracket>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            let jurisdiction = Jurisdiction::parse(&record.jurisdiction).ok_or_else(|| {
                RateTableLoaderError::InvalidJurisdiction {
                    jurisdiction: record.jurisdiction.clone(),
                    row: idx + 1,
                }
            })?;
            groups.entry(jurisdiction).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        let mut federal = None;
        let mut provincial = BTreeMap::new();

        for (jurisdiction, mut brackets) in groups {
            brackets.sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));
            let count = brackets.len();
            let table = BracketTable::new(brackets).map_err(|source| {
                RateTableLoaderError::InvalidTable {
                    jurisdiction: jurisdiction.code().to_string(),
                    source,
                }
            })?;
            debug!(jurisdiction = jurisdiction.code(), brackets = count, "built rate table");

            match jurisdiction {
                Jurisdiction::Federal => federal = Some(table),
                Jurisdiction::Provincial(p) => {
                    provincial.insert(p, table);
                }
            }
        }

        let federal = federal.ok_or(RateTableLoaderError::MissingFederal)?;
        Ok(RateTables::new(federal, provincial))
    }

    /// Read, parse and build rate tables from a file on disk.
    pub fn load_file(path: &Path) -> Result<RateTables, RateTableLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| RateTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = Self::parse(file)?;
        let tables = Self::build(&records)?;

        info!(
            path = %path.display(),
            records = records.len(),
            provinces = tables.provinces().len(),
            "loaded rate tables"
        );
        Ok(tables)
    }
}

/// Registers CSV files as a rate table source under the name `csv`.
///
/// [`TableConfig::location`] is the path of the CSV file.
pub struct CsvTableFactory;

impl CsvTableFactory {
    pub const NAME: &'static str = "csv";
}

impl TableSourceFactory for CsvTableFactory {
    fn source_name(&self) -> &'static str {
        Self::NAME
    }

    fn load(
        &self,
        config: &TableConfig,
    ) -> Result<RateTables, TableSourceError> {
        if config.location.trim().is_empty() {
            return Err(TableSourceError::Configuration(
                "the csv table source needs a file location".to_string(),
            ));
        }

        RateTableLoader::load_file(Path::new(&config.location)).map_err(|e| match e {
            RateTableLoaderError::MissingFederal => TableSourceError::MissingFederal,
            other => TableSourceError::Load {
                location: config.location.clone(),
                message: other.to_string(),
            },
        })
    }
}
