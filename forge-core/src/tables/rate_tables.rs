use std::collections::BTreeMap;

use thiserror::Error;

use crate::reference::{federal_brackets, provincial_brackets};
use crate::{BracketTable, Province};

#[derive(Debug, Error)]
pub enum TableSourceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load rate tables from '{location}': {message}")]
    Load { location: String, message: String },

    #[error("Rate tables have no federal bracket table")]
    MissingFederal,
}

/// One federal table plus any number of provincial tables.
///
/// The estimator reads brackets through this type rather than the
/// built-in statics, so tables loaded from a file work the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTables {
    federal: BracketTable,
    provincial: BTreeMap<Province, BracketTable>,
}

impl RateTables {
    pub fn new(
        federal: BracketTable,
        provincial: BTreeMap<Province, BracketTable>,
    ) -> Self {
        Self {
            federal,
            provincial,
        }
    }

    /// The 2025 tables compiled into the crate.
    pub fn builtin() -> Self {
        let provincial = Province::all()
            .iter()
            .map(|&p| (p, provincial_brackets(p).clone()))
            .collect();
        Self::new(federal_brackets().clone(), provincial)
    }

    pub fn federal(&self) -> &BracketTable {
        &self.federal
    }

    pub fn provincial(
        &self,
        province: Province,
    ) -> Option<&BracketTable> {
        self.provincial.get(&province)
    }

    /// Provinces that have a table, in [`Province::all`] order.
    pub fn provinces(&self) -> Vec<Province> {
        self.provincial.keys().copied().collect()
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::builtin()
    }
}
