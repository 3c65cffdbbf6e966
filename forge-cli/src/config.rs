//! `forge.toml` configuration.
//!
//! Every section and key is optional; anything left out falls back to the
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use forge_core::{Province, TableConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "forge.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub tables: TableConfig,
    pub estimator: EstimatorConfig,
    pub projection: ProjectionDefaults,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Province used when `--province` is omitted.
    pub province: Province,
}

/// Starting values for the RRSP vs TFSA form. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectionDefaults {
    pub annual_contribution: Decimal,
    pub years: u32,
    pub annual_return_rate: Decimal,
    pub current_tax_rate: Decimal,
    pub retirement_tax_rate: Decimal,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            annual_contribution: dec!(6000),
            years: 20,
            annual_return_rate: dec!(7),
            current_tax_rate: dec!(30),
            retirement_tax_rate: dec!(20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Any `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file opened in append mode, in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl ForgeConfig {
    /// Loads `path` when given, else `./forge.toml` when present, else
    /// the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and parses one file. Relative paths inside it (the csv table
    /// location, the log file) are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        debug!(path = %path.display(), source = %config.tables.source, "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn resolve_relative_to(
        &mut self,
        base: &Path,
    ) {
        if !self.tables.location.is_empty() {
            let location = Path::new(&self.tables.location);
            if location.is_relative() {
                self.tables.location = base.join(location).to_string_lossy().into_owned();
            }
        }
        if let Some(file) = &self.logging.file {
            if file.is_relative() {
                self.logging.file = Some(base.join(file));
            }
        }
    }
}
