use std::collections::HashMap;

use serde::Deserialize;

use super::rate_tables::{RateTables, TableSourceError};

/// Where rate tables come from.
///
/// `source` must match the [`TableSourceFactory::source_name`] of a
/// registered factory. `location` is passed through to that factory
/// unchanged; its meaning is source-specific.
///
/// | source    | location examples        |
/// |-----------|--------------------------|
/// | `builtin` | ignored                  |
/// | `csv`     | `rates.csv`, `/etc/forge/rates-2025.csv` |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"csv"`).
    pub source: String,
    /// Opaque value forwarded to the factory's `load` method.
    pub location: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            source: BuiltinTableFactory::NAME.to_string(),
            location: String::new(),
        }
    }
}

/// One implementation per table source. Each crate that knows how to
/// produce [`RateTables`] exports a unit struct implementing this trait,
/// registered with a [`TableSourceRegistry`] at startup.
pub trait TableSourceFactory: Send + Sync {
    /// Unique, lowercase identifier for this source.
    fn source_name(&self) -> &'static str;

    /// Produce validated rate tables for `config`.
    fn load(
        &self,
        config: &TableConfig,
    ) -> Result<RateTables, TableSourceError>;
}

/// The tables compiled into `forge-core`.
pub struct BuiltinTableFactory;

impl BuiltinTableFactory {
    pub const NAME: &'static str = "builtin";
}

impl TableSourceFactory for BuiltinTableFactory {
    fn source_name(&self) -> &'static str {
        Self::NAME
    }

    fn load(
        &self,
        _config: &TableConfig,
    ) -> Result<RateTables, TableSourceError> {
        Ok(RateTables::builtin())
    }
}

/// Registry of [`TableSourceFactory`] instances, keyed by source name.
pub struct TableSourceRegistry {
    factories: HashMap<&'static str, Box<dyn TableSourceFactory>>,
}

impl TableSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with [`BuiltinTableFactory`] already registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(BuiltinTableFactory));
        registry
    }

    /// Register a source factory. A factory with the same name is replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn TableSourceFactory>,
    ) {
        self.factories.insert(factory.source_name(), factory);
    }

    /// Names of every registered source, sorted alphabetically.
    pub fn available_sources(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.source`.
    ///
    /// # Errors
    /// * [`TableSourceError::Configuration`] when no factory is registered
    ///   under the requested name.
    /// * Any error the chosen factory returns.
    pub fn load(
        &self,
        config: &TableConfig,
    ) -> Result<RateTables, TableSourceError> {
        let factory = self.factories.get(config.source.as_str()).ok_or_else(|| {
            TableSourceError::Configuration(format!(
                "unknown table source '{}'; available: {:?}",
                config.source,
                self.available_sources()
            ))
        })?;

        tracing::debug!(source = %config.source, location = %config.location, "loading rate tables");
        factory.load(config)
    }
}

impl Default for TableSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
