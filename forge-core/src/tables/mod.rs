pub mod factory;
pub mod rate_tables;

pub use factory::{BuiltinTableFactory, TableConfig, TableSourceFactory, TableSourceRegistry};
pub use rate_tables::{RateTables, TableSourceError};
