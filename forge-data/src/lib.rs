pub mod loader;

pub use loader::{CsvTableFactory, RateTableLoader, RateTableLoaderError, RateTableRecord};
