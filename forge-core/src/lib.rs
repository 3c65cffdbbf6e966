pub mod calculations;
pub mod models;
pub mod reference;
pub mod tables;

pub use calculations::{EstimateError, ProjectionError, TaxEstimator, compute_tax, project};
pub use models::*;
pub use tables::{
    BuiltinTableFactory, RateTables, TableConfig, TableSourceError, TableSourceFactory,
    TableSourceRegistry,
};
