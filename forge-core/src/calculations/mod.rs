//! Calculation engines for the tax estimator and the RRSP vs TFSA
//! projector.
//!
//! Everything here is a pure, synchronous function of its inputs. The
//! engines return explicit errors; callers that want the "no result on
//! invalid input" behaviour simply discard the error.

pub mod common;
pub mod estimator;
pub mod progressive;
pub mod projector;

pub use estimator::{EstimateError, TaxEstimator};
pub use progressive::compute_tax;
pub use projector::{ProjectionError, project};
