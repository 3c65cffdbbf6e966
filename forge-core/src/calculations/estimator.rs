//! Federal + provincial income tax estimate.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Federal tax: progressive tax on income over the federal table |
//! | 2    | Provincial tax: progressive tax on income over the province's table |
//! | 3    | Total tax: step 1 + step 2 |
//! | 4    | Effective rate: step 3 ÷ income × 100 |
//! | 5    | After-tax income: income − step 3 |
//!
//! The estimate is deliberately simplified: no credits, deductions or
//! surtaxes, just the bracket tables.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use forge_core::{Province, RateTables, TaxEstimator};
//!
//! let tables = RateTables::builtin();
//! let estimate = TaxEstimator::new(&tables)
//!     .estimate(dec!(60000), Province::Alberta)
//!     .unwrap();
//!
//! assert_eq!(estimate.provincial_tax, dec!(6000));
//! assert_eq!(estimate.after_tax_income + estimate.total_tax, dec!(60000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::progressive::compute_tax;
use crate::{Province, RateTables, TaxEstimate};

/// Reasons an estimate is not produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// Income must be strictly positive.
    #[error("income must be positive, got {0}")]
    NonPositiveIncome(Decimal),

    /// The rate tables have no provincial table for this province.
    #[error("no bracket table for province {0}")]
    UnknownJurisdiction(Province),
}

/// Runs the estimate against a set of [`RateTables`].
#[derive(Debug, Clone)]
pub struct TaxEstimator<'a> {
    tables: &'a RateTables,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    /// Estimates tax on `income` for a resident of `province`.
    ///
    /// All fields of the result are computed from the same inputs and
    /// returned together; on error nothing is returned.
    ///
    /// # Errors
    ///
    /// * [`EstimateError::NonPositiveIncome`] if `income <= 0`.
    /// * [`EstimateError::UnknownJurisdiction`] if the tables lack `province`.
    pub fn estimate(
        &self,
        income: Decimal,
        province: Province,
    ) -> Result<TaxEstimate, EstimateError> {
        if income <= Decimal::ZERO {
            debug!(%income, "rejecting non-positive income");
            return Err(EstimateError::NonPositiveIncome(income));
        }

        let provincial_table = self
            .tables
            .provincial(province)
            .ok_or(EstimateError::UnknownJurisdiction(province))?;

        let federal_tax = compute_tax(income, self.tables.federal());
        let provincial_tax = compute_tax(income, provincial_table);
        let total_tax = federal_tax + provincial_tax;

        Ok(TaxEstimate {
            income,
            province,
            federal_tax,
            provincial_tax,
            total_tax,
            effective_rate_percent: self.effective_rate_percent(total_tax, income),
            after_tax_income: income - total_tax,
        })
    }

    /// Combined federal + provincial rate on the next dollar earned above
    /// `income`, or `None` when the tables lack `province`.
    pub fn marginal_rate(
        &self,
        income: Decimal,
        province: Province,
    ) -> Option<Decimal> {
        let provincial = self.tables.provincial(province)?;
        Some(self.tables.federal().marginal_rate(income) + provincial.marginal_rate(income))
    }

    fn effective_rate_percent(
        &self,
        total_tax: Decimal,
        income: Decimal,
    ) -> Decimal {
        total_tax / income * Decimal::ONE_HUNDRED
    }
}
