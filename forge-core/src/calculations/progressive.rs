//! Marginal (progressive) tax over a [`BracketTable`].
//!
//! Each slice of income is taxed only at the rate of the bracket it falls
//! in. For a table `[0–50,000 @ 10%, 50,000+ @ 20%]` an income of 60,000
//! owes `50,000 × 0.10 + 10,000 × 0.20 = 7,000`.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use forge_core::{BracketTable, TaxBracket, compute_tax};
//!
//! let table = BracketTable::new(vec![
//!     TaxBracket::new(dec!(0), Some(dec!(50000)), dec!(0.10)),
//!     TaxBracket::new(dec!(50000), None, dec!(0.20)),
//! ])
//! .unwrap();
//!
//! assert_eq!(compute_tax(dec!(60000), &table), dec!(7000));
//! ```

use rust_decimal::Decimal;

use crate::BracketTable;

/// Tax owed on `income` under `table`, unrounded.
///
/// Defined for non-negative incomes; callers reject anything else before
/// calling. Brackets at or above the income contribute nothing, so the
/// walk stops at the first bracket whose lower bound the income does not
/// exceed.
pub fn compute_tax(
    income: Decimal,
    table: &BracketTable,
) -> Decimal {
    let mut tax = Decimal::ZERO;

    for bracket in table.brackets() {
        if income <= bracket.lower_bound {
            break;
        }
        let top = match bracket.upper_bound {
            Some(upper) => income.min(upper),
            None => income,
        };
        tax += (top - bracket.lower_bound) * bracket.rate;
    }

    tax
}
