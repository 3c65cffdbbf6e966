use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Province;

/// Federal and provincial tax owed on one income in one province.
///
/// Values are unrounded; rounding happens only when they are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxEstimate {
    pub income: Decimal,
    pub province: Province,
    pub federal_tax: Decimal,
    pub provincial_tax: Decimal,
    pub total_tax: Decimal,
    /// Total tax as a percentage of income, e.g. `24.3` for 24.3%.
    pub effective_rate_percent: Decimal,
    pub after_tax_income: Decimal,
}
