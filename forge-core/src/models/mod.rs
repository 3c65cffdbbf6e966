mod projection;
mod province;
mod tax_bracket;
mod tax_estimate;

pub use projection::{ProjectionInput, ProjectionPoint, ProjectionSeries};
pub use province::Province;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_estimate::TaxEstimate;
