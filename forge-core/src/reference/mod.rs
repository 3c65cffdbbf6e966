//! Static reference data: 2025 bracket tables and registered-account
//! limits. Loaded once and immutable for the life of the process.

mod brackets;
mod limits;

pub use brackets::{TAX_YEAR, federal_brackets, provincial_brackets};
pub use limits::{
    ContributionLimit, Deadline, RRSP_LIMIT_NOTE, cumulative_tfsa_room, deadlines, rrsp_limits,
    tfsa_limits,
};
