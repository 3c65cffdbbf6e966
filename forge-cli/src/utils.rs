use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Error returned when form text cannot be turned into a number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseInputError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} must be a number, got '{input}'")]
    Invalid { field: &'static str, input: String },

    #[error("{field} is out of range: '{input}'")]
    OutOfRange { field: &'static str, input: String },
}

/// Characters users type around numbers: `$`, `%`, thousands separators
/// and whitespace.
fn decoration() -> &'static Regex {
    static DECORATION: OnceLock<Regex> = OnceLock::new();
    DECORATION.get_or_init(|| Regex::new(r"[\s,$%]").expect("static pattern compiles"))
}

fn normalize_decimal_input(s: &str) -> String {
    decoration().replace_all(s, "").into_owned()
}

/// Parses form text such as `"$85,000"` or `"7 %"` into a [`Decimal`].
pub fn parse_decimal(
    field: &'static str,
    s: &str,
) -> Result<Decimal, ParseInputError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(ParseInputError::Empty { field });
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(field, input = %s, "invalid decimal: {}", e);
        ParseInputError::Invalid {
            field,
            input: s.to_string(),
        }
    })
}

/// Parses a number of years. Fractions are truncated (`"20.9"` is 20,
/// `"-0.5"` is 0).
pub fn parse_years(
    field: &'static str,
    s: &str,
) -> Result<u32, ParseInputError> {
    // `normalize` turns the negative zero left by truncating `-0.x` into 0.
    parse_decimal(field, s)?
        .trunc()
        .normalize()
        .to_u32()
        .ok_or_else(|| ParseInputError::OutOfRange {
            field,
            input: s.to_string(),
        })
}
