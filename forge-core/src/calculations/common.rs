//! Rounding helpers shared by the engines and the display layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use forge_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(7337.14)), dec!(7337));
/// assert_eq!(round_whole(dec!(2.5)), dec!(3));
/// assert_eq!(round_whole(dec!(-2.5)), dec!(-3));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to `dp` decimal places, halves away from zero.
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage such as `7` or `20.5` into a fraction.
pub fn percent_to_fraction(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_whole tests
    // =========================================================================

    #[test]
    fn round_whole_rounds_down_below_midpoint() {
        assert_eq!(round_whole(dec!(6419.49)), dec!(6419));
    }

    #[test]
    fn round_whole_rounds_up_at_midpoint() {
        assert_eq!(round_whole(dec!(6419.5)), dec!(6420));
    }

    #[test]
    fn round_whole_rounds_negative_midpoint_away_from_zero() {
        assert_eq!(round_whole(dec!(-0.5)), dec!(-1));
    }

    #[test]
    fn round_whole_keeps_integers() {
        assert_eq!(round_whole(dec!(42)), dec!(42));
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_to_one_place() {
        assert_eq!(round_half_up(dec!(24.25), 1), dec!(24.3));
        assert_eq!(round_half_up(dec!(24.249), 1), dec!(24.2));
    }

    #[test]
    fn percent_to_fraction_divides_by_hundred() {
        assert_eq!(percent_to_fraction(dec!(7)), dec!(0.07));
        assert_eq!(percent_to_fraction(dec!(20.5)), dec!(0.205));
        assert_eq!(percent_to_fraction(dec!(-3)), dec!(-0.03));
    }
}
