//! RRSP vs TFSA growth projection.
//!
//! Both accounts receive the same take-home outlay every year and compound
//! at the same return, once per year at year end:
//!
//! * **TFSA**: the contribution is after-tax money, grows tax-free and is
//!   never taxed.
//! * **RRSP**: the contribution is grossed up to
//!   `contribution / (1 - current_rate)` to reflect the deduction, grows
//!   tax-deferred and is taxed at the retirement rate when reported.
//!
//! Roughly ten points are sampled: every `max(1, years / 10)` years, plus
//! the final year.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use forge_core::{ProjectionInput, project};
//!
//! let input = ProjectionInput {
//!     annual_contribution: dec!(6000),
//!     years: 1,
//!     annual_return_rate: dec!(7),
//!     current_tax_rate: dec!(30),
//!     retirement_tax_rate: dec!(20),
//! };
//!
//! let series = project(&input).unwrap();
//! let point = series.last().unwrap();
//!
//! assert_eq!(point.label, "Year 1");
//! assert_eq!(point.tfsa, dec!(6420));
//! assert_eq!(point.rrsp_after_tax, dec!(7337));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{percent_to_fraction, round_whole};
use crate::{ProjectionInput, ProjectionPoint, ProjectionSeries};

/// Reasons a projection is not produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("annual contribution must be positive, got {0}")]
    NonPositiveContribution(Decimal),

    #[error("years must be at least 1")]
    ZeroYears,

    /// A current tax rate of 100% leaves nothing to gross up from.
    #[error("current tax rate of {0}% leaves no take-home pay to gross up")]
    GrossUpUndefined(Decimal),

    #[error("balance overflowed in year {year}")]
    Overflow { year: u32 },
}

/// Projects both accounts over `input.years` and samples the result.
///
/// # Errors
///
/// Returns [`ProjectionError`] when the contribution or horizon is not
/// positive, when the current tax rate is exactly 100%, or when a
/// balance exceeds the range of [`Decimal`].
pub fn project(input: &ProjectionInput) -> Result<ProjectionSeries, ProjectionError> {
    if input.annual_contribution <= Decimal::ZERO {
        return Err(ProjectionError::NonPositiveContribution(input.annual_contribution));
    }
    if input.years == 0 {
        return Err(ProjectionError::ZeroYears);
    }

    let growth = Decimal::ONE + percent_to_fraction(input.annual_return_rate);
    let retirement_keep = Decimal::ONE - percent_to_fraction(input.retirement_tax_rate);
    let tfsa_contribution = input.annual_contribution;
    let rrsp_contribution = gross_up(input.annual_contribution, input.current_tax_rate)?;
    let stride = sample_stride(input.years);

    debug!(
        years = input.years,
        stride,
        %rrsp_contribution,
        "projecting RRSP vs TFSA"
    );

    let mut tfsa = Decimal::ZERO;
    let mut rrsp = Decimal::ZERO;
    let mut points = Vec::with_capacity(input.years.min(11) as usize);

    for year in 1..=input.years {
        let overflow = ProjectionError::Overflow { year };
        tfsa = compound(tfsa, tfsa_contribution, growth).ok_or(overflow.clone())?;
        rrsp = compound(rrsp, rrsp_contribution, growth).ok_or(overflow.clone())?;

        if year % stride == 0 || year == input.years {
            let rrsp_after_tax = rrsp.checked_mul(retirement_keep).ok_or(overflow)?;
            points.push(ProjectionPoint::new(
                year,
                round_whole(tfsa),
                round_whole(rrsp_after_tax),
            ));
        }
    }

    Ok(ProjectionSeries::new(points))
}

/// Pre-tax contribution that costs `contribution` of take-home pay at
/// `current_rate_percent`.
fn gross_up(
    contribution: Decimal,
    current_rate_percent: Decimal,
) -> Result<Decimal, ProjectionError> {
    let take_home = Decimal::ONE - percent_to_fraction(current_rate_percent);
    contribution
        .checked_div(take_home)
        .ok_or(ProjectionError::GrossUpUndefined(current_rate_percent))
}

/// One year: contribute at the start, grow to the end.
fn compound(
    balance: Decimal,
    contribution: Decimal,
    growth: Decimal,
) -> Option<Decimal> {
    balance.checked_add(contribution)?.checked_mul(growth)
}

fn sample_stride(years: u32) -> u32 {
    (years / 10).max(1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn input(years: u32) -> ProjectionInput {
        ProjectionInput {
            annual_contribution: dec!(6000),
            years,
            annual_return_rate: dec!(7),
            current_tax_rate: dec!(30),
            retirement_tax_rate: dec!(20),
        }
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn zero_contribution_is_rejected() {
        let mut input = input(20);
        input.annual_contribution = dec!(0);

        assert_eq!(
            project(&input),
            Err(ProjectionError::NonPositiveContribution(dec!(0)))
        );
    }

    #[test]
    fn negative_contribution_is_rejected() {
        let mut input = input(20);
        input.annual_contribution = dec!(-1);

        assert_eq!(
            project(&input),
            Err(ProjectionError::NonPositiveContribution(dec!(-1)))
        );
    }

    #[test]
    fn zero_years_is_rejected() {
        assert_eq!(project(&input(0)), Err(ProjectionError::ZeroYears));
    }

    #[test]
    fn full_current_tax_rate_is_rejected() {
        let mut input = input(5);
        input.current_tax_rate = dec!(100);

        assert_eq!(
            project(&input),
            Err(ProjectionError::GrossUpUndefined(dec!(100)))
        );
    }

    #[test]
    fn runaway_growth_reports_overflow() {
        let mut input = input(200);
        input.annual_return_rate = dec!(10000);

        assert!(matches!(
            project(&input),
            Err(ProjectionError::Overflow { .. })
        ));
    }

    // =========================================================================
    // single year scenario
    // =========================================================================

    #[test]
    fn one_year_matches_hand_calculation() {
        let series = project(&input(1)).unwrap();

        assert_eq!(series.len(), 1);
        let point = &series.points()[0];
        assert_eq!(point.year, 1);
        assert_eq!(point.label, "Year 1");
        // 6000 × 1.07
        assert_eq!(point.tfsa, dec!(6420));
        // 6000 / 0.7 × 1.07 × 0.8 = 7337.14…
        assert_eq!(point.rrsp_after_tax, dec!(7337));
        assert_eq!(point.rrsp_advantage(), dec!(917));
    }

    #[test]
    fn equal_tax_rates_make_accounts_equivalent() {
        let mut input = input(25);
        input.retirement_tax_rate = input.current_tax_rate;

        let series = project(&input).unwrap();

        for point in &series {
            let diff = (point.tfsa - point.rrsp_after_tax).abs();
            assert!(diff <= dec!(1), "{point:?}");
        }
    }

    #[test]
    fn zero_return_accumulates_contributions() {
        let mut input = input(3);
        input.annual_return_rate = dec!(0);
        input.current_tax_rate = dec!(0);
        input.retirement_tax_rate = dec!(0);

        let series = project(&input).unwrap();

        assert_eq!(series.years(), vec![1, 2, 3]);
        assert_eq!(series.last().unwrap().tfsa, dec!(18000));
        assert_eq!(series.last().unwrap().rrsp_after_tax, dec!(18000));
    }

    #[test]
    fn negative_return_shrinks_balance() {
        let mut input = input(2);
        input.annual_return_rate = dec!(-10);

        let series = project(&input).unwrap();

        // (6000 × 0.9 + 6000) × 0.9
        assert_eq!(series.last().unwrap().tfsa, dec!(10260));
    }

    #[test]
    fn balances_round_half_away_from_zero() {
        let input = ProjectionInput {
            annual_contribution: dec!(0.5),
            years: 1,
            annual_return_rate: dec!(0),
            current_tax_rate: dec!(0),
            retirement_tax_rate: dec!(0),
        };

        let point = project(&input).unwrap().points()[0].clone();

        assert_eq!(point.tfsa, dec!(1));
        assert_eq!(point.rrsp_after_tax, dec!(1));
    }

    // =========================================================================
    // sampling
    // =========================================================================

    #[test]
    fn twenty_years_samples_every_second_year() {
        let series = project(&input(20)).unwrap();

        assert_eq!(series.years(), vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
    }

    #[test]
    fn seven_years_samples_every_year() {
        let series = project(&input(7)).unwrap();

        assert_eq!(series.years(), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn twenty_five_years_appends_final_year_off_stride() {
        let series = project(&input(25)).unwrap();

        let mut expected: Vec<u32> = (1..=12).map(|n| n * 2).collect();
        expected.push(25);
        assert_eq!(series.years(), expected);
    }

    #[test]
    fn labels_follow_year_numbers() {
        let series = project(&input(30)).unwrap();

        let labels: Vec<_> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels[0], "Year 3");
        assert_eq!(labels[9], "Year 30");
    }

    #[test]
    fn sample_stride_floors_at_one() {
        assert_eq!(sample_stride(1), 1);
        assert_eq!(sample_stride(9), 1);
        assert_eq!(sample_stride(10), 1);
        assert_eq!(sample_stride(19), 1);
        assert_eq!(sample_stride(20), 2);
        assert_eq!(sample_stride(105), 10);
    }

    #[test]
    fn rerunning_is_deterministic() {
        assert_eq!(project(&input(40)), project(&input(40)));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_final_year_always_sampled(years in 1u32..120) {
            let series = project(&input(years)).unwrap();

            prop_assert_eq!(series.last().map(|p| p.year), Some(years));
            prop_assert!(series.len() <= 20);
            prop_assert!(series.years().windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_balances_grow_with_positive_return(
            years in 1u32..60,
            contribution in 1u32..50_000,
            return_bp in 1u32..1500,
        ) {
            let input = ProjectionInput {
                annual_contribution: Decimal::from(contribution),
                years,
                annual_return_rate: Decimal::new(return_bp as i64, 2),
                current_tax_rate: dec!(30),
                retirement_tax_rate: dec!(20),
            };

            let series = project(&input).unwrap();

            prop_assert!(series.iter().all(|p| p.tfsa > Decimal::ZERO));
            prop_assert!(series.points().windows(2).all(|w| w[0].tfsa <= w[1].tfsa));
            prop_assert!(series.points().windows(2).all(|w| w[0].rrsp_after_tax <= w[1].rrsp_after_tax));
        }
    }
}
