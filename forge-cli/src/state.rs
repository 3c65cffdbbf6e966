//! Component-local state for the two calculators.
//!
//! Each calculator keeps its raw form text and the last result it
//! produced. Invalid input never surfaces as an error here: the
//! calculation simply yields nothing, and the reason is logged at `debug`
//! and kept for [`TaxEstimatorState::rejection`] and
//! [`ProjectionState::rejection`].

use forge_core::{
    ProjectionInput, ProjectionSeries, Province, RateTables, TaxEstimate, TaxEstimator, project,
};
use tracing::{debug, info};

use crate::config::ProjectionDefaults;
use crate::utils::{ParseInputError, parse_decimal, parse_years};

/// Tax estimator form: a province, the income text and the current result.
///
/// Changing either input discards the result so a stale estimate is never
/// shown next to edited inputs.
#[derive(Debug, Clone)]
pub struct TaxEstimatorState<'a> {
    tables: &'a RateTables,
    province: Province,
    income: String,
    result: Option<TaxEstimate>,
    rejection: Option<String>,
}

impl<'a> TaxEstimatorState<'a> {
    pub fn new(
        tables: &'a RateTables,
        province: Province,
    ) -> Self {
        Self {
            tables,
            province,
            income: String::new(),
            result: None,
            rejection: None,
        }
    }

    pub fn result(&self) -> Option<&TaxEstimate> {
        self.result.as_ref()
    }

    /// Why the last `calculate` produced nothing.
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn set_province(
        &mut self,
        province: Province,
    ) {
        self.province = province;
        self.result = None;
        self.rejection = None;
    }

    pub fn set_income(
        &mut self,
        income: impl Into<String>,
    ) {
        self.income = income.into();
        self.result = None;
        self.rejection = None;
    }

    /// Runs the estimate for the current inputs.
    ///
    /// Returns the new result, or `None` when the income text is not a
    /// positive number (the state is left without a result).
    pub fn calculate(&mut self) -> Option<&TaxEstimate> {
        let outcome = parse_decimal("income", &self.income)
            .map_err(|e| e.to_string())
            .and_then(|income| {
                TaxEstimator::new(self.tables)
                    .estimate(income, self.province)
                    .map_err(|e| e.to_string())
            });

        match outcome {
            Ok(estimate) => {
                info!(
                    province = %self.province,
                    income = %estimate.income,
                    total_tax = %estimate.total_tax,
                    "estimate calculated"
                );
                self.rejection = None;
                self.result = Some(estimate);
                self.result.as_ref()
            }
            Err(reason) => {
                debug!(province = %self.province, %reason, "estimate skipped");
                self.rejection = Some(reason);
                None
            }
        }
    }
}

/// RRSP vs TFSA form: five raw text fields and the last series generated.
///
/// Every setter regenerates the series. A regeneration that fails leaves
/// the previously generated series in place.
#[derive(Debug, Clone, Default)]
pub struct ProjectionState {
    annual_contribution: String,
    years: String,
    annual_return_rate: String,
    current_tax_rate: String,
    retirement_tax_rate: String,
    series: Option<ProjectionSeries>,
    rejection: Option<String>,
}

impl ProjectionState {
    /// State built from raw field text, with the series generated when the
    /// text is valid.
    pub fn from_fields(
        annual_contribution: impl Into<String>,
        years: impl Into<String>,
        annual_return_rate: impl Into<String>,
        current_tax_rate: impl Into<String>,
        retirement_tax_rate: impl Into<String>,
    ) -> Self {
        let mut state = Self {
            annual_contribution: annual_contribution.into(),
            years: years.into(),
            annual_return_rate: annual_return_rate.into(),
            current_tax_rate: current_tax_rate.into(),
            retirement_tax_rate: retirement_tax_rate.into(),
            series: None,
            rejection: None,
        };
        state.regenerate();
        state
    }

    pub fn from_defaults(defaults: &ProjectionDefaults) -> Self {
        Self::from_fields(
            defaults.annual_contribution.to_string(),
            defaults.years.to_string(),
            defaults.annual_return_rate.to_string(),
            defaults.current_tax_rate.to_string(),
            defaults.retirement_tax_rate.to_string(),
        )
    }

    pub fn series(&self) -> Option<&ProjectionSeries> {
        self.series.as_ref()
    }

    /// Why the most recent regeneration failed; `None` once one succeeds.
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn set_annual_contribution(
        &mut self,
        value: impl Into<String>,
    ) {
        self.annual_contribution = value.into();
        self.regenerate();
    }

    pub fn set_years(
        &mut self,
        value: impl Into<String>,
    ) {
        self.years = value.into();
        self.regenerate();
    }

    pub fn set_annual_return_rate(
        &mut self,
        value: impl Into<String>,
    ) {
        self.annual_return_rate = value.into();
        self.regenerate();
    }

    pub fn set_current_tax_rate(
        &mut self,
        value: impl Into<String>,
    ) {
        self.current_tax_rate = value.into();
        self.regenerate();
    }

    pub fn set_retirement_tax_rate(
        &mut self,
        value: impl Into<String>,
    ) {
        self.retirement_tax_rate = value.into();
        self.regenerate();
    }

    fn input(&self) -> Result<ProjectionInput, ParseInputError> {
        Ok(ProjectionInput {
            annual_contribution: parse_decimal("contribution", &self.annual_contribution)?,
            years: parse_years("years", &self.years)?,
            annual_return_rate: parse_decimal("return rate", &self.annual_return_rate)?,
            current_tax_rate: parse_decimal("current tax rate", &self.current_tax_rate)?,
            retirement_tax_rate: parse_decimal("retirement tax rate", &self.retirement_tax_rate)?,
        })
    }

    fn regenerate(&mut self) {
        let outcome = self
            .input()
            .map_err(|e| e.to_string())
            .and_then(|input| project(&input).map_err(|e| e.to_string()));

        match outcome {
            Ok(series) => {
                debug!(points = series.len(), "projection regenerated");
                self.series = Some(series);
                self.rejection = None;
            }
            Err(reason) => {
                debug!(%reason, "projection skipped");
                self.rejection = Some(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // TaxEstimatorState
    // =========================================================================

    #[test]
    fn calculate_stores_estimate_for_valid_income() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Ontario);
        state.set_income("$85,000");

        let estimate = state.calculate().cloned().unwrap();

        assert_eq!(estimate.total_tax, dec!(19937.589));
        assert_eq!(state.result(), Some(&estimate));
    }

    #[test]
    fn calculate_is_noop_for_unparseable_income() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Ontario);
        state.set_income("eighty thousand");

        assert!(state.calculate().is_none());
        assert!(state.result().is_none());
    }

    #[test]
    fn calculate_is_noop_for_zero_and_negative_income() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Alberta);

        state.set_income("0");
        assert!(state.calculate().is_none());

        state.set_income("-5000");
        assert!(state.calculate().is_none());
        assert!(state.result().is_none());
    }

    #[test]
    fn calculate_is_noop_for_province_missing_from_tables() {
        let tables = RateTables::new(
            forge_core::reference::federal_brackets().clone(),
            Default::default(),
        );
        let mut state = TaxEstimatorState::new(&tables, Province::Quebec);
        state.set_income("50000");

        assert!(state.calculate().is_none());
    }

    #[test]
    fn changing_province_clears_result() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Ontario);
        state.set_income("85000");
        state.calculate();
        assert!(state.result().is_some());

        state.set_province(Province::BritishColumbia);

        assert!(state.result().is_none());
        let estimate = state.calculate().unwrap();
        assert_eq!(estimate.province, Province::BritishColumbia);
        assert_eq!(estimate.income, dec!(85000));
    }

    #[test]
    fn changing_income_clears_result() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Ontario);
        state.set_income("85000");
        state.calculate();

        state.set_income("90000");

        assert!(state.result().is_none());
        assert_eq!(state.calculate().unwrap().province, Province::Ontario);
    }

    #[test]
    fn rejection_reason_is_kept_until_inputs_change() {
        let tables = RateTables::builtin();
        let mut state = TaxEstimatorState::new(&tables, Province::Ontario);
        state.set_income("abc");

        assert!(state.calculate().is_none());
        assert_eq!(state.rejection(), Some("income must be a number, got 'abc'"));

        state.set_income("0");
        assert_eq!(state.rejection(), None);
        state.calculate();
        assert_eq!(state.rejection(), Some("income must be positive, got 0"));

        state.set_income("85000");
        state.calculate();
        assert_eq!(state.rejection(), None);
    }

    // =========================================================================
    // ProjectionState
    // =========================================================================

    #[test]
    fn from_defaults_generates_series() {
        let state = ProjectionState::from_defaults(&ProjectionDefaults::default());

        let series = state.series().unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(series.last().unwrap().year, 20);
    }

    #[test]
    fn setter_regenerates_series() {
        let mut state = ProjectionState::from_defaults(&ProjectionDefaults::default());

        state.set_years("1");

        let series = state.series().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].tfsa, dec!(6420));
        assert_eq!(series.points()[0].rrsp_after_tax, dec!(7337));
    }

    #[test]
    fn fractional_years_are_truncated() {
        let mut state = ProjectionState::from_defaults(&ProjectionDefaults::default());

        state.set_years("7.9");

        assert_eq!(state.series().unwrap().last().unwrap().year, 7);
    }

    #[test]
    fn failed_regeneration_keeps_previous_series() {
        let mut state = ProjectionState::from_defaults(&ProjectionDefaults::default());
        let before = state.series().cloned();

        state.set_annual_contribution("0");
        assert_eq!(state.series().cloned(), before);

        state.set_annual_contribution("6000");
        state.set_years("abc");
        assert_eq!(state.series().cloned(), before);

        state.set_years("0.5");
        assert_eq!(state.series().cloned(), before);

        state.set_years("20");
        state.set_current_tax_rate("100");
        assert_eq!(state.series().cloned(), before);
    }

    #[test]
    fn from_fields_with_invalid_text_has_no_series() {
        let state = ProjectionState::from_fields("6000", "twenty", "7", "30", "20");

        assert!(state.series().is_none());
        assert_eq!(state.rejection(), Some("years must be a number, got 'twenty'"));
    }

    #[test]
    fn projection_rejection_clears_after_successful_regeneration() {
        let mut state = ProjectionState::from_defaults(&ProjectionDefaults::default());

        state.set_current_tax_rate("100");
        assert!(state.rejection().is_some_and(|r| r.contains("100%")));
        assert!(state.series().is_some());

        state.set_current_tax_rate("30");
        assert_eq!(state.rejection(), None);
    }

    #[test]
    fn empty_state_has_no_series() {
        let mut state = ProjectionState::default();
        assert!(state.series().is_none());

        state.set_annual_contribution("6000");

        assert!(state.series().is_none());
    }
}
