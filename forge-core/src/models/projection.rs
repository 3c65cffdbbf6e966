use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for an RRSP vs TFSA comparison.
///
/// Rates are percentages (`7` means 7%), converted to fractions by the
/// projector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// After-tax amount set aside each year.
    pub annual_contribution: Decimal,
    pub years: u32,
    pub annual_return_rate: Decimal,
    /// Marginal rate today; drives the RRSP gross-up.
    pub current_tax_rate: Decimal,
    /// Rate applied to RRSP withdrawals in retirement.
    pub retirement_tax_rate: Decimal,
}

/// One sampled year of the comparison, balances rounded to whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    /// `"Year <n>"`, used as the chart/table axis label.
    pub label: String,
    pub tfsa: Decimal,
    /// RRSP balance after withdrawal tax at the retirement rate.
    pub rrsp_after_tax: Decimal,
}

impl ProjectionPoint {
    pub fn new(
        year: u32,
        tfsa: Decimal,
        rrsp_after_tax: Decimal,
    ) -> Self {
        Self {
            year,
            label: format!("Year {year}"),
            tfsa,
            rrsp_after_tax,
        }
    }

    /// RRSP minus TFSA; positive when the RRSP comes out ahead.
    pub fn rrsp_advantage(&self) -> Decimal {
        self.rrsp_after_tax - self.tfsa
    }
}

/// Sampled time series produced by [`crate::project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionSeries {
    points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    pub fn new(points: Vec<ProjectionPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ProjectionPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The final year of the horizon; always sampled.
    pub fn last(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    pub fn years(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.year).collect()
    }
}

impl<'a> IntoIterator for &'a ProjectionSeries {
    type Item = &'a ProjectionPoint;
    type IntoIter = std::slice::Iter<'a, ProjectionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
