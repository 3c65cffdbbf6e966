use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A contiguous income range taxed at a single marginal rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` for the top bracket, which has no upper limit.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate as a fraction, e.g. `0.205` for 20.5%.
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }
}

/// Errors raised when a set of brackets does not cover `[0, ∞)` cleanly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    NonZeroStart(Decimal),

    #[error("bracket {index} has rate {rate}, expected a fraction in [0, 1)")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} is empty or inverted ({lower} to {upper})")]
    InvertedBracket {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("gap or overlap between bracket {index} (ends at {end}) and the next (starts at {next_start})")]
    Discontiguous {
        index: usize,
        end: Decimal,
        next_start: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded, but ends at {0}")]
    BoundedTop(Decimal),
}

/// An ordered, gap-free sequence of brackets covering every non-negative
/// income.
///
/// The structure is checked on construction. Progressivity (rates
/// non-decreasing by index) is expected of the table's author but not
/// required; a regressive table is accepted with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if !first.lower_bound.is_zero() {
            return Err(BracketTableError::NonZeroStart(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }

            match (bracket.upper_bound, brackets.get(index + 1)) {
                (Some(upper), _) if upper <= bracket.lower_bound => {
                    return Err(BracketTableError::InvertedBracket {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                (Some(upper), Some(next)) if upper != next.lower_bound => {
                    return Err(BracketTableError::Discontiguous {
                        index,
                        end: upper,
                        next_start: next.lower_bound,
                    });
                }
                (Some(upper), None) => return Err(BracketTableError::BoundedTop(upper)),
                (None, Some(_)) => return Err(BracketTableError::UnboundedBeforeEnd(index)),
                _ => {}
            }
        }

        if brackets.windows(2).any(|pair| pair[1].rate < pair[0].rate) {
            warn!(
                brackets = last_index + 1,
                "bracket table is not progressive; rates decrease with income"
            );
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Rate on the next dollar earned above `income`. At a boundary this
    /// is the rate of the bracket that starts there.
    pub fn marginal_rate(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .take_while(|b| b.lower_bound <= income)
            .last()
            .unwrap_or(&self.brackets[0])
            .rate
    }
}

impl<'de> Deserialize<'de> for BracketTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let brackets = Vec::<TaxBracket>::deserialize(deserializer)?;
        BracketTable::new(brackets).map_err(serde::de::Error::custom)
    }
}
