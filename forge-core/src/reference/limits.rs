use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Annual contribution ceiling for a range of calendar years (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionLimit {
    pub first_year: i32,
    pub last_year: i32,
    pub limit: Decimal,
}

impl ContributionLimit {
    const fn new(
        first_year: i32,
        last_year: i32,
        limit: Decimal,
    ) -> Self {
        Self {
            first_year,
            last_year,
            limit,
        }
    }

    /// `"2019–2022"` or `"2024"` for single-year ranges.
    pub fn year_label(&self) -> String {
        if self.first_year == self.last_year {
            self.first_year.to_string()
        } else {
            format!("{}–{}", self.first_year, self.last_year)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub date: &'static str,
    pub event: &'static str,
}

pub const RRSP_LIMIT_NOTE: &str =
    "18% of previous year's earned income, up to the listed maximum";

const TFSA_LIMITS: &[ContributionLimit] = &[
    ContributionLimit::new(2009, 2012, dec!(5000)),
    ContributionLimit::new(2013, 2014, dec!(5500)),
    ContributionLimit::new(2015, 2015, dec!(10000)),
    ContributionLimit::new(2016, 2018, dec!(5500)),
    ContributionLimit::new(2019, 2022, dec!(6000)),
    ContributionLimit::new(2023, 2023, dec!(6500)),
    ContributionLimit::new(2024, 2024, dec!(7000)),
    ContributionLimit::new(2025, 2025, dec!(7000)),
];

const RRSP_LIMITS: &[ContributionLimit] = &[
    ContributionLimit::new(2021, 2021, dec!(27830)),
    ContributionLimit::new(2022, 2022, dec!(29210)),
    ContributionLimit::new(2023, 2023, dec!(30780)),
    ContributionLimit::new(2024, 2024, dec!(31560)),
    ContributionLimit::new(2025, 2025, dec!(32490)),
];

const DEADLINES: &[Deadline] = &[
    Deadline {
        date: "March 3, 2025",
        event: "RRSP contribution deadline (for 2024 tax year)",
    },
    Deadline {
        date: "April 30, 2025",
        event: "Personal income tax filing deadline",
    },
    Deadline {
        date: "June 15, 2025",
        event: "Self-employment tax filing deadline",
    },
    Deadline {
        date: "April 30, 2025",
        event: "Tax balance owing payment deadline",
    },
    Deadline {
        date: "January 1, 2025",
        event: "New TFSA contribution room available",
    },
];

pub fn tfsa_limits() -> &'static [ContributionLimit] {
    TFSA_LIMITS
}

pub fn rrsp_limits() -> &'static [ContributionLimit] {
    RRSP_LIMITS
}

pub fn deadlines() -> &'static [Deadline] {
    DEADLINES
}

/// Cumulative TFSA room for someone eligible since 2009, through `year`.
pub fn cumulative_tfsa_room(year: i32) -> Decimal {
    TFSA_LIMITS
        .iter()
        .flat_map(|l| (l.first_year..=l.last_year.min(year)).map(move |_| l.limit))
        .sum()
}
