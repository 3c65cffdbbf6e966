use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Province {
    #[default]
    #[serde(rename = "ON")]
    Ontario,
    #[serde(rename = "BC")]
    BritishColumbia,
    #[serde(rename = "AB")]
    Alberta,
    #[serde(rename = "QC")]
    Quebec,
    #[serde(rename = "MB")]
    Manitoba,
    #[serde(rename = "SK")]
    Saskatchewan,
    #[serde(rename = "NS")]
    NovaScotia,
    #[serde(rename = "NB")]
    NewBrunswick,
    #[serde(rename = "NL")]
    NewfoundlandAndLabrador,
    #[serde(rename = "PE")]
    PrinceEdwardIsland,
}

impl Province {
    /// Every province with a provincial bracket table, in display order.
    pub fn all() -> &'static [Province] {
        &[
            Self::Ontario,
            Self::BritishColumbia,
            Self::Alberta,
            Self::Quebec,
            Self::Manitoba,
            Self::Saskatchewan,
            Self::NovaScotia,
            Self::NewBrunswick,
            Self::NewfoundlandAndLabrador,
            Self::PrinceEdwardIsland,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ontario => "ON",
            Self::BritishColumbia => "BC",
            Self::Alberta => "AB",
            Self::Quebec => "QC",
            Self::Manitoba => "MB",
            Self::Saskatchewan => "SK",
            Self::NovaScotia => "NS",
            Self::NewBrunswick => "NB",
            Self::NewfoundlandAndLabrador => "NL",
            Self::PrinceEdwardIsland => "PE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ontario => "Ontario",
            Self::BritishColumbia => "British Columbia",
            Self::Alberta => "Alberta",
            Self::Quebec => "Quebec",
            Self::Manitoba => "Manitoba",
            Self::Saskatchewan => "Saskatchewan",
            Self::NovaScotia => "Nova Scotia",
            Self::NewBrunswick => "New Brunswick",
            Self::NewfoundlandAndLabrador => "Newfoundland & Labrador",
            Self::PrinceEdwardIsland => "Prince Edward Island",
        }
    }

    /// Parses a two-letter province code. Case-insensitive, surrounding
    /// whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase();
        Self::all().iter().copied().find(|p| p.as_str() == code)
    }
}

impl fmt::Display for Province {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
