use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Historical window requested from the market service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Default)]
pub enum Timeframe {
    D1,
    D5,
    #[default]
    M1,
    M3,
    M6,
    Y1,
    Y5,
    Max,
}

impl Timeframe {
    /// Label used both on the buttons and on the wire (`?timeframe=1M`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::D1 => "1D",
            Self::D5 => "5D",
            Self::M1 => "1M",
            Self::M3 => "3M",
            Self::M6 => "6M",
            Self::Y1 => "1Y",
            Self::Y5 => "5Y",
            Self::Max => "MAX",
        }
    }

    /// Intraday windows come back with a `Datetime` column and need
    /// hours on the time axis.
    pub fn is_intraday(&self) -> bool {
        matches!(self, Self::D1 | Self::D5)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timeframe '{0}', expected one of 1D, 5D, 1M, 3M, 6M, 1Y, 5Y, MAX")]
pub struct InvalidTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = InvalidTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1D" => Ok(Self::D1),
            "5D" => Ok(Self::D5),
            "1M" => Ok(Self::M1),
            "3M" => Ok(Self::M3),
            "6M" => Ok(Self::M6),
            "1Y" => Ok(Self::Y1),
            "5Y" => Ok(Self::Y5),
            "MAX" => Ok(Self::Max),
            _ => Err(InvalidTimeframe(s.to_string())),
        }
    }
}
