//! Market venues and trend filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// Exchange an equity is listed on.
///
/// `Market::ALL` is also the iteration order used for cross-market symbol
/// lookups: when a symbol exists on both venues, BMV wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Bolsa Mexicana de Valores
    #[serde(rename = "BMV")]
    Bmv,
    /// New York listings
    #[serde(rename = "BNY")]
    Bny,
}

impl Market {
    pub const ALL: [Market; 2] = [Market::Bmv, Market::Bny];

    pub fn code(self) -> &'static str {
        match self {
            Market::Bmv => "BMV",
            Market::Bny => "BNY",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Market {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BMV" => Ok(Market::Bmv),
            "BNY" => Ok(Market::Bny),
            other => Err(MarketError::invalid(format!(
                "unknown market '{other}' (expected BMV or BNY)"
            ))),
        }
    }
}

/// Direction filter over `change_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// change_percent > 0
    Up,
    /// change_percent < 0
    Down,
    #[default]
    All,
}

impl Trend {
    pub fn matches(self, change_percent: f64) -> bool {
        match self {
            Trend::Up => change_percent > 0.0,
            Trend::Down => change_percent < 0.0,
            Trend::All => true,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::All => "all",
        })
    }
}

impl FromStr for Trend {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "all" => Ok(Trend::All),
            other => Err(MarketError::invalid(format!(
                "unknown trend '{other}' (expected up, down or all)"
            ))),
        }
    }
}
