//! Exchange-rate tables and their quoting conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// Quoting convention for a currency table.
///
/// Every kind quotes the same currency codes from the same base ladder;
/// `Crypto` carries an explicit 10% markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteKind {
    #[default]
    Spot,
    Fix,
    Cash,
    Crypto,
}

impl QuoteKind {
    pub const ALL: [QuoteKind; 4] =
        [QuoteKind::Spot, QuoteKind::Fix, QuoteKind::Cash, QuoteKind::Crypto];

    pub fn multiplier(self) -> f64 {
        match self {
            QuoteKind::Spot | QuoteKind::Fix | QuoteKind::Cash => 1.0,
            QuoteKind::Crypto => 1.1,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            QuoteKind::Spot => "spot",
            QuoteKind::Fix => "fix",
            QuoteKind::Cash => "cash",
            QuoteKind::Crypto => "crypto",
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for QuoteKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spot" => Ok(QuoteKind::Spot),
            "fix" => Ok(QuoteKind::Fix),
            "cash" => Ok(QuoteKind::Cash),
            "crypto" => Ok(QuoteKind::Crypto),
            other => Err(MarketError::invalid(format!("invalid kind '{other}'"))),
        }
    }
}

/// One row of an exchange-rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub currency_code: String,
    /// Rounded to 4 decimals.
    pub rate: f64,
    /// Rounded to 2 decimals, within [-2, 2].
    pub variation_percent: f64,
    pub volume: u64,
}
