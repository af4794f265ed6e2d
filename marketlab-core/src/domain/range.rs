//! Time-range granularities for synthesized series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// A named granularity with a fixed number of points.
///
/// `Intraday` is the canonical range: last value and change percent are
/// always derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RangeKind {
    #[serde(rename = "1D")]
    Intraday,
    #[serde(rename = "1W")]
    Weekly,
    #[serde(rename = "1M")]
    Monthly,
}

impl RangeKind {
    pub const ALL: [RangeKind; 3] = [RangeKind::Intraday, RangeKind::Weekly, RangeKind::Monthly];

    /// The range summary fields are computed from.
    pub const CANONICAL: RangeKind = RangeKind::Intraday;

    /// Hours in a day, days in a week, days in a month.
    pub fn point_count(self) -> usize {
        match self {
            RangeKind::Intraday => 24,
            RangeKind::Weekly => 7,
            RangeKind::Monthly => 30,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RangeKind::Intraday => "1D",
            RangeKind::Weekly => "1W",
            RangeKind::Monthly => "1M",
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RangeKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" | "intraday" => Ok(RangeKind::Intraday),
            "1w" | "weekly" => Ok(RangeKind::Weekly),
            "1m" | "monthly" => Ok(RangeKind::Monthly),
            other => Err(MarketError::invalid(format!(
                "unknown range '{other}' (expected 1D, 1W or 1M)"
            ))),
        }
    }
}
