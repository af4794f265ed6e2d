use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::market::Market;
use super::range::RangeKind;
use super::series::SeriesPoint;
use super::Symbol;

/// What kind of tradable entity an instrument is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    #[default]
    Equity,
    CurrencyPair,
}

/// Input to the instrument factory: identity plus the seed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub symbol: Symbol,
    #[serde(alias = "display_name")]
    pub name: String,
    pub market: Market,
    pub base_price: f64,
    #[serde(default)]
    pub kind: InstrumentKind,
}

impl InstrumentSpec {
    pub fn equity(symbol: &str, name: &str, market: Market, base_price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            market,
            base_price,
            kind: InstrumentKind::Equity,
        }
    }
}

/// Summary statistics over the canonical (intraday) series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentStats {
    pub open: f64,
    pub day_high: f64,
    pub day_low: f64,
    /// Sample std-dev of point-to-point percent returns.
    pub volatility: f64,
}

/// An instrument with a synthesized series for every range.
///
/// `series` holds exactly one entry per `RangeKind`. `last_value` and
/// `change_percent` are derived from the intraday range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: Symbol,
    pub display_name: String,
    pub market: Market,
    pub kind: InstrumentKind,
    pub series: BTreeMap<RangeKind, Vec<SeriesPoint>>,
    pub last_value: f64,
    pub change_percent: f64,
    pub stats: InstrumentStats,
}

impl Instrument {
    pub fn series_for(&self, range: RangeKind) -> &[SeriesPoint] {
        self.series.get(&range).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }

    /// Case-insensitive substring match on symbol or display name.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.symbol.to_lowercase().contains(needle_lower)
            || self.display_name.to_lowercase().contains(needle_lower)
    }
}

/// The list-view projection of an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSummary {
    pub symbol: Symbol,
    pub display_name: String,
    pub market: Market,
    pub last_value: f64,
    pub change_percent: f64,
    pub series: BTreeMap<RangeKind, Vec<SeriesPoint>>,
}

impl InstrumentSummary {
    /// Projects `instrument`; with `range` set only that series is carried.
    pub fn project(instrument: &Instrument, range: Option<RangeKind>) -> Self {
        let series = match range {
            Some(r) => instrument
                .series
                .iter()
                .filter(|(k, _)| **k == r)
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
            None => instrument.series.clone(),
        };
        Self {
            symbol: instrument.symbol.clone(),
            display_name: instrument.display_name.clone(),
            market: instrument.market,
            last_value: instrument.last_value,
            change_percent: instrument.change_percent,
            series,
        }
    }
}
