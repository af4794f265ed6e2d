//! Universe configuration — which instruments and currencies get synthesized.
//!
//! The universe is stored as TOML: an ordered list of instrument specs, the
//! ordered currency-code list shared by every quote kind, and the quote kinds
//! to build. Order matters everywhere; "top N" views take the first N.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;
use crate::domain::{InstrumentSpec, Market, QuoteKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub currencies: Vec<String>,
    #[serde(default = "all_quote_kinds")]
    pub quote_kinds: Vec<QuoteKind>,
    pub instruments: Vec<InstrumentSpec>,
}

fn all_quote_kinds() -> Vec<QuoteKind> {
    QuoteKind::ALL.to_vec()
}

const DEFAULT_CURRENCIES: [&str; 10] =
    ["USD", "EUR", "JPY", "GBP", "CAD", "CHF", "CNY", "BRL", "ARS", "MXN"];

const BMV_EQUITIES: [(&str, &str, f64); 10] = [
    ("AMXL", "América Móvil L", 17.2),
    ("WALMEX", "WALMEX", 64.7),
    ("GMEXICO", "Grupo México", 109.5),
    ("BIMBOA", "Bimbo A", 92.3),
    ("CEMEXCPO", "Cemex CPO", 12.1),
    ("FEMSAUBD", "FEMSA", 224.2),
    ("GAPB", "GAP B", 250.8),
    ("ASURB", "ASUR B", 417.6),
    ("KOFUBL", "Coca-Cola FEMSA", 133.2),
    ("ALFAA", "ALFA A", 17.9),
];

const BNY_EQUITIES: [(&str, &str, f64); 10] = [
    ("AAPL", "Apple", 205.0),
    ("MSFT", "Microsoft", 410.0),
    ("AMZN", "Amazon", 180.0),
    ("GOOGL", "Alphabet", 155.0),
    ("META", "Meta", 510.0),
    ("TSLA", "Tesla", 195.0),
    ("NVDA", "NVIDIA", 1100.0),
    ("JPM", "JPMorgan", 205.0),
    ("V", "Visa", 280.0),
    ("PG", "Procter & Gamble", 170.0),
];

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Ten BMV and ten BNY equities, ten currencies, all quote kinds.
    pub fn default_universe() -> Self {
        let bmv = BMV_EQUITIES
            .iter()
            .map(|(sym, name, base)| InstrumentSpec::equity(sym, name, Market::Bmv, *base));
        let bny = BNY_EQUITIES
            .iter()
            .map(|(sym, name, base)| InstrumentSpec::equity(sym, name, Market::Bny, *base));

        Self {
            currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            quote_kinds: all_quote_kinds(),
            instruments: bmv.chain(bny).collect(),
        }
    }

    /// Specs listed on `market`, in universe order.
    pub fn market_specs(&self, market: Market) -> impl Iterator<Item = &InstrumentSpec> {
        self.instruments.iter().filter(move |s| s.market == market)
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::default_universe()
    }
}
