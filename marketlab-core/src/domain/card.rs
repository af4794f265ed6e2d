//! QuoteCard — the tagged "stock or exchange rate" shape shown on a dashboard.

use serde::{Deserialize, Serialize};

use super::exchange::ExchangeRate;
use super::instrument::Instrument;
use super::Symbol;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuoteCard {
    Equity {
        symbol: Symbol,
        name: String,
        price: f64,
        change_percent: f64,
    },
    Exchange {
        code: String,
        rate: f64,
        variation_percent: f64,
    },
}

impl QuoteCard {
    pub fn label(&self) -> &str {
        match self {
            QuoteCard::Equity { symbol, .. } => symbol,
            QuoteCard::Exchange { code, .. } => code,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            QuoteCard::Equity { price, .. } => *price,
            QuoteCard::Exchange { rate, .. } => *rate,
        }
    }

    pub fn change_percent(&self) -> f64 {
        match self {
            QuoteCard::Equity { change_percent, .. } => *change_percent,
            QuoteCard::Exchange { variation_percent, .. } => *variation_percent,
        }
    }
}

impl From<&Instrument> for QuoteCard {
    fn from(inst: &Instrument) -> Self {
        QuoteCard::Equity {
            symbol: inst.symbol.clone(),
            name: inst.display_name.clone(),
            price: inst.last_value,
            change_percent: inst.change_percent,
        }
    }
}

impl From<&ExchangeRate> for QuoteCard {
    fn from(rate: &ExchangeRate) -> Self {
        QuoteCard::Exchange {
            code: rate.currency_code.clone(),
            rate: rate.rate,
            variation_percent: rate.variation_percent,
        }
    }
}
