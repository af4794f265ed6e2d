//! Domain types for MarketLab

pub mod card;
pub mod exchange;
pub mod instrument;
pub mod market;
pub mod range;
pub mod series;

pub use card::QuoteCard;
pub use exchange::{ExchangeRate, QuoteKind};
pub use instrument::{Instrument, InstrumentKind, InstrumentSpec, InstrumentStats, InstrumentSummary};
pub use market::{Market, Trend};
pub use range::RangeKind;
pub use series::SeriesPoint;

/// Ticker as listed on its market. Lookups compare it case-insensitively.
pub type Symbol = String;
