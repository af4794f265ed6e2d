//! MarketLab Core — synthetic market data and the query surface over it.
//!
//! This crate contains:
//! - Domain types (instruments, series points, exchange rates, quote cards)
//! - Deterministic RNG hierarchy (master seed → per-instrument streams)
//! - Series synthesizer (bounded oscillation plus uniform perturbation)
//! - Instrument factory and derived metrics (change percent, high/low, volatility)
//! - Dataset builder producing immutable snapshots
//! - Query service and snapshot store with atomic regeneration

pub mod config;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod factory;
pub mod metrics;
pub mod query;
pub mod rng;
pub mod snapshot;
pub mod synth;
pub mod universe;

pub use config::{ConfigError, GeneratorConfig, InvalidSpecPolicy};
pub use dataset::{DatasetBuilder, MarketDataset};
pub use error::MarketError;
pub use factory::InstrumentFactory;
pub use query::{Dashboard, ExchangeRateTable, InstrumentQuery, MarketBreadth, QueryService};
pub use snapshot::SnapshotStore;
pub use synth::{SeriesSource, SeriesSynthesizer};
pub use universe::Universe;
