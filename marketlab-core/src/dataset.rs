//! MarketDataset — one immutable snapshot of every instrument and rate table.
//!
//! Building is a pure construction: the only inputs besides the specs are the
//! RNG hierarchy and a generation number. Each instrument and each
//! exchange-rate row draws from its own sub-seeded stream, so instruments are
//! built in parallel and the result does not depend on thread scheduling.
//!
//! A snapshot is never mutated after it is returned. Regeneration builds a new
//! one (see `snapshot::SnapshotStore`).

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{GeneratorConfig, InvalidSpecPolicy};
use crate::domain::{ExchangeRate, Instrument, InstrumentSpec, Market, QuoteKind, Symbol};
use crate::error::MarketError;
use crate::factory::InstrumentFactory;
use crate::metrics::round_to;
use crate::rng::{RngHierarchy, SCOPE_EXCHANGE, SCOPE_INSTRUMENT};
use crate::synth::{validate_base_price, SeriesSynthesizer};
use crate::universe::Universe;

/// First rung of the exchange-rate ladder.
pub const BASE_RATE: f64 = 15.0;
/// Increment per position in the currency list.
pub const RATE_STEP: f64 = 0.3;
/// Bounds of the uniform variation draw, in percent.
pub const VARIATION_BOUND: f64 = 2.0;
pub const MIN_VOLUME: u64 = 1_000_000;
pub const MAX_VOLUME: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataset {
    pub generation: u64,
    /// Master seed the snapshot was derived from.
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    /// Every market is present, possibly with an empty list. Input order is kept.
    pub instruments_by_market: BTreeMap<Market, Vec<Instrument>>,
    pub exchange_rates_by_kind: BTreeMap<QuoteKind, Vec<ExchangeRate>>,
    pub currency_codes: Vec<String>,
    /// Symbols dropped under `InvalidSpecPolicy::Skip`.
    #[serde(default)]
    pub skipped: Vec<Symbol>,
}

impl MarketDataset {
    pub fn instruments(&self, market: Market) -> &[Instrument] {
        self.instruments_by_market
            .get(&market)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All instruments, markets in `Market::ALL` order.
    pub fn all_instruments(&self) -> impl Iterator<Item = &Instrument> {
        Market::ALL.into_iter().flat_map(move |m| self.instruments(m).iter())
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments_by_market.values().map(|v| v.len()).sum()
    }

    pub fn exchange_rates(&self, kind: QuoteKind) -> Option<&[ExchangeRate]> {
        self.exchange_rates_by_kind.get(&kind).map(|v| v.as_slice())
    }

    pub fn quote_kinds(&self) -> impl Iterator<Item = QuoteKind> + '_ {
        self.exchange_rates_by_kind.keys().copied()
    }
}

/// Deterministic part of a rate: `(15 + position * 0.3) * multiplier`, 4 decimals.
pub fn base_rate(position: usize, kind: QuoteKind) -> f64 {
    round_to((BASE_RATE + position as f64 * RATE_STEP) * kind.multiplier(), 4)
}

/// Builds snapshots from specs using one RNG hierarchy.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    hierarchy: RngHierarchy,
    policy: InvalidSpecPolicy,
}

impl DatasetBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            hierarchy: RngHierarchy::new(seed),
            policy: InvalidSpecPolicy::default(),
        }
    }

    /// Uses the configured seed, or draws one from entropy.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let hierarchy = match config.seed {
            Some(seed) => RngHierarchy::new(seed),
            None => RngHierarchy::from_entropy(),
        };
        Self {
            hierarchy,
            policy: config.invalid_spec_policy,
        }
    }

    pub fn with_policy(mut self, policy: InvalidSpecPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn seed(&self) -> u64 {
        self.hierarchy.master_seed()
    }

    pub fn build_universe(
        &self,
        generation: u64,
        universe: &Universe,
    ) -> Result<MarketDataset, MarketError> {
        self.build(
            generation,
            &universe.instruments,
            &universe.currencies,
            &universe.quote_kinds,
        )
    }

    /// Build a complete snapshot.
    ///
    /// All validation happens before any series is generated. Under
    /// `InvalidSpecPolicy::Abort` a base price below `MIN_BASE_PRICE` fails the whole
    /// build; under `Skip` the spec is dropped and recorded.
    pub fn build(
        &self,
        generation: u64,
        specs: &[InstrumentSpec],
        currencies: &[String],
        quote_kinds: &[QuoteKind],
    ) -> Result<MarketDataset, MarketError> {
        validate_unique_symbols(specs)?;
        validate_currencies(currencies)?;

        let mut accepted = Vec::with_capacity(specs.len());
        let mut skipped = Vec::new();
        for spec in specs {
            match validate_base_price(spec.base_price, &format!("base price of {}", spec.symbol)) {
                Ok(()) => accepted.push(spec),
                Err(err) => match self.policy {
                    InvalidSpecPolicy::Abort => return Err(err),
                    InvalidSpecPolicy::Skip => {
                        warn!(symbol = %spec.symbol, market = %spec.market, %err, "skipping instrument spec");
                        skipped.push(spec.symbol.clone());
                    }
                },
            }
        }

        let instruments = accepted
            .par_iter()
            .map(|spec| {
                let key = format!("{}:{}", spec.market, spec.symbol);
                let rng = self.hierarchy.rng_for(generation, SCOPE_INSTRUMENT, &key);
                InstrumentFactory::new(SeriesSynthesizer::new(rng)).build(spec)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut instruments_by_market: BTreeMap<Market, Vec<Instrument>> =
            Market::ALL.into_iter().map(|m| (m, Vec::new())).collect();
        for inst in instruments {
            instruments_by_market.entry(inst.market).or_default().push(inst);
        }

        let exchange_rates_by_kind: BTreeMap<QuoteKind, Vec<ExchangeRate>> = quote_kinds
            .iter()
            .map(|&kind| (kind, self.rate_table(generation, kind, currencies)))
            .collect();

        let dataset = MarketDataset {
            generation,
            seed: self.seed(),
            generated_at: Utc::now(),
            instruments_by_market,
            exchange_rates_by_kind,
            currency_codes: currencies.to_vec(),
            skipped,
        };

        info!(
            generation,
            seed = dataset.seed,
            instruments = dataset.instrument_count(),
            quote_kinds = dataset.exchange_rates_by_kind.len(),
            skipped = dataset.skipped.len(),
            "market dataset built"
        );
        Ok(dataset)
    }

    fn rate_table(&self, generation: u64, kind: QuoteKind, currencies: &[String]) -> Vec<ExchangeRate> {
        currencies
            .iter()
            .enumerate()
            .map(|(position, code)| {
                let key = format!("{kind}:{code}");
                let mut rng = self.hierarchy.rng_for(generation, SCOPE_EXCHANGE, &key);
                ExchangeRate {
                    currency_code: code.clone(),
                    rate: base_rate(position, kind),
                    variation_percent: round_to(
                        rng.gen_range(-VARIATION_BOUND..=VARIATION_BOUND),
                        2,
                    ),
                    volume: rng.gen_range(MIN_VOLUME..=MAX_VOLUME),
                }
            })
            .collect()
    }
}

fn validate_unique_symbols(specs: &[InstrumentSpec]) -> Result<(), MarketError> {
    let mut seen = HashSet::new();
    for spec in specs {
        if spec.symbol.trim().is_empty() {
            return Err(MarketError::invalid("instrument symbol must not be empty"));
        }
        if !seen.insert((spec.market, spec.symbol.to_ascii_uppercase())) {
            return Err(MarketError::invalid(format!(
                "duplicate symbol {} on {}",
                spec.symbol, spec.market
            )));
        }
    }
    Ok(())
}

fn validate_currencies(currencies: &[String]) -> Result<(), MarketError> {
    let mut seen = HashSet::new();
    for code in currencies {
        if code.trim().is_empty() {
            return Err(MarketError::invalid("currency code must not be empty"));
        }
        if !seen.insert(code.to_ascii_uppercase()) {
            return Err(MarketError::invalid(format!("duplicate currency code {code}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<InstrumentSpec> {
        vec![
            InstrumentSpec::equity("AAPL", "Apple", Market::Bny, 205.0),
            InstrumentSpec::equity("AMXL", "América Móvil L", Market::Bmv, 17.2),
            InstrumentSpec::equity("MSFT", "Microsoft", Market::Bny, 410.0),
            InstrumentSpec::equity("WALMEX", "WALMEX", Market::Bmv, 64.7),
        ]
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn partitions_by_market_preserving_order() {
        let ds = DatasetBuilder::new(1)
            .build(0, &specs(), &codes(&["USD"]), &[QuoteKind::Spot])
            .unwrap();

        let bmv: Vec<_> = ds.instruments(Market::Bmv).iter().map(|i| i.symbol.as_str()).collect();
        let bny: Vec<_> = ds.instruments(Market::Bny).iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(bmv, vec!["AMXL", "WALMEX"]);
        assert_eq!(bny, vec!["AAPL", "MSFT"]);
        assert_eq!(ds.instrument_count(), 4);
    }

    #[test]
    fn empty_market_is_present() {
        let only_bny = vec![InstrumentSpec::equity("V", "Visa", Market::Bny, 280.0)];
        let ds = DatasetBuilder::new(1).build(0, &only_bny, &[], &[]).unwrap();
        assert!(ds.instruments_by_market.contains_key(&Market::Bmv));
        assert!(ds.instruments(Market::Bmv).is_empty());
    }

    #[test]
    fn base_rates_follow_ladder() {
        assert_eq!(base_rate(0, QuoteKind::Spot), 15.0);
        assert_eq!(base_rate(1, QuoteKind::Spot), 15.3);
        assert_eq!(base_rate(0, QuoteKind::Crypto), 16.5);
        assert_eq!(base_rate(1, QuoteKind::Crypto), 16.83);
    }

    #[test]
    fn rate_tables_have_bounded_random_fields() {
        let ds = DatasetBuilder::new(9)
            .build(0, &[], &codes(&["USD", "EUR", "JPY"]), &QuoteKind::ALL)
            .unwrap();

        for kind in QuoteKind::ALL {
            let rates = ds.exchange_rates(kind).unwrap();
            assert_eq!(rates.len(), 3);
            for (i, r) in rates.iter().enumerate() {
                assert_eq!(r.rate, base_rate(i, kind));
                assert!(r.variation_percent.abs() <= VARIATION_BOUND);
                assert!((MIN_VOLUME..=MAX_VOLUME).contains(&r.volume));
            }
        }
    }

    #[test]
    fn same_seed_same_snapshot_content() {
        let builder = DatasetBuilder::new(42);
        let a = builder.build(0, &specs(), &codes(&["USD", "EUR"]), &QuoteKind::ALL).unwrap();
        let b = builder.build(0, &specs(), &codes(&["USD", "EUR"]), &QuoteKind::ALL).unwrap();
        assert_eq!(a.instruments_by_market, b.instruments_by_market);
        assert_eq!(a.exchange_rates_by_kind, b.exchange_rates_by_kind);
    }

    #[test]
    fn spec_order_does_not_change_series() {
        let builder = DatasetBuilder::new(42);
        let mut reversed = specs();
        reversed.reverse();
        let a = builder.build(0, &specs(), &[], &[]).unwrap();
        let b = builder.build(0, &reversed, &[], &[]).unwrap();

        let find = |ds: &MarketDataset, sym: &str| {
            ds.all_instruments().find(|i| i.symbol == sym).cloned().unwrap()
        };
        assert_eq!(find(&a, "MSFT"), find(&b, "MSFT"));
    }

    #[test]
    fn new_generation_differs_in_random_fields_only() {
        let builder = DatasetBuilder::new(42);
        let g0 = builder.build(0, &specs(), &codes(&["USD", "EUR"]), &[QuoteKind::Spot]).unwrap();
        let g1 = builder.build(1, &specs(), &codes(&["USD", "EUR"]), &[QuoteKind::Spot]).unwrap();

        let r0 = g0.exchange_rates(QuoteKind::Spot).unwrap();
        let r1 = g1.exchange_rates(QuoteKind::Spot).unwrap();
        assert_eq!(r0[1].rate, r1[1].rate);
        assert_ne!(g0.instruments(Market::Bny), g1.instruments(Market::Bny));
    }

    #[test]
    fn abort_policy_fails_whole_build() {
        let mut bad = specs();
        bad.push(InstrumentSpec::equity("ZERO", "Zero", Market::Bmv, 0.0));
        let err = DatasetBuilder::new(1)
            .with_policy(InvalidSpecPolicy::Abort)
            .build(0, &bad, &[], &[])
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
        assert!(err.to_string().contains("ZERO"));
    }

    #[test]
    fn skip_policy_drops_and_records() {
        let mut bad = specs();
        bad.insert(1, InstrumentSpec::equity("NEG", "Negative", Market::Bmv, -4.0));
        let ds = DatasetBuilder::new(1)
            .with_policy(InvalidSpecPolicy::Skip)
            .build(0, &bad, &[], &[])
            .unwrap();
        assert_eq!(ds.instrument_count(), 4);
        assert_eq!(ds.skipped, vec!["NEG".to_string()]);
    }

    #[test]
    fn skip_policy_also_drops_sub_cent_bases() {
        let mut bad = specs();
        bad.push(InstrumentSpec::equity("PENNY", "Penny Co", Market::Bny, 0.004));
        let ds = DatasetBuilder::new(1)
            .with_policy(InvalidSpecPolicy::Skip)
            .build(0, &bad, &[], &[])
            .unwrap();
        assert_eq!(ds.skipped, vec!["PENNY".to_string()]);
        assert!(ds
            .all_instruments()
            .flat_map(|i| i.series.values().flatten())
            .all(|p| p.value > 0.0));
    }

    #[test]
    fn duplicate_symbol_within_market_is_rejected() {
        let mut dup = specs();
        dup.push(InstrumentSpec::equity("aapl", "Apple again", Market::Bny, 1.0));
        assert!(DatasetBuilder::new(1).build(0, &dup, &[], &[]).is_err());
    }

    #[test]
    fn same_symbol_on_two_markets_is_allowed() {
        let specs = vec![
            InstrumentSpec::equity("AC", "Arca", Market::Bmv, 125.4),
            InstrumentSpec::equity("AC", "Other AC", Market::Bny, 40.0),
        ];
        let ds = DatasetBuilder::new(1).build(0, &specs, &[], &[]).unwrap();
        assert_eq!(ds.instrument_count(), 2);
    }

    #[test]
    fn duplicate_currency_is_rejected() {
        let err = DatasetBuilder::new(1)
            .build(0, &[], &codes(&["USD", "usd"]), &[QuoteKind::Spot])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate currency"));
    }

    #[test]
    fn configured_seed_is_used() {
        let cfg = GeneratorConfig::default().with_seed(1234);
        assert_eq!(DatasetBuilder::from_config(&cfg).seed(), 1234);
    }
}
