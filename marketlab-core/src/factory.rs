//! InstrumentFactory — one instrument from one spec.
//!
//! Every range is synthesized independently from the same base price; ranges
//! are not nested or derived from one another. Summary fields come from the
//! intraday range only.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Instrument, InstrumentSpec, RangeKind};
use crate::error::MarketError;
use crate::metrics::{change_percent, series_stats};
use crate::synth::{validate_base_price, SeriesSource};

pub struct InstrumentFactory<S> {
    source: S,
}

impl<S: SeriesSource> InstrumentFactory<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Build one instrument. Fails with `InvalidInput` on a base price below
    /// `MIN_BASE_PRICE`, before any series is generated.
    pub fn build(&mut self, spec: &InstrumentSpec) -> Result<Instrument, MarketError> {
        validate_base_price(spec.base_price, &format!("base price of {}", spec.symbol))?;

        let mut series = BTreeMap::new();
        for range in RangeKind::ALL {
            series.insert(range, self.source.generate_range(spec.base_price, range)?);
        }

        let canonical = &series[&RangeKind::CANONICAL];
        let (first, last) = match (canonical.first(), canonical.last()) {
            (Some(first), Some(last)) => (first.value, last.value),
            _ => {
                return Err(MarketError::invalid(format!(
                    "{} range of {} is empty",
                    RangeKind::CANONICAL,
                    spec.symbol
                )))
            }
        };
        let stats = series_stats(canonical);
        let change = change_percent(first, last);

        debug!(symbol = %spec.symbol, market = %spec.market, last, change, "instrument built");

        Ok(Instrument {
            symbol: spec.symbol.clone(),
            display_name: spec.name.clone(),
            market: spec.market,
            kind: spec.kind,
            series,
            last_value: last,
            change_percent: change,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::points_from_values;
    use crate::domain::{Market, SeriesPoint};
    use crate::synth::SeriesSynthesizer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Returns a fixed intraday series and flat series elsewhere.
    struct FixedIntraday(Vec<f64>);

    impl SeriesSource for FixedIntraday {
        fn generate(&mut self, base: f64, n: usize) -> Result<Vec<SeriesPoint>, MarketError> {
            Ok(points_from_values(&vec![base; n]))
        }

        fn generate_range(
            &mut self,
            base: f64,
            range: RangeKind,
        ) -> Result<Vec<SeriesPoint>, MarketError> {
            match range {
                RangeKind::Intraday => Ok(points_from_values(&self.0)),
                other => self.generate(base, other.point_count()),
            }
        }
    }

    #[test]
    fn stubbed_intraday_drives_summary() {
        let mut factory = InstrumentFactory::new(FixedIntraday(vec![100.0, 102.0, 98.0, 101.0]));
        let inst = factory
            .build(&InstrumentSpec::equity("XYZ", "Test Co", Market::Bmv, 100.0))
            .unwrap();

        assert_eq!(inst.last_value, 101.0);
        assert_eq!(inst.change_percent, 1.0);
        assert_eq!(inst.stats.day_high, 102.0);
        assert_eq!(inst.stats.day_low, 98.0);
        assert_eq!(inst.series.len(), RangeKind::ALL.len());
        assert_eq!(inst.series_for(RangeKind::Weekly).len(), 7);
    }

    #[test]
    fn every_range_is_present_with_fixed_counts() {
        let mut factory = InstrumentFactory::new(SeriesSynthesizer::new(StdRng::seed_from_u64(5)));
        let inst = factory
            .build(&InstrumentSpec::equity("AAPL", "Apple", Market::Bny, 205.0))
            .unwrap();

        for range in RangeKind::ALL {
            assert_eq!(inst.series_for(range).len(), range.point_count());
        }
        let intraday = inst.series_for(RangeKind::Intraday);
        assert_eq!(inst.last_value, intraday[intraday.len() - 1].value);
        assert_eq!(
            inst.change_percent,
            change_percent(intraday[0].value, inst.last_value)
        );
    }

    #[test]
    fn non_positive_base_fails() {
        let mut factory = InstrumentFactory::new(SeriesSynthesizer::new(StdRng::seed_from_u64(5)));
        let err = factory
            .build(&InstrumentSpec::equity("BAD", "Bad", Market::Bmv, 0.0))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
    }

    #[test]
    fn sub_cent_base_fails_instead_of_publishing_zeros() {
        let mut factory = InstrumentFactory::new(SeriesSynthesizer::new(StdRng::seed_from_u64(5)));
        let err = factory
            .build(&InstrumentSpec::equity("PENNY", "Penny Co", Market::Bmv, 0.004))
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(ref msg) if msg.contains("PENNY")));
    }

    #[test]
    fn empty_intraday_is_rejected() {
        let mut factory = InstrumentFactory::new(FixedIntraday(vec![]));
        let err = factory
            .build(&InstrumentSpec::equity("EMPTY", "Empty", Market::Bmv, 10.0))
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
