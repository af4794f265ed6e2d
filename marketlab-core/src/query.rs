//! QueryService — read-only operations over one bound snapshot.
//!
//! No operation reorders the stored sequence unless it says so
//! (`top_movers`). Filters compose in a fixed order: market, trend, search
//! text, then limit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dataset::MarketDataset;
use crate::domain::{
    ExchangeRate, Instrument, InstrumentSummary, Market, QuoteCard, QuoteKind, RangeKind, Trend,
};
use crate::error::MarketError;

/// Number of cards a dashboard shows per section by default.
pub const DEFAULT_DASHBOARD_CARDS: usize = 8;
/// Number of movers a market page shows by default.
pub const DEFAULT_TOP_MOVERS: usize = 5;

/// Filters for `list_instruments`. The default lists everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentQuery {
    pub market: Option<Market>,
    #[serde(default)]
    pub trend: Trend,
    pub search_text: Option<String>,
    pub limit: Option<usize>,
    /// Narrow each summary's series to one range.
    pub range: Option<RangeKind>,
}

impl InstrumentQuery {
    pub fn market(mut self, market: Market) -> Self {
        self.market = Some(market);
        self
    }

    pub fn trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn range(mut self, range: RangeKind) -> Self {
        self.range = Some(range);
        self
    }

    fn validate(&self) -> Result<(), MarketError> {
        if self.limit == Some(0) {
            return Err(MarketError::invalid("limit must be a positive integer"));
        }
        Ok(())
    }
}

/// Response of `list_exchange_rates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    pub kind: QuoteKind,
    pub rates: Vec<ExchangeRate>,
    pub currency_codes: Vec<String>,
}

/// Advancers and decliners on one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBreadth {
    pub market: Market,
    pub advancing: usize,
    pub declining: usize,
    pub unchanged: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub market: Market,
    pub kind: QuoteKind,
    pub instruments: Vec<QuoteCard>,
    pub exchange_rates: Vec<QuoteCard>,
}

#[derive(Debug, Clone)]
pub struct QueryService {
    dataset: Arc<MarketDataset>,
}

impl QueryService {
    pub fn new(dataset: Arc<MarketDataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &MarketDataset {
        &self.dataset
    }

    /// Instruments matching `query`, in stored order.
    pub fn list_instruments(
        &self,
        query: &InstrumentQuery,
    ) -> Result<Vec<InstrumentSummary>, MarketError> {
        query.validate()?;
        let needle = query
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matches = self
            .dataset
            .all_instruments()
            .filter(|i| query.market.map_or(true, |m| i.market == m))
            .filter(|i| query.trend.matches(i.change_percent))
            .filter(|i| needle.as_deref().map_or(true, |n| i.matches_text(n)))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|i| InstrumentSummary::project(i, query.range))
            .collect();
        Ok(matches)
    }

    /// Case-insensitive exact symbol lookup.
    ///
    /// Markets are searched in `Market::ALL` order, so a symbol listed on both
    /// BMV and BNY resolves to the BMV instrument.
    pub fn get_instrument(&self, symbol: &str) -> Result<&Instrument, MarketError> {
        self.dataset
            .all_instruments()
            .find(|i| i.matches_symbol(symbol))
            .ok_or_else(|| MarketError::not_found(symbol.trim()))
    }

    /// Fails with `InvalidInput` if the snapshot was built without `kind`.
    /// The error names the kinds that are available.
    pub fn list_exchange_rates(&self, kind: QuoteKind) -> Result<ExchangeRateTable, MarketError> {
        let rates = self.dataset.exchange_rates(kind).ok_or_else(|| {
            let built: Vec<String> = self.dataset.quote_kinds().map(|k| k.to_string()).collect();
            MarketError::invalid(format!(
                "invalid kind '{kind}' (snapshot has: {})",
                built.join(", ")
            ))
        })?;
        Ok(ExchangeRateTable {
            kind,
            rates: rates.to_vec(),
            currency_codes: self.dataset.currency_codes.clone(),
        })
    }

    /// Same as `list_exchange_rates`, from the wire spelling of the kind.
    pub fn list_exchange_rates_named(&self, kind: &str) -> Result<ExchangeRateTable, MarketError> {
        self.list_exchange_rates(kind.parse()?)
    }

    pub fn list_markets(&self) -> &'static [Market] {
        &Market::ALL
    }

    pub fn market_breadth(&self, market: Market) -> MarketBreadth {
        let instruments = self.dataset.instruments(market);
        let advancing = instruments.iter().filter(|i| Trend::Up.matches(i.change_percent)).count();
        let declining = instruments.iter().filter(|i| Trend::Down.matches(i.change_percent)).count();
        MarketBreadth {
            market,
            advancing,
            declining,
            unchanged: instruments.len() - advancing - declining,
            total: instruments.len(),
        }
    }

    /// Best performers first; ties keep stored order.
    pub fn top_movers(&self, market: Market, count: usize) -> Vec<&Instrument> {
        let mut sorted: Vec<&Instrument> = self.dataset.instruments(market).iter().collect();
        sorted.sort_by(|a, b| b.change_percent.total_cmp(&a.change_percent));
        sorted.truncate(count);
        sorted
    }

    /// First `count` instrument cards for `market`/`trend` and first `count`
    /// rate cards for `kind`.
    pub fn dashboard(
        &self,
        market: Market,
        trend: Trend,
        kind: QuoteKind,
        count: usize,
    ) -> Result<Dashboard, MarketError> {
        let instruments = self
            .dataset
            .instruments(market)
            .iter()
            .filter(|i| trend.matches(i.change_percent))
            .take(count)
            .map(QuoteCard::from)
            .collect();
        let exchange_rates = self
            .list_exchange_rates(kind)?
            .rates
            .iter()
            .take(count)
            .map(QuoteCard::from)
            .collect();
        Ok(Dashboard {
            market,
            kind,
            instruments,
            exchange_rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetBuilder;
    use crate::domain::InstrumentSpec;

    fn service() -> QueryService {
        let specs = vec![
            InstrumentSpec::equity("AMXL", "América Móvil L", Market::Bmv, 17.2),
            InstrumentSpec::equity("WALMEX", "WALMEX", Market::Bmv, 64.7),
            InstrumentSpec::equity("AAPL", "Apple", Market::Bny, 205.0),
        ];
        let currencies = vec!["USD".to_string(), "EUR".to_string()];
        let ds = DatasetBuilder::new(11)
            .build(0, &specs, &currencies, &[QuoteKind::Spot, QuoteKind::Crypto])
            .unwrap();
        QueryService::new(Arc::new(ds))
    }

    #[test]
    fn unfiltered_lists_everything_in_order() {
        let svc = service();
        let all = svc.list_instruments(&InstrumentQuery::default()).unwrap();
        let syms: Vec<_> = all.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(syms, vec!["AMXL", "WALMEX", "AAPL"]);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let svc = service();
        let hits = svc.list_instruments(&InstrumentQuery::default().search("MÓVIL")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "AMXL");
    }

    #[test]
    fn blank_search_is_no_filter() {
        let svc = service();
        let hits = svc.list_instruments(&InstrumentQuery::default().search("  ")).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn limit_truncates_and_tolerates_overshoot() {
        let svc = service();
        assert_eq!(svc.list_instruments(&InstrumentQuery::default().limit(2)).unwrap().len(), 2);
        assert_eq!(svc.list_instruments(&InstrumentQuery::default().limit(50)).unwrap().len(), 3);
    }

    #[test]
    fn zero_limit_is_invalid() {
        let svc = service();
        let err = svc.list_instruments(&InstrumentQuery::default().limit(0)).unwrap_err();
        assert!(matches!(err, MarketError::InvalidInput(_)));
    }

    #[test]
    fn range_narrows_series() {
        let svc = service();
        let hits = svc
            .list_instruments(&InstrumentQuery::default().range(RangeKind::Monthly))
            .unwrap();
        assert!(hits.iter().all(|s| s.series.len() == 1 && s.series[&RangeKind::Monthly].len() == 30));
    }

    #[test]
    fn get_instrument_is_case_insensitive() {
        let svc = service();
        assert_eq!(svc.get_instrument("walmex").unwrap().symbol, "WALMEX");
        assert!(svc.get_instrument("NOPE").unwrap_err().is_not_found());
    }

    #[test]
    fn exchange_rates_carry_currency_codes() {
        let svc = service();
        let table = svc.list_exchange_rates(QuoteKind::Spot).unwrap();
        assert_eq!(table.kind, QuoteKind::Spot);
        assert_eq!(table.currency_codes, vec!["USD", "EUR"]);
        assert_eq!(table.rates[0].rate, 15.0);
        assert_eq!(table.rates[1].rate, 15.3);
    }

    #[test]
    fn unbuilt_or_unknown_kind_is_invalid() {
        let svc = service();
        match svc.list_exchange_rates(QuoteKind::Cash) {
            Err(MarketError::InvalidInput(msg)) => {
                assert!(msg.contains("'cash'"), "{msg}");
                assert!(msg.contains("spot, crypto"), "{msg}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(matches!(
            svc.list_exchange_rates_named("forward"),
            Err(MarketError::InvalidInput(_))
        ));
        assert!(svc.list_exchange_rates_named("crypto").is_ok());
    }

    #[test]
    fn markets_are_fixed() {
        assert_eq!(service().list_markets(), &[Market::Bmv, Market::Bny]);
    }

    #[test]
    fn breadth_adds_up() {
        let b = service().market_breadth(Market::Bmv);
        assert_eq!(b.total, 2);
        assert_eq!(b.advancing + b.declining + b.unchanged, b.total);
    }

    #[test]
    fn movers_sorted_descending() {
        let svc = service();
        let movers = svc.top_movers(Market::Bmv, 5);
        assert_eq!(movers.len(), 2);
        assert!(movers[0].change_percent >= movers[1].change_percent);
    }

    #[test]
    fn dashboard_mixes_card_kinds() {
        let dash = service()
            .dashboard(Market::Bny, Trend::All, QuoteKind::Crypto, DEFAULT_DASHBOARD_CARDS)
            .unwrap();
        assert_eq!(dash.instruments.len(), 1);
        assert!(matches!(dash.instruments[0], QuoteCard::Equity { .. }));
        assert_eq!(dash.exchange_rates.len(), 2);
        assert_eq!(dash.exchange_rates[0].price(), 16.5);
    }
}
