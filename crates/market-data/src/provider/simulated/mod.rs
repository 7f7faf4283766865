//! Simulated market data provider.
//!
//! Generates plausible OHLCV data as a per-symbol random walk instead of
//! calling an upstream API. Useful for local development, demos and tests
//! where no provider token is available.
//!
//! The first quote for a symbol opens uniformly in [10, 100) and closes at
//! open ± 20%; every following quote opens at the previous close and walks
//! from there. Prices are rounded to 5 decimal places and timestamps advance
//! by the configured cadence step.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{Interval, Quote, SymbolInfo};
use crate::provider::MarketDataProvider;

const PROVIDER_ID: &str = "SIMULATED";

/// Decimal places kept on generated prices and volumes.
const PRICE_SCALE: u32 = 5;

/// Built-in symbol universe served by the simulated provider.
const UNIVERSE: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOG", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("META", "Meta Platforms Inc."),
    ("NFLX", "Netflix Inc."),
    ("AMD", "Advanced Micro Devices Inc."),
    ("INTC", "Intel Corporation"),
    ("IBM", "International Business Machines Corporation"),
    ("ORCL", "Oracle Corporation"),
    ("CRM", "Salesforce Inc."),
    ("UBER", "Uber Technologies Inc."),
    ("SHOP", "Shopify Inc."),
    ("PYPL", "PayPal Holdings Inc."),
    ("DIS", "The Walt Disney Company"),
    ("BA", "The Boeing Company"),
    ("JPM", "JPMorgan Chase & Co."),
    ("GS", "The Goldman Sachs Group Inc."),
];

/// Random-walk quote generator with a fixed symbol universe.
///
/// Walk state is kept per symbol, so consecutive calls for the same symbol
/// produce a continuous price series. Any non-empty symbol is served, not
/// just the built-in universe, which keeps ad-hoc refresh requests working.
pub struct SimulatedProvider {
    interval: Interval,
    walks: DashMap<String, Quote>,
}

impl SimulatedProvider {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            walks: DashMap::new(),
        }
    }

    fn round(value: f64) -> Decimal {
        Decimal::try_from(value)
            .unwrap_or_default()
            .round_dp(PRICE_SCALE)
    }

    /// First quote of a walk: open in [10, 100), close at open ± 20%.
    fn initial_quote(symbol: &str, timestamp: DateTime<Utc>) -> Quote {
        let mut rng = rand::thread_rng();
        let open: f64 = rng.gen_range(10.0..100.0);
        let close: f64 = open * rng.gen_range(0.8..1.2);
        let volume: f64 = rng.gen_range(50.0..1_000_000.0);
        Self::build_quote(symbol, open, close, volume, timestamp, &mut rng)
    }

    /// Next step of a walk: opens at the previous close, volume drifts ± 20%.
    fn next_quote(previous: &Quote, step_seconds: i64) -> Quote {
        let mut rng = rand::thread_rng();
        let open = previous.close.to_f64().unwrap_or(50.0);
        let close: f64 = open * rng.gen_range(0.8..1.2);
        let volume: f64 = previous.volume.to_f64().unwrap_or(1000.0) * rng.gen_range(0.8..1.2);
        let timestamp = previous.timestamp + Duration::seconds(step_seconds);
        Self::build_quote(&previous.symbol, open, close, volume, timestamp, &mut rng)
    }

    fn build_quote(
        symbol: &str,
        open: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Quote {
        let high: f64 = open.max(close) * rng.gen_range(1.0..1.2);
        let low: f64 = open.min(close) * rng.gen_range(0.8..1.0);

        let open = Self::round(open);
        let close = Self::round(close);
        // Re-assert the OHLC bounds after rounding
        let high = Self::round(high).max(open).max(close);
        let low = Self::round(low).min(open).min(close);

        Quote::ohlcv(
            symbol.to_string(),
            open,
            high,
            low,
            close,
            Self::round(volume),
            timestamp,
            PROVIDER_ID.to_string(),
        )
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn list_symbol_details(&self) -> Result<Vec<SymbolInfo>, MarketDataError> {
        Ok(UNIVERSE
            .iter()
            .map(|(symbol, name)| SymbolInfo::new(*symbol, *name))
            .collect())
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        if symbol.trim().is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        let step = self.interval.step_seconds();
        let quote = self
            .walks
            .entry(symbol.to_string())
            .and_modify(|prev| {
                let next = Self::next_quote(prev, step);
                *prev = next;
            })
            .or_insert_with(|| Self::initial_quote(symbol, Utc::now()))
            .clone();

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_universe_is_served() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        let symbols = provider.list_symbols().await.unwrap();
        assert_eq!(symbols.len(), UNIVERSE.len());
        assert!(symbols.contains(&"AAPL".to_string()));
    }

    #[tokio::test]
    async fn test_initial_quote_within_bounds() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        let quote = provider.get_quote("AAPL").await.unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.source, "SIMULATED");
        assert!(quote.open >= dec!(10) && quote.open < dec!(100));
        assert!(quote.volume >= dec!(50) && quote.volume < dec!(1000000));
        quote.validate().unwrap();
    }

    #[tokio::test]
    async fn test_walk_is_continuous() {
        let provider = SimulatedProvider::new(Interval::Minutes);
        let first = provider.get_quote("MSFT").await.unwrap();
        let second = provider.get_quote("MSFT").await.unwrap();

        assert_eq!(second.open, first.close);
        assert_eq!(
            second.timestamp - first.timestamp,
            Duration::seconds(Interval::Minutes.step_seconds())
        );
    }

    #[tokio::test]
    async fn test_walk_stays_valid_over_many_steps() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        for _ in 0..200 {
            let quote = provider.get_quote("TSLA").await.unwrap();
            quote.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_symbols_outside_universe_are_served() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        let quote = provider.get_quote("ZZZT").await.unwrap();
        assert_eq!(quote.symbol, "ZZZT");
        quote.validate().unwrap();
    }

    #[tokio::test]
    async fn test_empty_symbol_is_rejected() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        let err = provider.get_quote("  ").await.unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[tokio::test]
    async fn test_walks_are_independent_per_symbol() {
        let provider = SimulatedProvider::new(Interval::Seconds);
        let aapl = provider.get_quote("AAPL").await.unwrap();
        let msft = provider.get_quote("MSFT").await.unwrap();
        let aapl_next = provider.get_quote("AAPL").await.unwrap();

        assert_eq!(aapl_next.open, aapl.close);
        assert_ne!(msft.symbol, aapl.symbol);
    }
}
