//! Quote storage traits.
//!
//! This module defines the storage interface for per-symbol quote snapshots
//! and the in-memory implementation shipped with the engine. The trait
//! abstracts the persistence layer so a durable backend can be swapped in
//! without touching the refresh coordinator.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::errors::{Result, StoreError};
use quotecast_market_data::Quote;

// =============================================================================
// Quote Store
// =============================================================================

/// Storage interface for quote snapshots, keyed by symbol and timestamp.
///
/// # Design Notes
///
/// - Writes are idempotent per (symbol, timestamp): the last write wins,
///   which is what makes refresh cycles safely re-runnable
/// - `batch_put` reports success or failure per item; one bad item never
///   fails the whole batch
/// - Implementations must provide atomic per-record updates; no cross-record
///   transactions are required by the engine
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Fetch the quote stored for a symbol at an exact timestamp.
    async fn get(&self, symbol: &str, timestamp: DateTime<Utc>) -> Result<Option<Quote>>;

    /// Fetch all quotes for a symbol within `[start, end]`, ordered by
    /// ascending timestamp.
    async fn query_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>>;

    /// Persist one quote. Overwrites any quote already stored for the same
    /// (symbol, timestamp) pair.
    async fn put(&self, quote: Quote) -> Result<()>;

    /// Persist many quotes, reporting the outcome per item.
    ///
    /// Returns one `(symbol, result)` pair per input quote, in input order.
    async fn batch_put(&self, quotes: Vec<Quote>) -> Vec<(String, Result<()>)>;
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory quote store.
///
/// Keeps one time-ordered series per symbol in a sharded concurrent map.
/// Per-symbol mutations go through the map's entry API, which gives the
/// atomic per-record updates the store contract requires.
#[derive(Default)]
pub struct InMemoryQuoteStore {
    series: DashMap<String, BTreeMap<DateTime<Utc>, Quote>>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn get(&self, symbol: &str, timestamp: DateTime<Utc>) -> Result<Option<Quote>> {
        Ok(self
            .series
            .get(symbol)
            .and_then(|series| series.get(&timestamp).cloned()))
    }

    async fn query_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        if start > end {
            return Err(StoreError::ReadFailed(format!(
                "invalid range for {}: start is after end",
                symbol
            ))
            .into());
        }
        Ok(self
            .series
            .get(symbol)
            .map(|series| series.range(start..=end).map(|(_, q)| q.clone()).collect())
            .unwrap_or_default())
    }

    async fn put(&self, quote: Quote) -> Result<()> {
        self.series
            .entry(quote.symbol.clone())
            .or_default()
            .insert(quote.timestamp, quote);
        Ok(())
    }

    async fn batch_put(&self, quotes: Vec<Quote>) -> Vec<(String, Result<()>)> {
        let mut results = Vec::with_capacity(quotes.len());
        for quote in quotes {
            let symbol = quote.symbol.clone();
            let result = self.put(quote).await;
            results.push((symbol, result));
        }
        results
    }
}
