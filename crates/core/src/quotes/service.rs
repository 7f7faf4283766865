//! Quote refresh coordinator.
//!
//! Orchestrates chunked, partial-failure-tolerant batch refresh of symbols:
//! the symbol list is split into fixed-size chunks, chunks run sequentially,
//! and within a chunk every fetch+persist runs concurrently. A failing
//! symbol is recorded on the report and the batch continues; only a cycle
//! where every symbol fails surfaces as a hard error.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::constants::DEFAULT_REFRESH_CHUNK_SIZE;
use crate::errors::{Error, Result};
use crate::quotes::store::QuoteStore;
use crate::quotes::RefreshReport;
use quotecast_market_data::{MarketDataProvider, Quote};

/// Coordinates quote refresh cycles against a provider and a store.
///
/// Holds trait handles only; both collaborators are injected so the engine
/// runs unchanged against production or in-memory implementations.
pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn QuoteStore>,
    chunk_size: usize,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<dyn QuoteStore>) -> Self {
        Self {
            provider,
            store,
            chunk_size: DEFAULT_REFRESH_CHUNK_SIZE,
        }
    }

    /// Override the refresh chunk size. Values below 1 are clamped to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Refresh the full symbol universe reported by the provider.
    ///
    /// Failing to obtain the universe itself is a hard error; per-symbol
    /// failures afterwards follow the usual partial-failure rules.
    pub async fn refresh_all(&self) -> Result<RefreshReport> {
        let symbols = self.provider.list_symbols().await?;
        debug!(
            "Refreshing full universe of {} symbols from {}",
            symbols.len(),
            self.provider.id()
        );
        self.refresh_symbols(&symbols).await
    }

    /// Refresh the given symbols, tolerating per-symbol failures.
    ///
    /// Duplicates are de-duplicated before fetching (first occurrence wins).
    /// An empty list returns an empty report, not an error. If every
    /// attempted symbol fails the call returns [`Error::RefreshAllFailed`].
    pub async fn refresh_symbols(&self, symbols: &[String]) -> Result<RefreshReport> {
        let symbols = dedupe_symbols(symbols);
        let mut report = RefreshReport::new();
        if symbols.is_empty() {
            return Ok(report);
        }

        for chunk in symbols.chunks(self.chunk_size) {
            let futures: Vec<_> = chunk
                .iter()
                .map(|symbol| {
                    let symbol = symbol.clone();
                    async move {
                        match self.fetch_and_persist(&symbol).await {
                            Ok(quote) => Ok(quote),
                            Err(e) => Err((symbol, e.to_string())),
                        }
                    }
                })
                .collect();

            let results = join_all(futures).await;

            for result in results {
                match result {
                    Ok(quote) => report.add_success(quote),
                    Err((symbol, reason)) => {
                        warn!("Failed to refresh {}: {}", symbol, reason);
                        report.add_failure(symbol, reason);
                    }
                }
            }
        }

        if report.is_total_failure() {
            let attempted = report.attempted();
            error!(
                "Quote refresh failed for all {} symbols; treating as outage",
                attempted
            );
            return Err(Error::RefreshAllFailed { attempted });
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// Fetch-then-persist for exactly one symbol.
    pub async fn refresh_single(&self, symbol: &str) -> Result<Quote> {
        self.fetch_and_persist(symbol).await
    }

    /// Fetch stored quotes for a symbol within `[start, end]`.
    pub async fn get_quotes_in_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        self.store.query_range(symbol, start, end).await
    }

    /// Building block for both the single and the batch path: fetch the
    /// latest quote, validate it, persist it.
    async fn fetch_and_persist(&self, symbol: &str) -> Result<Quote> {
        let mut quote = self.provider.get_quote(symbol).await?;
        // Key results by the requested symbol even if the provider
        // canonicalizes it differently
        quote.symbol = symbol.to_string();
        quote.validate()?;
        self.store.put(quote.clone()).await?;
        Ok(quote)
    }
}

/// First occurrence wins; relative order is preserved.
fn dedupe_symbols(symbols: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .iter()
        .filter(|symbol| seen.insert((*symbol).clone()))
        .cloned()
        .collect()
}
