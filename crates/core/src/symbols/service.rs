//! Symbol directory refresh.
//!
//! Pulls the provider's full symbol catalog and mirrors it into the
//! directory store. Writes go out in fixed-size batches that all run
//! concurrently; the directory is reference data, so there is no rate
//! pressure comparable to the quote path and no need to serialize batches.

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};
use serde::Serialize;

use crate::constants::DEFAULT_DIRECTORY_CHUNK_SIZE;
use crate::errors::Result;
use crate::symbols::store::SymbolStore;
use quotecast_market_data::{MarketDataProvider, SymbolInfo};

/// Outcome of one directory refresh.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRefreshReport {
    /// Entries the provider returned.
    pub total: usize,
    /// Entries written to the store.
    pub written: usize,
    /// Entries the store rejected, with reasons.
    pub failures: Vec<DirectoryWriteFailure>,
}

/// One directory entry the store rejected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryWriteFailure {
    pub symbol: String,
    pub reason: String,
}

impl DirectoryRefreshReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Directory refresh wrote {} of {} symbols with {} failures",
            self.written,
            self.total,
            self.failed()
        )
    }
}

/// Keeps the symbol directory in sync with the provider's catalog.
pub struct SymbolDirectoryService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn SymbolStore>,
    chunk_size: usize,
}

impl SymbolDirectoryService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<dyn SymbolStore>) -> Self {
        Self {
            provider,
            store,
            chunk_size: DEFAULT_DIRECTORY_CHUNK_SIZE,
        }
    }

    /// Override the batch size for directory writes. Values below 1 are
    /// clamped to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Re-pull the provider catalog and upsert it into the store.
    ///
    /// Failing to list the catalog is a hard error. Per-entry store
    /// rejections are recorded on the report and do not abort the refresh.
    pub async fn refresh_directory(&self) -> Result<DirectoryRefreshReport> {
        let details = self.provider.list_symbol_details().await?;

        let mut report = DirectoryRefreshReport {
            total: details.len(),
            ..Default::default()
        };
        if details.is_empty() {
            info!("Provider {} returned an empty catalog", self.provider.id());
            return Ok(report);
        }

        let batches: Vec<_> = details
            .chunks(self.chunk_size)
            .map(|chunk| self.store.batch_put(chunk.to_vec()))
            .collect();

        for batch in join_all(batches).await {
            for (symbol, result) in batch {
                match result {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        warn!("Failed to store directory entry {}: {}", symbol, e);
                        report.failures.push(DirectoryWriteFailure {
                            symbol,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        let directory_size = self.store.count().await?;
        info!("{}; directory now holds {} symbols", report.summary(), directory_size);
        Ok(report)
    }

    /// The current directory contents, sorted by symbol.
    pub async fn list_directory(&self) -> Result<Vec<SymbolInfo>> {
        self.store.list().await
    }
}
