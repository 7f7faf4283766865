//! Storage boundary for the symbol directory.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::Result;
use quotecast_market_data::SymbolInfo;

// =============================================================================
// Store trait
// =============================================================================

/// Persistence interface for the symbol directory.
///
/// The directory is a flat catalog keyed by symbol. Writes are idempotent
/// upserts; refreshing the directory twice with the same provider data
/// leaves it unchanged.
#[async_trait]
pub trait SymbolStore: Send + Sync {
    /// Upsert a batch of directory entries. Per-item outcomes are reported
    /// in input order; one bad item never fails the batch.
    async fn batch_put(&self, items: Vec<SymbolInfo>) -> Vec<(String, Result<()>)>;

    /// Every directory entry, sorted by symbol.
    async fn list(&self) -> Result<Vec<SymbolInfo>>;

    /// Number of entries in the directory.
    async fn count(&self) -> Result<usize>;
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// Concurrent in-memory directory backend.
#[derive(Debug, Default)]
pub struct InMemorySymbolStore {
    items: DashMap<String, SymbolInfo>,
}

impl InMemorySymbolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SymbolStore for InMemorySymbolStore {
    async fn batch_put(&self, items: Vec<SymbolInfo>) -> Vec<(String, Result<()>)> {
        items
            .into_iter()
            .map(|item| {
                let symbol = item.symbol.clone();
                self.items.insert(symbol.clone(), item);
                (symbol, Ok(()))
            })
            .collect()
    }

    async fn list(&self) -> Result<Vec<SymbolInfo>> {
        let mut entries: Vec<SymbolInfo> = self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(entries)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.items.len())
    }
}
