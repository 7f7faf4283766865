//! Storage boundary for subscription records.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::errors::Result;
use crate::subscriptions::model::Subscription;
use quotecast_market_data::Interval;

// =============================================================================
// Store trait
// =============================================================================

/// Persistence interface for the subscription registry.
///
/// Implementations must apply `upsert_merge` and `upsert_replace` atomically
/// per record: concurrent calls for the same connection id may interleave in
/// any order, but no update may be lost.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Look up the record for a connection. `Ok(None)` when the connection
    /// never subscribed.
    async fn get(&self, connection_id: &str) -> Result<Option<Subscription>>;

    /// Merge `symbols` into the record's set (creating the record if absent)
    /// and set the cadence label. Returns the record after the merge.
    async fn upsert_merge(
        &self,
        connection_id: &str,
        symbols: &[String],
        interval: Interval,
    ) -> Result<Subscription>;

    /// Replace the record's symbol set wholesale, keeping its cadence label.
    /// Creates the record with the default cadence if absent. Returns the
    /// record after the write.
    async fn upsert_replace(
        &self,
        connection_id: &str,
        symbols: &[String],
    ) -> Result<Subscription>;

    /// Remove the record. Deleting an absent record is not an error.
    async fn delete(&self, connection_id: &str) -> Result<()>;

    /// Every stored record, in no particular order.
    async fn scan_all(&self) -> Result<Vec<Subscription>>;
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// Concurrent in-memory registry backend.
///
/// The entry API makes each read-modify-write atomic per connection id, so
/// interleaved subscribe calls from the same connection cannot drop symbols.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: DashMap<String, Subscription>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn get(&self, connection_id: &str) -> Result<Option<Subscription>> {
        Ok(self
            .records
            .get(connection_id)
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_merge(
        &self,
        connection_id: &str,
        symbols: &[String],
        interval: Interval,
    ) -> Result<Subscription> {
        let record = self
            .records
            .entry(connection_id.to_string())
            .and_modify(|record| {
                record.symbols.extend(symbols.iter().cloned());
                record.interval = interval;
            })
            .or_insert_with(|| Subscription::new(connection_id, symbols, interval))
            .clone();
        Ok(record)
    }

    async fn upsert_replace(
        &self,
        connection_id: &str,
        symbols: &[String],
    ) -> Result<Subscription> {
        let record = self
            .records
            .entry(connection_id.to_string())
            .and_modify(|record| {
                record.symbols = symbols.iter().cloned().collect();
            })
            .or_insert_with(|| Subscription::new(connection_id, symbols, Interval::default()))
            .clone();
        Ok(record)
    }

    async fn delete(&self, connection_id: &str) -> Result<()> {
        self.records.remove(connection_id);
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<Subscription>> {
        Ok(self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}
