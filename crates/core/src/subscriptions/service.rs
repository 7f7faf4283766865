//! Subscription registry service.
//!
//! Business rules over the [`SubscriptionStore`] boundary. The one invariant
//! enforced here is that a record with an empty symbol set never exists:
//! removing the last symbol deletes the record outright.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error};

use crate::errors::{Result, ValidationError};
use crate::subscriptions::model::Subscription;
use crate::subscriptions::store::SubscriptionStore;
use quotecast_market_data::Interval;

/// Tracks which symbols each connection wants updates for.
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Current symbol set for a connection. A connection with no record gets
    /// an empty set, not an error.
    pub async fn get_subscribed_symbols(&self, connection_id: &str) -> Result<Vec<String>> {
        let record = self.store.get(connection_id).await?;
        Ok(record.map(|r| r.symbols_vec()).unwrap_or_default())
    }

    /// Merge `symbols` into the connection's set and update its cadence
    /// label. Returns the resulting full set.
    ///
    /// Blank symbols are dropped before the merge; a request that leaves no
    /// usable symbol is an input error with no side effects.
    pub async fn create_subscriptions(
        &self,
        connection_id: &str,
        symbols: &[String],
        interval: Interval,
    ) -> Result<Vec<String>> {
        let symbols = sanitize_symbols(symbols);
        if symbols.is_empty() {
            return Err(ValidationError::MissingField("symbols".to_string()).into());
        }

        let record = self
            .store
            .upsert_merge(connection_id, &symbols, interval)
            .await?;
        debug!(
            "Connection {} now subscribed to {} symbols",
            connection_id,
            record.symbols.len()
        );
        Ok(record.symbols_vec())
    }

    /// Remove `symbols` from the connection's set. Returns the remaining
    /// set; when nothing remains the record is deleted rather than stored
    /// empty. Unsubscribing symbols never subscribed, or a connection with
    /// no record, is a no-op.
    pub async fn delete_subscriptions(
        &self,
        connection_id: &str,
        symbols: &[String],
    ) -> Result<Vec<String>> {
        let Some(record) = self.store.get(connection_id).await? else {
            return Ok(Vec::new());
        };

        let remaining: Vec<String> = record
            .symbols
            .iter()
            .filter(|existing| !symbols.contains(existing))
            .cloned()
            .collect();

        if remaining.is_empty() {
            self.store.delete(connection_id).await?;
            debug!("Connection {} unsubscribed from everything", connection_id);
            return Ok(Vec::new());
        }

        let record = self.store.upsert_replace(connection_id, &remaining).await?;
        Ok(record.symbols_vec())
    }

    /// Drop the connection's record unconditionally.
    ///
    /// Runs on disconnect, so a store failure is reported as `false` and
    /// logged instead of propagated: tearing down a connection must never
    /// fail because its subscriptions could not be removed.
    pub async fn delete_all_subscriptions(&self, connection_id: &str) -> bool {
        match self.store.delete(connection_id).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Failed to remove subscriptions for connection {}: {}",
                    connection_id, e
                );
                false
            }
        }
    }

    /// Snapshot of every active connection and its subscription record. The
    /// fan-out source of truth.
    pub async fn get_all_client_connection_info(&self) -> Result<HashMap<String, Subscription>> {
        let records = self.store.scan_all().await?;
        Ok(records
            .into_iter()
            .map(|record| (record.connection_id.clone(), record))
            .collect())
    }
}

/// Drop blank entries and trim the rest.
fn sanitize_symbols(symbols: &[String]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
