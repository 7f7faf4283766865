//! Fan-out of refreshed quotes to subscribed connections.
//!
//! The refresh runs once per cycle; the dispatcher projects its result onto
//! each connection's subscribed set and sends one personalized payload per
//! connection. Delivery cost is O(connections), not O(connections x symbols
//! fetched).

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;

use crate::broadcast::push::PushChannel;
use crate::constants::BROADCAST_SEND_TIMEOUT_MS;
use crate::errors::Result;
use crate::subscriptions::SubscriptionService;
use quotecast_market_data::Quote;

// =============================================================================
// Payload and report types
// =============================================================================

/// Wire shape of one push message: the subscribed symbols that refreshed
/// this cycle, keyed by symbol.
#[derive(Debug, Serialize)]
struct QuoteUpdatePayload<'a> {
    quotes: BTreeMap<&'a str, &'a Quote>,
}

/// One connection the broadcast could not deliver to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastFailure {
    pub connection_id: String,
    pub reason: String,
}

/// Outcome of one broadcast cycle.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    /// Connections that received a payload.
    pub delivered: usize,
    /// Connections skipped because none of their symbols refreshed.
    pub skipped: usize,
    /// Connections whose send failed or timed out.
    pub failures: Vec<BroadcastFailure>,
}

impl BroadcastReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn record_failure(&mut self, connection_id: String, reason: String) {
        self.failures.push(BroadcastFailure {
            connection_id,
            reason,
        });
    }

    pub fn summary(&self) -> String {
        format!(
            "Broadcast delivered {} payloads, skipped {} connections, {} failures",
            self.delivered,
            self.skipped,
            self.failed()
        )
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Sends each subscriber the quotes for exactly the symbols it subscribes to.
pub struct BroadcastDispatcher {
    subscriptions: Arc<SubscriptionService>,
    channel: Arc<dyn PushChannel>,
    send_timeout: Duration,
}

impl BroadcastDispatcher {
    pub fn new(subscriptions: Arc<SubscriptionService>, channel: Arc<dyn PushChannel>) -> Self {
        Self {
            subscriptions,
            channel,
            send_timeout: Duration::from_millis(BROADCAST_SEND_TIMEOUT_MS),
        }
    }

    /// Override the per-connection send timeout.
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// Push this cycle's refreshed quotes to every subscribed connection.
    ///
    /// One payload per connection, holding only the intersection of its
    /// subscribed set with `refreshed`. Connections whose intersection is
    /// empty are skipped. A failed or timed-out send is recorded on the
    /// report and never blocks the other deliveries.
    pub async fn broadcast_updates(
        &self,
        refreshed: &HashMap<String, Quote>,
    ) -> Result<BroadcastReport> {
        let mut report = BroadcastReport::default();
        if refreshed.is_empty() {
            debug!("No refreshed quotes this cycle; skipping broadcast");
            return Ok(report);
        }

        let connections = self.subscriptions.get_all_client_connection_info().await?;
        if connections.is_empty() {
            debug!("No active subscriptions; skipping broadcast");
            return Ok(report);
        }

        // Projection pass: build each connection's payload before any send
        // so a slow socket cannot delay serialization for the rest.
        let mut outbound: Vec<(String, Vec<u8>)> = Vec::new();
        for (connection_id, subscription) in connections {
            let quotes: BTreeMap<&str, &Quote> = subscription
                .symbols
                .iter()
                .filter_map(|symbol| {
                    refreshed
                        .get(symbol)
                        .map(|quote| (symbol.as_str(), quote))
                })
                .collect();

            if quotes.is_empty() {
                report.skipped += 1;
                continue;
            }

            match serde_json::to_vec(&QuoteUpdatePayload { quotes }) {
                Ok(payload) => outbound.push((connection_id, payload)),
                Err(e) => {
                    warn!("Failed to serialize payload for {}: {}", connection_id, e);
                    report.record_failure(connection_id, e.to_string());
                }
            }
        }

        // Delivery pass: all sends in flight at once, each with its own
        // timeout so one stalled connection cannot hold up the cycle.
        let sends: Vec<_> = outbound
            .into_iter()
            .map(|(connection_id, payload)| async move {
                match tokio::time::timeout(
                    self.send_timeout,
                    self.channel.send(&connection_id, &payload),
                )
                .await
                {
                    Ok(Ok(())) => Ok(connection_id),
                    Ok(Err(e)) => Err((connection_id, e.to_string())),
                    Err(_) => Err((
                        connection_id,
                        format!("send timed out after {}ms", self.send_timeout.as_millis()),
                    )),
                }
            })
            .collect();

        for result in join_all(sends).await {
            match result {
                Ok(_) => report.delivered += 1,
                Err((connection_id, reason)) => {
                    warn!("Failed to push update to {}: {}", connection_id, reason);
                    report.record_failure(connection_id, reason);
                }
            }
        }

        info!("{}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeliveryError;
    use crate::subscriptions::InMemorySubscriptionStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use quotecast_market_data::Interval;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn quote(symbol: &str) -> Quote {
        Quote::ohlcv(
            symbol.to_string(),
            dec!(100),
            dec!(110),
            dec!(95),
            dec!(105),
            dec!(5000),
            Utc::now(),
            "MOCK".to_string(),
        )
    }

    fn refreshed(symbols: &[&str]) -> HashMap<String, Quote> {
        symbols
            .iter()
            .map(|s| (s.to_string(), quote(s)))
            .collect()
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Channel double that records payloads and can reject chosen
    /// connections.
    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<(String, Vec<u8>)>>,
        fail_connections: HashSet<String>,
    }

    impl RecordingChannel {
        fn failing_for(connections: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_connections: connections.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn payload_for(&self, connection_id: &str) -> Option<serde_json::Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .find(|(id, _)| id == connection_id)
                .map(|(_, payload)| serde_json::from_slice(payload).unwrap())
        }

        fn recipients(&self) -> HashSet<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(id, _)| id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PushChannel for RecordingChannel {
        async fn send(
            &self,
            connection_id: &str,
            payload: &[u8],
        ) -> std::result::Result<(), DeliveryError> {
            if self.fail_connections.contains(connection_id) {
                return Err(DeliveryError::Closed(connection_id.to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((connection_id.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    /// Channel double that never completes within a short timeout.
    struct StalledChannel;

    #[async_trait]
    impl PushChannel for StalledChannel {
        async fn send(
            &self,
            _connection_id: &str,
            _payload: &[u8],
        ) -> std::result::Result<(), DeliveryError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        }
    }

    async fn registry_with(entries: &[(&str, &[&str])]) -> Arc<SubscriptionService> {
        let service = Arc::new(SubscriptionService::new(Arc::new(
            InMemorySubscriptionStore::new(),
        )));
        for (connection_id, subscribed) in entries {
            service
                .create_subscriptions(connection_id, &symbols(subscribed), Interval::Daily)
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_payload_is_projected_onto_subscribed_set() {
        let registry = registry_with(&[("conn-1", &["B"])]).await;
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = BroadcastDispatcher::new(registry, channel.clone());

        let report = dispatcher
            .broadcast_updates(&refreshed(&["A", "B", "C"]))
            .await
            .unwrap();

        assert_eq!(report.delivered, 1);
        let payload = channel.payload_for("conn-1").unwrap();
        let quotes = payload["quotes"].as_object().unwrap();
        assert_eq!(quotes.len(), 1);
        assert!(quotes.contains_key("B"));
    }

    #[tokio::test]
    async fn test_payload_shape_is_quotes_keyed_by_symbol() {
        let registry = registry_with(&[("conn-1", &["AAPL"])]).await;
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = BroadcastDispatcher::new(registry, channel.clone());

        dispatcher
            .broadcast_updates(&refreshed(&["AAPL"]))
            .await
            .unwrap();

        let payload = channel.payload_for("conn-1").unwrap();
        assert_eq!(payload["quotes"]["AAPL"]["symbol"], "AAPL");
        assert!(payload["quotes"]["AAPL"]["close"].is_number());
    }

    #[tokio::test]
    async fn test_one_failing_connection_does_not_block_the_rest() {
        let registry = registry_with(&[
            ("conn-x", &["A"]),
            ("conn-y", &["A"]),
            ("conn-z", &["A"]),
        ])
        .await;
        let channel = Arc::new(RecordingChannel::failing_for(&["conn-x"]));
        let dispatcher = BroadcastDispatcher::new(registry, channel.clone());

        let report = dispatcher.broadcast_updates(&refreshed(&["A"])).await.unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].connection_id, "conn-x");
        let recipients = channel.recipients();
        assert!(recipients.contains("conn-y"));
        assert!(recipients.contains("conn-z"));
    }

    #[tokio::test]
    async fn test_connection_with_no_fresh_symbols_is_skipped() {
        let registry = registry_with(&[("conn-1", &["ZZZ"]), ("conn-2", &["A"])]).await;
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = BroadcastDispatcher::new(registry, channel.clone());

        let report = dispatcher.broadcast_updates(&refreshed(&["A"])).await.unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert!(!channel.recipients().contains("conn-1"));
    }

    #[tokio::test]
    async fn test_empty_refresh_sends_nothing() {
        let registry = registry_with(&[("conn-1", &["A"])]).await;
        let channel = Arc::new(RecordingChannel::default());
        let dispatcher = BroadcastDispatcher::new(registry, channel.clone());

        let report = dispatcher.broadcast_updates(&HashMap::new()).await.unwrap();

        assert_eq!(report.delivered, 0);
        assert_eq!(report.skipped, 0);
        assert!(channel.recipients().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_send_times_out_and_is_recorded() {
        let registry = registry_with(&[("conn-1", &["A"])]).await;
        let dispatcher = BroadcastDispatcher::new(registry, Arc::new(StalledChannel))
            .with_send_timeout(Duration::from_millis(10));

        let report = dispatcher.broadcast_updates(&refreshed(&["A"])).await.unwrap();

        assert_eq!(report.delivered, 0);
        assert_eq!(report.failed(), 1);
        assert!(report.failures[0].reason.contains("timed out"));
    }
}
