//! Subscription domain model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use quotecast_market_data::Interval;

/// One client connection's subscription record.
///
/// The registry keeps exactly one record per connection id. Symbols live in
/// a sorted set so re-subscribing is a plain union and the wire form is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Opaque identifier of the client connection.
    pub connection_id: String,
    /// Symbols this connection receives updates for.
    pub symbols: BTreeSet<String>,
    /// Cadence label the connection last asked for.
    #[serde(default)]
    pub interval: Interval,
}

impl Subscription {
    pub fn new(connection_id: impl Into<String>, symbols: &[String], interval: Interval) -> Self {
        Self {
            connection_id: connection_id.into(),
            symbols: symbols.iter().cloned().collect(),
            interval,
        }
    }

    /// Symbols as a sorted vector, the shape wire payloads use.
    pub fn symbols_vec(&self) -> Vec<String> {
        self.symbols.iter().cloned().collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dedupes_and_sorts() {
        let subscription = Subscription::new(
            "conn-1",
            &[
                "MSFT".to_string(),
                "AAPL".to_string(),
                "MSFT".to_string(),
            ],
            Interval::Seconds,
        );
        assert_eq!(subscription.symbols_vec(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let subscription =
            Subscription::new("conn-1", &["AAPL".to_string()], Interval::Minutes);
        let json = serde_json::to_value(&subscription).unwrap();
        assert_eq!(json["connectionId"], "conn-1");
        assert_eq!(json["symbols"][0], "AAPL");
        assert_eq!(json["interval"], "m");
    }

    #[test]
    fn test_interval_defaults_when_absent() {
        let subscription: Subscription =
            serde_json::from_str(r#"{"connectionId":"c","symbols":["AAPL"]}"#).unwrap();
        assert_eq!(subscription.interval, Interval::Daily);
    }
}
