//! Refresh cycle result types.
//!
//! A refresh produces a transient [`RefreshReport`]: the successfully
//! refreshed quotes keyed by symbol, plus a failure entry per symbol that
//! could not be refreshed. The report classifies the cycle as full success,
//! partial success or total failure; the coordinator turns total failure
//! into a hard error because it signals a systemic outage rather than
//! sparse data.

use std::collections::HashMap;

use serde::Serialize;

use quotecast_market_data::Quote;

/// One symbol that failed during a refresh cycle.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    /// The symbol that failed.
    pub symbol: String,
    /// Why the fetch or persist failed.
    pub reason: String,
}

/// Classification of a completed refresh cycle.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshOutcome {
    /// Every attempted symbol succeeded (trivially true for an empty batch).
    FullSuccess,
    /// At least one symbol succeeded and at least one failed.
    PartialSuccess,
    /// Every attempted symbol failed.
    TotalFailure,
}

/// Outcome of one refresh cycle. Transient, never persisted.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Successfully refreshed quotes, keyed by symbol.
    pub quotes: HashMap<String, Quote>,
    /// Symbols that failed, with reasons, in completion order.
    pub failures: Vec<RefreshFailure>,
}

impl RefreshReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully refreshed quote, keyed by its symbol.
    pub fn add_success(&mut self, quote: Quote) {
        self.quotes.insert(quote.symbol.clone(), quote);
    }

    /// Record a per-symbol failure.
    pub fn add_failure(&mut self, symbol: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(RefreshFailure {
            symbol: symbol.into(),
            reason: reason.into(),
        });
    }

    /// Symbols attempted in this cycle.
    pub fn attempted(&self) -> usize {
        self.quotes.len() + self.failures.len()
    }

    /// Symbols refreshed successfully.
    pub fn succeeded(&self) -> usize {
        self.quotes.len()
    }

    /// Symbols that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when at least one symbol was attempted and none succeeded.
    pub fn is_total_failure(&self) -> bool {
        self.quotes.is_empty() && !self.failures.is_empty()
    }

    /// Classify the cycle.
    pub fn outcome(&self) -> RefreshOutcome {
        if self.is_total_failure() {
            RefreshOutcome::TotalFailure
        } else if self.failures.is_empty() {
            RefreshOutcome::FullSuccess
        } else {
            RefreshOutcome::PartialSuccess
        }
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!("Refreshed {} symbols successfully", self.succeeded())
        } else {
            format!(
                "Refreshed {} of {} symbols with {} failures",
                self.succeeded(),
                self.attempted(),
                self.failed()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn quote(symbol: &str) -> Quote {
        Quote::ohlcv(
            symbol.to_string(),
            dec!(100),
            dec!(110),
            dec!(95),
            dec!(105),
            dec!(5000),
            Utc::now(),
            "TEST".to_string(),
        )
    }

    #[test]
    fn test_empty_report_is_full_success() {
        let report = RefreshReport::new();
        assert_eq!(report.attempted(), 0);
        assert_eq!(report.outcome(), RefreshOutcome::FullSuccess);
        assert!(!report.is_total_failure());
    }

    #[test]
    fn test_all_successes_classify_as_full() {
        let mut report = RefreshReport::new();
        report.add_success(quote("AAPL"));
        report.add_success(quote("MSFT"));

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.outcome(), RefreshOutcome::FullSuccess);
        assert!(report.quotes.contains_key("AAPL"));
    }

    #[test]
    fn test_mixed_results_classify_as_partial() {
        let mut report = RefreshReport::new();
        report.add_success(quote("AAPL"));
        report.add_failure("MSFT", "Timeout: IEX");

        assert_eq!(report.outcome(), RefreshOutcome::PartialSuccess);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].symbol, "MSFT");
    }

    #[test]
    fn test_all_failures_classify_as_total() {
        let mut report = RefreshReport::new();
        report.add_failure("AAPL", "Timeout: IEX");
        report.add_failure("MSFT", "Timeout: IEX");

        assert!(report.is_total_failure());
        assert_eq!(report.outcome(), RefreshOutcome::TotalFailure);
    }

    #[test]
    fn test_summary_mentions_failures() {
        let mut report = RefreshReport::new();
        report.add_success(quote("AAPL"));
        report.add_failure("MSFT", "boom");

        let summary = report.summary();
        assert!(summary.contains("1 of 2"));
        assert!(summary.contains("1 failures"));
    }
}
