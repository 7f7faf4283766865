use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// A priced snapshot for one symbol at a point in time.
///
/// Quotes are immutable once written: a refresh produces a new quote rather
/// than mutating an old one. All four prices are required and must satisfy
/// the OHLC bounds checked by [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol this quote belongs to
    pub symbol: String,

    /// Opening price
    pub open: Decimal,

    /// High price
    pub high: Decimal,

    /// Low price
    pub low: Decimal,

    /// Closing/current price
    pub close: Decimal,

    /// Trading volume
    pub volume: Decimal,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Source of the quote (IEX, SIMULATED, etc.)
    pub source: String,
}

impl Quote {
    /// Create a full OHLCV quote
    #[allow(clippy::too_many_arguments)]
    pub fn ohlcv(
        symbol: String,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        timestamp: DateTime<Utc>,
        source: String,
    ) -> Self {
        Self {
            symbol,
            open,
            high,
            low,
            close,
            volume,
            timestamp,
            source,
        }
    }

    /// Check the quote against the model bounds: non-empty symbol, positive
    /// prices, `high >= max(open, close)`, `low <= min(open, close)` and a
    /// non-negative volume.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.symbol.trim().is_empty() {
            return Err(MarketDataError::ValidationFailed {
                message: "quote has an empty symbol".to_string(),
            });
        }
        if self.open <= Decimal::ZERO
            || self.high <= Decimal::ZERO
            || self.low <= Decimal::ZERO
            || self.close <= Decimal::ZERO
        {
            return Err(MarketDataError::ValidationFailed {
                message: format!("{}: prices must be positive", self.symbol),
            });
        }
        if self.high < self.open.max(self.close) {
            return Err(MarketDataError::ValidationFailed {
                message: format!("{}: high is below max(open, close)", self.symbol),
            });
        }
        if self.low > self.open.min(self.close) {
            return Err(MarketDataError::ValidationFailed {
                message: format!("{}: low is above min(open, close)", self.symbol),
            });
        }
        if self.volume < Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("{}: volume must be non-negative", self.symbol),
            });
        }
        Ok(())
    }
}
