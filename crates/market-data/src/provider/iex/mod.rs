//! IEX-style market data provider implementation.
//!
//! This module fetches data from an IEX Cloud compatible API:
//! - Symbol directory via the `ref-data/symbols` endpoint
//! - Latest quotes via the `stock/{symbol}/quote` endpoint
//!
//! Authentication is a `token` query parameter on every request.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{Quote, SymbolInfo};
use crate::provider::MarketDataProvider;

const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";
const PROVIDER_ID: &str = "IEX";

/// IEX-style market data provider.
///
/// Talks to any IEX Cloud compatible endpoint (production or sandbox);
/// the base URL and token come from configuration.
pub struct IexProvider {
    client: Client,
    base_url: String,
    token: String,
}

// ============================================================================
// Response structures for the IEX API
// ============================================================================

/// One entry of the `ref-data/symbols` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexSymbolItem {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    is_enabled: Option<bool>,
}

/// The `stock/{symbol}/quote` response, reduced to the fields we map
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexQuoteResponse {
    #[serde(default)]
    symbol: Option<String>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    #[serde(default)]
    latest_price: Option<f64>,
    #[serde(default)]
    latest_volume: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    /// Millisecond epoch of the latest update
    #[serde(default)]
    latest_update: Option<i64>,
}

impl IexSymbolItem {
    fn into_symbol_info(self) -> SymbolInfo {
        SymbolInfo {
            name: self.name.unwrap_or_else(|| self.symbol.clone()),
            symbol: self.symbol,
            exchange: self.exchange,
            currency: self.currency,
            enabled: self.is_enabled.unwrap_or(true),
        }
    }
}

// ============================================================================
// IexProvider implementation
// ============================================================================

impl IexProvider {
    /// Create a new IEX provider with the given base URL and API token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Create a provider against the public IEX Cloud endpoint.
    pub fn with_default_base_url(token: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, token)
    }

    /// Make an authenticated request against the API.
    async fn fetch(&self, path: &str) -> Result<String, MarketDataError> {
        let endpoint = format!("{}/{}", self.base_url, path);
        let url = reqwest::Url::parse_with_params(&endpoint, &[("token", self.token.as_str())])
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            })?;

        debug!(
            "IEX request: {}",
            url.as_str().replace(&self.token, "***")
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(path.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    /// Convert a JSON number into a Decimal price.
    fn parse_decimal(value: f64) -> Option<Decimal> {
        Decimal::try_from(value).ok()
    }

    /// Convert a millisecond epoch into a UTC timestamp.
    fn parse_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }

    fn quote_from_response(
        symbol: &str,
        response: IexQuoteResponse,
    ) -> Result<Quote, MarketDataError> {
        let close = response
            .close
            .or(response.latest_price)
            .and_then(Self::parse_decimal)
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("{}: quote response has no close price", symbol),
            })?;

        let (open, high, low) = match (response.open, response.high, response.low) {
            (Some(open), Some(high), Some(low)) => (
                Self::parse_decimal(open),
                Self::parse_decimal(high),
                Self::parse_decimal(low),
            ),
            _ => (None, None, None),
        };
        let (open, high, low) = match (open, high, low) {
            (Some(open), Some(high), Some(low)) => (open, high, low),
            _ => {
                return Err(MarketDataError::ValidationFailed {
                    message: format!("{}: quote response has incomplete OHLC data", symbol),
                })
            }
        };

        let volume = response
            .latest_volume
            .or(response.volume)
            .and_then(Self::parse_decimal)
            .unwrap_or(Decimal::ZERO);

        let timestamp = response
            .latest_update
            .and_then(Self::parse_millis)
            .unwrap_or_else(Utc::now);

        let quote = Quote::ohlcv(
            response.symbol.unwrap_or_else(|| symbol.to_string()),
            open,
            high,
            low,
            close,
            volume,
            timestamp,
            PROVIDER_ID.to_string(),
        );
        quote.validate()?;
        Ok(quote)
    }
}

// ============================================================================
// MarketDataProvider trait implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for IexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn list_symbol_details(&self) -> Result<Vec<SymbolInfo>, MarketDataError> {
        let text = self.fetch("ref-data/symbols").await?;
        let items: Vec<IexSymbolItem> =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse symbol directory: {}", e),
            })?;

        debug!("IEX: fetched {} directory entries", items.len());

        Ok(items
            .into_iter()
            .map(IexSymbolItem::into_symbol_info)
            .collect())
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let text = self
            .fetch(&format!("stock/{}/quote", symbol))
            .await
            .map_err(|e| match e {
                MarketDataError::SymbolNotFound(_) => {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                }
                other => other,
            })?;

        let response: IexQuoteResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse quote response: {}", e),
            })?;

        Self::quote_from_response(symbol, response)
    }
}
