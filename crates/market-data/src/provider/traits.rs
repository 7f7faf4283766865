//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Quote, SymbolInfo};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The refresh coordinator only needs the symbol universe and a latest
/// quote per symbol; everything else is provider-internal.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use quotecast_market_data::provider::MarketDataProvider;
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     // ... implement list_symbol_details and get_quote
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "IEX" or "SIMULATED".
    /// Used for logging and as the `source` field on quotes.
    fn id(&self) -> &'static str;

    /// Fetch the provider's full symbol reference directory.
    async fn list_symbol_details(&self) -> Result<Vec<SymbolInfo>, MarketDataError>;

    /// Fetch the plain symbol universe.
    ///
    /// Default implementation projects [`list_symbol_details`](Self::list_symbol_details)
    /// down to ticker strings.
    async fn list_symbols(&self) -> Result<Vec<String>, MarketDataError> {
        Ok(self
            .list_symbol_details()
            .await?
            .into_iter()
            .map(|item| item.symbol)
            .collect())
    }

    /// Fetch the latest quote for one symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
