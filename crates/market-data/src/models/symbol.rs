use serde::{Deserialize, Serialize};

/// One row of the provider's symbol reference directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    /// Ticker symbol
    pub symbol: String,

    /// Display name of the listed asset
    pub name: String,

    /// Listing exchange, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Trading currency, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Whether the provider currently serves quotes for this symbol
    pub enabled: bool,
}

impl SymbolInfo {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            exchange: None,
            currency: None,
            enabled: true,
        }
    }
}
