//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to a market data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (unexpected status, bad payload).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");
    }

    #[test]
    fn test_rate_limited_display() {
        let error = MarketDataError::RateLimited {
            provider: "IEX".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: IEX");
    }

    #[test]
    fn test_timeout_display() {
        let error = MarketDataError::Timeout {
            provider: "IEX".to_string(),
        };
        assert_eq!(format!("{}", error), "Timeout: IEX");
    }

    #[test]
    fn test_provider_error_display() {
        let error = MarketDataError::ProviderError {
            provider: "IEX".to_string(),
            message: "HTTP 500 Internal Server Error".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: IEX - HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn test_validation_failed_display() {
        let error = MarketDataError::ValidationFailed {
            message: "AAPL: high is below max(open, close)".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Validation failed: AAPL: high is below max(open, close)"
        );
    }
}
