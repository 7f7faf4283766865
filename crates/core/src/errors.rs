//! Core error types for the quote refresh engine.
//!
//! This module defines store-agnostic error types. Storage-specific errors
//! are converted to these types by the store implementations.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use quotecast_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quote refresh engine.
///
/// Per-symbol failures inside a batch refresh are not errors: they are
/// recorded on the refresh report and the batch continues. This type covers
/// the cases that do propagate, such as single-record store mutations and
/// the total-failure outcome of a batch.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Every symbol in a refresh batch failed. This signals a systemic
    /// outage (provider or store down), not sparse data, and callers must
    /// treat it as a hard error.
    #[error("Quote refresh failed for all {attempted} symbols")]
    RefreshAllFailed { attempted: usize },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Store-agnostic error type for quote, subscription and symbol stores.
///
/// This enum uses `String` for all error details, allowing store
/// implementations to convert backend-specific errors into this format.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A store read failed to execute.
    #[error("Store read failed: {0}")]
    ReadFailed(String),

    /// A store write failed to execute.
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Errors delivering a payload to one connection over the push channel.
///
/// Expected and tolerated during a broadcast: stale connections are logged
/// and skipped, never fatal to the fan out.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The connection id has no live channel.
    #[error("Connection not found: {0}")]
    NotFound(String),

    /// The connection existed but its channel is closed.
    #[error("Connection closed: {0}")]
    Closed(String),

    /// The transport rejected the send.
    #[error("Send failed for {connection_id}: {message}")]
    SendFailed {
        connection_id: String,
        message: String,
    },
}

/// Validation errors for caller input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
