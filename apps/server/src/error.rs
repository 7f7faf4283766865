//! API error type mapping engine errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use quotecast_core::errors::StoreError;
use quotecast_core::Error as CoreError;
use quotecast_market_data::MarketDataError;

pub type ApiResult<T> = Result<T, ApiError>;

/// An HTTP status plus a client-safe message, rendered as
/// `{"error": message}`.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("API error {}: {}", self.status.as_u16(), self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            CoreError::MarketData(MarketDataError::SymbolNotFound(_)) => StatusCode::NOT_FOUND,
            CoreError::MarketData(MarketDataError::RateLimited { .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            // A refresh where every symbol failed means the upstream
            // provider or store is down, not that the request was bad.
            CoreError::RefreshAllFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}
