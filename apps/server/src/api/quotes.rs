use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};

use quotecast_core::{RefreshOutcome, RefreshReport};
use quotecast_market_data::Quote;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeQuery {
    symbol: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    symbols: Vec<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    outcome: RefreshOutcome,
    #[serde(flatten)]
    report: RefreshReport,
}

/// Stored quotes for one symbol inside a closed time range.
async fn get_quotes_in_range(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<Quote>>> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Query parameter 'symbol' is required"))?;
    let start = parse_date_param(query.start_date.as_deref(), "startDate")?;
    let end = parse_date_param(query.end_date.as_deref(), "endDate")?;
    if start > end {
        return Err(ApiError::bad_request("startDate must not be after endDate"));
    }

    let quotes = state
        .quote_service
        .get_quotes_in_range(symbol, start, end)
        .await?;
    Ok(Json(quotes))
}

fn parse_date_param(raw: Option<&str>, name: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Query parameter '{}' is required", name)))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::bad_request(format!("Invalid '{}': {}", name, e)))
}

/// Refresh one symbol on demand. Returns the fresh quote without fanning it
/// out; subscribers see it on the next broadcast cycle.
async fn refresh_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Quote>> {
    let quote = state.quote_service.refresh_single(&symbol).await?;
    Ok(Json(quote))
}

/// Refresh a client-supplied symbol list and fan the successes out.
async fn refresh_quotes(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let report = state.quote_service.refresh_symbols(&body.symbols).await?;
    broadcast_report(&state, &report).await;
    Ok(Json(RefreshResponse {
        outcome: report.outcome(),
        report,
    }))
}

/// Refresh the provider's whole universe and fan the successes out.
async fn refresh_all_quotes(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RefreshResponse>> {
    let report = state.quote_service.refresh_all().await?;
    broadcast_report(&state, &report).await;
    Ok(Json(RefreshResponse {
        outcome: report.outcome(),
        report,
    }))
}

/// Delivery problems after an API-triggered refresh are logged, never
/// surfaced as an HTTP failure; the quotes themselves were stored.
async fn broadcast_report(state: &Arc<AppState>, report: &RefreshReport) {
    if let Err(e) = state.dispatcher.broadcast_updates(&report.quotes).await {
        tracing::warn!("Broadcast after refresh failed: {}", e);
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(get_quotes_in_range))
        .route("/quotes/refresh", post(refresh_quotes))
        .route("/quotes/refresh-all", post(refresh_all_quotes))
        .route("/quotes/{symbol}/refresh", post(refresh_quote))
}
