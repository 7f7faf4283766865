use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use quotecast_core::symbols::DirectoryRefreshReport;
use quotecast_market_data::SymbolInfo;

/// Full symbol directory, sorted by symbol.
async fn list_symbols(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SymbolInfo>>> {
    let items = state.symbol_directory.list_directory().await?;
    Ok(Json(items))
}

/// Re-pull the reference directory from the provider.
async fn refresh_directory(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DirectoryRefreshReport>> {
    let report = state.symbol_directory.refresh_directory().await?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/symbols", get(list_symbols))
        .route("/symbols/refresh", post(refresh_directory))
}
