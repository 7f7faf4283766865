use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Json, Router};

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    status: &'static str,
    provider: String,
    active_connections: usize,
    tracked_connections: usize,
}

/// Liveness snapshot: provider in use, live sockets, tracked subscriptions.
async fn get_health(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthStatus>> {
    let tracked = state
        .subscription_service
        .get_all_client_connection_info()
        .await?;
    Ok(Json(HealthStatus {
        status: "ok",
        provider: state.provider_id.clone(),
        active_connections: state.connections.active_connections(),
        tracked_connections: tracked.len(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}
