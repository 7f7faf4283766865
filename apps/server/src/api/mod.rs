//! HTTP API surface.
//!
//! Each submodule owns one resource and exposes a `router()`; `app_router`
//! merges them under `/api` and mounts the WebSocket endpoint at `/ws`.

pub mod health;
pub mod quotes;
pub mod symbols;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;
use crate::ws;

pub fn app_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .merge(health::router())
        .merge(quotes::router())
        .merge(symbols::router());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
