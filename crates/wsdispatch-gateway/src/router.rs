//! Axum router wiring (HTTP -> WS upgrade).
//!
//! Exposes the configured WebSocket path and `/healthz`.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let ws_path = state.cfg().gateway.path.clone();
    Router::new()
        .route(&ws_path, get(transport::ws::ws_upgrade))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
