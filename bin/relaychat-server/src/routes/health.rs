//! Relay heartbeat.
//!
//! Reports how the relay is wired: which upstream it forwards to and which
//! response mode applies when a request does not choose one. The upstream
//! itself is not probed.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(RelayHealth)))]
pub struct HealthApi;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelayHealth {
    pub status: String,
    pub version: String,
    pub upstream: String,
    pub stream_by_default: bool,
    pub max_tokens: u32,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Relay is up", body = RelayHealth))
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<RelayHealth> {
    let cfg = &state.config;
    Json(RelayHealth {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        upstream: cfg.upstream_url.clone(),
        stream_by_default: cfg.stream_by_default,
        max_tokens: cfg.max_tokens,
    })
}
