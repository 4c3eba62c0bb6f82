pub mod chat;

use crate::state::AppState;
use utoipa::OpenApi;

use axum::Router;
use std::sync::Arc;

/// Routes nested under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(chat::router())
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    chat::ChatApi::openapi()
}
