use crate::routes::{api, health};
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "relaychat-server",
    description = "Chat relay in front of an OpenAI-compatible completion service",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.info.version = env!("CARGO_PKG_VERSION").to_owned();
    root.merge(health::HealthApi::openapi());
    root.merge(api::api_docs());
    root
}

/// Serves the generated document at `/api-docs/openapi.json`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(|| async { Json(get_docs()) }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn document_tracks_crate_version_and_routes() {
        let doc = get_docs();
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
        assert!(doc.paths.paths.contains_key("/api/chat"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
