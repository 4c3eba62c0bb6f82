//! The chat relay (`POST /api/chat`).
//!
//! Forwards the caller's turn list to the upstream completion service with
//! the relay's system prompt applied. In buffered mode the upstream JSON body
//! is returned as-is; in streaming mode the upstream bytes are forwarded as
//! they arrive, tagged `text/event-stream`, without re-framing.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequest, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::TryStreamExt;
use relaychat_types::{CompletionResponse, RelayRequest, Role, TurnPayload, EVENT_STREAM};
use tracing::{debug, info, warn};
use utoipa::OpenApi;

use crate::error::{ErrorBody, ServerError};
use crate::handlers::prompt::apply_system_prompt;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(relay_chat),
    components(schemas(RelayRequest, TurnPayload, Role, CompletionResponse, ErrorBody))
)]
pub struct ChatApi;

/// JSON extractor whose rejection is reported as a [`ServerError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ServerError))]
pub struct RelayJson<T>(pub T);

/// Register the relay route.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(relay_chat))
}

/// Relay a chat request upstream.
///
/// `stream` in the body selects the response mode; without it the server
/// default applies.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = RelayRequest,
    responses(
        (status = 200, description = "Buffered completion, or the relayed event stream", body = CompletionResponse),
        (status = 400, description = "Malformed turn list", body = ErrorBody),
        (status = 500, description = "Upstream unreachable", body = ErrorBody),
    )
)]
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    RelayJson(req): RelayJson<RelayRequest>,
) -> Result<Response, ServerError> {
    let stream = req.stream.unwrap_or(state.config.stream_by_default);
    let messages = apply_system_prompt(req.messages, &state.config.system_prompt);
    debug!(turns = messages.len(), stream, "chat relay request");

    let upstream = state.upstream.complete(messages, stream).await?;

    if stream {
        return Ok(relay_stream(upstream));
    }

    let body: serde_json::Value = upstream.json().await.map_err(|e| {
        ServerError::Internal(format!("upstream returned an unreadable body: {e}"))
    })?;
    info!("buffered completion relayed");
    Ok(Json(body).into_response())
}

fn relay_stream(upstream: reqwest::Response) -> Response {
    let bytes = upstream
        .bytes_stream()
        .inspect_err(|e| warn!(error = %e, "upstream stream interrupted"));
    (
        [
            (header::CONTENT_TYPE, EVENT_STREAM),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(bytes),
    )
        .into_response()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
