//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are converted to a JSON
//! `{"error": "..."}` body with an appropriate status code.
//!
//! Upstream failures keep the upstream status code. Transport and internal
//! errors are logged with full detail but the caller only sees a generic
//! message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Message returned for every failure the caller cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error body of every non-success relay response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// All errors that can occur in the relaychat-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body could not be decoded into a turn list.
    #[error("rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, body: String },

    /// The upstream could not be reached or the connection failed.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::Rejected { status, message } => {
                warn!(%status, %message, "rejected malformed chat request");
                (*status, message.clone())
            }
            ServerError::Upstream { status, body } => {
                error!(%status, body = %body, "LLM API error");
                // Only the standard phrase is known; a custom one sent by the
                // upstream is not carried through reqwest.
                let reason = match status.canonical_reason() {
                    Some(phrase) => phrase.to_owned(),
                    None => status.as_u16().to_string(),
                };
                (*status, format!("LLM API Error: {reason}"))
            }
            ServerError::Transport(e) => {
                error!(error = %e, "proxy error: upstream unreachable");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_owned())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_owned())
            }
        };
        (status, Json(ErrorBody { error: client_message })).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_status_is_mirrored() {
        let resp = ServerError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_json(resp).await["error"], "LLM API Error: Too Many Requests");
    }

    #[tokio::test]
    async fn non_standard_status_reports_its_code() {
        let status = StatusCode::from_u16(520).unwrap();
        let resp = ServerError::Upstream {
            status,
            body: "origin error".into(),
        }
        .into_response();
        assert_eq!(resp.status(), status);
        assert_eq!(body_json(resp).await["error"], "LLM API Error: 520");
    }

    #[tokio::test]
    async fn internal_detail_is_hidden() {
        let resp = ServerError::Internal("secret path /var/lib".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], INTERNAL_ERROR_MESSAGE);
    }
}
