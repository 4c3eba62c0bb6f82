//! Sending the turn history to the relay.

use std::future::Future;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use relaychat_types::{CompletionResponse, RelayRequest, TurnPayload, EVENT_STREAM};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Raw event-stream bytes as they arrive from the relay.
pub type ByteStream = BoxStream<'static, Result<Bytes, ClientError>>;

/// What the relay answered with.
pub enum RelayReply {
    /// Buffered mode: the whole completion body.
    Complete(CompletionResponse),
    /// Streaming mode: the undecoded event stream.
    Stream(ByteStream),
}

impl std::fmt::Debug for RelayReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayReply::Complete(c) => f.debug_tuple("Complete").field(c).finish(),
            RelayReply::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Sends one request per submission. Dropping the returned future (or the
/// stream inside a [`RelayReply::Stream`]) aborts the request.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        messages: Vec<TurnPayload>,
    ) -> impl Future<Output = Result<RelayReply, ClientError>> + Send;
}

/// [`ChatTransport`] over HTTP against the relay endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl RelayClient {
    /// `stream` overrides the relay's default response mode when set.
    pub fn new(url: impl Into<String>, stream: Option<bool>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("relaychat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            stream,
        })
    }
}

impl ChatTransport for RelayClient {
    async fn send(&self, messages: Vec<TurnPayload>) -> Result<RelayReply, ClientError> {
        debug!(url = %self.url, turns = messages.len(), "sending chat request");
        let request = RelayRequest {
            messages,
            stream: self.stream,
        };
        let resp = self.client.post(&self.url).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown status").to_owned());
            warn!(%status, %message, "relay rejected chat request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let is_stream = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with(EVENT_STREAM));

        if is_stream {
            let bytes = resp.bytes_stream().map_err(ClientError::from).boxed();
            return Ok(RelayReply::Stream(bytes));
        }

        let body = resp.bytes().await?;
        Ok(RelayReply::Complete(serde_json::from_slice(&body)?))
    }
}
