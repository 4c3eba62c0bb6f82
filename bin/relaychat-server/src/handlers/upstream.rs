//! HTTP client for the upstream completion service.

use relaychat_types::{TurnPayload, UpstreamRequest};
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::ServerError;

/// Pooled client that posts turn lists to the configured upstream URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    url: String,
    max_tokens: u32,
    mode: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("relaychat-server/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            max_tokens: config.max_tokens,
            mode: config.upstream_mode.clone(),
        })
    }

    /// Send `messages` upstream and return the successful response unread.
    ///
    /// A non-success status is turned into [`ServerError::Upstream`] carrying
    /// the upstream body text; connection failures become
    /// [`ServerError::Transport`].
    pub async fn complete(
        &self,
        messages: Vec<TurnPayload>,
        stream: bool,
    ) -> Result<reqwest::Response, ServerError> {
        let body = UpstreamRequest {
            messages,
            max_tokens: self.max_tokens,
            mode: self.mode.clone(),
            stream,
        };
        debug!(url = %self.url, turns = body.messages.len(), stream, "forwarding to upstream");

        let response = self.client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServerError::Upstream { status, body });
        }
        Ok(response)
    }
}
