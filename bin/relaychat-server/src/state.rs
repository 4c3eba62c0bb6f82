//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::handlers::upstream::UpstreamClient;

/// State shared across all HTTP handlers.
///
/// Read-only after startup: concurrent requests share it without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Pooled HTTP client bound to the upstream completion endpoint.
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            upstream,
        })
    }
}
