//! Client configuration, loaded from environment variables.

/// Settings for a client session and the CLI that drives it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay endpoint (default: `"http://127.0.0.1:3000/api/chat"`).
    pub relay_url: String,

    /// sqlx SQLite URL of the local conversation store
    /// (default: `"sqlite://relaychat.db"`).
    pub database_url: String,

    /// `tracing` filter string (default: `"warn"`).
    pub log_level: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        Self {
            relay_url: env_or("RELAYCHAT_RELAY_URL", "http://127.0.0.1:3000/api/chat"),
            database_url: env_or("RELAYCHAT_DATABASE_URL", "sqlite://relaychat.db"),
            log_level: env_or("RELAYCHAT_LOG", "warn"),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
