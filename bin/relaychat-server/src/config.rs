//! Server configuration, loaded from environment variables at startup.

/// Instruction the relay places in the `system` turn of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer clearly and concisely, using Markdown where it helps.";

/// Runtime configuration for relaychat-server.
///
/// Every field has a default so the relay starts without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Chat-completion endpoint every request is forwarded to.
    pub upstream_url: String,

    /// Token budget sent as `max_tokens` on each upstream request.
    pub max_tokens: u32,

    /// Value of the upstream `mode` field (default: `"instruction"`).
    pub upstream_mode: String,

    /// Fixed instruction injected as (or written over) the system turn.
    pub system_prompt: String,

    /// Response mode used when a request does not set `stream` itself.
    pub stream_by_default: bool,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI document at `/api-docs/openapi.json`.
    pub enable_openapi: bool,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_address: env_or(&lookup, "RELAYCHAT_BIND", "0.0.0.0:3000"),
            upstream_url: env_or(
                &lookup,
                "RELAYCHAT_UPSTREAM_URL",
                "http://168.119.2.104:8989/v1/chat/completions",
            ),
            max_tokens: parse_env(&lookup, "RELAYCHAT_MAX_TOKENS", 1000),
            upstream_mode: env_or(&lookup, "RELAYCHAT_UPSTREAM_MODE", "instruction"),
            system_prompt: env_or(&lookup, "RELAYCHAT_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
            stream_by_default: flag(&lookup, "RELAYCHAT_STREAM", true),
            cors_allowed_origins: lookup("RELAYCHAT_CORS_ORIGINS").filter(|v| !v.trim().is_empty()),
            enable_openapi: flag(&lookup, "RELAYCHAT_ENABLE_OPENAPI", true),
            log_level: env_or(&lookup, "RELAYCHAT_LOG", "info"),
            log_json: flag(&lookup, "RELAYCHAT_LOG_JSON", false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
