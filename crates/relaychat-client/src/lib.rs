//! Client session for relaychat.
//!
//! A [`ChatSession`] keeps the turns of the current conversation in memory,
//! mirrors confirmed turns into a [`ChatStore`], sends the history to the
//! relay through a [`ChatTransport`] and renders the assistant reply through a
//! [`RenderSink`] fragment by fragment as the event stream arrives.

pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod sse;
pub mod store;
pub mod transport;

pub use config::ClientConfig;
pub use error::ClientError;
pub use render::{NullSink, RenderSink};
pub use session::{ChatSession, SessionPhase, SubmitOutcome, DEFAULT_TITLE, FALLBACK_ERROR_MESSAGE};
pub use sse::{SseDecoder, SseLine};
pub use store::{ChatStore, MemoryStore, SqliteStore, StoreError};
pub use transport::{ByteStream, ChatTransport, RelayClient, RelayReply};

pub use tokio_util::sync::CancellationToken;
