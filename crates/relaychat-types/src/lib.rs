//! Shared data model for relaychat.
//!
//! The relay server and the client session agree on these types: the chat
//! [`Role`] and [`ChatTurn`], the persisted [`Conversation`] /
//! [`StoredMessage`] rows, and the JSON payloads exchanged with the relay and
//! the upstream completion service (see [`wire`]).

pub mod conversation;
pub mod error;
pub mod role;
pub mod turn;
pub mod wire;

pub use conversation::{Conversation, StoredMessage};
pub use error::TypesError;
pub use role::Role;
pub use turn::{ChatTurn, TurnPayload};
pub use wire::{
    CompletionResponse, RelayRequest, StreamChunk, UpstreamRequest, DATA_PREFIX, DONE_SENTINEL,
    EVENT_STREAM,
};
