//! JSON payloads exchanged between the client, the relay and the upstream
//! completion service.
//!
//! Only the fields relaychat reads are modelled; everything else the
//! upstream sends is ignored on decode.

use serde::{Deserialize, Serialize};

use crate::turn::TurnPayload;

/// Prefix of an event-stream data line.
pub const DATA_PREFIX: &str = "data: ";
/// Payload of the data line that marks the end of a stream.
pub const DONE_SENTINEL: &str = "[DONE]";
/// Content type of a streamed relay response.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RelayRequest {
    pub messages: Vec<TurnPayload>,
    /// Per-request override of the relay's default response mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Body the relay sends to the upstream completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpstreamRequest {
    pub messages: Vec<TurnPayload>,
    pub max_tokens: u32,
    pub mode: String,
    pub stream: bool,
}

/// Buffered completion body: `{"choices":[{"message":{"content":"..."}}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, if the upstream produced one.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

/// One streamed event: `{"choices":[{"delta":{"content":"..."}}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StreamDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl StreamChunk {
    /// Incremental text carried by this chunk.
    ///
    /// `None` when the chunk has no choice or the first choice's delta has no
    /// `content` (role announcements, finish markers, usage chunks).
    pub fn fragment(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::role::Role;

    #[test]
    fn fragment_present() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"id":"x","choices":[{"index":0,"delta":{"content":"Hel"}}]}"#)
                .unwrap();
        assert_eq!(chunk.fragment(), Some("Hel"));
    }

    #[test]
    fn fragment_absent_is_none() {
        let role_only: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(role_only.fragment(), None);

        let finished: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(finished.fragment(), None);

        let no_choices: StreamChunk = serde_json::from_str(r#"{"usage":{}}"#).unwrap();
        assert_eq!(no_choices.fragment(), None);
    }

    #[test]
    fn completion_content() {
        let resp: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hello"}}]}"#).unwrap();
        assert_eq!(resp.content(), Some("hello"));

        let empty: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.content(), None);
    }

    #[test]
    fn relay_request_stream_flag_is_optional() {
        let req: RelayRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert_eq!(req.stream, None);
        assert_eq!(req.messages, vec![TurnPayload::new(Role::User, "hi")]);
    }

    #[test]
    fn malformed_turn_list_is_rejected() {
        assert!(serde_json::from_str::<RelayRequest>(r#"{"messages":"hi"}"#).is_err());
        assert!(
            serde_json::from_str::<RelayRequest>(r#"{"messages":[{"role":"bot","content":"x"}]}"#)
                .is_err()
        );
    }
}
