use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// One message of a conversation as held in memory by a client session.
///
/// Turns are values: the streaming loop never mutates a turn, it builds a new
/// one with [`ChatTurn::with_content`] and swaps it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Same role and timestamp, new content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            role: self.role,
            content: content.into(),
            created_at: self.created_at,
        }
    }

    /// `true` when the content is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// The `{role, content}` projection of a turn sent to the relay and upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TurnPayload {
    pub role: Role,
    pub content: String,
}

impl TurnPayload {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ChatTurn> for TurnPayload {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn with_content_keeps_role_and_timestamp() {
        let placeholder = ChatTurn::new(Role::Assistant, "");
        let updated = placeholder.with_content("Hel");
        assert_eq!(updated.role, Role::Assistant);
        assert_eq!(updated.created_at, placeholder.created_at);
        assert_eq!(updated.content, "Hel");
        assert_eq!(placeholder.content, "");
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(ChatTurn::new(Role::User, "  \n").is_blank());
        assert!(!ChatTurn::new(Role::User, " hi ").is_blank());
    }

    #[test]
    fn payload_wire_shape() {
        let turn = ChatTurn::new(Role::User, "hi");
        let json = serde_json::to_value(TurnPayload::from(&turn)).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
    }
}
