//! In-memory [`ChatStore`] for tests and throwaway sessions.

use relaychat_types::{Conversation, Role, StoredMessage};
use tokio::sync::Mutex;

use super::{now_millis, ChatStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    conversations: Vec<Conversation>,
    messages: Vec<StoredMessage>,
    next_id: i64,
    closed: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn open(&mut self) -> Result<&mut Self, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(self)
    }

    fn conversation_mut(&mut self, id: &str) -> Result<&mut Conversation, StoreError> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }
}

impl ChatStore for MemoryStore {
    async fn create_conversation(&self, id: &str, title: &str) -> Result<Conversation, StoreError> {
        let mut guard = self.inner.lock().await;
        let inner = guard.open()?;
        if inner.conversations.iter().any(|c| c.id == id) {
            return Err(StoreError::Duplicate(id.to_owned()));
        }
        let now = now_millis();
        let conv = Conversation {
            id: id.to_owned(),
            title: title.to_owned(),
            created_at: now,
            updated_at: now,
        };
        inner.conversations.push(conv.clone());
        Ok(conv)
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let mut guard = self.inner.lock().await;
        let mut all = guard.open()?.conversations.clone();
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(all)
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        let mut guard = self.inner.lock().await;
        let inner = guard.open()?;
        let now = now_millis();
        inner.conversation_mut(conversation_id)?.updated_at = now;

        inner.next_id += 1;
        let msg = StoredMessage {
            id: inner.next_id,
            conversation_id: conversation_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at: now,
        };
        inner.messages.push(msg.clone());
        Ok(msg)
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>, StoreError> {
        let mut guard = self.inner.lock().await;
        let mut found: Vec<_> = guard
            .open()?
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn update_conversation_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        guard.open()?.conversation_mut(id)?.title = title.to_owned();
        Ok(())
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        let inner = guard.open()?;
        // Both removals happen under one lock acquisition.
        inner.messages.retain(|m| m.conversation_id != id);
        inner.conversations.retain(|c| c.id != id);
        Ok(())
    }

    async fn close(&self) {
        self.inner.lock().await.closed = true;
    }
}
