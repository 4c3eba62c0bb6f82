//! Conversation persistence.
//!
//! [`ChatStore`] is the capability interface the client session depends on.
//! [`SqliteStore`] is the real implementation; [`MemoryStore`] is a fake for
//! tests. The store is injected into the session and has an explicit
//! `connect`/`close` lifecycle, there is no process-wide handle.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::future::Future;

use chrono::{DateTime, Utc};
use relaychat_types::{Conversation, Role, StoredMessage, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt row: {0}")]
    Types(#[from] TypesError),

    #[error("conversation {0} not found")]
    NotFound(String),

    #[error("conversation {0} already exists")]
    Duplicate(String),

    #[error("store is closed")]
    Closed,
}

pub trait ChatStore: Send + Sync + 'static {
    fn create_conversation(
        &self,
        id: &str,
        title: &str,
    ) -> impl Future<Output = Result<Conversation, StoreError>> + Send;

    /// Most recently updated first.
    fn list_conversations(
        &self,
    ) -> impl Future<Output = Result<Vec<Conversation>, StoreError>> + Send;

    /// Appends a message and bumps the owning conversation's `updated_at`.
    fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> impl Future<Output = Result<StoredMessage, StoreError>> + Send;

    /// Ordered by creation time, then row id.
    fn list_messages(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Vec<StoredMessage>, StoreError>> + Send;

    fn update_conversation_title(
        &self,
        id: &str,
        title: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes the conversation and all of its messages atomically.
    fn delete_conversation(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// Current time at the millisecond precision rows are stored with.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
