//! SQLite implementation of [`ChatStore`].
//!
//! `sqlx::migrate!("./migrations")` embeds the migrations at compile time,
//! relative to the crate root. The database location is chosen at runtime by
//! the URL passed to [`SqliteStore::connect`]. Timestamps are stored as unix
//! milliseconds.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use relaychat_types::{Conversation, Role, StoredMessage};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::{now_millis, ChatStore, StoreError};

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx SQLite URL, e.g. `"sqlite://relaychat.db"` or
    /// `"sqlite::memory:"` for tests.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database: keep exactly one alive.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(%url, "conversation store ready");
        Ok(Self { pool })
    }

    fn pool(&self) -> Result<&SqlitePool, StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(&self.pool)
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(|| {
        warn!(raw = ms, "timestamp out of range; using now");
        Utc::now()
    })
}

impl ChatStore for SqliteStore {
    async fn create_conversation(&self, id: &str, title: &str) -> Result<Conversation, StoreError> {
        let now = now_millis();
        sqlx::query(
            "INSERT INTO conversations (id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(id)
        .bind(title)
        .bind(now.timestamp_millis())
        .execute(self.pool()?)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                StoreError::Duplicate(id.to_owned())
            } else {
                StoreError::Database(e)
            }
        })?;
        Ok(Conversation {
            id: id.to_owned(),
            title: title.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let rows: Vec<(String, String, i64, i64)> = sqlx::query_as(
            "SELECT id, title, created_at, updated_at FROM conversations \
             ORDER BY updated_at DESC, created_at DESC",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, title, created_at, updated_at)| Conversation {
                id,
                title,
                created_at: from_millis(created_at),
                updated_at: from_millis(updated_at),
            })
            .collect())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        let now = now_millis();
        let mut tx = self.pool()?.begin().await?;

        let bumped = sqlx::query("UPDATE conversations SET updated_at = ?1 WHERE id = ?2")
            .bind(now.timestamp_millis())
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;
        if bumped.rows_affected() == 0 {
            return Err(StoreError::NotFound(conversation_id.to_owned()));
        }

        let inserted = sqlx::query(
            "INSERT INTO messages (conversation_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(conversation_id)
        .bind(<&'static str>::from(role))
        .bind(content)
        .bind(now.timestamp_millis())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(StoredMessage {
            id: inserted.last_insert_rowid(),
            conversation_id: conversation_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at: now,
        })
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<StoredMessage>, StoreError> {
        let rows: Vec<(i64, String, String, String, i64)> = sqlx::query_as(
            "SELECT id, conversation_id, role, content, created_at FROM messages \
             WHERE conversation_id = ?1 ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(self.pool()?)
        .await?;
        rows.into_iter()
            .map(|(id, conversation_id, role, content, created_at)| -> Result<_, StoreError> {
                Ok(StoredMessage {
                    id,
                    conversation_id,
                    role: Role::parse(&role)?,
                    content,
                    created_at: from_millis(created_at),
                })
            })
            .collect()
    }

    async fn update_conversation_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let updated = sqlx::query("UPDATE conversations SET title = ?1 WHERE id = ?2")
            .bind(title)
            .bind(id)
            .execute(self.pool()?)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_owned()));
        }
        Ok(())
    }

    async fn delete_conversation(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.pool()?.begin().await?;
        let messages = sqlx::query("DELETE FROM messages WHERE conversation_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM conversations WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(conversation = %id, messages = messages.rows_affected(), "conversation deleted");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
