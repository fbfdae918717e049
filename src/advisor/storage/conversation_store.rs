//! Conversation storage backed by `SQLite`.

use std::future::Future;
use std::pin::Pin;

use chrono::DateTime;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::advisor::core::config::AdvisorConfig;
use crate::advisor::core::conversation::Conversation;
use crate::advisor::core::errors::AdvisorResult;
use crate::advisor::core::ids::{ConversationId, UserId};

/// Boxed future type for conversation store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Conversation repository trait.
pub trait ConversationStore: Send + Sync {
    /// Persist a freshly created conversation.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn save(&self, conversation: &Conversation) -> StoreFuture<'_, AdvisorResult<()>>;

    /// Look up a conversation by id.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn find_by_id(
        &self,
        id: ConversationId,
    ) -> StoreFuture<'_, AdvisorResult<Option<Conversation>>>;
}

/// `SQLite` implementation of the conversation store.
pub struct SqliteConversationStore {
    conn: Connection,
    table: String,
}

impl SqliteConversationStore {
    /// Initialize the conversation store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn new(config: &AdvisorConfig) -> AdvisorResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        let table = config.conversation_table.clone();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    conversation_id TEXT PRIMARY KEY,
                    owner_id TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }
}

impl ConversationStore for SqliteConversationStore {
    fn save(&self, conversation: &Conversation) -> StoreFuture<'_, AdvisorResult<()>> {
        let conversation = conversation.clone();
        Box::pin(async move {
            let table = self.table.clone();
            let created_at = conversation.created_at.timestamp_millis();

            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table} (conversation_id, owner_id, created_at)
                             VALUES (?1, ?2, ?3)"
                        ),
                        rusqlite::params![conversation.id, conversation.owner, created_at],
                    )?;
                    Ok(())
                })
                .await?;

            Ok(())
        })
    }

    fn find_by_id(
        &self,
        id: ConversationId,
    ) -> StoreFuture<'_, AdvisorResult<Option<Conversation>>> {
        Box::pin(async move {
            let table = self.table.clone();

            let row = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT conversation_id, owner_id, created_at
                         FROM {table} WHERE conversation_id = ?1"
                    ))?;
                    let row = stmt
                        .query_row(rusqlite::params![id], |row| {
                            Ok((
                                row.get::<_, ConversationId>(0)?,
                                row.get::<_, UserId>(1)?,
                                row.get::<_, i64>(2)?,
                            ))
                        })
                        .optional()?;
                    Ok(row)
                })
                .await?;

            Ok(row.map(|(id, owner, created_at_millis)| {
                let created_at =
                    DateTime::from_timestamp_millis(created_at_millis).unwrap_or_default();
                Conversation::from_parts(id, owner, created_at)
            }))
        })
    }
}
