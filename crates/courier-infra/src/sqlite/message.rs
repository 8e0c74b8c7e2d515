//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `courier-core` using sqlx with split
//! read/write pools. Rows are appended to the `messages` table and never
//! updated or deleted.

use courier_core::repository::message::MessageRepository;
use courier_types::error::RepositoryError;
use courier_types::message::MessageRow;
use sqlx::Row;
use sqlx::migrate::Migrator;
use tracing::{debug, warn};

use super::pool::DatabasePool;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn row_from_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<MessageRow, sqlx::Error> {
    Ok(MessageRow {
        conversation_id: row.try_get("conversation_id")?,
        message_id: row.try_get("message_id")?,
        timestamp: row.try_get("timestamp")?,
        metadata: row.try_get("metadata")?,
        payload: row.try_get("payload")?,
    })
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    #[tracing::instrument(name = "sqlite.ensure_schema", skip(self))]
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        MIGRATOR
            .run(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Schema(e.to_string()))?;
        debug!("Message schema ensured");
        Ok(())
    }

    #[tracing::instrument(
        name = "sqlite.insert_message",
        skip(self, row),
        fields(conversation_id = %row.conversation_id, message_id = %row.message_id)
    )]
    async fn insert_one(&self, row: &MessageRow) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO messages
               (conversation_id, message_id, timestamp, metadata, payload)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&row.conversation_id)
        .bind(&row.message_id)
        .bind(row.timestamp)
        .bind(&row.metadata)
        .bind(&row.payload)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    #[tracing::instrument(name = "sqlite.select_messages", skip(self))]
    async fn select_all(&self) -> Result<Vec<MessageRow>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT conversation_id, message_id, timestamp, metadata, payload
               FROM messages
               ORDER BY rowid ASC"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match row_from_sqlite(row) {
                Ok(r) => out.push(r),
                Err(e) => warn!(index, error = %e, "Skipping unreadable message row"),
            }
        }
        Ok(out)
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("Message database closed");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> (SqliteMessageRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::connect(&url).await.unwrap();
        let repo = SqliteMessageRepository::new(pool);
        repo.ensure_schema().await.unwrap();
        (repo, dir)
    }

    fn make_row(conversation: &str, id: &str, ts: i64) -> MessageRow {
        MessageRow {
            conversation_id: conversation.to_string(),
            message_id: id.to_string(),
            timestamp: ts,
            metadata: format!(r#"{{"id":"{id}"}}"#).into_bytes(),
            payload: vec![0x0a, 0x02, b'h', b'i'],
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_messages_table() {
        let (repo, _dir) = test_repo().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&repo.pool().reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["messages"]);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let (repo, _dir) = test_repo().await;
        repo.insert_one(&make_row("A", "m1", 1)).await.unwrap();

        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();

        assert_eq!(repo.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_and_select_all_in_insertion_order() {
        let (repo, _dir) = test_repo().await;

        repo.insert_one(&make_row("A", "m1", 30)).await.unwrap();
        repo.insert_one(&make_row("B", "m1", 10)).await.unwrap();
        repo.insert_one(&make_row("A", "m2", 20)).await.unwrap();

        let rows = repo.select_all().await.unwrap();
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.conversation_id.as_str(), r.message_id.as_str()))
            .collect();
        assert_eq!(keys, vec![("A", "m1"), ("B", "m1"), ("A", "m2")]);
        assert_eq!(rows[0], make_row("A", "m1", 30));
    }

    #[tokio::test]
    async fn test_duplicate_rows_are_accepted() {
        let (repo, _dir) = test_repo().await;
        let row = make_row("A", "m1", 1);

        repo.insert_one(&row).await.unwrap();
        repo.insert_one(&row).await.unwrap();

        assert_eq!(repo.select_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_select_all_empty() {
        let (repo, _dir) = test_repo().await;
        assert!(repo.select_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_after_close_fails() {
        let (repo, _dir) = test_repo().await;
        repo.close().await;

        let err = repo.insert_one(&make_row("A", "m1", 1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
