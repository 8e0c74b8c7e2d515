//! Wiring of the core message store onto the SQLite repository.

use courier_core::store::MessageStore;
use courier_types::config::Settings;
use courier_types::error::{RepositoryError, StoreError};

use crate::config::resolve_data_dir;
use crate::sqlite::message::SqliteMessageRepository;
use crate::sqlite::pool::DatabasePool;

/// The production store: in-memory history over a SQLite file.
pub type SqliteMessageStore = MessageStore<SqliteMessageRepository>;

/// Open the store described by `settings`.
///
/// Creates the data directory if needed, connects to the database file, then
/// runs the usual schema check and full load.
pub async fn open_message_store(settings: &Settings) -> Result<SqliteMessageStore, StoreError> {
    let data_dir = resolve_data_dir(settings);
    tokio::fs::create_dir_all(&data_dir).await.map_err(|e| {
        StoreError::Open(RepositoryError::Connection(format!(
            "cannot create {}: {e}",
            data_dir.display()
        )))
    })?;

    let url = settings.database_url(&data_dir);
    tracing::debug!(database = %settings.database_path(&data_dir).display(), "Opening message database");

    let pool = DatabasePool::connect(&url)
        .await
        .map_err(|e| StoreError::Open(RepositoryError::Connection(e.to_string())))?;

    MessageStore::open(SqliteMessageRepository::new(pool)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use courier_core::repository::message::MessageRepository;
    use courier_types::chat::{IngestOutcome, LoadReport};
    use courier_types::message::{
        ConversationId, DocumentContent, ExtendedTextContent, MessageEvent, MessageId,
        MessageMetadata, MessagePayload, MessageRow, QuotedContext,
    };

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            data_dir: Some(dir.join("data")),
            ..Settings::default()
        }
    }

    fn event(conversation: &str, id: &str, ts: i64, payload: MessagePayload) -> MessageEvent {
        let mut metadata = MessageMetadata::new(
            ConversationId::parse(conversation).unwrap(),
            MessageId::parse(id).unwrap(),
            "alice@s.whatsapp.net",
            Utc.timestamp_opt(ts, 0).unwrap(),
        );
        metadata.push_name = Some("Alice".to_string());
        MessageEvent { metadata, payload }
    }

    #[tokio::test]
    async fn test_open_creates_data_dir_and_database() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path());

        let store = open_message_store(&settings).await.unwrap();
        assert!(tmp.path().join("data").join("messages.db").exists());
        assert_eq!(store.load_report(), LoadReport::default());
        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_restart_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path());
        let conv_a = ConversationId::parse("A").unwrap();
        let conv_b = ConversationId::parse("B").unwrap();

        let store = open_message_store(&settings).await.unwrap();
        let events = vec![
            event("A", "m1", 100, MessagePayload::text("hello")),
            event(
                "B",
                "m1",
                150,
                MessagePayload::Document(DocumentContent {
                    mime_type: "application/pdf".to_string(),
                    file_name: Some("notes.pdf".to_string()),
                    ..Default::default()
                }),
            ),
            event(
                "A",
                "m2",
                120,
                MessagePayload::ExtendedText(ExtendedTextContent {
                    text: "replying".to_string(),
                    canonical_url: None,
                    context: Some(QuotedContext {
                        stanza_id: "m1".to_string(),
                        participant: None,
                        quoted_text: Some("hello".to_string()),
                    }),
                }),
            ),
        ];
        for e in events {
            assert_eq!(store.ingest(e).await, IngestOutcome::Persisted);
        }
        let before_a = store.history(&conv_a);
        let before_b = store.history(&conv_b);
        let before_chats = store.list_chats();
        store.shutdown().await;

        let reopened = open_message_store(&settings).await.unwrap();
        assert_eq!(reopened.history(&conv_a), before_a);
        assert_eq!(reopened.history(&conv_b), before_b);
        assert_eq!(reopened.list_chats(), before_chats);
        assert_eq!(reopened.load_report(), LoadReport { loaded: 3, skipped: 0 });
        assert_eq!(
            reopened
                .ingest(event("A", "m1", 100, MessagePayload::text("hello")))
                .await,
            IngestOutcome::Duplicate
        );
        reopened.shutdown().await;
    }

    #[tokio::test]
    async fn test_corrupt_rows_on_disk_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path());

        let store = open_message_store(&settings).await.unwrap();
        store
            .ingest(event("A", "m1", 1, MessagePayload::text("kept")))
            .await;
        store
            .repository()
            .insert_one(&MessageRow {
                conversation_id: "A".to_string(),
                message_id: "junk".to_string(),
                timestamp: 2,
                metadata: b"not json".to_vec(),
                payload: vec![0xff],
            })
            .await
            .unwrap();
        store.shutdown().await;

        let reopened = open_message_store(&settings).await.unwrap();
        let history = reopened.history(&ConversationId::parse("A").unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].payload, MessagePayload::text("kept"));
        assert_eq!(reopened.load_report(), LoadReport { loaded: 1, skipped: 1 });
    }

    #[tokio::test]
    async fn test_open_fails_when_data_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = open_message_store(&settings_in(tmp.path())).await;
        assert!(matches!(result, Err(StoreError::Open(_))));
    }
}
