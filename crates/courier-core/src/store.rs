//! Message store orchestrating in-memory history and write-through persistence.
//!
//! `MessageStore` owns two [`KeyedMap`]s: the per-conversation history and the
//! dedup index of message keys already ingested. Construction replays every
//! persisted row once; after that, reads are served from memory only and each
//! new message is written through to the repository.
//!
//! Generic over `MessageRepository` so courier-core never depends on
//! courier-infra.

use courier_types::chat::{ChatSummary, IngestOutcome, LoadReport, StoreStats};
use courier_types::error::StoreError;
use courier_types::message::{ConversationId, Message, MessageEvent, MessageId, MessageKey};
use tracing::{debug, info, warn};

use crate::codec;
use crate::keyed::KeyedMap;
use crate::repository::message::MessageRepository;
use crate::summary;

/// In-memory message history backed by an append-only repository.
pub struct MessageStore<R: MessageRepository> {
    repo: R,
    history: KeyedMap<ConversationId, Vec<Message>>,
    seen: KeyedMap<MessageKey, ()>,
    load_report: LoadReport,
}

impl<R: MessageRepository> MessageStore<R> {
    /// Ensure the schema exists and load every persisted row.
    ///
    /// Rows that fail to decode, and rows repeating a key already loaded, are
    /// skipped with a warning. Only schema and full-scan failures are fatal.
    #[tracing::instrument(name = "message_store.open", skip(repo))]
    pub async fn open(repo: R) -> Result<Self, StoreError> {
        repo.ensure_schema().await.map_err(StoreError::Schema)?;
        let rows = repo.select_all().await.map_err(StoreError::Load)?;

        let history: KeyedMap<ConversationId, Vec<Message>> = KeyedMap::new();
        let seen: KeyedMap<MessageKey, ()> = KeyedMap::new();
        let mut report = LoadReport::default();

        for row in &rows {
            let message = match codec::decode_row(row) {
                Ok(message) => message,
                Err(e) => {
                    warn!(
                        conversation_id = %row.conversation_id,
                        message_id = %row.message_id,
                        error = %e,
                        "Skipping undecodable message row"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if !seen.insert_if_absent(message.metadata.key(), ()) {
                debug!(
                    conversation_id = %row.conversation_id,
                    message_id = %row.message_id,
                    "Skipping duplicate message row"
                );
                report.skipped += 1;
                continue;
            }

            let conversation_id = message.conversation_id().clone();
            history.update_or_default(conversation_id, |messages| messages.push(message));
            report.loaded += 1;
        }

        info!(
            loaded = report.loaded,
            skipped = report.skipped,
            conversations = history.len(),
            "Message history loaded"
        );

        Ok(Self {
            repo,
            history,
            seen,
            load_report: report,
        })
    }

    /// Ingest one inbound event.
    ///
    /// A redelivered event (same conversation and message ID) is a no-op. A new
    /// one is marked seen, appended to its conversation, then written to the
    /// repository. Write failures are logged and leave the in-memory append in
    /// place; they are never returned to the caller.
    #[tracing::instrument(
        name = "message_store.ingest",
        skip(self, event),
        fields(
            conversation_id = %event.metadata.conversation_id,
            message_id = %event.metadata.id,
        )
    )]
    pub async fn ingest(&self, event: MessageEvent) -> IngestOutcome {
        let message = Message::from(event);
        let key = message.metadata.key();

        if !self.seen.insert_if_absent(key.clone(), ()) {
            debug!(key = %key, "Duplicate message event ignored");
            return IngestOutcome::Duplicate;
        }

        let encoded = codec::encode_message(&message);
        // A concurrent redelivery may already report Duplicate here, before the
        // append below lands in history. Accepted: both happen in this call.
        self.history
            .update_or_default(key.conversation_id.clone(), |messages| messages.push(message));

        // No lock is held past this point.
        let row = match encoded {
            Ok(row) => row,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode message; kept in memory only");
                return IngestOutcome::MemoryOnly;
            }
        };

        match self.repo.insert_one(&row).await {
            Ok(()) => IngestOutcome::Persisted,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to persist message; kept in memory only");
                IngestOutcome::MemoryOnly
            }
        }
    }

    /// Snapshot of a conversation's history in arrival order. Empty if unknown.
    pub fn history(&self, conversation_id: &ConversationId) -> Vec<Message> {
        self.history.get(conversation_id).unwrap_or_default()
    }

    /// Find one message by ID within a conversation.
    pub fn message(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> Option<Message> {
        self.history
            .with_value(conversation_id, |messages| {
                messages.iter().find(|m| &m.metadata.id == message_id).cloned()
            })
            .flatten()
    }

    /// Chat list: one entry per non-empty conversation, newest first.
    ///
    /// Holds the history read lock for the whole scan.
    pub fn list_chats(&self) -> Vec<ChatSummary> {
        let histories = self.history.read();
        summary::chat_summaries(&histories)
    }

    /// Whether a message has already been ingested or loaded.
    pub fn has_seen(&self, key: &MessageKey) -> bool {
        self.seen.contains_key(key)
    }

    pub fn stats(&self) -> StoreStats {
        let histories = self.history.read();
        StoreStats {
            conversations: histories.len(),
            messages: histories.values().map(Vec::len).sum(),
        }
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    /// Access the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Release the repository handle. The store is consumed.
    pub async fn shutdown(self) {
        self.repo.close().await;
        debug!("Message store shut down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
