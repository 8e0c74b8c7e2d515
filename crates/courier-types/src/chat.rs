//! Chat list projection types.

use serde::{Deserialize, Serialize};

use crate::message::ConversationId;

/// One row of the chat list: a conversation and its latest message.
///
/// Derived on demand from the in-memory history and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub conversation_id: ConversationId,
    /// Short display string for the latest message.
    pub text: String,
    /// Latest message timestamp, seconds since the Unix epoch.
    pub timestamp: i64,
}

/// Counts describing the in-memory history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub conversations: usize,
    pub messages: usize,
}

/// Outcome of the startup load phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Rows decoded and added to history.
    pub loaded: usize,
    /// Rows dropped because they failed to decode or repeated an earlier row.
    pub skipped: usize,
}

/// What `ingest` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Already seen; nothing changed.
    Duplicate,
    /// Appended in memory and written to the database.
    Persisted,
    /// Appended in memory; the database write failed and was logged.
    MemoryOnly,
}
