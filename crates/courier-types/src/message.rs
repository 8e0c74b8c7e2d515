//! Message domain types for Courier.
//!
//! A [`Message`] pairs a structured [`MessageMetadata`] envelope with a
//! [`MessagePayload`] sum type. Both halves are immutable once built; the
//! store hands out clones, never mutable handles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::IdError;

/// Identifier of a conversation (a chat or channel), e.g. `12345@s.whatsapp.net`.
///
/// Opaque to the store; used as the partition key for history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConversationId(String);

impl ConversationId {
    /// Parse a conversation ID, rejecting empty or whitespace-only input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdError::Empty("conversation"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ConversationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ConversationId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ConversationId> for String {
    fn from(id: ConversationId) -> Self {
        id.0
    }
}

/// Identifier of a message. Unique within its conversation only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(String);

impl MessageId {
    /// Parse a message ID, rejecting empty or whitespace-only input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdError::Empty("message"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MessageId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MessageId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

/// Dedup key: a message ID scoped to its conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.conversation_id, self.message_id)
    }
}

/// Structured envelope describing a received message.
///
/// Encoded as self-describing JSON when persisted. New optional fields must
/// carry `#[serde(default)]` so rows written by older builds keep decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub conversation_id: ConversationId,
    pub id: MessageId,
    /// Sender address as delivered by the transport.
    pub sender: String,
    pub timestamp: DateTime<Utc>,
    /// Display name the sender advertised, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_name: Option<String>,
    #[serde(default)]
    pub is_from_me: bool,
    #[serde(default)]
    pub is_group: bool,
    /// Server-assigned sequence number (newsletters and some group chats).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i64>,
    /// Set when this message edits an earlier one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_of: Option<MessageId>,
}

impl MessageMetadata {
    /// Build metadata with the required fields and no delivery extras.
    pub fn new(
        conversation_id: ConversationId,
        id: MessageId,
        sender: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id,
            id,
            sender: sender.into(),
            timestamp,
            push_name: None,
            is_from_me: false,
            is_group: false,
            server_id: None,
            edit_of: None,
        }
    }

    pub fn key(&self) -> MessageKey {
        MessageKey {
            conversation_id: self.conversation_id.clone(),
            message_id: self.id.clone(),
        }
    }

    /// Timestamp as whole seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }
}

/// Quoted message referenced by an extended text reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotedContext {
    pub stanza_id: String,
    pub participant: Option<String>,
    pub quoted_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedTextContent {
    pub text: String,
    /// Link preview target when the text contains a URL.
    pub canonical_url: Option<String>,
    pub context: Option<QuotedContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    pub mime_type: String,
    pub caption: Option<String>,
    pub url: Option<String>,
    pub file_length: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContent {
    pub mime_type: String,
    pub caption: Option<String>,
    pub url: Option<String>,
    pub file_length: u64,
    pub seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioContent {
    pub mime_type: String,
    pub url: Option<String>,
    pub file_length: u64,
    pub seconds: u32,
    /// Push-to-talk voice note rather than an attached audio file.
    pub voice_note: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentContent {
    pub mime_type: String,
    pub caption: Option<String>,
    pub url: Option<String>,
    pub file_length: u64,
    pub file_name: Option<String>,
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerContent {
    pub mime_type: String,
    pub url: Option<String>,
    pub file_length: u64,
    pub animated: bool,
}

/// Message content. One variant per kind of message the client understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePayload {
    Text { body: String },
    ExtendedText(ExtendedTextContent),
    Image(ImageContent),
    Video(VideoContent),
    Audio(AudioContent),
    Document(DocumentContent),
    Sticker(StickerContent),
    /// Content the client does not model (reactions, polls, protocol messages...).
    /// `kind` names what arrived, when the transport could tell.
    Unsupported { kind: String },
}

/// Variant tag of a [`MessagePayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Text,
    ExtendedText,
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Unsupported,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Text => write!(f, "text"),
            PayloadKind::ExtendedText => write!(f, "extended_text"),
            PayloadKind::Image => write!(f, "image"),
            PayloadKind::Video => write!(f, "video"),
            PayloadKind::Audio => write!(f, "audio"),
            PayloadKind::Document => write!(f, "document"),
            PayloadKind::Sticker => write!(f, "sticker"),
            PayloadKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl MessagePayload {
    /// Plain text payload.
    pub fn text(body: impl Into<String>) -> Self {
        MessagePayload::Text { body: body.into() }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            MessagePayload::Text { .. } => PayloadKind::Text,
            MessagePayload::ExtendedText(_) => PayloadKind::ExtendedText,
            MessagePayload::Image(_) => PayloadKind::Image,
            MessagePayload::Video(_) => PayloadKind::Video,
            MessagePayload::Audio(_) => PayloadKind::Audio,
            MessagePayload::Document(_) => PayloadKind::Document,
            MessagePayload::Sticker(_) => PayloadKind::Sticker,
            MessagePayload::Unsupported { .. } => PayloadKind::Unsupported,
        }
    }

    /// Non-empty plain text body, if this is a plain text message.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            MessagePayload::Text { body } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    /// Extended (reply / link preview) text body, if present. May be empty.
    pub fn extended_text(&self) -> Option<&str> {
        match self {
            MessagePayload::ExtendedText(ext) => Some(&ext.text),
            _ => None,
        }
    }

    /// Caption attached to a media message.
    pub fn caption(&self) -> Option<&str> {
        let caption = match self {
            MessagePayload::Image(img) => img.caption.as_deref(),
            MessagePayload::Video(vid) => vid.caption.as_deref(),
            MessagePayload::Document(doc) => doc.caption.as_deref(),
            _ => None,
        };
        caption.filter(|c| !c.is_empty())
    }

    /// Text shown in a message bubble when rendering a conversation.
    pub fn preview_text(&self) -> String {
        if let Some(body) = self.plain_text().or(self.extended_text()) {
            return body.to_string();
        }
        if let Some(caption) = self.caption() {
            return caption.to_string();
        }
        match self {
            MessagePayload::Image(_) => "📷 Image".to_string(),
            MessagePayload::Video(_) => "🎥 Video".to_string(),
            MessagePayload::Audio(_) => "🎵 Audio".to_string(),
            MessagePayload::Document(_) => "📄 Document".to_string(),
            MessagePayload::Sticker(_) => "Sticker".to_string(),
            _ => "Media message".to_string(),
        }
    }
}

/// An inbound message event as pushed by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    pub metadata: MessageMetadata,
    pub payload: MessagePayload,
}

/// The unit of storage: one envelope plus its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub metadata: MessageMetadata,
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(metadata: MessageMetadata, payload: MessagePayload) -> Self {
        Self { metadata, payload }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.metadata.conversation_id
    }

    pub fn id(&self) -> &MessageId {
        &self.metadata.id
    }
}

impl From<MessageEvent> for Message {
    fn from(event: MessageEvent) -> Self {
        Self {
            metadata: event.metadata,
            payload: event.payload,
        }
    }
}

/// A persisted message row, exactly as stored in the `messages` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub conversation_id: String,
    pub message_id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// JSON-encoded [`MessageMetadata`].
    pub metadata: Vec<u8>,
    /// Protobuf-encoded [`MessagePayload`].
    pub payload: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
