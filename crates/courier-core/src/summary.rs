//! Chat list derivation.
//!
//! One [`ChatSummary`] per non-empty conversation, built from the most
//! recently appended message and sorted newest first.

use std::collections::HashMap;

use courier_types::chat::ChatSummary;
use courier_types::message::{ConversationId, Message, MessagePayload};

pub const IMAGE_LABEL: &str = "image";
pub const VIDEO_LABEL: &str = "video";
pub const AUDIO_LABEL: &str = "audio";
pub const DOCUMENT_LABEL: &str = "document";
pub const STICKER_LABEL: &str = "sticker";
pub const UNSUPPORTED_LABEL: &str = "unsupported message type";

/// Display string for a chat list entry.
///
/// Priority: non-empty plain text, then extended text (even if empty), then a
/// fixed label per media kind, then the generic unsupported label.
pub fn summary_text(payload: &MessagePayload) -> String {
    match payload {
        MessagePayload::Text { body } if !body.is_empty() => body.clone(),
        MessagePayload::ExtendedText(ext) => ext.text.clone(),
        MessagePayload::Image(_) => IMAGE_LABEL.to_string(),
        MessagePayload::Video(_) => VIDEO_LABEL.to_string(),
        MessagePayload::Audio(_) => AUDIO_LABEL.to_string(),
        MessagePayload::Document(_) => DOCUMENT_LABEL.to_string(),
        MessagePayload::Sticker(_) => STICKER_LABEL.to_string(),
        MessagePayload::Text { .. } | MessagePayload::Unsupported { .. } => {
            UNSUPPORTED_LABEL.to_string()
        }
    }
}

/// Build the chat list from per-conversation histories.
///
/// Ties on timestamp come out in no particular order.
pub fn chat_summaries(histories: &HashMap<ConversationId, Vec<Message>>) -> Vec<ChatSummary> {
    let mut chats: Vec<ChatSummary> = histories
        .iter()
        .filter_map(|(conversation_id, messages)| {
            let latest = messages.last()?;
            Some(ChatSummary {
                conversation_id: conversation_id.clone(),
                text: summary_text(&latest.payload),
                timestamp: latest.metadata.unix_seconds(),
            })
        })
        .collect();

    chats.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    chats
}
