//! Codec between [`Message`] and the persisted [`MessageRow`].
//!
//! The two halves are encoded independently: metadata as self-describing JSON
//! ([`metadata`]), payload as protobuf ([`payload`]). Decoding a row also checks
//! that the row's key columns agree with the decoded metadata.

pub mod metadata;
pub mod payload;

use courier_types::error::CodecError;
use courier_types::message::{Message, MessageRow};

/// Encode a message into the row shape stored by the repository.
pub fn encode_message(message: &Message) -> Result<MessageRow, CodecError> {
    Ok(MessageRow {
        conversation_id: message.metadata.conversation_id.to_string(),
        message_id: message.metadata.id.to_string(),
        timestamp: message.metadata.unix_seconds(),
        metadata: metadata::encode(&message.metadata)?,
        payload: payload::encode(&message.payload),
    })
}

/// Decode a persisted row back into a message.
pub fn decode_row(row: &MessageRow) -> Result<Message, CodecError> {
    let meta = metadata::decode(&row.metadata)?;
    let content = payload::decode(&row.payload)?;

    if meta.conversation_id.as_str() != row.conversation_id || meta.id.as_str() != row.message_id {
        return Err(CodecError::KeyMismatch {
            column: format!("{}/{}", row.conversation_id, row.message_id),
            metadata: meta.key().to_string(),
        });
    }

    Ok(Message::new(meta, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use courier_types::message::{
        ConversationId, ImageContent, MessageId, MessageMetadata, MessagePayload,
    };

    fn image_message() -> Message {
        let mut meta = MessageMetadata::new(
            ConversationId::parse("family@g.us").unwrap(),
            MessageId::parse("IMG-1").unwrap(),
            "carol@s.whatsapp.net",
            Utc.timestamp_opt(1_700_000_200, 0).unwrap(),
        );
        meta.is_group = true;
        meta.push_name = Some("Carol".to_string());
        Message::new(
            meta,
            MessagePayload::Image(ImageContent {
                mime_type: "image/jpeg".to_string(),
                caption: Some("beach".to_string()),
                url: None,
                file_length: 52_114,
                width: 1280,
                height: 720,
            }),
        )
    }

    #[test]
    fn test_encode_fills_key_columns() {
        let row = encode_message(&image_message()).unwrap();
        assert_eq!(row.conversation_id, "family@g.us");
        assert_eq!(row.message_id, "IMG-1");
        assert_eq!(row.timestamp, 1_700_000_200);
        assert!(!row.metadata.is_empty());
        assert!(!row.payload.is_empty());
    }

    #[test]
    fn test_decode_row_restores_message() {
        let original = image_message();
        let row = encode_message(&original).unwrap();
        assert_eq!(decode_row(&row).unwrap(), original);
    }

    #[test]
    fn test_decode_row_rejects_mismatched_key_columns() {
        let mut row = encode_message(&image_message()).unwrap();
        row.conversation_id = "someone-else@s.whatsapp.net".to_string();
        let err = decode_row(&row).unwrap_err();
        assert!(matches!(err, CodecError::KeyMismatch { .. }));
    }

    #[test]
    fn test_decode_row_reports_corrupt_metadata() {
        let mut row = encode_message(&image_message()).unwrap();
        row.metadata = b"\x00\x01not json".to_vec();
        assert!(matches!(
            decode_row(&row).unwrap_err(),
            CodecError::MetadataDecode(_)
        ));
    }
}
