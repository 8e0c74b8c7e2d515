//! Payload encoding: protobuf, laid out like the chat protocol's own message
//! schema so field numbers stay stable across releases.
//!
//! The wire structs are hand-derived with `prost` and kept private; only
//! [`encode`] and [`decode`] cross the module boundary.

use courier_types::error::CodecError;
use courier_types::message::{
    AudioContent, DocumentContent, ExtendedTextContent, ImageContent, MessagePayload,
    QuotedContext, StickerContent, VideoContent,
};
use prost::Message as _;

/// Label used when a decoded payload carries no content field we know.
const UNKNOWN_KIND: &str = "unknown";

#[derive(Clone, PartialEq, prost::Message)]
struct WireMessage {
    #[prost(oneof = "wire_message::Content", tags = "1, 3, 6, 7, 8, 9, 26, 99")]
    content: Option<wire_message::Content>,
}

mod wire_message {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub(super) enum Content {
        #[prost(string, tag = "1")]
        Conversation(String),
        #[prost(message, tag = "3")]
        Image(super::WireImage),
        #[prost(message, tag = "6")]
        ExtendedText(super::WireExtendedText),
        #[prost(message, tag = "7")]
        Document(super::WireDocument),
        #[prost(message, tag = "8")]
        Audio(super::WireAudio),
        #[prost(message, tag = "9")]
        Video(super::WireVideo),
        #[prost(message, tag = "26")]
        Sticker(super::WireSticker),
        #[prost(string, tag = "99")]
        Unsupported(String),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireContextInfo {
    #[prost(string, tag = "1")]
    stanza_id: String,
    #[prost(string, optional, tag = "2")]
    participant: Option<String>,
    #[prost(string, optional, tag = "3")]
    quoted_text: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireExtendedText {
    #[prost(string, tag = "1")]
    text: String,
    #[prost(string, optional, tag = "4")]
    canonical_url: Option<String>,
    #[prost(message, optional, tag = "17")]
    context_info: Option<WireContextInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireImage {
    #[prost(string, optional, tag = "1")]
    url: Option<String>,
    #[prost(string, tag = "2")]
    mimetype: String,
    #[prost(string, optional, tag = "3")]
    caption: Option<String>,
    #[prost(uint64, tag = "5")]
    file_length: u64,
    #[prost(uint32, tag = "6")]
    height: u32,
    #[prost(uint32, tag = "7")]
    width: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireAudio {
    #[prost(string, optional, tag = "1")]
    url: Option<String>,
    #[prost(string, tag = "2")]
    mimetype: String,
    #[prost(uint64, tag = "4")]
    file_length: u64,
    #[prost(uint32, tag = "5")]
    seconds: u32,
    #[prost(bool, tag = "6")]
    ptt: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireVideo {
    #[prost(string, optional, tag = "1")]
    url: Option<String>,
    #[prost(string, tag = "2")]
    mimetype: String,
    #[prost(uint64, tag = "4")]
    file_length: u64,
    #[prost(uint32, tag = "5")]
    seconds: u32,
    #[prost(string, optional, tag = "7")]
    caption: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireDocument {
    #[prost(string, optional, tag = "1")]
    url: Option<String>,
    #[prost(string, tag = "2")]
    mimetype: String,
    #[prost(uint64, tag = "5")]
    file_length: u64,
    #[prost(uint32, optional, tag = "6")]
    page_count: Option<u32>,
    #[prost(string, optional, tag = "8")]
    file_name: Option<String>,
    #[prost(string, optional, tag = "20")]
    caption: Option<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
struct WireSticker {
    #[prost(string, optional, tag = "1")]
    url: Option<String>,
    #[prost(string, tag = "5")]
    mimetype: String,
    #[prost(uint64, tag = "9")]
    file_length: u64,
    #[prost(bool, tag = "13")]
    is_animated: bool,
}

/// Encode a payload to protobuf bytes. Encoding into a `Vec` cannot fail.
pub fn encode(payload: &MessagePayload) -> Vec<u8> {
    to_wire(payload.clone()).encode_to_vec()
}

/// Decode protobuf bytes into a payload.
///
/// Bytes that parse but carry no known content field decode as
/// [`MessagePayload::Unsupported`].
pub fn decode(bytes: &[u8]) -> Result<MessagePayload, CodecError> {
    let wire =
        WireMessage::decode(bytes).map_err(|e| CodecError::PayloadDecode(e.to_string()))?;
    Ok(from_wire(wire))
}

fn to_wire(payload: MessagePayload) -> WireMessage {
    use wire_message::Content;

    let content = match payload {
        MessagePayload::Text { body } => Content::Conversation(body),
        MessagePayload::ExtendedText(ext) => Content::ExtendedText(WireExtendedText {
            text: ext.text,
            canonical_url: ext.canonical_url,
            context_info: ext.context.map(|ctx| WireContextInfo {
                stanza_id: ctx.stanza_id,
                participant: ctx.participant,
                quoted_text: ctx.quoted_text,
            }),
        }),
        MessagePayload::Image(img) => Content::Image(WireImage {
            url: img.url,
            mimetype: img.mime_type,
            caption: img.caption,
            file_length: img.file_length,
            height: img.height,
            width: img.width,
        }),
        MessagePayload::Video(vid) => Content::Video(WireVideo {
            url: vid.url,
            mimetype: vid.mime_type,
            file_length: vid.file_length,
            seconds: vid.seconds,
            caption: vid.caption,
        }),
        MessagePayload::Audio(aud) => Content::Audio(WireAudio {
            url: aud.url,
            mimetype: aud.mime_type,
            file_length: aud.file_length,
            seconds: aud.seconds,
            ptt: aud.voice_note,
        }),
        MessagePayload::Document(doc) => Content::Document(WireDocument {
            url: doc.url,
            mimetype: doc.mime_type,
            file_length: doc.file_length,
            page_count: doc.page_count,
            file_name: doc.file_name,
            caption: doc.caption,
        }),
        MessagePayload::Sticker(st) => Content::Sticker(WireSticker {
            url: st.url,
            mimetype: st.mime_type,
            file_length: st.file_length,
            is_animated: st.animated,
        }),
        MessagePayload::Unsupported { kind } => Content::Unsupported(kind),
    };

    WireMessage {
        content: Some(content),
    }
}

fn from_wire(wire: WireMessage) -> MessagePayload {
    use wire_message::Content;

    let Some(content) = wire.content else {
        return MessagePayload::Unsupported {
            kind: UNKNOWN_KIND.to_string(),
        };
    };

    match content {
        Content::Conversation(body) => MessagePayload::Text { body },
        Content::ExtendedText(ext) => MessagePayload::ExtendedText(ExtendedTextContent {
            text: ext.text,
            canonical_url: ext.canonical_url,
            context: ext.context_info.map(|ctx| QuotedContext {
                stanza_id: ctx.stanza_id,
                participant: ctx.participant,
                quoted_text: ctx.quoted_text,
            }),
        }),
        Content::Image(img) => MessagePayload::Image(ImageContent {
            mime_type: img.mimetype,
            caption: img.caption,
            url: img.url,
            file_length: img.file_length,
            width: img.width,
            height: img.height,
        }),
        Content::Video(vid) => MessagePayload::Video(VideoContent {
            mime_type: vid.mimetype,
            caption: vid.caption,
            url: vid.url,
            file_length: vid.file_length,
            seconds: vid.seconds,
        }),
        Content::Audio(aud) => MessagePayload::Audio(AudioContent {
            mime_type: aud.mimetype,
            url: aud.url,
            file_length: aud.file_length,
            seconds: aud.seconds,
            voice_note: aud.ptt,
        }),
        Content::Document(doc) => MessagePayload::Document(DocumentContent {
            mime_type: doc.mimetype,
            caption: doc.caption,
            url: doc.url,
            file_length: doc.file_length,
            file_name: doc.file_name,
            page_count: doc.page_count,
        }),
        Content::Sticker(st) => MessagePayload::Sticker(StickerContent {
            mime_type: st.mimetype,
            url: st.url,
            file_length: st.file_length,
            animated: st.is_animated,
        }),
        Content::Unsupported(kind) => MessagePayload::Unsupported { kind },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_every_variant() {
        let payloads = vec![
            MessagePayload::text("hello"),
            MessagePayload::text(""),
            MessagePayload::ExtendedText(ExtendedTextContent {
                text: "see https://example.org".to_string(),
                canonical_url: Some("https://example.org".to_string()),
                context: Some(QuotedContext {
                    stanza_id: "Q1".to_string(),
                    participant: Some("dave@s.whatsapp.net".to_string()),
                    quoted_text: Some("what link?".to_string()),
                }),
            }),
            MessagePayload::Image(ImageContent {
                mime_type: "image/png".to_string(),
                caption: Some(String::new()),
                url: Some("https://mmg.example/img".to_string()),
                file_length: 4096,
                width: 64,
                height: 32,
            }),
            MessagePayload::Video(VideoContent {
                mime_type: "video/mp4".to_string(),
                seconds: 12,
                ..Default::default()
            }),
            MessagePayload::Audio(AudioContent {
                mime_type: "audio/ogg; codecs=opus".to_string(),
                seconds: 4,
                voice_note: true,
                ..Default::default()
            }),
            MessagePayload::Document(DocumentContent {
                mime_type: "application/pdf".to_string(),
                file_name: Some("invoice.pdf".to_string()),
                page_count: Some(3),
                ..Default::default()
            }),
            MessagePayload::Sticker(StickerContent {
                mime_type: "image/webp".to_string(),
                animated: true,
                ..Default::default()
            }),
            MessagePayload::Unsupported {
                kind: "reaction".to_string(),
            },
        ];

        for payload in payloads {
            let bytes = encode(&payload);
            assert_eq!(decode(&bytes).unwrap(), payload, "variant {}", payload.kind());
        }
    }

    #[test]
    fn test_text_uses_conversation_field() {
        // Field 1, wire type 2 (length-delimited), then "hi".
        assert_eq!(encode(&MessagePayload::text("hi")), vec![0x0a, 0x02, b'h', b'i']);
    }

    #[test]
    fn test_empty_message_decodes_as_unsupported() {
        let payload = decode(&[]).unwrap();
        assert_eq!(
            payload,
            MessagePayload::Unsupported {
                kind: UNKNOWN_KIND.to_string()
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        // Field 50 (varint) is not part of the schema; field 1 still decodes.
        let bytes = [0x90, 0x03, 0x01, 0x0a, 0x02, b'o', b'k'];
        assert_eq!(decode(&bytes).unwrap(), MessagePayload::text("ok"));
    }

    #[test]
    fn test_garbage_reports_decode_error() {
        let err = decode(&[0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, CodecError::PayloadDecode(_)));
    }
}
