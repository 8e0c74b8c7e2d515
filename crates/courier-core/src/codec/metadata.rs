//! Metadata encoding: JSON with named fields.
//!
//! Field names travel with every row, so adding an optional field (with a
//! serde default) never breaks rows written earlier.

use courier_types::error::CodecError;
use courier_types::message::MessageMetadata;

pub fn encode(metadata: &MessageMetadata) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(metadata).map_err(|e| CodecError::MetadataEncode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<MessageMetadata, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::MetadataDecode(e.to_string()))
}
