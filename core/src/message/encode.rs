//! message/encode.rs
//!
//! Message -> JSON bytes.
//!
//! Design notes:
//! - Output is compact UTF-8 JSON with default-valued fields omitted.
//! - Validation runs first so nothing half-serialized is ever returned.

use crate::message::error::EncodeError;
use crate::message::types::{SeldonMessage, SeldonMessageList};
use crate::message::validate::validate_for_encode;

/// Encode one `SeldonMessage` as JSON bytes.
pub fn encode_message(msg: &SeldonMessage) -> Result<Vec<u8>, EncodeError> {
    validate_for_encode(msg)?;
    Ok(serde_json::to_vec(msg)?)
}

/// Encode a `SeldonMessageList` as JSON bytes.
pub fn encode_message_list(list: &SeldonMessageList) -> Result<Vec<u8>, EncodeError> {
    list.seldon_messages.iter().try_for_each(validate_for_encode)?;
    Ok(serde_json::to_vec(list)?)
}
