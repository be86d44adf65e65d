//! message/decode.rs
//!
//! JSON bytes -> message.
//!
//! Design notes:
//! - Input must be UTF-8 JSON holding exactly one object of the target schema.
//! - Serde rejects syntax errors, wrong types and unknown fields.
//! - Oneof exclusivity is checked after parsing; a message that breaks it never
//!   reaches a model.

use serde::de::DeserializeOwned;

use crate::message::error::DecodeError;
use crate::message::types::{Feedback, SeldonMessage, SeldonMessageList};
use crate::message::validate::{find_feedback_violation, find_oneof_violation};

fn parse<T: DeserializeOwned>(buf: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(buf)?)
}

/// Decode one `SeldonMessage` from JSON bytes.
pub fn decode_message(buf: &[u8]) -> Result<SeldonMessage, DecodeError> {
    let msg: SeldonMessage = parse(buf)?;
    if let Some(v) = find_oneof_violation(&msg, "message") {
        return Err(v.into());
    }
    Ok(msg)
}

/// Decode a `Feedback` from JSON bytes.
pub fn decode_feedback(buf: &[u8]) -> Result<Feedback, DecodeError> {
    let fb: Feedback = parse(buf)?;
    if let Some(v) = find_feedback_violation(&fb) {
        return Err(v.into());
    }
    Ok(fb)
}

/// Decode a `SeldonMessageList` from JSON bytes.
pub fn decode_message_list(buf: &[u8]) -> Result<SeldonMessageList, DecodeError> {
    let list: SeldonMessageList = parse(buf)?;
    for (i, msg) in list.seldon_messages.iter().enumerate() {
        if let Some(v) = find_oneof_violation(msg, &format!("seldonMessages[{}]", i)) {
            return Err(v.into());
        }
    }
    Ok(list)
}
