//! message/bin_data.rs
//! Serde adapter for `bytes` fields: base64 text on the wire.
//!
//! Output uses the standard padded alphabet. Input accepts standard or
//! URL-safe alphabets, padded or not, as the proto3 JSON mapping allows.
//! The alphabet is picked per value: any `-` or `_` selects URL-safe, so a
//! value mixing `+`/`/` with `-`/`_` is rejected.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Encode bytes as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD_LENIENT.encode(bytes)
}

/// Decode base64 text in either alphabet.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if text.contains(['-', '_']) {
        URL_SAFE_LENIENT.decode(text)
    } else {
        STANDARD_LENIENT.decode(text)
    }
}

pub fn serialize<S>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(bytes) => s.serialize_str(&encode(bytes)),
        None => s.serialize_none(),
    }
}

pub fn deserialize<'de, D>(d: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(d)?;
    text.map(|t| decode(&t).map_err(|e| D::Error::custom(format!("invalid base64 in binData: {}", e))))
        .transpose()
}
