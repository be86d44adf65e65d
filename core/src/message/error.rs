//! message/error.rs
//! Errors raised while turning bytes into messages and back.

use std::fmt;

use thiserror::Error;

/// Which check rejected an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not JSON at all (or truncated, or not UTF-8).
    Syntax,
    /// Well-formed JSON that does not fit the message schema.
    Schema,
    /// Fits the schema but breaks a structural rule (oneof, tensor shape, ...).
    Validation,
    /// Larger than the configured request limit.
    TooLarge,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecodeErrorKind::Syntax => "invalid JSON",
            DecodeErrorKind::Schema => "schema mismatch",
            DecodeErrorKind::Validation => "invalid message",
            DecodeErrorKind::TooLarge => "request too large",
        };
        f.write_str(name)
    }
}

/// Input could not be decoded into a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::Validation, message)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        use serde_json::error::Category;
        let message = e.to_string();
        let kind = match e.classify() {
            Category::Data => DecodeErrorKind::Schema,
            // Valid JSON whose number does not fit the target field.
            Category::Syntax if message.starts_with("number out of range") => DecodeErrorKind::Schema,
            Category::Syntax | Category::Eof | Category::Io => DecodeErrorKind::Syntax,
        };
        DecodeError::new(kind, message)
    }
}

/// A message produced by a model could not be serialized.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{path}: more than one payload field is set ({count})")]
    MultiplePayloads { path: String, count: usize },

    #[error("{field}: non-finite number cannot be encoded as JSON")]
    NonFinite { field: String },

    #[error("metric {index}: {reason}")]
    InvalidMetric { index: usize, reason: String },

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
