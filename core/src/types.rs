use crate::{
    config::ConfigError,
    message::{DecodeError, EncodeError},
};

/// Unified adapter error covering decode, user prediction, encode and config.
/// - `From<T>` impls enable `?` across the adapter.
/// - `Predict` carries the model's own error untouched.
#[derive(Debug)]
pub enum AdapterError {
    /// Input bytes were not a valid message.
    Decode(DecodeError),

    /// The model's output could not be serialized.
    Encode(EncodeError),

    /// The user's `predict` / `send_feedback` failed.
    Predict(anyhow::Error),

    /// Adapter configuration is unusable.
    Config(ConfigError),
}

impl AdapterError {
    /// True when the caller sent bad input (as opposed to a model or adapter fault).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AdapterError::Decode(_))
    }
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::Decode(e) => write!(f, "decode error: {}", e),
            AdapterError::Encode(e) => write!(f, "encode error: {}", e),
            // User errors are shown as the user wrote them.
            AdapterError::Predict(e) => write!(f, "{:#}", e),
            AdapterError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::Decode(e) => Some(e),
            AdapterError::Encode(e) => Some(e),
            AdapterError::Predict(e) => Some(e.as_ref()),
            AdapterError::Config(e) => Some(e),
        }
    }
}

impl From<DecodeError> for AdapterError {
    fn from(e: DecodeError) -> Self {
        AdapterError::Decode(e)
    }
}

impl From<EncodeError> for AdapterError {
    fn from(e: EncodeError) -> Self {
        AdapterError::Encode(e)
    }
}

impl From<ConfigError> for AdapterError {
    fn from(e: ConfigError) -> Self {
        AdapterError::Config(e)
    }
}
