/// Environment variables read by `AdapterConfig::from_env`.
pub mod env {
    /// Name of this predictive unit in the serving graph.
    pub const MODEL_NAME: &str = "PREDICTIVE_UNIT_ID";
    /// Image the unit runs, reported next to the name in `meta.requestPath`.
    pub const MODEL_IMAGE: &str = "PREDICTIVE_UNIT_IMAGE";
    /// Path of an optional JSON config file.
    pub const CONFIG_PATH: &str = "SELDON_MODEL_CONFIG";
    pub const VALIDATE_REQUEST: &str = "SELDON_VALIDATE_REQUEST";
    pub const INCLUDE_METRICS: &str = "INCLUDE_METRICS_IN_CLIENT_RESPONSE";
    pub const LOG_PAYLOADS: &str = "SELDON_LOG_PAYLOADS";
    pub const MAX_REQUEST_BYTES: &str = "SELDON_MAX_REQUEST_BYTES";
}

/// Values accepted as `true` by boolean env vars (compared lowercase).
pub const TRUTHY: &[&str] = &["1", "true", "t"];

/// Payload logging truncates after this many bytes.
pub const MAX_LOGGED_PAYLOAD: usize = 1024;
