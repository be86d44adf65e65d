//! Adapter configuration.
//!
//! Loaded from an optional JSON file, then overridden by the environment the
//! serving platform sets on the model container (`PREDICTIVE_UNIT_ID`, ...).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::env;
use crate::utils::{first_set, parse_bool};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("both {} and {} have to be set", env::MODEL_NAME, env::MODEL_IMAGE)]
    IncompleteRequestPath,
}

/// Knobs for `ModelAdapter`. Every field defaults to the plain
/// decode -> predict -> encode behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdapterConfig {
    /// Unit name recorded in `meta.requestPath`. Overridden by PREDICTIVE_UNIT_ID.
    #[serde(default)]
    pub model_name: Option<String>,

    /// Unit image recorded in `meta.requestPath`. Overridden by PREDICTIVE_UNIT_IMAGE.
    #[serde(default)]
    pub image_name: Option<String>,

    /// Reject requests without a usable payload before calling the model.
    #[serde(default)]
    pub validate_request: bool,

    /// Append the model's custom metrics to `meta.metrics` of each response.
    #[serde(default)]
    pub include_metrics_in_response: bool,

    /// Log request and response bodies at trace level.
    #[serde(default)]
    pub log_payloads: bool,

    /// Upper bound on the request buffer, in bytes.
    #[serde(default)]
    pub max_request_bytes: Option<usize>,
}

impl AdapterConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AdapterConfig = serde_json::from_slice(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Config file named by SELDON_MODEL_CONFIG (or defaults), then env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `from_env` against an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match first_set(&[env::CONFIG_PATH], &lookup) {
            Some(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = non_empty(env::MODEL_NAME) {
            self.model_name = Some(v);
        }
        if let Some(v) = non_empty(env::MODEL_IMAGE) {
            self.image_name = Some(v);
        }
        if let Some(v) = lookup(env::VALIDATE_REQUEST) {
            self.validate_request = parse_bool(&v);
        }
        if let Some(v) = lookup(env::INCLUDE_METRICS) {
            self.include_metrics_in_response = parse_bool(&v);
        }
        if let Some(v) = lookup(env::LOG_PAYLOADS) {
            self.log_payloads = parse_bool(&v);
        }
        if let Some(v) = non_empty(env::MAX_REQUEST_BYTES) {
            let n = v.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: env::MAX_REQUEST_BYTES,
                value: v.clone(),
            })?;
            self.max_request_bytes = Some(n);
        }
        Ok(())
    }

    /// A unit name and image are only meaningful together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.model_name, &self.image_name) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::IncompleteRequestPath),
            _ => Ok(()),
        }
    }

    /// `{model_name: image_name}` when this unit is named, else empty.
    pub fn request_path(&self) -> BTreeMap<String, String> {
        match (&self.model_name, &self.image_name) {
            (Some(name), Some(image)) => BTreeMap::from([(name.clone(), image.clone())]),
            _ => BTreeMap::new(),
        }
    }
}
