//! adapter.rs
//! `ModelAdapter`: bytes -> `SeldonMessage` -> user `predict` -> bytes.
//!
//! Design notes:
//! - Every call is independent. The adapter owns the predictor and an
//!   immutable config, nothing else.
//! - Decode failures are returned before the predictor is touched.
//! - The predictor is called exactly once per successful decode.
//! - Response enrichment (tags, metrics, puid, requestPath) only creates
//!   `meta` when it has something to put there, so an echoing model returns
//!   its input verbatim under the default config.

use log::{debug, info, trace, warn};

use crate::config::AdapterConfig;
use crate::message::{
    decode_feedback, decode_message, encode_message, sanity_check_request, DecodeError,
    DecodeErrorKind, EncodeError, SeldonMessage,
};
use crate::predictor::{Predictor, RawPredictor};
use crate::telemetry::{CallTelemetry, CallTimer, Stage};
use crate::types::AdapterError;
use crate::utils::payload_preview;

/// Marshalling boundary around a user `Predictor`.
#[derive(Debug, Clone)]
pub struct ModelAdapter<P> {
    predictor: P,
    config: AdapterConfig,
}

impl<P: Predictor> ModelAdapter<P> {
    /// Adapter with the default config around an already loaded predictor.
    /// `Predictor::load` is not called.
    pub fn new(predictor: P) -> Self {
        Self { predictor, config: AdapterConfig::default() }
    }

    /// Validate `config`, then run `Predictor::load` once.
    pub fn with_config(predictor: P, config: AdapterConfig) -> Result<Self, AdapterError> {
        config.validate()?;
        predictor
            .load()
            .map_err(|e| AdapterError::Predict(e.context("model failed to load")))?;
        info!("model loaded");
        Ok(Self { predictor, config })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn into_inner(self) -> P {
        self.predictor
    }

    /// Decode `input`, run the predictor, encode its response.
    pub fn predict_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError> {
        self.predict_raw_traced(input).map(|(out, _)| out)
    }

    /// `predict_raw` plus the timings of each stage.
    pub fn predict_raw_traced(&self, input: &[u8]) -> Result<(Vec<u8>, CallTelemetry), AdapterError> {
        let mut timer = CallTimer::new();
        if self.config.log_payloads {
            trace!("request: {}", payload_preview(input));
        }

        let request = timer
            .time(Stage::Decode, || self.decode_request(input))
            .inspect_err(|e| warn!("rejecting request: {}", e))?;

        if self.config.validate_request {
            timer
                .time(Stage::Validate, || sanity_check_request(&request))
                .inspect_err(|e| warn!("rejecting request: {}", e))?;
        }

        let mut response = timer
            .time(Stage::Predict, || self.predictor.predict(&request))
            .map_err(AdapterError::Predict)?;
        self.enrich_response(&request, &mut response);

        let out = timer
            .time(Stage::Encode, || encode_message(&response))
            .inspect_err(|e| warn!("cannot encode model response: {}", e))?;
        timer.finish();

        if self.config.log_payloads {
            trace!("response: {}", payload_preview(&out));
        }
        let telemetry = CallTelemetry::from(&timer, input.len(), out.len());
        debug!("predict_raw: {}", telemetry.summary());
        Ok((out, telemetry))
    }

    /// Typed entry point: validation, prediction and enrichment without JSON.
    pub fn predict_message(&self, request: &SeldonMessage) -> Result<SeldonMessage, AdapterError> {
        if self.config.validate_request {
            sanity_check_request(request)?;
        }
        let mut response = self.predictor.predict(request).map_err(AdapterError::Predict)?;
        self.enrich_response(request, &mut response);
        Ok(response)
    }

    /// Decode a JSON `Feedback`, hand it to the predictor, encode the reply.
    pub fn send_feedback_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError> {
        if self.config.log_payloads {
            trace!("feedback: {}", payload_preview(input));
        }
        self.check_size(input)?;
        let feedback = decode_feedback(input).inspect_err(|e| warn!("rejecting feedback: {}", e))?;
        debug!("feedback received, reward={}", feedback.reward);
        let response = self.predictor.send_feedback(&feedback).map_err(AdapterError::Predict)?;
        Ok(encode_message(&response)?)
    }

    /// Health payload from the predictor, enriched like a prediction response.
    pub fn health_status_raw(&self) -> Result<Vec<u8>, AdapterError> {
        let mut response = self.predictor.health_status().map_err(AdapterError::Predict)?;
        self.enrich_response(&SeldonMessage::default(), &mut response);
        Ok(encode_message(&response)?)
    }

    /// Predictor metadata as a JSON document.
    pub fn metadata_raw(&self) -> Result<Vec<u8>, AdapterError> {
        let metadata = self.predictor.metadata().map_err(AdapterError::Predict)?;
        Ok(serde_json::to_vec(&metadata).map_err(EncodeError::Json)?)
    }

    fn check_size(&self, input: &[u8]) -> Result<(), DecodeError> {
        match self.config.max_request_bytes {
            Some(max) if input.len() > max => Err(DecodeError::new(
                DecodeErrorKind::TooLarge,
                format!("{} bytes exceeds limit of {}", input.len(), max),
            )),
            _ => Ok(()),
        }
    }

    fn decode_request(&self, input: &[u8]) -> Result<SeldonMessage, DecodeError> {
        self.check_size(input)?;
        decode_message(input)
    }

    fn enrich_response(&self, request: &SeldonMessage, response: &mut SeldonMessage) {
        let tags = self.predictor.tags();
        let metrics = if self.config.include_metrics_in_response {
            self.predictor.metrics()
        } else {
            Vec::new()
        };
        // A request puid replaces any puid the model set.
        let puid = request.puid().map(str::to_owned);
        // Entries already on the request win over this unit's own entry.
        let mut request_path = self.config.request_path();
        if let Some(meta) = &request.meta {
            request_path.extend(meta.request_path.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if tags.is_empty() && metrics.is_empty() && puid.is_none() && request_path.is_empty() {
            return;
        }

        let meta = response.meta_mut();
        meta.tags.extend(tags);
        meta.metrics.extend(metrics);
        if let Some(puid) = puid {
            meta.puid = puid;
        }
        meta.request_path.extend(request_path);
    }
}

impl<P: Predictor> RawPredictor for ModelAdapter<P> {
    fn predict_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError> {
        ModelAdapter::predict_raw(self, input)
    }

    fn send_feedback_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError> {
        ModelAdapter::send_feedback_raw(self, input)
    }

    fn health_status_raw(&self) -> Result<Vec<u8>, AdapterError> {
        ModelAdapter::health_status_raw(self)
    }

    fn metadata_raw(&self) -> Result<Vec<u8>, AdapterError> {
        ModelAdapter::metadata_raw(self)
    }
}
