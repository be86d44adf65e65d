//! predictor.rs
//! The capability a user model implements, and the byte-level boundary the
//! binding layer talks to.
//!
//! Design notes:
//! - `Predictor` takes `&self`: the adapter keeps no state between calls, so a
//!   predictor that is `Sync` can be driven from several host threads at once.
//! - Only `predict` is required. Load, feedback, health, metadata, tags and
//!   metrics all have no-op defaults.
//! - `load` runs once, before the first request, when an adapter is built
//!   with `ModelAdapter::with_config`.
//! - `RawPredictor` is object-safe; the Python class stores one behind a `Box`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::message::{Feedback, Metric, SeldonMessage};
use crate::types::AdapterError;

/// A user model: one pure transformation from request to response.
pub trait Predictor {
    /// Produce a response for `request`. Errors propagate to the caller as-is.
    fn predict(&self, request: &SeldonMessage) -> anyhow::Result<SeldonMessage>;

    /// One-time setup (weights, lookup tables). State built here lives behind
    /// interior mutability, e.g. a `OnceLock`.
    fn load(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Accept a reward signal for an earlier prediction.
    fn send_feedback(&self, _feedback: &Feedback) -> anyhow::Result<SeldonMessage> {
        Ok(SeldonMessage::default())
    }

    /// Custom tags merged into `meta.tags` of every response.
    fn tags(&self) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    /// Custom metrics reported with every response.
    fn metrics(&self) -> Vec<Metric> {
        Vec::new()
    }

    /// Liveness payload. An empty message means healthy.
    fn health_status(&self) -> anyhow::Result<SeldonMessage> {
        Ok(SeldonMessage::default())
    }

    /// Free-form model metadata (name, versions, inputs, outputs).
    fn metadata(&self) -> anyhow::Result<Value> {
        Ok(Value::Object(Default::default()))
    }
}

/// Wraps a closure as a predictor.
pub struct FnPredictor<F>(pub F);

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&SeldonMessage) -> anyhow::Result<SeldonMessage>,
{
    fn predict(&self, request: &SeldonMessage) -> anyhow::Result<SeldonMessage> {
        (self.0)(request)
    }
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, request: &SeldonMessage) -> anyhow::Result<SeldonMessage> {
        (**self).predict(request)
    }

    fn load(&self) -> anyhow::Result<()> {
        (**self).load()
    }

    fn send_feedback(&self, feedback: &Feedback) -> anyhow::Result<SeldonMessage> {
        (**self).send_feedback(feedback)
    }

    fn tags(&self) -> BTreeMap<String, Value> {
        (**self).tags()
    }

    fn metrics(&self) -> Vec<Metric> {
        (**self).metrics()
    }

    fn health_status(&self) -> anyhow::Result<SeldonMessage> {
        (**self).health_status()
    }

    fn metadata(&self) -> anyhow::Result<Value> {
        (**self).metadata()
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, request: &SeldonMessage) -> anyhow::Result<SeldonMessage> {
        (**self).predict(request)
    }

    fn load(&self) -> anyhow::Result<()> {
        (**self).load()
    }

    fn send_feedback(&self, feedback: &Feedback) -> anyhow::Result<SeldonMessage> {
        (**self).send_feedback(feedback)
    }

    fn tags(&self) -> BTreeMap<String, Value> {
        (**self).tags()
    }

    fn metrics(&self) -> Vec<Metric> {
        (**self).metrics()
    }

    fn health_status(&self) -> anyhow::Result<SeldonMessage> {
        (**self).health_status()
    }

    fn metadata(&self) -> anyhow::Result<Value> {
        (**self).metadata()
    }
}

/// Byte-in, byte-out entry points, independent of the predictor type.
pub trait RawPredictor {
    /// JSON `SeldonMessage` in, JSON `SeldonMessage` out.
    fn predict_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError>;

    /// JSON `Feedback` in, JSON `SeldonMessage` out.
    fn send_feedback_raw(&self, input: &[u8]) -> Result<Vec<u8>, AdapterError>;

    /// JSON `SeldonMessage` describing model health.
    fn health_status_raw(&self) -> Result<Vec<u8>, AdapterError>;

    /// JSON object of model metadata.
    fn metadata_raw(&self) -> Result<Vec<u8>, AdapterError>;
}

/// Echoes every request back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl Predictor for IdentityModel {
    fn predict(&self, request: &SeldonMessage) -> anyhow::Result<SeldonMessage> {
        Ok(request.clone())
    }
}
