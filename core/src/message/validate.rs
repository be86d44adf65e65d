//! message/validate.rs
//! Structural checks that serde alone cannot express.
//!
//! Design notes:
//! - Oneof exclusivity applies both ways: decode rejects it as a `DecodeError`,
//!   encode as an `EncodeError`.
//! - Finite-number and metric checks only guard the output side; JSON input
//!   cannot carry NaN or infinity in the first place.
//! - `sanity_check_request` is opt-in (see `AdapterConfig::validate_request`).

use crate::message::error::{DecodeError, EncodeError};
use crate::message::types::{Feedback, SeldonMessage};

/// Where a oneof group had more than one member set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofViolation {
    pub path: String,
    pub count: usize,
}

impl From<OneofViolation> for DecodeError {
    fn from(v: OneofViolation) -> Self {
        DecodeError::validation(format!(
            "{}: more than one payload field is set ({})",
            v.path, v.count
        ))
    }
}

impl From<OneofViolation> for EncodeError {
    fn from(v: OneofViolation) -> Self {
        EncodeError::MultiplePayloads { path: v.path, count: v.count }
    }
}

/// First oneof group in `msg` with more than one member set.
pub fn find_oneof_violation(msg: &SeldonMessage, path: &str) -> Option<OneofViolation> {
    let count = msg.payload_count();
    if count > 1 {
        return Some(OneofViolation { path: path.to_string(), count });
    }
    if let Some(data) = &msg.data {
        let count = data.payload_count();
        if count > 1 {
            return Some(OneofViolation { path: format!("{}.data", path), count });
        }
    }
    None
}

/// Oneof check over every message embedded in a feedback.
pub fn find_feedback_violation(fb: &Feedback) -> Option<OneofViolation> {
    [("request", &fb.request), ("response", &fb.response), ("truth", &fb.truth)]
        .into_iter()
        .find_map(|(name, m)| m.as_ref().and_then(|m| find_oneof_violation(m, name)))
}

/// Reject NaN / infinity anywhere a number is carried as a typed float.
pub fn check_finite(msg: &SeldonMessage) -> Result<(), EncodeError> {
    if let Some(tensor) = msg.data.as_ref().and_then(|d| d.tensor.as_ref()) {
        if let Some(i) = tensor.values.iter().position(|v| !v.is_finite()) {
            return Err(EncodeError::NonFinite { field: format!("data.tensor.values[{}]", i) });
        }
    }
    if let Some(meta) = &msg.meta {
        if let Some(i) = meta.metrics.iter().position(|m| !m.value.is_finite()) {
            return Err(EncodeError::NonFinite { field: format!("meta.metrics[{}].value", i) });
        }
    }
    Ok(())
}

/// Every metric must be named.
pub fn check_metrics(msg: &SeldonMessage) -> Result<(), EncodeError> {
    let Some(meta) = &msg.meta else { return Ok(()) };
    for (index, metric) in meta.metrics.iter().enumerate() {
        if metric.key.trim().is_empty() {
            return Err(EncodeError::InvalidMetric { index, reason: "missing key".into() });
        }
    }
    Ok(())
}

/// All output-side checks, in the order they are reported.
pub fn validate_for_encode(msg: &SeldonMessage) -> Result<(), EncodeError> {
    if let Some(v) = find_oneof_violation(msg, "message") {
        return Err(v.into());
    }
    check_finite(msg)?;
    check_metrics(msg)
}

/// Request sanity check applied by the serving wrapper before it calls a model.
///
/// - The message must carry a payload.
/// - `data` must carry `tensor`, `ndarray` or `tftensor`.
/// - A tensor with an explicit shape must hold exactly that many values.
pub fn sanity_check_request(msg: &SeldonMessage) -> Result<(), DecodeError> {
    if msg.payload_count() == 0 {
        return Err(DecodeError::validation(
            "request must contain data, binData, strData or jsonData",
        ));
    }
    let Some(data) = &msg.data else { return Ok(()) };
    if data.payload_count() == 0 {
        return Err(DecodeError::validation(
            "data has no 'tensor', 'ndarray' or 'tftensor' field",
        ));
    }
    if let Some(tensor) = &data.tensor {
        if !tensor.shape.is_empty() {
            match tensor.element_count() {
                Some(n) if n == tensor.values.len() => {}
                Some(n) => {
                    return Err(DecodeError::validation(format!(
                        "tensor shape {:?} needs {} values, got {}",
                        tensor.shape,
                        n,
                        tensor.values.len()
                    )))
                }
                None => {
                    return Err(DecodeError::validation(format!(
                        "tensor shape {:?} is not a valid shape",
                        tensor.shape
                    )))
                }
            }
        }
    }
    Ok(())
}
