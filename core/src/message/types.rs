//! message/types.rs
//! Typed view of the Seldon prediction schema (`prediction.proto`) in its JSON form.
//!
//! Design notes:
//! - Field names follow the proto3 JSON mapping (`binData`, `strData`, `requestPath`, ...).
//! - Scalars at their default value are omitted on output and filled in when absent on input.
//! - Unknown fields are rejected, as the host runtime's JSON parser does.
//! - Oneof groups are plain `Option`s here; exclusivity is checked in `validate.rs`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::message::bin_data;

// -----------------------------------------------------------------------------
// Serde helpers
// -----------------------------------------------------------------------------

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// A present `null` is a real `google.protobuf.Value` (NULL), not an absent field.
fn deserialize_some<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

/// Proto enums arrive either as their name or as their number.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnumRepr {
    Name(String),
    Number(i32),
}

// -----------------------------------------------------------------------------
// Enums
// -----------------------------------------------------------------------------

/// `Status.status` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "EnumRepr")]
pub enum StatusFlag {
    #[default]
    Success,
    Failure,
}

impl TryFrom<EnumRepr> for StatusFlag {
    type Error = String;

    fn try_from(raw: EnumRepr) -> Result<Self, Self::Error> {
        match raw {
            EnumRepr::Name(n) if n == "SUCCESS" => Ok(StatusFlag::Success),
            EnumRepr::Name(n) if n == "FAILURE" => Ok(StatusFlag::Failure),
            EnumRepr::Number(0) => Ok(StatusFlag::Success),
            EnumRepr::Number(1) => Ok(StatusFlag::Failure),
            EnumRepr::Name(n) => Err(format!("unknown status flag {:?}", n)),
            EnumRepr::Number(n) => Err(format!("unknown status flag {}", n)),
        }
    }
}

/// `Metric.type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "EnumRepr")]
pub enum MetricType {
    #[default]
    Counter,
    Gauge,
    Timer,
}

impl TryFrom<EnumRepr> for MetricType {
    type Error = String;

    fn try_from(raw: EnumRepr) -> Result<Self, Self::Error> {
        match raw {
            EnumRepr::Name(n) => match n.as_str() {
                "COUNTER" => Ok(MetricType::Counter),
                "GAUGE" => Ok(MetricType::Gauge),
                "TIMER" => Ok(MetricType::Timer),
                _ => Err(format!("unknown metric type {:?}", n)),
            },
            EnumRepr::Number(0) => Ok(MetricType::Counter),
            EnumRepr::Number(1) => Ok(MetricType::Gauge),
            EnumRepr::Number(2) => Ok(MetricType::Timer),
            EnumRepr::Number(n) => Err(format!("unknown metric type {}", n)),
        }
    }
}

// -----------------------------------------------------------------------------
// Messages
// -----------------------------------------------------------------------------

/// Outcome reported by a unit. `code`/`info`/`reason` are free-form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Status {
    #[serde(default, skip_serializing_if = "is_default")]
    pub code: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub status: StatusFlag,
}

/// One custom metric emitted by a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(rename = "type", default, skip_serializing_if = "is_default")]
    pub kind: MetricType,
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub value: f32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl Metric {
    pub fn new(key: impl Into<String>, kind: MetricType, value: f32) -> Self {
        Self { key: key.into(), kind, value, tags: BTreeMap::new() }
    }
}

/// Request/response metadata travelling alongside the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Meta {
    /// Prediction unique id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub puid: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routing: BTreeMap<String, i32>,
    /// Model name -> image, one entry per unit that handled the request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_path: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        self.puid.is_empty()
            && self.tags.is_empty()
            && self.routing.is_empty()
            && self.request_path.is_empty()
            && self.metrics.is_empty()
    }
}

/// Dense numeric tensor: row-major `values` reshaped by `shape`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tensor {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
}

impl Tensor {
    /// Number of elements implied by `shape`, or `None` for a negative dim or overflow.
    pub fn element_count(&self) -> Option<usize> {
        self.shape.iter().try_fold(1usize, |acc, &d| {
            usize::try_from(d).ok().and_then(|d| acc.checked_mul(d))
        })
    }
}

/// Tabular payload. `tensor`, `ndarray` and `tftensor` form a oneof.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefaultData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensor: Option<Tensor>,
    /// `google.protobuf.ListValue`: arbitrary nested JSON array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndarray: Option<Vec<Value>>,
    /// TensorFlow `TensorProto`, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_some")]
    pub tftensor: Option<Value>,
}

impl DefaultData {
    pub(crate) fn payload_count(&self) -> usize {
        self.tensor.is_some() as usize
            + self.ndarray.is_some() as usize
            + self.tftensor.is_some() as usize
    }
}

/// The request/response envelope exchanged with a model.
///
/// `data`, `binData`, `strData` and `jsonData` form the payload oneof:
/// at most one of them is set on a well-formed message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeldonMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DefaultData>,
    /// Raw bytes; base64 text on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "bin_data")]
    pub bin_data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "deserialize_some")]
    pub json_data: Option<Value>,
}

impl SeldonMessage {
    pub fn from_str_data(s: impl Into<String>) -> Self {
        Self { str_data: Some(s.into()), ..Self::default() }
    }

    pub fn from_bin_data(b: impl Into<Vec<u8>>) -> Self {
        Self { bin_data: Some(b.into()), ..Self::default() }
    }

    pub fn from_json_data(v: Value) -> Self {
        Self { json_data: Some(v), ..Self::default() }
    }

    pub fn from_tensor(shape: Vec<i32>, values: Vec<f64>) -> Self {
        Self {
            data: Some(DefaultData {
                tensor: Some(Tensor { shape, values }),
                ..DefaultData::default()
            }),
            ..Self::default()
        }
    }

    /// True when no field at all is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of payload oneof members that are set.
    pub fn payload_count(&self) -> usize {
        self.data.is_some() as usize
            + self.bin_data.is_some() as usize
            + self.str_data.is_some() as usize
            + self.json_data.is_some() as usize
    }

    /// Borrow `meta`, creating an empty one if absent.
    pub fn meta_mut(&mut self) -> &mut Meta {
        self.meta.get_or_insert_with(Meta::default)
    }

    /// `meta.puid`, if set and non-empty.
    pub fn puid(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.puid.as_str()).filter(|p| !p.is_empty())
    }
}

/// Reward signal for a previous prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<SeldonMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<SeldonMessage>,
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub reward: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truth: Option<SeldonMessage>,
}

/// Batch of messages, as exchanged by combiners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeldonMessageList {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seldon_messages: Vec<SeldonMessage>,
}
