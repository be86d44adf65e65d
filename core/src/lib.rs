//! seldon-model-core
//!
//! Pure Rust model adapter for the Seldon serving wrapper.
//! JSON bytes in, user `Predictor` in the middle, JSON bytes out.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod config;
pub mod message;
pub mod telemetry;

// Dispatch layers
pub mod adapter;
pub mod predictor;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::adapter::ModelAdapter;
    pub use crate::config::AdapterConfig;
    pub use crate::message::{
        DefaultData, Feedback, Meta, Metric, MetricType, SeldonMessage, Status, StatusFlag, Tensor,
    };
    pub use crate::predictor::{FnPredictor, IdentityModel, Predictor, RawPredictor};
    pub use crate::types::AdapterError;
}
