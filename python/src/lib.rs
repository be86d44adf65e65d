//! seldon-model-python
//!
//! Python bindings for seldon-model-core (PyO3).
//!
//! A model crate registers its predictor from its own module entry point:
//!
//! ```ignore
//! #[pymodule]
//! fn my_model(m: &Bound<'_, PyModule>) -> PyResult<()> {
//!     seldon_model::register_model::<MyModel>(m)
//! }
//! ```

#[cfg(feature = "identity-module")]
use pyo3::prelude::*;

mod ffi;

pub use ffi::{register_model, ConfigError, DecodeError, EncodeError, PredictionError, PySeldonModel};

/// Python module entry point serving the echo model.
#[cfg(feature = "identity-module")]
#[pymodule]
fn seldon_model(m: &Bound<'_, PyModule>) -> PyResult<()> {
    ffi::register_model::<seldon_model_core::predictor::IdentityModel>(m)?;
    Ok(())
}
