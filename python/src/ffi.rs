//! ffi.rs
//!
//! Python surface: one `SeldonModel` class and its exception types.
//!
//! Design notes:
//! - `register_model::<P>()` is the explicit registration hook. Call it from a
//!   `#[pymodule]`; it fixes which predictor the zero-arg constructor builds.
//! - One extension process serves one model. Registering a second, different
//!   predictor type is an error; re-registering the same type is a no-op.
//! - Config is read from the environment, and the predictor's `load` hook
//!   run, each time a `SeldonModel` is built.
//! - The GIL is released while the adapter runs.

use std::any::{type_name, TypeId};
use std::sync::OnceLock;

use pyo3::create_exception;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use seldon_model_core::prelude::*;

create_exception!(seldon_model, DecodeError, PyValueError, "Request bytes are not a valid SeldonMessage.");
create_exception!(seldon_model, EncodeError, PyValueError, "Model response cannot be serialized.");
create_exception!(seldon_model, PredictionError, PyRuntimeError, "A model hook (load, predict, send_feedback, health_status, metadata) failed.");
create_exception!(seldon_model, ConfigError, PyRuntimeError, "Adapter configuration is invalid.");

type BoxedModel = Box<dyn RawPredictor + Send + Sync>;
type ModelFactory = fn() -> Result<BoxedModel, AdapterError>;

struct Registration {
    type_id: TypeId,
    type_name: &'static str,
    factory: ModelFactory,
}

static REGISTRATION: OnceLock<Registration> = OnceLock::new();

fn build_adapter<P>() -> Result<BoxedModel, AdapterError>
where
    P: Predictor + Default + Send + Sync + 'static,
{
    let config = AdapterConfig::from_env()?;
    Ok(Box::new(ModelAdapter::with_config(P::default(), config)?))
}

fn to_py_err(e: AdapterError) -> PyErr {
    match e {
        AdapterError::Decode(e) => DecodeError::new_err(e.to_string()),
        AdapterError::Encode(e) => EncodeError::new_err(e.to_string()),
        AdapterError::Predict(e) => PredictionError::new_err(format!("{:#}", e)),
        AdapterError::Config(e) => ConfigError::new_err(e.to_string()),
    }
}

fn init_logging() {
    // A host may have installed its own logger already.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}

/// A registered model as seen from Python.
#[pyclass(name = "SeldonModel", module = "seldon_model", frozen)]
pub struct PySeldonModel {
    inner: BoxedModel,
}

#[pymethods]
impl PySeldonModel {
    #[new]
    fn new() -> PyResult<Self> {
        let reg = REGISTRATION
            .get()
            .ok_or_else(|| PyRuntimeError::new_err("no model registered with this module"))?;
        let inner = (reg.factory)().map_err(to_py_err)?;
        log::debug!("built SeldonModel for {}", reg.type_name);
        Ok(Self { inner })
    }

    /// JSON SeldonMessage bytes in, JSON SeldonMessage bytes out.
    fn predict_raw<'py>(&self, py: Python<'py>, input: &[u8]) -> PyResult<Bound<'py, PyBytes>> {
        let out = py
            .allow_threads(|| self.inner.predict_raw(input))
            .map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &out))
    }

    /// JSON Feedback bytes in, JSON SeldonMessage bytes out.
    fn send_feedback_raw<'py>(&self, py: Python<'py>, input: &[u8]) -> PyResult<Bound<'py, PyBytes>> {
        let out = py
            .allow_threads(|| self.inner.send_feedback_raw(input))
            .map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &out))
    }

    /// JSON SeldonMessage bytes describing model health.
    fn health_status_raw<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let out = py
            .allow_threads(|| self.inner.health_status_raw())
            .map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &out))
    }

    /// JSON object bytes with the model's metadata.
    fn metadata_raw<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let out = py
            .allow_threads(|| self.inner.metadata_raw())
            .map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &out))
    }
}

/// Register predictor `P` and add `SeldonModel` plus the exception types to `m`.
pub fn register_model<P>(m: &Bound<'_, PyModule>) -> PyResult<()>
where
    P: Predictor + Default + Send + Sync + 'static,
{
    init_logging();

    let reg = REGISTRATION.get_or_init(|| Registration {
        type_id: TypeId::of::<P>(),
        type_name: type_name::<P>(),
        factory: build_adapter::<P>,
    });
    if reg.type_id != TypeId::of::<P>() {
        return Err(PyRuntimeError::new_err(format!(
            "cannot register {}: {} is already registered",
            type_name::<P>(),
            reg.type_name
        )));
    }

    let py = m.py();
    m.add_class::<PySeldonModel>()?;
    m.add("DecodeError", py.get_type_bound::<DecodeError>())?;
    m.add("EncodeError", py.get_type_bound::<EncodeError>())?;
    m.add("PredictionError", py.get_type_bound::<PredictionError>())?;
    m.add("ConfigError", py.get_type_bound::<ConfigError>())?;
    log::info!("registered model {}", reg.type_name);
    Ok(())
}
