//!
//! Errors returned by the [`sdkload_dom`](super) crate
//!
use async_std::channel::RecvError;
use thiserror::Error;
use wasm_bindgen::JsValue;
use workflow_core::sendable::Sendable;

/// Errors returned by the [`sdkload_dom`](super) crate
#[derive(Error, Debug)]
pub enum Error {
    /// Custom string error
    #[error("{0}")]
    String(String),
    /// Error containing [`wasm_bindgen::JsValue`] value
    #[error("{0:?}")]
    JsValue(Sendable<JsValue>),
    /// Image did not load or is narrower than required
    #[error("unable to load image `{0}`")]
    ImageLoad(String),
    #[error(transparent)]
    Core(#[from] sdkload_core::error::Error),
    #[error("{0}")]
    RecvError(RecvError),
}

impl From<String> for Error {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Error {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<JsValue> for Error {
    fn from(v: JsValue) -> Self {
        Self::JsValue(Sendable(v))
    }
}

impl From<RecvError> for Error {
    fn from(err: RecvError) -> Self {
        Self::RecvError(err)
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<Error> for sdkload_core::error::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(err) => err,
            err => sdkload_core::error::Error::Environment(err.to_string()),
        }
    }
}
