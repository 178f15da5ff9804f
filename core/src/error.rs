//!
//! Errors returned by the [`sdkload_core`](super) crate
//!
use crate::channel::RecvError;
use thiserror::Error;

/// Errors returned by the [`sdkload_core`](super) crate.
///
/// The error is [`Clone`] because a single load failure is delivered
/// to every request waiting on the same URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Custom string error
    #[error("{0}")]
    Custom(String),

    /// The script resource failed to load
    #[error("unable to load `{url}`: {reason}")]
    Load { url: String, reason: String },

    /// The script loaded but the expected global symbol is not present
    #[error("global `{0}` is not defined")]
    MissingGlobal(String),

    /// The environment rejected an operation (symbol or handler installation)
    #[error("environment error: {0}")]
    Environment(String),

    #[error("{0}")]
    RecvError(RecvError),
}

impl Error {
    pub fn load<U: ToString, R: ToString>(url: U, reason: R) -> Self {
        Error::Load {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn custom<T: ToString>(s: T) -> Self {
        Error::Custom(s.to_string())
    }
}

impl From<String> for Error {
    fn from(v: String) -> Self {
        Self::Custom(v)
    }
}

impl From<&str> for Error {
    fn from(v: &str) -> Self {
        Self::Custom(v.to_string())
    }
}

impl From<RecvError> for Error {
    fn from(err: RecvError) -> Self {
        Self::RecvError(err)
    }
}
