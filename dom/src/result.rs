//! Result type used by the [`sdkload_dom`](super) crate

pub type Result<T> = std::result::Result<T, crate::error::Error>;
