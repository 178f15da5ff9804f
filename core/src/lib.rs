//!
//! [`sdkload_core`] provides a platform-independent loader for external
//! script resources (third-party SDKs) that are expected to publish a global
//! symbol once they have been evaluated.
//!
//! Each unique URL is loaded at most once at a time: concurrent requests for
//! the same URL are queued behind the first one and all of them resolve with
//! the same value (or fail with the same error) once the underlying load
//! completes. Requests issued after the SDK became available resolve
//! immediately from the environment.
//!
//! The loader does not touch any global state directly. Symbol lookup and
//! ready-signal installation go through an [`Environment`](environment::Environment)
//! and the actual script insertion goes through a
//! [`ScriptInjector`](injector::ScriptInjector), both supplied at construction.
//! The `sdkload-dom` crate provides browser implementations of both.
//!
//! Alongside the loader this crate carries small helpers that are typically
//! used to build SDK URLs: query string parsing/serialization and JSON
//! decoding.
//!
//! Example:
//!
//! ```rust ignore
//! use sdkload_core::prelude::*;
//!
//! let loader = Loader::new(environment, injector);
//! let sdk = Sdk::new("https://www.youtube.com/iframe_api", "YT")
//!     .with_ready("onYouTubeIframeAPIReady");
//! let yt = loader.load(&sdk).await?;
//! ```

extern crate self as sdkload_core;

pub mod channel;
pub mod environment;
pub mod error;
pub mod injector;
pub mod json;
pub mod loader;
pub mod pending;
pub mod prelude;
pub mod query;
pub mod result;
pub mod sdk;
