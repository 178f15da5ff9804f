//!
//! Script insertion strategy used by the [`Loader`](crate::loader::Loader).
//!
//! A [`ScriptInjector`] inserts the script located at a URL into the
//! execution environment and completes once the script has loaded
//! (or failed to load). The default browser implementation that creates
//! a `<script>` element is provided by the `sdkload-dom` crate.
//!

use crate::result::Result;
use async_trait::async_trait;

/// Inserts a script resource and signals its completion.
///
/// Futures are `Send` in native builds and `?Send` in WASM builds,
/// where they hold on to JavaScript event closures.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ScriptInjector: Send + Sync {
    /// Insert the script at `url`. Resolves with `Ok(())` when the script
    /// has been loaded and evaluated, or with [`Error::Load`](crate::error::Error::Load)
    /// if the script could not be loaded.
    async fn inject(&self, url: &str) -> Result<()>;
}
