//!
//! Browser [`Loader`] construction.
//!

use crate::environment::WindowEnvironment;
use crate::script::ScriptTagInjector;
use sdkload_core::loader::Loader;
use std::sync::Arc;

pub type WindowLoader = Loader<WindowEnvironment>;

/// Create a loader that resolves globals on `globalThis`
/// and injects scripts as `<script>` elements.
pub fn create() -> WindowLoader {
    Loader::new(Arc::new(WindowEnvironment), Arc::new(ScriptTagInjector::default()))
}
