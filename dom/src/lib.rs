//!
//! Browser bindings for [`sdkload_core`].
//!
//! Provides the browser implementations of the loader seams:
//! - [`WindowEnvironment`](environment::WindowEnvironment) resolves SDK globals on
//!   `globalThis` (falling back to CommonJS `exports` and `module.exports`) and
//!   installs ready-signal handlers as global functions.
//! - [`ScriptTagInjector`](script::ScriptTagInjector) loads a script by inserting
//!   a `<script>` element ahead of the first script in the document.
//!
//! along with small DOM helpers commonly used next to SDK loading:
//! image load detection, `<link rel="preconnect">` hints and SVG sprite injection.
//!
//! Example:
//!
//! ```rust ignore
//! use sdkload_core::sdk::Sdk;
//!
//! let loader = sdkload_dom::loader::create();
//! let sdk = Sdk::new("https://player.vimeo.com/api/player.js", "Vimeo");
//! let vimeo = loader.load(&sdk).await?;
//! ```

pub mod environment;
pub mod error;
pub mod image;
pub mod link;
pub mod loader;
pub mod result;
pub mod script;
pub mod sprite;
pub mod utils;
