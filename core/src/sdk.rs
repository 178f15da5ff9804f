//!
//! [`Sdk`] describes an external script resource and the global symbol
//! it publishes once loaded.
//!

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sdk {
    /// Script URL, also used as the deduplication key
    pub url: String,
    /// Name of the global symbol published by the script
    pub global: String,
    /// Optional name of the global function the script calls once ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<String>,
}

impl Sdk {
    pub fn new(url: impl Into<String>, global: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            global: global.into(),
            ready: None,
        }
    }

    pub fn with_ready(mut self, ready: impl Into<String>) -> Self {
        self.ready = Some(ready.into());
        self
    }
}
