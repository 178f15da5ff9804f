//! Re-exports of the most commonly used types and functions.

pub use crate::environment::{Environment, Globals, Namespace, ReadyHandler};
pub use crate::error::Error;
pub use crate::injector::ScriptInjector;
pub use crate::loader::Loader;
pub use crate::query::{
    append_params_to_url, append_query_string_to_url, parse_query_string,
    serialize_query_string, QueryParams, QueryValue,
};
pub use crate::result::Result;
pub use crate::sdk::Sdk;
