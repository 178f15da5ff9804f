//!
//! Execution environment abstraction used by the [`Loader`](crate::loader::Loader).
//!
//! An [`Environment`] resolves global symbols published by loaded scripts
//! and stores named ready-signal handlers that scripts invoke once they
//! finish initializing. [`Globals`] is an in-memory implementation; the
//! browser implementation lives in the `sdkload-dom` crate.
//!

use crate::result::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Handler installed under a ready-signal name
pub type ReadyHandler = Arc<dyn Fn() + Send + Sync>;

pub trait Environment: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    /// Resolve a global symbol, consulting any fallback namespaces
    fn lookup(&self, name: &str) -> Option<Self::Value>;

    /// Whether a resolved value counts as a published symbol. Values
    /// rejected here (e.g. a falsy placeholder) do not prevent a load.
    fn is_present(&self, _value: &Self::Value) -> bool {
        true
    }

    /// Handler currently installed under `signal`, if any
    fn ready_handler(&self, signal: &str) -> Option<ReadyHandler>;

    /// Install `handler` under `signal`, replacing the current one
    fn set_ready_handler(&self, signal: &str, handler: ReadyHandler) -> Result<()>;
}

/// Namespaces of [`Globals`], listed in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The primary global scope (`globalThis`)
    Global,
    /// CommonJS `exports`
    Exports,
    /// CommonJS `module.exports`
    ModuleExports,
}

impl Namespace {
    pub const ORDER: [Namespace; 3] = [
        Namespace::Global,
        Namespace::Exports,
        Namespace::ModuleExports,
    ];
}

/// In-memory [`Environment`] holding symbols in three namespaces
/// and a table of ready-signal handlers.
pub struct Globals<V> {
    symbols: Mutex<HashMap<Namespace, HashMap<String, V>>>,
    handlers: Mutex<HashMap<String, ReadyHandler>>,
    presence: Option<fn(&V) -> bool>,
}

impl<V> Default for Globals<V> {
    fn default() -> Self {
        Globals {
            symbols: Mutex::new(HashMap::new()),
            handlers: Mutex::new(HashMap::new()),
            presence: None,
        }
    }
}

impl<V> Globals<V>
where
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`Globals`] that only reports values accepted by
    /// `presence` as present.
    pub fn with_presence(presence: fn(&V) -> bool) -> Self {
        Globals {
            presence: Some(presence),
            ..Self::default()
        }
    }

    /// Define `name` in the primary global namespace
    pub fn define(&self, name: &str, value: V) {
        self.define_in(Namespace::Global, name, value);
    }

    pub fn define_in(&self, namespace: Namespace, name: &str, value: V) {
        self.symbols
            .lock()
            .unwrap()
            .entry(namespace)
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Remove `name` from every namespace
    pub fn remove(&self, name: &str) {
        for symbols in self.symbols.lock().unwrap().values_mut() {
            symbols.remove(name);
        }
    }

    /// Invoke the handler installed under `signal`, the way a loaded
    /// script announces readiness. Returns `false` if no handler is installed.
    pub fn signal(&self, signal: &str) -> bool {
        // the handler may re-enter the environment
        let handler = { self.handlers.lock().unwrap().get(signal).cloned() };
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl<V> Environment for Globals<V>
where
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    fn lookup(&self, name: &str) -> Option<V> {
        let symbols = self.symbols.lock().unwrap();
        Namespace::ORDER.iter().find_map(|namespace| {
            symbols
                .get(namespace)
                .and_then(|symbols| symbols.get(name))
                .cloned()
        })
    }

    fn is_present(&self, value: &V) -> bool {
        self.presence.map_or(true, |presence| presence(value))
    }

    fn ready_handler(&self, signal: &str) -> Option<ReadyHandler> {
        self.handlers.lock().unwrap().get(signal).cloned()
    }

    fn set_ready_handler(&self, signal: &str, handler: ReadyHandler) -> Result<()> {
        self.handlers
            .lock()
            .unwrap()
            .insert(signal.to_string(), handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn lookup_follows_namespace_order() {
        let globals = Globals::<u32>::new();
        assert_eq!(globals.lookup("Sdk"), None);

        globals.define_in(Namespace::ModuleExports, "Sdk", 3);
        assert_eq!(globals.lookup("Sdk"), Some(3));

        globals.define_in(Namespace::Exports, "Sdk", 2);
        assert_eq!(globals.lookup("Sdk"), Some(2));

        globals.define("Sdk", 1);
        assert_eq!(globals.lookup("Sdk"), Some(1));

        globals.remove("Sdk");
        assert_eq!(globals.lookup("Sdk"), None);
    }

    #[test]
    fn presence_predicate() {
        let globals = Globals::<u32>::new();
        assert!(globals.is_present(&0));

        let globals = Globals::<u32>::with_presence(|value| *value != 0);
        assert!(!globals.is_present(&0));
        assert!(globals.is_present(&1));
    }

    #[test]
    fn signal_invokes_installed_handler() {
        let globals = Globals::<u32>::new();
        assert!(!globals.signal("onReady"));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        globals
            .set_ready_handler(
                "onReady",
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert!(globals.ready_handler("onReady").is_some());
        assert!(globals.signal("onReady"));
        assert!(globals.signal("onReady"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
