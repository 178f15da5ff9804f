//!
//! [`WindowEnvironment`] resolves SDK globals in the browser global scope.
//!
//! Symbols are looked up on `globalThis` first; SDKs bundled as CommonJS
//! modules are also found on `globalThis.exports` or
//! `globalThis.module.exports`. Ready-signal handlers are plain functions
//! stored on `globalThis` under the signal name.
//!

use js_sys::{Function, Reflect};
use sdkload_core::environment::{Environment, ReadyHandler};
use sdkload_core::error::Error;
use sdkload_core::result::Result;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use workflow_core::sendable::Sendable;
use workflow_log::*;

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    if target.is_undefined() || target.is_null() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(name)).ok()
}

/// JS value resolved for an SDK global
pub type GlobalValue = Arc<Sendable<JsValue>>;

fn global_value(value: JsValue) -> GlobalValue {
    Arc::new(Sendable(value))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowEnvironment;

impl WindowEnvironment {
    pub fn new() -> Self {
        WindowEnvironment
    }

    fn global(&self) -> JsValue {
        js_sys::global().into()
    }
}

impl Environment for WindowEnvironment {
    type Value = GlobalValue;

    fn lookup(&self, name: &str) -> Option<Self::Value> {
        let global = self.global();

        if let Some(value) = property(&global, name).filter(|value| !value.is_undefined()) {
            return Some(global_value(value));
        }

        let exports = property(&global, "exports");
        if let Some(value) = exports
            .and_then(|exports| property(&exports, name))
            .filter(JsValue::is_truthy)
        {
            return Some(global_value(value));
        }

        property(&global, "module")
            .and_then(|module| property(&module, "exports"))
            .and_then(|exports| property(&exports, name))
            .filter(JsValue::is_truthy)
            .map(global_value)
    }

    fn is_present(&self, value: &Self::Value) -> bool {
        value.is_truthy()
    }

    fn ready_handler(&self, signal: &str) -> Option<ReadyHandler> {
        let function = property(&self.global(), signal)?
            .dyn_into::<Function>()
            .ok()?;
        let function = Sendable(function);
        let signal = signal.to_string();

        Some(Arc::new(move || {
            if let Err(err) = function.call0(&JsValue::UNDEFINED) {
                log_error!("ready handler `{}` failed: {:?}", signal, err);
            }
        }))
    }

    fn set_ready_handler(&self, signal: &str, handler: ReadyHandler) -> Result<()> {
        // the closure is owned by the global scope from here on
        let closure = Closure::<dyn FnMut()>::new(move || handler()).into_js_value();
        Reflect::set(&self.global(), &JsValue::from_str(signal), &closure)
            .map_err(|err| Error::Environment(format!("unable to install `{signal}`: {err:?}")))?;
        Ok(())
    }
}
