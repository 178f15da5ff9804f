//!
//! Script injection via `<script>` elements.
//!
//! New scripts are inserted ahead of the first `<script>` element in the
//! document, or appended to `<head>` (or `<body>`) if the document has no
//! scripts yet.
//!

use crate::result::Result;
use crate::utils::*;
use async_std::channel::bounded;
use async_trait::async_trait;
use js_sys::Function;
use sdkload_core::error::Error;
use sdkload_core::injector::ScriptInjector;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, Node};
use workflow_core::sendable::Sendable;

type EventClosure = Closure<dyn FnMut(Event)>;

/// Create a `<script src=url>` element with `load` and `error` listeners
/// and insert it into the document.
pub fn insert_script(url: &str, onload: &Function, onerror: &Function) -> Result<Element> {
    let document = document()?;
    let script = document.create_element("script")?;
    script.set_attribute("src", url)?;
    script.add_event_listener_with_callback("load", onload)?;
    script.add_event_listener_with_callback("error", onerror)?;

    match document.get_elements_by_tag_name("script").item(0) {
        Some(first) => {
            let parent = first
                .parent_node()
                .ok_or("Unable to locate parent of the first script element")?;
            let anchor: &Node = first.as_ref();
            parent.insert_before(&script, Some(anchor))?;
        }
        None => {
            root()?.append_child(&script)?;
        }
    }

    Ok(script)
}

/// Default [`ScriptInjector`] that loads scripts through `<script>` elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptTagInjector;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ScriptInjector for ScriptTagInjector {
    async fn inject(&self, url: &str) -> sdkload_core::result::Result<()> {
        let (sender, receiver) = bounded::<std::result::Result<(), String>>(1);

        let onload: Sendable<EventClosure> = {
            let sender = sender.clone();
            Sendable(Closure::new(move |_event: Event| {
                sender.try_send(Ok(())).ok();
            }))
        };
        let onerror: Sendable<EventClosure> = Sendable(Closure::new(move |event: Event| {
            sender.try_send(Err(format!("script `{}` event", event.type_()))).ok();
        }));

        insert_script(
            url,
            onload.0.as_ref().unchecked_ref(),
            onerror.0.as_ref().unchecked_ref(),
        )
        .map_err(|err| Error::load(url, err))?;

        // listeners must stay alive until the script settles
        let result = receiver.recv().await?;
        drop((onload, onerror));
        result.map_err(|reason| Error::load(url, reason))
    }
}
