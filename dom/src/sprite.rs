//!
//! SVG sprite loading.
//!

use crate::result::Result;
use crate::utils::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Response};

/// Fetch the sprite sheet at `src` and embed it in a hidden `<div data-sprite>`
/// appended to `into` (or to `<head>` if not supplied), making its symbols
/// available to `<use href="#id">` references.
pub async fn load_sprite(src: &str, into: Option<&Element>) -> Result<()> {
    let response: Response = JsFuture::from(window()?.fetch_with_str(src))
        .await?
        .dyn_into()?;
    let sprite = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| format!("sprite `{src}` is not a text resource"))?;

    let div = document()?.create_element("div")?;
    div.set_attribute("data-sprite", src)?;
    div.set_attribute("style", "display: none;")?;
    div.set_inner_html(&sprite);

    match into {
        Some(into) => into.append_child(&div)?,
        None => root()?.append_child(&div)?,
    };

    Ok(())
}
