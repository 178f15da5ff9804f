//!
//! Image load detection.
//!
//! Loading through an `<img>` element avoids CORS restrictions that apply
//! to `fetch()`. The server status is not observable this way, so success
//! is determined by the image's `naturalWidth` after it settles.
//!

use crate::error::Error;
use crate::result::Result;
use async_std::channel::bounded;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Load the image at `src`. Resolves with the image element once loaded if
/// its natural width is at least `min_width` pixels, fails otherwise.
pub async fn load_image(src: &str, min_width: u32) -> Result<HtmlImageElement> {
    let image = HtmlImageElement::new()?;
    let (sender, receiver) = bounded::<()>(1);
    let handler = Closure::<dyn FnMut()>::new(move || {
        sender.try_send(()).ok();
    });

    image.set_onload(Some(handler.as_ref().unchecked_ref()));
    image.set_onerror(Some(handler.as_ref().unchecked_ref()));
    image.set_src(src);

    receiver.recv().await?;
    image.set_onload(None);
    image.set_onerror(None);

    if image.natural_width() >= min_width {
        Ok(image)
    } else {
        Err(Error::ImageLoad(src.to_string()))
    }
}
