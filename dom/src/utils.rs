//! Helper functions for accessing the DOM environment
use crate::result::Result;
use web_sys::{Document, Element, Window};

/// Return the current browser [`web_sys::Window`]
pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| "Unable to access window".into())
}

/// Return the current browser [`web_sys::Document`]
pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| "Unable to access document".into())
}

/// Return the `head` element of the current document, or `body`
/// if the document has no `head`
pub fn root() -> Result<Element> {
    let document = document()?;
    document
        .get_elements_by_tag_name("head")
        .item(0)
        .or_else(|| document.get_elements_by_tag_name("body").item(0))
        .ok_or_else(|| "Unable to locate head or body element".into())
}
