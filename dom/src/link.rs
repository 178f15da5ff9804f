//!
//! Resource hints via `<link>` elements.
//!

use crate::result::Result;
use crate::utils::*;

/// Hint the browser to start establishing a connection to `url`
/// by appending a `<link rel="preconnect">` (or the given `rel`) element.
pub fn preconnect(url: &str, rel: Option<&str>, as_: Option<&str>) -> Result<()> {
    let link = document()?.create_element("link")?;
    link.set_attribute("rel", rel.unwrap_or("preconnect"))?;
    link.set_attribute("href", url)?;
    if let Some(as_) = as_ {
        link.set_attribute("as", as_)?;
    }
    link.set_attribute("crossorigin", "true")?;
    root()?.append_child(&link)?;
    Ok(())
}
