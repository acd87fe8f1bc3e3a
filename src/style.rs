//! Stylesheet for the injected nodes.

use web_sys::Document;

use crate::dom::{NOTIFICATION_ID, PREVIEW_CLASS};
use crate::error::DomError;

/// Id of the injected `<style>` element.
pub const STYLE_ID: &str = "hoverzoom-style";

fn stylesheet() -> String {
    format!(
        ".{PREVIEW_CLASS} {{
  position: fixed;
  display: none;
  z-index: 2147483646;
  box-sizing: border-box;
  padding: 0;
  margin: 0;
  border: 1px solid rgba(0, 0, 0, 0.25);
  background: #fff;
  box-shadow: 0 4px 18px rgba(0, 0, 0, 0.35);
  pointer-events: none;
  overflow: hidden;
}}
.{PREVIEW_CLASS} img {{
  display: block;
  max-width: none;
  max-height: none;
  object-fit: contain;
}}
#{NOTIFICATION_ID} {{
  position: fixed;
  display: none;
  top: 20px;
  left: 50%;
  transform: translateX(-50%);
  z-index: 2147483647;
  padding: 8px 16px;
  border-radius: 4px;
  background: rgba(0, 0, 0, 0.8);
  color: #fff;
  font: 14px/1.4 sans-serif;
  pointer-events: none;
}}
"
    )
}

/// Add the stylesheet to `<head>` (or the document element) once.
pub fn inject(document: &Document) -> Result<(), DomError> {
    if document.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(&stylesheet()));

    let parent = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or(DomError::MissingGlobal("document element"))?,
    };
    parent.append_child(&style)?;
    Ok(())
}
