//! Errors from DOM operations.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that can occur while touching the host document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A browser global (window, document, body) is unavailable
    #[error("missing {0}")]
    MissingGlobal(&'static str),

    /// A node had an unexpected type
    #[error("unexpected node type: expected {0}")]
    UnexpectedType(&'static str),

    /// A DOM call threw
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &"message".into())
                    .ok()
                    .and_then(|message| message.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

impl From<DomError> for JsValue {
    fn from(error: DomError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
