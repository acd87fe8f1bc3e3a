//! HoverZoom - magnified floating previews of images under the pointer.
//!
//! Built as a WebAssembly content script. The platform-independent logic
//! lives in [`hoverzoom_core`]; this crate binds it to the browser DOM.

pub use hoverzoom_core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod error;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod style;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomPage, EventSink, PageEvent, NOTIFICATION_ID, PREVIEW_CLASS};
#[cfg(target_arch = "wasm32")]
pub use error::DomError;
#[cfg(target_arch = "wasm32")]
pub use wasm::*;
