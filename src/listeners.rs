//! Document event listeners.
//!
//! All four pointer/keyboard listeners are registered on `document` in the
//! capture phase so they run before the page's own bubbling handlers.

use std::rc::Rc;

use hoverzoom_core::{KeyInput, KeyOutcome, Point, LOG_PREFIX};
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, KeyboardEvent, MouseEvent, MutationObserver, MutationObserverInit};

use crate::error::DomError;
use crate::runtime::{Runtime, SharedRuntime};

fn add_capture_listener<T>(
    document: &Document,
    event_type: &str,
    closure: Closure<T>,
) -> Result<(), DomError>
where
    T: ?Sized + WasmClosure,
{
    document.add_event_listener_with_callback_and_bool(
        event_type,
        closure.as_ref().unchecked_ref(),
        true,
    )?;
    // Listeners stay registered for the life of the document
    closure.forget();
    Ok(())
}

fn as_element(target: Option<EventTarget>) -> Option<Element> {
    target.and_then(|target| target.dyn_into::<Element>().ok())
}

fn pointer(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Run `f` on the runtime unless a callback further up the stack holds it.
fn with_runtime<R>(runtime: &SharedRuntime, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    match runtime.try_borrow_mut() {
        Ok(mut runtime) => Some(f(&mut runtime)),
        Err(_) => {
            log::debug!("{LOG_PREFIX} Runtime busy, skipping event");
            None
        }
    }
}

/// Register the `keydown`, `mouseover`, `mouseout` and `mousemove` listeners.
pub fn register(document: &Document, runtime: &SharedRuntime) -> Result<(), DomError> {
    let keydown = {
        let runtime = Rc::clone(runtime);
        Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |event: KeyboardEvent| {
            let input = KeyInput::new(event.ctrl_key(), event.key(), event.code());
            let outcome = with_runtime(&runtime, |runtime| runtime.key_down(&input));
            if let Some(KeyOutcome::Toggled { .. }) = outcome {
                event.prevent_default();
            }
        }))
    };
    add_capture_listener(document, "keydown", keydown)?;

    let mouseover = {
        let runtime = Rc::clone(runtime);
        Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            let Some(target) = as_element(event.target()) else {
                return;
            };
            with_runtime(&runtime, |runtime| {
                runtime.mouse_over(&target, pointer(&event))
            });
        }))
    };
    add_capture_listener(document, "mouseover", mouseover)?;

    let mouseout = {
        let runtime = Rc::clone(runtime);
        Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            let Some(target) = as_element(event.target()) else {
                return;
            };
            let related = as_element(event.related_target());
            with_runtime(&runtime, |runtime| {
                runtime.mouse_out(&target, related.as_ref())
            });
        }))
    };
    add_capture_listener(document, "mouseout", mouseout)?;

    let mousemove = {
        let runtime = Rc::clone(runtime);
        Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |event: MouseEvent| {
            let Some(target) = as_element(event.target()) else {
                return;
            };
            with_runtime(&runtime, |runtime| {
                runtime.mouse_move(&target, pointer(&event))
            });
        }))
    };
    add_capture_listener(document, "mousemove", mousemove)?;

    Ok(())
}

/// Attach a mutation observer to `<body>`. It only traces; reserved for
/// pages that swap images in after load.
pub fn observe_mutations(document: &Document) -> Result<(), DomError> {
    let Some(body) = document.body() else {
        log::debug!("{LOG_PREFIX} No body yet, skipping mutation observer");
        return Ok(());
    };

    let callback = Closure::<dyn FnMut(js_sys::Array)>::wrap(Box::new(|records: js_sys::Array| {
        log::trace!("{LOG_PREFIX} {} page mutations observed", records.length());
    }));
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&body, &options)?;

    callback.forget();
    Ok(())
}
