use std::cell::RefCell;

use hoverzoom_core::{HoverZoomConfig, LOG_PREFIX};
use wasm_bindgen::prelude::*;

use crate::runtime::{Runtime, SharedRuntime};
use crate::{listeners, logging, style};

thread_local! {
    /// The document's runtime, once started
    static RUNTIME: RefCell<Option<SharedRuntime>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// Start previews with the default configuration.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    boot(HoverZoomConfig::default())
}

/// Start previews with a JSON configuration; omitted fields keep defaults.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
    let config =
        HoverZoomConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
    boot(config)
}

fn boot(config: HoverZoomConfig) -> Result<(), JsValue> {
    if RUNTIME.with(|slot| slot.borrow().is_some()) {
        log::warn!("{LOG_PREFIX} Already started");
        return Ok(());
    }

    logging::init(config.log_level);

    let runtime = Runtime::create(config)?;
    let document = runtime.borrow().page().document().clone();

    style::inject(&document)?;
    listeners::register(&document, &runtime)?;
    listeners::observe_mutations(&document)?;

    let active = runtime.borrow().controller().is_active();
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));

    log::info!("{LOG_PREFIX} Content script loaded, active: {active}, toggle with Ctrl+Q");
    Ok(())
}
