//! The per-document preview runtime shared by the event listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hoverzoom_core::{
    HoverZoomConfig, KeyInput, KeyOutcome, Locale, Point, PreviewController, LOG_PREFIX,
};
use web_sys::Element;

use crate::dom::{global_window, DomPage, EventSink, PageEvent};
use crate::error::DomError;

/// Controller plus the page it drives.
pub struct Runtime {
    controller: PreviewController<DomPage>,
    page: DomPage,
}

/// Handle held by every listener.
pub type SharedRuntime = Rc<RefCell<Runtime>>;

impl Runtime {
    /// Build the runtime for the global document.
    pub fn create(config: HoverZoomConfig) -> Result<SharedRuntime, DomError> {
        let (window, document) = global_window()?;
        let locale = window
            .navigator()
            .language()
            .map(|tag| Locale::from_language_tag(&tag))
            .unwrap_or_default();

        Ok(Rc::new_cyclic(|weak: &Weak<RefCell<Runtime>>| {
            let weak = weak.clone();
            let sink: EventSink = Rc::new(move |event| Self::dispatch(&weak, event));
            RefCell::new(Self {
                controller: PreviewController::new(config, locale),
                page: DomPage::new(window, document, sink),
            })
        }))
    }

    /// Deliver an asynchronous page event, if the runtime is still alive.
    fn dispatch(weak: &Weak<RefCell<Runtime>>, event: PageEvent) {
        let Some(runtime) = weak.upgrade() else {
            return;
        };
        let Ok(mut runtime) = runtime.try_borrow_mut() else {
            log::warn!("{LOG_PREFIX} Runtime busy, dropping {event:?}");
            return;
        };
        runtime.page_event(event);
    }

    pub fn page(&self) -> &DomPage {
        &self.page
    }

    pub fn controller(&self) -> &PreviewController<DomPage> {
        &self.controller
    }

    fn page_event(&mut self, event: PageEvent) {
        let Self { controller, page } = self;
        match event {
            PageEvent::DecodeSucceeded {
                generation,
                natural,
            } => controller.handle_decode_success(page, generation, natural),
            PageEvent::DecodeFailed { generation } => {
                controller.handle_decode_failure(page, generation)
            }
            PageEvent::NotificationExpired => controller.notification_expired(),
        }
    }

    pub fn key_down(&mut self, input: &KeyInput) -> KeyOutcome {
        self.controller.handle_key(&mut self.page, input)
    }

    pub fn mouse_over(&mut self, target: &Element, pointer: Point) {
        self.controller
            .handle_mouse_over(&mut self.page, target, pointer);
    }

    pub fn mouse_out(&mut self, target: &Element, related: Option<&Element>) {
        self.controller
            .handle_mouse_out(&mut self.page, target, related);
    }

    pub fn mouse_move(&mut self, target: &Element, pointer: Point) {
        self.controller
            .handle_mouse_move(&mut self.page, target, pointer);
    }
}
