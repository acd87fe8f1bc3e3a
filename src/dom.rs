//! [`HostPage`] over the real browser DOM.
//!
//! Owns the two injected nodes: the preview container (a `div` wrapping one
//! `img`) and the notification banner. Both are created on first use and
//! stay in the document for the life of the page; hiding only changes their
//! display and clears the preview image source.

use std::rc::Rc;

use hoverzoom_core::{
    ElementKind, Generation, HostPage, LoadRequest, Point, Size, Viewport, LOG_PREFIX,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlAnchorElement, HtmlElement, HtmlImageElement, HtmlVideoElement, Window,
};

use crate::error::DomError;

/// Class marker of the preview container.
pub const PREVIEW_CLASS: &str = "image-hover-preview-container";
const PREVIEW_SELECTOR: &str = ".image-hover-preview-container";

/// Id of the notification banner.
pub const NOTIFICATION_ID: &str = "hoverzoom-notification";

/// Attribute on the preview image recording the original thumbnail URL.
const FALLBACK_ATTRIBUTE: &str = "data-original-thumb-src";

/// Asynchronous results delivered back from the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// The preview image decoded
    DecodeSucceeded {
        generation: Generation,
        natural: Size,
    },
    /// The preview image failed to load or decode
    DecodeFailed { generation: Generation },
    /// The notification banner hid itself
    NotificationExpired,
}

/// Receiver for [`PageEvent`]s.
pub type EventSink = Rc<dyn Fn(PageEvent)>;

/// Decode callbacks bound to the preview image for one generation.
struct DecodeCallbacks {
    generation: Generation,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl DecodeCallbacks {
    fn bind(image: &HtmlImageElement, generation: Generation, sink: &EventSink) -> Self {
        let onload = {
            let image = image.clone();
            let sink = Rc::clone(sink);
            Closure::<dyn FnMut()>::wrap(Box::new(move || {
                let natural = Size::new(
                    f64::from(image.natural_width()),
                    f64::from(image.natural_height()),
                );
                sink(PageEvent::DecodeSucceeded {
                    generation,
                    natural,
                });
            }))
        };
        let onerror = {
            let sink = Rc::clone(sink);
            Closure::<dyn FnMut()>::wrap(Box::new(move || {
                sink(PageEvent::DecodeFailed { generation });
            }))
        };

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        Self {
            generation,
            _onload: onload,
            _onerror: onerror,
        }
    }
}

struct PreviewNode {
    container: HtmlElement,
    image: HtmlImageElement,
    callbacks: Option<DecodeCallbacks>,
}

/// The current document as seen by the preview controller.
pub struct DomPage {
    window: Window,
    document: Document,
    sink: EventSink,
    preview: Option<PreviewNode>,
    notification: Option<HtmlElement>,
    notification_callback: Option<Closure<dyn FnMut()>>,
}

impl DomPage {
    pub fn new(window: Window, document: Document, sink: EventSink) -> Self {
        Self {
            window,
            document,
            sink,
            preview: None,
            notification: None,
            notification_callback: None,
        }
    }

    /// Page for the global window, or an error outside a document context.
    pub fn from_global(sink: EventSink) -> Result<Self, DomError> {
        let (window, document) = global_window()?;
        Ok(Self::new(window, document, sink))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The preview container, if it has been created.
    pub fn preview_container(&self) -> Option<&HtmlElement> {
        self.preview.as_ref().map(|node| &node.container)
    }

    /// The notification banner, if it has been created.
    pub fn notification_banner(&self) -> Option<&HtmlElement> {
        self.notification.as_ref()
    }

    fn body(&self) -> Result<HtmlElement, DomError> {
        self.document
            .body()
            .ok_or(DomError::MissingGlobal("document.body"))
    }

    fn create_html_element(&self, tag: &'static str) -> Result<HtmlElement, DomError> {
        self.document
            .create_element(tag)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::UnexpectedType("HtmlElement"))
    }

    fn create_preview(&self) -> Result<PreviewNode, DomError> {
        let container = self.create_html_element("div")?;
        container.set_class_name(PREVIEW_CLASS);
        let image = HtmlImageElement::new()?;
        image.set_alt("");
        container.append_child(&image)?;
        self.body()?.append_child(&container)?;
        log::info!("{LOG_PREFIX} Preview container created");

        Ok(PreviewNode {
            container,
            image,
            callbacks: None,
        })
    }

    fn ensure_preview(&mut self) -> Result<&mut PreviewNode, DomError> {
        let node = match self.preview.take() {
            Some(node) => node,
            None => self.create_preview()?,
        };
        Ok(self.preview.insert(node))
    }

    fn ensure_notification(&mut self) -> Result<HtmlElement, DomError> {
        if let Some(banner) = &self.notification {
            return Ok(banner.clone());
        }
        let banner = match self.document.get_element_by_id(NOTIFICATION_ID) {
            Some(existing) => existing
                .dyn_into::<HtmlElement>()
                .map_err(|_| DomError::UnexpectedType("HtmlElement"))?,
            None => {
                let banner = self.create_html_element("div")?;
                banner.set_id(NOTIFICATION_ID);
                self.body()?.append_child(&banner)?;
                banner
            }
        };
        self.notification = Some(banner.clone());
        Ok(banner)
    }
}

/// The global window and its document.
pub(crate) fn global_window() -> Result<(Window, Document), DomError> {
    let window = web_sys::window().ok_or(DomError::MissingGlobal("window"))?;
    let document = window
        .document()
        .ok_or(DomError::MissingGlobal("document"))?;
    Ok((window, document))
}

fn set_px(element: &HtmlElement, property: &str, value: f64) -> Result<(), DomError> {
    element
        .style()
        .set_property(property, &format!("{value}px"))?;
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl HostPage for DomPage {
    type Element = Element;
    type Timer = i32;
    type Error = DomError;

    fn document_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default();
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or_default();
        Viewport::new(width, height)
    }

    fn element_kind(&self, element: &Element) -> ElementKind {
        let tag = element.tag_name();
        if tag.eq_ignore_ascii_case("img") {
            ElementKind::Image
        } else if tag.eq_ignore_ascii_case("video") {
            ElementKind::Video
        } else {
            ElementKind::Other
        }
    }

    fn bounding_size(&self, element: &Element) -> Size {
        let rect = element.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn natural_size(&self, element: &Element) -> Size {
        element
            .dyn_ref::<HtmlImageElement>()
            .map(|image| {
                Size::new(
                    f64::from(image.natural_width()),
                    f64::from(image.natural_height()),
                )
            })
            .unwrap_or_default()
    }

    fn image_source(&self, element: &Element) -> Option<String> {
        let image = element.dyn_ref::<HtmlImageElement>()?;
        non_empty(image.current_src()).or_else(|| non_empty(image.src()))
    }

    fn poster(&self, element: &Element) -> Option<String> {
        element
            .dyn_ref::<HtmlVideoElement>()
            .and_then(|video| non_empty(video.poster()))
    }

    fn background_image(&self, element: &Element) -> Option<String> {
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("background-image").ok())
            .and_then(non_empty)
    }

    fn children(&self, element: &Element) -> Vec<Element> {
        let children = element.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn enclosing_link_href(&self, element: &Element) -> Option<String> {
        element
            .closest("a")
            .ok()
            .flatten()
            .and_then(|link| link.dyn_into::<HtmlAnchorElement>().ok())
            .and_then(|link| non_empty(link.href()))
    }

    fn is_within_preview(&self, element: &Element) -> bool {
        matches!(element.closest(PREVIEW_SELECTOR), Ok(Some(_)))
    }

    fn begin_preview_load(&mut self, request: &LoadRequest) -> Result<(), DomError> {
        let sink = Rc::clone(&self.sink);
        let node = self.ensure_preview()?;
        node.image
            .set_attribute(FALLBACK_ATTRIBUTE, &request.fallback)?;

        // A retry within the same generation keeps the callbacks that are
        // currently running.
        let bound = node.callbacks.as_ref().map(|callbacks| callbacks.generation);
        if bound != Some(request.generation) {
            node.callbacks = Some(DecodeCallbacks::bind(
                &node.image,
                request.generation,
                &sink,
            ));
        }

        node.image.set_src(&request.src);
        Ok(())
    }

    fn resize_preview(&mut self, size: Size) -> Result<(), DomError> {
        let node = self.ensure_preview()?;
        set_px(&node.container, "width", size.width)?;
        set_px(&node.container, "height", size.height)?;
        let image_style = node.image.style();
        image_style.set_property("width", "100%")?;
        image_style.set_property("height", "100%")?;
        Ok(())
    }

    fn move_preview(&mut self, position: Point) -> Result<(), DomError> {
        let node = self.ensure_preview()?;
        set_px(&node.container, "left", position.x)?;
        set_px(&node.container, "top", position.y)?;
        Ok(())
    }

    fn reveal_preview(&mut self) -> Result<(), DomError> {
        self.ensure_preview()?
            .container
            .style()
            .set_property("display", "block")?;
        Ok(())
    }

    fn conceal_preview(&mut self) -> Result<(), DomError> {
        let Some(node) = self.preview.as_mut() else {
            return Ok(());
        };
        node.container.style().set_property("display", "none")?;
        node.image.set_onload(None);
        node.image.set_onerror(None);
        node.image.remove_attribute("src")?;
        node.callbacks = None;
        Ok(())
    }

    fn show_notification(&mut self, message: &str) -> Result<(), DomError> {
        let banner = self.ensure_notification()?;
        banner.set_text_content(Some(message));
        banner.style().set_property("display", "block")?;
        Ok(())
    }

    fn schedule_notification_hide(&mut self, after_ms: u32) -> Result<i32, DomError> {
        let banner = self.ensure_notification()?;
        let sink = Rc::clone(&self.sink);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            if let Err(err) = banner.style().set_property("display", "none") {
                log::warn!(
                    "{LOG_PREFIX} Failed to hide notification: {}",
                    DomError::from(err)
                );
            }
            sink(PageEvent::NotificationExpired);
        });

        let timeout = i32::try_from(after_ms).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            )?;
        self.notification_callback = Some(callback);
        Ok(handle)
    }

    fn cancel_timer(&mut self, timer: i32) {
        self.window.clear_timeout_with_handle(timer);
    }
}
