//! The page the preview lives in.
//!
//! [`HostPage`] is everything the controller needs from a document: read
//! access to hovered elements, and ownership of the two injected nodes (the
//! preview container and the notification banner). The browser build
//! implements it over `web-sys`; tests implement it in memory.

use std::fmt;

use crate::controller::Generation;
use crate::geometry::{Point, Size, Viewport};

/// How a hovered element can carry an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<img>`: its current source
    Image,
    /// `<video>`: its poster
    Video,
    /// Anything else: a CSS background image on it or a direct child
    Other,
}

/// Instruction to start decoding an image into the preview node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Hover interaction this load belongs to; echoed back by decode callbacks
    pub generation: Generation,
    /// URL to assign to the preview image
    pub src: String,
    /// Original thumbnail URL, recorded on the preview image as a marker
    pub fallback: String,
}

/// Document access used by [`crate::PreviewController`].
///
/// Mutating operations may fail (a missing `<body>`, a detached node). The
/// controller logs such failures and falls back to the hidden state.
pub trait HostPage {
    /// Handle to a DOM element.
    type Element: Clone + PartialEq + fmt::Debug;
    /// Handle to a pending timer.
    type Timer: Copy + fmt::Debug;
    /// Error from a DOM mutation.
    type Error: fmt::Display;

    /// Current document URL, used to resolve relative candidates.
    fn document_url(&self) -> String;

    fn viewport(&self) -> Viewport;

    fn element_kind(&self, element: &Self::Element) -> ElementKind;

    /// Rendered bounding box size.
    fn bounding_size(&self, element: &Self::Element) -> Size;

    /// Intrinsic pixel size of an `<img>`; zero for other elements.
    fn natural_size(&self, element: &Self::Element) -> Size;

    /// Current resolved source of an `<img>`.
    fn image_source(&self, element: &Self::Element) -> Option<String>;

    /// Poster of a `<video>`.
    fn poster(&self, element: &Self::Element) -> Option<String>;

    /// Computed `background-image` value.
    fn background_image(&self, element: &Self::Element) -> Option<String>;

    /// Direct element children in document order.
    fn children(&self, element: &Self::Element) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Target of the closest enclosing `<a>`.
    fn enclosing_link_href(&self, element: &Self::Element) -> Option<String>;

    /// Whether `element` is the preview container or inside it.
    fn is_within_preview(&self, element: &Self::Element) -> bool;

    /// Create the preview node if needed, bind decode callbacks for
    /// `request.generation` and assign `request.src`.
    fn begin_preview_load(&mut self, request: &LoadRequest) -> Result<(), Self::Error>;

    fn resize_preview(&mut self, size: Size) -> Result<(), Self::Error>;

    fn move_preview(&mut self, position: Point) -> Result<(), Self::Error>;

    /// Make the preview container visible.
    fn reveal_preview(&mut self) -> Result<(), Self::Error>;

    /// Hide the container, clear the image source and drop decode callbacks.
    /// The node stays in the document.
    fn conceal_preview(&mut self) -> Result<(), Self::Error>;

    /// Show `message` in the notification banner, creating it on first use.
    fn show_notification(&mut self, message: &str) -> Result<(), Self::Error>;

    /// Hide the banner after `after_ms` milliseconds.
    fn schedule_notification_hide(&mut self, after_ms: u32) -> Result<Self::Timer, Self::Error>;

    fn cancel_timer(&mut self, timer: Self::Timer);
}

/// Adapts one element of a [`HostPage`] to [`crate::resolver::AttributeLookup`].
pub(crate) struct PageElement<'a, P: HostPage> {
    pub page: &'a P,
    pub element: &'a P::Element,
}

impl<P: HostPage> crate::resolver::AttributeLookup for PageElement<'_, P> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.page.attribute(self.element, name)
    }

    fn is_image(&self) -> bool {
        self.page.element_kind(self.element) == ElementKind::Image
    }

    fn enclosing_link_href(&self) -> Option<String> {
        self.page.enclosing_link_href(self.element)
    }
}
