//! Hover preview state machine.
//!
//! ```text
//!            mouseover (eligible)          decode ok
//!  Hidden ─────────────────────────▶ Loading ─────────▶ Shown
//!    ▲                                 │  │ decode failed,   │
//!    │                                 │  └─ retry fallback  │
//!    └──── hide / decode failed ───────┴──── hide ───────────┘
//! ```
//!
//! One [`PreviewController`] exists per document. Each hover that starts a
//! load takes a new [`Generation`]; decode callbacks carry the generation
//! they were bound for and are ignored once it is superseded.

use crate::background::extract_background_url;
use crate::config::HoverZoomConfig;
use crate::geometry::{self, Point, Size};
use crate::host::{ElementKind, HostPage, LoadRequest, PageElement};
use crate::messages::{self, Locale};
use crate::resolver::UrlResolver;
use crate::toggle::{KeyInput, ToggleShortcut};
use crate::url::{is_valid_image_url, parse_image_url};
use crate::LOG_PREFIX;

#[cfg(test)]
mod tests;

/// Identifies one hover interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Visible state of the preview node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewPhase {
    #[default]
    Hidden,
    /// Source assigned, decode pending
    Loading,
    /// Decoded, sized and visible
    Shown,
}

/// Result of feeding a key press to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not the shortcut; let the page handle it
    Ignored,
    /// Shortcut consumed; the browser default must be suppressed
    Toggled {
        /// Active state after the toggle
        active: bool,
    },
}

/// Candidate image found on a hovered element.
struct HoverCandidate<E> {
    raw_url: String,
    /// Element that supplied `raw_url`: the target or one of its children
    source: E,
}

/// Owns all preview state for one document.
pub struct PreviewController<P: HostPage> {
    config: HoverZoomConfig,
    resolver: UrlResolver,
    shortcut: ToggleShortcut,
    locale: Locale,

    active: bool,
    phase: PreviewPhase,
    /// Container is displayed; stays set while a new hover loads over it
    revealed: bool,
    generation: Generation,

    tracked_element: Option<P::Element>,
    tracked_url: Option<String>,
    /// Original thumbnail URL, retried once if the resolved URL fails
    fallback_url: Option<String>,
    /// URL currently assigned to the preview image
    loading_src: Option<String>,
    retried: bool,

    pointer: Point,
    preview_size: Size,
    notification_timer: Option<P::Timer>,
}

impl<P: HostPage> PreviewController<P> {
    pub fn new(config: HoverZoomConfig, locale: Locale) -> Self {
        let resolver = UrlResolver::from_config(&config);
        Self::with_resolver(config, locale, resolver)
    }

    /// Controller using a custom resolver, e.g. one with extra site rules.
    pub fn with_resolver(config: HoverZoomConfig, locale: Locale, resolver: UrlResolver) -> Self {
        let locale = config.locale.unwrap_or(locale);
        Self {
            active: config.active_on_start,
            config,
            resolver,
            shortcut: ToggleShortcut::default(),
            locale,
            phase: PreviewPhase::Hidden,
            revealed: false,
            generation: Generation::default(),
            tracked_element: None,
            tracked_url: None,
            fallback_url: None,
            loading_src: None,
            retried: false,
            pointer: Point::default(),
            preview_size: Size::default(),
            notification_timer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> PreviewPhase {
        self.phase
    }

    /// Whether the preview container is currently displayed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn tracked_element(&self) -> Option<&P::Element> {
        self.tracked_element.as_ref()
    }

    /// Observed (pre-resolution) URL of the tracked element.
    pub fn tracked_url(&self) -> Option<&str> {
        self.tracked_url.as_deref()
    }

    /// URL currently assigned to the preview image.
    pub fn loading_src(&self) -> Option<&str> {
        self.loading_src.as_deref()
    }

    pub fn preview_size(&self) -> Size {
        self.preview_size
    }

    pub fn config(&self) -> &HoverZoomConfig {
        &self.config
    }

    // ---- keyboard ----

    /// Handle a `keydown`. Toggles on the shortcut.
    pub fn handle_key(&mut self, page: &mut P, input: &KeyInput) -> KeyOutcome {
        if !self.shortcut.matches(input) {
            return KeyOutcome::Ignored;
        }
        let active = self.toggle(page);
        KeyOutcome::Toggled { active }
    }

    /// Flip the active flag, announce it, and hide any preview on deactivation.
    pub fn toggle(&mut self, page: &mut P) -> bool {
        self.active = !self.active;
        log::info!("{LOG_PREFIX} Toggled, active: {}", self.active);

        self.notify(page, messages::toggle_message(self.locale, self.active));

        if !self.active && self.phase != PreviewPhase::Hidden {
            self.hide(page);
        }
        self.active
    }

    fn notify(&mut self, page: &mut P, message: &str) {
        if let Some(timer) = self.notification_timer.take() {
            page.cancel_timer(timer);
        }
        if let Err(err) = page.show_notification(message) {
            log::warn!("{LOG_PREFIX} Failed to show notification: {err}");
            return;
        }
        match page.schedule_notification_hide(self.config.notification_duration_ms) {
            Ok(timer) => self.notification_timer = Some(timer),
            Err(err) => log::warn!("{LOG_PREFIX} Failed to schedule notification hide: {err}"),
        }
    }

    /// The banner timer fired; forget its handle.
    pub fn notification_expired(&mut self) {
        self.notification_timer = None;
    }

    // ---- pointer ----

    /// Handle a captured `mouseover` on `target`.
    pub fn handle_mouse_over(&mut self, page: &mut P, target: &P::Element, pointer: Point) {
        if !self.active {
            return;
        }
        if page.is_within_preview(target) {
            return;
        }

        let bounds = page.bounding_size(target);
        let min = self.config.min_target_size;
        if bounds.width < min || bounds.height < min {
            return;
        }

        let kind = page.element_kind(target);
        let Some(candidate) = Self::extract_candidate(page, target, kind) else {
            return;
        };

        let base = page.document_url();
        if let Err(err) = parse_image_url(&candidate.raw_url, &base) {
            log::debug!(
                "{LOG_PREFIX} Ignoring candidate {}: {err}",
                candidate.raw_url
            );
            return;
        }

        log::debug!(
            "{LOG_PREFIX} Mouse over eligible element {:?}, candidate {}",
            target,
            candidate.raw_url
        );

        let resolved = self.resolver.resolve(
            &candidate.raw_url,
            &PageElement {
                page: &*page,
                element: &candidate.source,
            },
            &base,
        );

        let source_size = match kind {
            ElementKind::Image => page.natural_size(target),
            ElementKind::Video | ElementKind::Other => bounds,
        };

        self.pointer = pointer;
        self.begin_load(page, target, candidate.raw_url, resolved, source_size);
    }

    fn extract_candidate(
        page: &P,
        target: &P::Element,
        kind: ElementKind,
    ) -> Option<HoverCandidate<P::Element>> {
        let own = |raw_url: String| HoverCandidate {
            raw_url,
            source: target.clone(),
        };
        match kind {
            ElementKind::Image => page.image_source(target).filter(|src| !src.is_empty()).map(own),
            ElementKind::Video => page.poster(target).filter(|src| !src.is_empty()).map(own),
            ElementKind::Other => {
                if let Some(url) = page
                    .background_image(target)
                    .and_then(|css| extract_background_url(&css))
                {
                    return Some(own(url));
                }
                page.children(target).into_iter().find_map(|child| {
                    let raw_url = page
                        .background_image(&child)
                        .and_then(|css| extract_background_url(&css))?;
                    Some(HoverCandidate {
                        raw_url,
                        source: child,
                    })
                })
            }
        }
    }

    fn begin_load(
        &mut self,
        page: &mut P,
        target: &P::Element,
        raw_url: String,
        resolved: String,
        source_size: Size,
    ) {
        self.generation = self.generation.next();
        self.tracked_element = Some(target.clone());
        self.tracked_url = Some(raw_url.clone());
        self.fallback_url = Some(raw_url.clone());
        self.loading_src = Some(resolved.clone());
        self.retried = false;
        self.phase = PreviewPhase::Loading;

        let limits = page.viewport().preview_limits(self.config.viewport_fraction);
        let size = geometry::placeholder_size(
            source_size,
            self.config.placeholder_size,
            self.config.zoom_factor,
            limits,
        );

        let request = LoadRequest {
            generation: self.generation,
            src: resolved,
            fallback: raw_url,
        };
        let result = self
            .layout(page, size)
            .and_then(|()| page.begin_preview_load(&request));
        if let Err(err) = result {
            log::warn!("{LOG_PREFIX} Failed to start preview load: {err}");
            self.hide(page);
        }
    }

    /// Handle a captured `mouseout` from `target` towards `related`.
    pub fn handle_mouse_out(
        &mut self,
        page: &mut P,
        target: &P::Element,
        related: Option<&P::Element>,
    ) {
        let Some(tracked) = self.tracked_element.as_ref() else {
            return;
        };
        let entering_preview = related.is_some_and(|element| page.is_within_preview(element));
        if entering_preview {
            return;
        }
        if target == tracked || page.is_within_preview(target) {
            self.hide(page);
        }
    }

    /// Handle a captured `mousemove`: follow the pointer while the container
    /// is displayed, including while the next hover's image loads.
    pub fn handle_mouse_move(&mut self, page: &mut P, target: &P::Element, pointer: Point) {
        if !self.active {
            return;
        }
        self.pointer = pointer;
        if !self.revealed || page.is_within_preview(target) {
            return;
        }
        let position = self.position(page);
        if let Err(err) = page.move_preview(position) {
            log::warn!("{LOG_PREFIX} Failed to move preview: {err}");
        }
    }

    // ---- decode callbacks ----

    /// The preview image decoded with `natural` pixel size.
    pub fn handle_decode_success(&mut self, page: &mut P, generation: Generation, natural: Size) {
        if !self.is_current(generation) {
            log::trace!("{LOG_PREFIX} Ignoring decode for superseded {generation:?}");
            return;
        }

        let limits = page.viewport().preview_limits(self.config.viewport_fraction);
        let size = if natural.is_positive() {
            geometry::fit_preview_size(natural, self.config.zoom_factor, limits)
        } else {
            geometry::placeholder_size(
                natural,
                self.config.placeholder_size,
                self.config.zoom_factor,
                limits,
            )
        };

        if let Err(err) = self.layout(page, size).and_then(|()| page.reveal_preview()) {
            log::warn!("{LOG_PREFIX} Failed to show preview: {err}");
            self.hide(page);
            return;
        }
        self.phase = PreviewPhase::Shown;
        self.revealed = true;
        log::info!(
            "{LOG_PREFIX} Preview shown for {} at {:.0}x{:.0}",
            self.loading_src.as_deref().unwrap_or_default(),
            size.width,
            size.height
        );
    }

    /// The preview image failed to decode. Retries the original thumbnail
    /// once, then hides.
    pub fn handle_decode_failure(&mut self, page: &mut P, generation: Generation) {
        if !self.is_current(generation) {
            log::trace!("{LOG_PREFIX} Ignoring decode failure for superseded {generation:?}");
            return;
        }

        let failed = self.loading_src.take().unwrap_or_default();
        log::warn!("{LOG_PREFIX} Failed to load image: {failed}");

        let fallback = self
            .fallback_url
            .clone()
            .filter(|fallback| !self.retried && *fallback != failed)
            .filter(|fallback| is_valid_image_url(fallback, &page.document_url()));

        let Some(fallback) = fallback else {
            log::warn!("{LOG_PREFIX} No usable fallback, hiding preview");
            self.hide(page);
            return;
        };

        log::info!("{LOG_PREFIX} Falling back to original source: {fallback}");
        self.retried = true;
        self.loading_src = Some(fallback.clone());
        let request = LoadRequest {
            generation: self.generation,
            src: fallback.clone(),
            fallback,
        };
        if let Err(err) = page.begin_preview_load(&request) {
            log::warn!("{LOG_PREFIX} Failed to retry preview load: {err}");
            self.hide(page);
        }
    }

    fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation && self.phase == PreviewPhase::Loading
    }

    // ---- layout ----

    fn position(&self, page: &P) -> Point {
        geometry::position_near_pointer(
            self.pointer,
            self.preview_size,
            page.viewport(),
            self.config.pointer_offset,
        )
    }

    fn layout(&mut self, page: &mut P, size: Size) -> Result<(), P::Error> {
        self.preview_size = size;
        page.resize_preview(size)?;
        let position = self.position(page);
        page.move_preview(position)
    }

    /// Hide the preview and forget the tracked element. Pending decode
    /// callbacks become stale.
    pub fn hide(&mut self, page: &mut P) {
        if let Some(element) = self.tracked_element.take() {
            log::debug!("{LOG_PREFIX} Preview hidden for {:?}", element);
        }
        if let Err(err) = page.conceal_preview() {
            log::warn!("{LOG_PREFIX} Failed to hide preview: {err}");
        }
        self.phase = PreviewPhase::Hidden;
        self.revealed = false;
        self.generation = self.generation.next();
        self.tracked_url = None;
        self.fallback_url = None;
        self.loading_src = None;
        self.retried = false;
    }
}
