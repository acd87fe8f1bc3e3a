//! Preview sizing and positioning math.
//!
//! Kept free of DOM types so the clamping rules can be tested directly.

use serde::{Deserialize, Serialize};

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Each dimension multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Smaller of each dimension, compared independently.
    pub fn min(&self, other: Size) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }
}

/// A position in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible area of the document window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest preview allowed: `fraction` of each viewport dimension.
    pub fn preview_limits(&self, fraction: f64) -> Size {
        Size::new(self.width * fraction, self.height * fraction)
    }
}

/// Immediate size shown while the full image decodes.
///
/// Uses `source` (natural or rendered size of the hovered element), falling
/// back per dimension to `fallback` when a dimension is unknown. Each
/// dimension is scaled by `zoom` and clamped independently to `limits`.
pub fn placeholder_size(source: Size, fallback: Size, zoom: f64, limits: Size) -> Size {
    let width = if source.width > 0.0 {
        source.width
    } else {
        fallback.width
    };
    let height = if source.height > 0.0 {
        source.height
    } else {
        fallback.height
    };
    Size::new(width, height).scale(zoom).min(limits)
}

/// Final preview size for a decoded image.
///
/// Scales the natural size by `zoom` and clamps it to `limits` while keeping
/// the aspect ratio: width first, then height, then width once more to undo
/// any overshoot from the height pass. Degenerate images (a zero dimension)
/// have no aspect ratio and are clamped per dimension instead.
pub fn fit_preview_size(natural: Size, zoom: f64, limits: Size) -> Size {
    if !natural.is_positive() {
        return natural.scale(zoom).min(limits);
    }

    let aspect = natural.width / natural.height;
    let mut width = natural.width * zoom;
    let mut height = natural.height * zoom;

    if width > limits.width {
        width = limits.width;
        height = width / aspect;
    }
    if height > limits.height {
        height = limits.height;
        width = height * aspect;
    }
    if width > limits.width {
        width = limits.width;
        height = width / aspect;
    }

    Size::new(width, height)
}

/// Top-left corner for a preview of `size` near `pointer`.
///
/// The preview sits `offset` right of and below the pointer. It flips to the
/// other side of the pointer on an axis where it would overflow, a negative
/// coordinate is then replaced by `offset`, and finally the corner is pulled
/// back so a preview smaller than the viewport never crosses its far edge.
pub fn position_near_pointer(pointer: Point, size: Size, viewport: Viewport, offset: f64) -> Point {
    Point::new(
        place_on_axis(pointer.x, size.width, viewport.width, offset),
        place_on_axis(pointer.y, size.height, viewport.height, offset),
    )
}

fn place_on_axis(pointer: f64, extent: f64, available: f64, offset: f64) -> f64 {
    let mut start = pointer + offset;
    if start + extent > available {
        start = pointer - extent - offset;
    }
    if start < 0.0 {
        start = offset;
    }
    if start + extent > available {
        start = (available - extent).max(0.0);
    }
    start
}
