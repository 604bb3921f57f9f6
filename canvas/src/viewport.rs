//! Viewport transform: screen pixels ↔ canvas pixels under pan, zoom and
//! display scaling.
//!
//! The canvas element is laid out centred inside its container at its
//! `displayed` size, then translated by `pan` and scaled by `scale` about its
//! own centre. The bitmap behind it has `native` resolution, which can differ
//! from `displayed` when the container constrains the element. Every mapping
//! goes through the element's resulting on-screen rectangle, so both kinds of
//! scaling are accounted for at once.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, ZOOM_SENSITIVITY};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where the canvas element sits before pan/zoom are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Screen position of the container's top-left corner.
    pub origin: Point,
    /// Container size in screen pixels. The canvas is centred in it.
    pub container: Size,
    /// Bitmap resolution of the canvas surfaces (the loaded image's size).
    pub native: Size,
    /// Laid-out element size in screen pixels at `scale == 1`.
    pub displayed: Size,
}

impl Layout {
    /// Layout where the container hugs the canvas and no display scaling applies.
    #[must_use]
    pub fn unscaled(native: Size) -> Self {
        Self { origin: Point::new(0.0, 0.0), container: native, native, displayed: native }
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Inclusive containment, matching the brush cursor's visibility rule.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Zoom and pan for the loaded image.
///
/// `pan_x` / `pan_y` are in screen pixels and are never scaled.
/// `scale` is a zoom factor clamped to `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

impl Viewport {
    /// The canvas element's rectangle on screen after layout, pan and zoom.
    #[must_use]
    pub fn on_screen_rect(&self, layout: &Layout) -> ScreenRect {
        let width = layout.displayed.width * self.scale;
        let height = layout.displayed.height * self.scale;
        let center_x = layout.origin.x + layout.container.width * 0.5 + self.pan_x;
        let center_y = layout.origin.y + layout.container.height * 0.5 + self.pan_y;
        ScreenRect { left: center_x - width * 0.5, top: center_y - height * 0.5, width, height }
    }

    /// Convert a screen-space point to canvas pixels.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point, layout: &Layout) -> Point {
        let rect = self.on_screen_rect(layout);
        Point {
            x: (screen.x - rect.left) * ratio(layout.native.width, rect.width),
            y: (screen.y - rect.top) * ratio(layout.native.height, rect.height),
        }
    }

    /// Convert a canvas-pixel point to screen space.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point, layout: &Layout) -> Point {
        let rect = self.on_screen_rect(layout);
        Point {
            x: rect.left + canvas.x * ratio(rect.width, layout.native.width),
            y: rect.top + canvas.y * ratio(rect.height, layout.native.height),
        }
    }

    /// On-screen length of a horizontal canvas-pixel distance.
    #[must_use]
    pub fn canvas_len_to_screen(&self, len: f64, layout: &Layout) -> f64 {
        len * ratio(self.on_screen_rect(layout).width, layout.native.width)
    }

    /// Apply one wheel event: `scale += -delta_y * ZOOM_SENSITIVITY`, clamped.
    ///
    /// Non-finite deltas are ignored so the scale never leaves its range.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        if !delta_y.is_finite() {
            return;
        }
        self.scale = (self.scale - delta_y * ZOOM_SENSITIVITY).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Shift by a screen-space pointer delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Back to `scale = 1`, `pan = (0, 0)`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}
