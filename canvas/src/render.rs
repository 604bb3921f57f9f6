//! Layer compositor: three canvas-sized raster surfaces, back to front.
//!
//! 1. **base**: the loaded photo, written once per image load.
//! 2. **committed**: every visible stroke in store order, fully redrawn on
//!    each store mutation. Never holds partial data.
//! 3. **in-progress**: the one stroke being drawn, cleared on commit.
//!
//! The committed layer is combined with the base using a screen blend so that
//! overlapping lights brighten instead of occluding each other. Surfaces are
//! `tiny_skia::Pixmap`s (premultiplied RGBA8); this module is the only place
//! that touches them.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::{
    BlendMode, Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke as SkStroke,
    Transform,
};

use crate::color::Rgb;
use crate::engine::EngineError;
use crate::strokes::{StrokeShape, StrokeStore};
use crate::viewport::{Point, Size};

/// The three surfaces for one loaded image.
#[derive(Debug, Clone)]
pub struct Compositor {
    base: Pixmap,
    committed: Pixmap,
    in_progress: Pixmap,
}

impl Compositor {
    /// Create all three surfaces from straight-alpha RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidImage`] for a zero-sized image or when
    /// `rgba` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidImage { width, height, len: rgba.len() };
        let expected = u64::from(width) * u64::from(height) * 4;
        if u64::try_from(rgba.len()).map_or(true, |len| len != expected) {
            return Err(invalid());
        }
        let mut base = Pixmap::new(width, height).ok_or_else(invalid)?;
        for (dst, src) in base.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        let committed = Pixmap::new(width, height).ok_or_else(invalid)?;
        let in_progress = Pixmap::new(width, height).ok_or_else(invalid)?;
        Ok(Self { base, committed, in_progress })
    }

    /// Bitmap resolution shared by all three surfaces.
    #[must_use]
    pub fn native_size(&self) -> Size {
        Size::new(f64::from(self.base.width()), f64::from(self.base.height()))
    }

    #[must_use]
    pub fn base(&self) -> &Pixmap {
        &self.base
    }

    #[must_use]
    pub fn committed(&self) -> &Pixmap {
        &self.committed
    }

    #[must_use]
    pub fn in_progress(&self) -> &Pixmap {
        &self.in_progress
    }

    /// Clear the committed surface and repaint every visible stroke, oldest first.
    pub fn redraw_committed(&mut self, store: &StrokeStore) {
        self.committed.fill(Color::TRANSPARENT);
        for stroke in store.visible() {
            match stroke.shape() {
                StrokeShape::Dot => fill_dot(&mut self.committed, stroke.points[0], stroke.color, stroke.size),
                StrokeShape::Segment | StrokeShape::Polyline => {
                    stroke_polyline(&mut self.committed, &stroke.points, stroke.color, stroke.size);
                }
            }
        }
    }

    /// Start a new in-progress stroke with a dot at the press point.
    pub fn begin_in_progress(&mut self, at: Point, color: Rgb, size: f64) {
        self.in_progress.fill(Color::TRANSPARENT);
        fill_dot(&mut self.in_progress, at, color, size);
    }

    /// Paint only the newest freehand segment on top of what is already there.
    pub fn extend_in_progress(&mut self, from: Point, to: Point, color: Rgb, size: f64) {
        stroke_polyline(&mut self.in_progress, &[from, to], color, size);
    }

    /// Replace the in-progress surface with a single straight preview segment.
    pub fn preview_segment(&mut self, start: Point, end: Point, color: Rgb, size: f64) {
        self.in_progress.fill(Color::TRANSPARENT);
        stroke_polyline(&mut self.in_progress, &[start, end], color, size);
    }

    pub fn clear_in_progress(&mut self) {
        self.in_progress.fill(Color::TRANSPARENT);
    }

    /// Flatten the on-screen view: base, committed strokes (screen blend),
    /// then the in-progress stroke drawn normally on top.
    #[must_use]
    pub fn composite(&self) -> Pixmap {
        let mut out = self.base.clone();
        let screen = PixmapPaint { blend_mode: BlendMode::Screen, ..PixmapPaint::default() };
        out.draw_pixmap(0, 0, self.committed.as_ref(), &screen, Transform::identity(), None);
        out.draw_pixmap(0, 0, self.in_progress.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        out
    }

    /// PNG of the base surface.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Encode`] if PNG encoding fails.
    pub fn base_png(&self) -> Result<Vec<u8>, EngineError> {
        encode_png(&self.base)
    }

    /// PNG of the committed-strokes surface, transparent where nothing is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Encode`] if PNG encoding fails.
    pub fn mask_png(&self) -> Result<Vec<u8>, EngineError> {
        encode_png(&self.committed)
    }
}

/// PNG-encode any surface.
///
/// # Errors
///
/// Returns [`EngineError::Encode`] if PNG encoding fails.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, EngineError> {
    pixmap.encode_png().map_err(|e| EngineError::Encode(e.to_string()))
}

// =============================================================
// Primitives
// =============================================================

fn paint_for(color: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn px(v: f64) -> f32 {
    v as f32
}

/// Filled circle of diameter `size` centred on `at`.
fn fill_dot(pixmap: &mut Pixmap, at: Point, color: Rgb, size: f64) {
    let Some(circle) = PathBuilder::from_circle(px(at.x), px(at.y), px(size / 2.0)) else {
        return;
    };
    pixmap.fill_path(&circle, &paint_for(color), tiny_skia::FillRule::Winding, Transform::identity(), None);
}

/// Round-capped, round-joined path of width `size` through `points` as one
/// continuous path, so self-overlaps inside one stroke show no seams.
fn stroke_polyline(pixmap: &mut Pixmap, points: &[Point], color: Rgb, size: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut builder = PathBuilder::new();
    builder.move_to(px(first.x), px(first.y));
    for p in rest {
        builder.line_to(px(p.x), px(p.y));
    }
    // A path whose points all coincide has no extent; a round cap on it is a dot.
    let Some(path) = builder.finish() else {
        fill_dot(pixmap, *first, color, size);
        return;
    };
    let stroke = SkStroke { width: px(size), line_cap: LineCap::Round, line_join: LineJoin::Round, ..SkStroke::default() };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
}
