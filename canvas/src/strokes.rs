//! Stroke model: light types, committed strokes, and the ordered store.
//!
//! Strokes are created by the gesture controller on pointer release and owned
//! by [`StrokeStore`] until deleted. Their points are canvas pixels, so stored
//! geometry never changes with pan or zoom. The only in-place mutation is the
//! visibility flag; everything else is append or remove.

#[cfg(test)]
#[path = "strokes_test.rs"]
mod strokes_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Rgb;
use crate::hit;
use crate::viewport::Point;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// Semantic category of a simulated light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightType {
    /// Focused beam.
    #[default]
    Spotlight,
    /// Straight light bar; always committed as a two-point segment.
    Linear,
    /// Ambient daylight.
    Natural,
    /// Small omnidirectional bulb.
    Point,
    /// Edge light behind the subject.
    Rim,
    /// Large diffused panel.
    Softbox,
}

impl LightType {
    /// Every light type in toolbar order.
    pub const ALL: [Self; 6] = [Self::Spotlight, Self::Linear, Self::Natural, Self::Point, Self::Rim, Self::Softbox];

    /// Position in [`LightType::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Spotlight => 0,
            Self::Linear => 1,
            Self::Natural => 2,
            Self::Point => 3,
            Self::Rim => 4,
            Self::Softbox => 5,
        }
    }

    /// Palette color a fresh session starts with.
    #[must_use]
    pub fn default_color(self) -> Rgb {
        match self {
            Self::Spotlight => Rgb::new(0xFF, 0x3B, 0x30),
            Self::Linear => Rgb::new(0x00, 0x7A, 0xFF),
            Self::Natural => Rgb::new(0x34, 0xC7, 0x59),
            Self::Point => Rgb::new(0xFF, 0xCC, 0x00),
            Self::Rim => Rgb::new(0xAF, 0x52, 0xDE),
            Self::Softbox => Rgb::new(0x32, 0xAD, 0xE6),
        }
    }

    /// Short toolbar label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spotlight => "Spot",
            Self::Linear => "Line",
            Self::Natural => "Natural",
            Self::Point => "Point",
            Self::Rim => "Rim",
            Self::Softbox => "Soft",
        }
    }

    /// Digit key that selects this light type.
    #[must_use]
    pub fn shortcut(self) -> char {
        match self {
            Self::Spotlight => '1',
            Self::Linear => '2',
            Self::Natural => '3',
            Self::Point => '4',
            Self::Rim => '5',
            Self::Softbox => '6',
        }
    }

    /// Inverse of [`LightType::shortcut`].
    #[must_use]
    pub fn from_shortcut(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.shortcut() == c)
    }
}

/// How a stroke is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeShape {
    /// Filled circle of diameter `size` at the only point.
    Dot,
    /// Straight `LINEAR` segment between exactly two points.
    Segment,
    /// Freehand path through every point.
    Polyline,
}

/// One committed annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    /// Canvas-pixel points in drawing order. Never empty.
    pub points: Vec<Point>,
    pub light: LightType,
    pub color: Rgb,
    /// Brush diameter in canvas pixels.
    pub size: f64,
    pub visible: bool,
}

impl Stroke {
    /// Build a visible stroke with a fresh id.
    ///
    /// Returns `None` for an empty point list; a stroke always has at least one point.
    #[must_use]
    pub fn new(points: Vec<Point>, light: LightType, color: Rgb, size: f64) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { id: Uuid::new_v4(), points, light, color, size, visible: true })
    }

    #[must_use]
    pub fn shape(&self) -> StrokeShape {
        match (self.points.len(), self.light) {
            (1, _) => StrokeShape::Dot,
            (2, LightType::Linear) => StrokeShape::Segment,
            _ => StrokeShape::Polyline,
        }
    }
}

/// Ordered collection of committed strokes, oldest first.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    #[must_use]
    pub fn new() -> Self {
        Self { strokes: Vec::new() }
    }

    /// Append a stroke on top of all others.
    pub fn push(&mut self, stroke: Stroke) -> StrokeId {
        let id = stroke.id;
        self.strokes.push(stroke);
        id
    }

    #[must_use]
    pub fn get(&self, id: &StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == *id)
    }

    /// All strokes in paint order, visible or not.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Visible strokes in paint order.
    pub fn visible(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().filter(|s| s.visible)
    }

    /// Flip a stroke's visibility. Returns the new flag, or `None` if the id is unknown.
    pub fn toggle_visibility(&mut self, id: &StrokeId) -> Option<bool> {
        let stroke = self.strokes.iter_mut().find(|s| s.id == *id)?;
        stroke.visible = !stroke.visible;
        Some(stroke.visible)
    }

    /// Delete one stroke by id, returning it if it was present.
    pub fn remove(&mut self, id: &StrokeId) -> Option<Stroke> {
        let index = self.strokes.iter().position(|s| s.id == *id)?;
        Some(self.strokes.remove(index))
    }

    /// Delete every visible stroke with a recorded point strictly within
    /// `radius` of `at`. Whole strokes go; hidden strokes are never touched.
    ///
    /// Brute force over all points. Sessions hold tens of strokes, not thousands.
    pub fn erase_at(&mut self, at: Point, radius: f64) -> Vec<StrokeId> {
        let mut erased = Vec::new();
        self.strokes.retain(|stroke| {
            let hit = stroke.visible && hit::stroke_touches(stroke, at, radius);
            if hit {
                erased.push(stroke.id);
            }
            !hit
        });
        erased
    }

    /// Drop every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
