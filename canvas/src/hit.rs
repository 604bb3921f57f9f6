//! Eraser hit-testing against committed strokes.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::strokes::Stroke;
use crate::viewport::Point;

/// Whether any recorded point of `stroke` lies strictly within `radius` of `at`.
///
/// Only recorded points count, not the segments between them, so a long
/// straight `LINEAR` stroke is only erasable near its two endpoints.
/// Visibility is the caller's concern.
#[must_use]
pub fn stroke_touches(stroke: &Stroke, at: Point, radius: f64) -> bool {
    let radius_sq = radius * radius;
    stroke.points.iter().any(|p| p.distance_sq(at) < radius_sq)
}
