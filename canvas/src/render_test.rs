use super::*;
use crate::strokes::{LightType, Stroke};

// =============================================================
// Helpers
// =============================================================

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);

fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    rgba.repeat((width * height) as usize)
}

fn gray_compositor() -> Compositor {
    Compositor::from_rgba(100, 100, &solid_rgba(100, 100, [128, 128, 128, 255])).unwrap()
}

fn rgba_at(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
    let c = pixmap.pixel(x, y).unwrap().demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
    pixmap.pixel(x, y).unwrap().alpha()
}

fn close(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= 2
}

fn stroke(points: &[(f64, f64)], light: LightType, color: Rgb, size: f64) -> Stroke {
    let points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    Stroke::new(points, light, color, size).unwrap()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn from_rgba_rejects_wrong_length() {
    let err = Compositor::from_rgba(10, 10, &[0; 12]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidImage { width: 10, height: 10, len: 12 }));
}

#[test]
fn from_rgba_rejects_zero_size() {
    assert!(Compositor::from_rgba(0, 10, &[]).is_err());
}

#[test]
fn from_rgba_copies_base_and_starts_overlays_empty() {
    let comp = gray_compositor();
    assert_eq!(comp.native_size(), Size::new(100.0, 100.0));
    assert_eq!(rgba_at(comp.base(), 50, 50), [128, 128, 128, 255]);
    assert_eq!(alpha_at(comp.committed(), 50, 50), 0);
    assert_eq!(alpha_at(comp.in_progress(), 50, 50), 0);
}

#[test]
fn from_rgba_premultiplies_translucent_pixels() {
    let comp = Compositor::from_rgba(1, 1, &[200, 100, 50, 128]).unwrap();
    let raw = comp.base().pixel(0, 0).unwrap();
    assert_eq!(raw.alpha(), 128);
    assert!(raw.red() < 200);
}

// =============================================================
// Committed surface
// =============================================================

#[test]
fn single_point_stroke_renders_filled_circle_of_brush_diameter() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    store.push(stroke(&[(50.0, 50.0)], LightType::Point, RED, 40.0));
    comp.redraw_committed(&store);

    assert_eq!(rgba_at(comp.committed(), 50, 50), [255, 0, 0, 255]);
    // radius 20: well inside at 15 px, empty at 25 px
    assert_eq!(alpha_at(comp.committed(), 65, 50), 255);
    assert_eq!(alpha_at(comp.committed(), 50, 35), 255);
    assert_eq!(alpha_at(comp.committed(), 75, 50), 0);
    assert_eq!(alpha_at(comp.committed(), 50, 25), 0);
}

#[test]
fn polyline_covers_its_path_with_round_caps() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    store.push(stroke(&[(20.0, 20.0), (80.0, 20.0), (80.0, 80.0)], LightType::Natural, BLUE, 10.0));
    comp.redraw_committed(&store);

    assert_eq!(rgba_at(comp.committed(), 50, 20), [0, 0, 255, 255]);
    assert_eq!(rgba_at(comp.committed(), 80, 50), [0, 0, 255, 255]);
    // round cap extends past the first point
    assert!(alpha_at(comp.committed(), 17, 20) > 0);
    assert_eq!(alpha_at(comp.committed(), 50, 50), 0);
}

#[test]
fn hidden_strokes_are_not_painted() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    let id = store.push(stroke(&[(50.0, 50.0)], LightType::Point, RED, 40.0));
    store.toggle_visibility(&id);
    comp.redraw_committed(&store);
    assert_eq!(alpha_at(comp.committed(), 50, 50), 0);
}

#[test]
fn later_strokes_paint_on_top() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    store.push(stroke(&[(50.0, 50.0)], LightType::Point, RED, 40.0));
    store.push(stroke(&[(50.0, 50.0)], LightType::Point, BLUE, 20.0));
    comp.redraw_committed(&store);
    assert_eq!(rgba_at(comp.committed(), 50, 50), [0, 0, 255, 255]);
    assert_eq!(rgba_at(comp.committed(), 50, 65), [255, 0, 0, 255]);
}

#[test]
fn redraw_clears_removed_strokes() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    let id = store.push(stroke(&[(50.0, 50.0)], LightType::Point, RED, 40.0));
    comp.redraw_committed(&store);
    store.remove(&id);
    comp.redraw_committed(&store);
    assert_eq!(alpha_at(comp.committed(), 50, 50), 0);
}

// =============================================================
// In-progress surface
// =============================================================

#[test]
fn begin_in_progress_paints_a_dot() {
    let mut comp = gray_compositor();
    comp.begin_in_progress(Point::new(30.0, 30.0), RED, 20.0);
    assert_eq!(rgba_at(comp.in_progress(), 30, 30), [255, 0, 0, 255]);
    assert_eq!(alpha_at(comp.committed(), 30, 30), 0);
}

#[test]
fn extend_in_progress_accumulates_segments() {
    let mut comp = gray_compositor();
    comp.begin_in_progress(Point::new(10.0, 50.0), RED, 6.0);
    comp.extend_in_progress(Point::new(10.0, 50.0), Point::new(40.0, 50.0), RED, 6.0);
    comp.extend_in_progress(Point::new(40.0, 50.0), Point::new(70.0, 50.0), RED, 6.0);
    assert_eq!(alpha_at(comp.in_progress(), 25, 50), 255);
    assert_eq!(alpha_at(comp.in_progress(), 55, 50), 255);
}

#[test]
fn preview_segment_replaces_previous_preview() {
    let mut comp = gray_compositor();
    comp.begin_in_progress(Point::new(10.0, 10.0), RED, 6.0);
    comp.preview_segment(Point::new(10.0, 10.0), Point::new(90.0, 10.0), RED, 6.0);
    assert_eq!(alpha_at(comp.in_progress(), 50, 10), 255);

    comp.preview_segment(Point::new(10.0, 10.0), Point::new(10.0, 90.0), RED, 6.0);
    assert_eq!(alpha_at(comp.in_progress(), 50, 10), 0);
    assert_eq!(alpha_at(comp.in_progress(), 10, 50), 255);
}

#[test]
fn clear_in_progress_empties_surface() {
    let mut comp = gray_compositor();
    comp.begin_in_progress(Point::new(30.0, 30.0), RED, 20.0);
    comp.clear_in_progress();
    assert_eq!(alpha_at(comp.in_progress(), 30, 30), 0);
}

// =============================================================
// Composite and export
// =============================================================

#[test]
fn composite_screen_blends_committed_strokes() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    store.push(stroke(&[(50.0, 50.0)], LightType::Point, RED, 40.0));
    comp.redraw_committed(&store);

    let out = comp.composite();
    let [r, g, b, a] = rgba_at(&out, 50, 50);
    // screen(255, 128) = 255, screen(0, 128) = 128
    assert!(close(r, 255), "r = {r}");
    assert!(close(g, 128), "g = {g}");
    assert!(close(b, 128), "b = {b}");
    assert_eq!(a, 255);
    assert_eq!(rgba_at(&out, 5, 5), [128, 128, 128, 255]);
}

#[test]
fn composite_overlapping_lights_brighten() {
    let mut comp = gray_compositor();
    let mut store = StrokeStore::new();
    store.push(stroke(&[(50.0, 50.0)], LightType::Point, Rgb::new(100, 100, 100), 40.0));
    comp.redraw_committed(&store);
    let [r, _, _, _] = rgba_at(&comp.composite(), 50, 50);
    assert!(r > 128, "screen blend must not darken: r = {r}");
}

#[test]
fn composite_draws_in_progress_on_top() {
    let mut comp = gray_compositor();
    comp.begin_in_progress(Point::new(50.0, 50.0), BLUE, 20.0);
    assert_eq!(rgba_at(&comp.composite(), 50, 50), [0, 0, 255, 255]);
}

#[test]
fn png_exports_have_png_signature() {
    let comp = gray_compositor();
    let base = comp.base_png().unwrap();
    let mask = comp.mask_png().unwrap();
    assert_eq!(&base[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(&mask[..8], b"\x89PNG\r\n\x1a\n");
}
