//! The annotation engine: one controller object that owns every piece of
//! canvas state and mutates it one event at a time.
//!
//! Hosts feed [`InputEvent`]s to [`EngineCore::handle`] and act on the
//! returned [`Action`]s (re-render, update the layers panel, open a color
//! picker). Nothing here blocks or does I/O.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::color::Rgb;
use crate::input::{Button, InputEvent, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::render::Compositor;
use crate::strokes::{LightType, Stroke, StrokeId, StrokeStore};
use crate::viewport::{Layout, Point, ScreenRect, Size, Viewport};

/// Key that opens the color picker for the active light type.
const COLOR_PICKER_KEY: &str = "7";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no image loaded")]
    NoImage,
    #[error("invalid image: {width}x{height} with {len} bytes of RGBA")]
    InvalidImage { width: u32, height: u32, len: usize },
    #[error("invalid color `{0}`, expected #RRGGBB")]
    InvalidColor(String),
    #[error("png encode failed: {0}")]
    Encode(String),
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StrokeCommitted(StrokeId),
    StrokesErased(Vec<StrokeId>),
    StrokeDeleted(StrokeId),
    StrokeVisibilityChanged { id: StrokeId, visible: bool },
    ViewportChanged(Viewport),
    BrushSizeChanged(f64),
    ToolChanged { light: LightType, erasing: bool },
    ColorChanged { light: LightType, color: Rgb },
    /// The user asked to edit the color of this light type.
    OpenColorPicker(LightType),
    RenderNeeded,
}

/// How the on-screen brush indicator should look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorStyle {
    Erase,
    Paint(Rgb),
}

/// Circle drawn under the pointer to preview the brush footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushCursor {
    /// Screen position of the circle's centre.
    pub center: Point,
    /// On-screen diameter: brush size scaled by zoom and display scaling.
    pub diameter: f64,
    pub style: CursorStyle,
}

/// All canvas state for one session.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub strokes: StrokeStore,
    pub viewport: Viewport,
    pub layout: Option<Layout>,
    pub ui: UiState,
    pub input: InputState,
    compositor: Option<Compositor>,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Image lifecycle ---

    /// Replace the base image with straight-alpha RGBA8 pixels.
    ///
    /// Creates fresh surfaces, discards every stroke, and resets the viewport
    /// and any in-flight gesture. Display scaling starts out as none; hosts
    /// call [`EngineCore::set_layout`] once the element is laid out.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidImage`] when the buffer does not match
    /// the dimensions. Prior state is kept in that case.
    pub fn load_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Vec<Action>, EngineError> {
        let compositor = Compositor::from_rgba(width, height, rgba)?;
        self.layout = Some(Layout::unscaled(compositor.native_size()));
        self.compositor = Some(compositor);
        self.strokes.clear();
        self.viewport.reset();
        self.input = InputState::Idle;
        debug!(width, height, "image loaded");
        Ok(vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded])
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.compositor.is_some()
    }

    /// Record where the canvas element sits on screen. Ignored without an image.
    pub fn set_layout(&mut self, origin: Point, container: Size, displayed: Size) {
        if let Some(layout) = self.layout.as_mut() {
            layout.origin = origin;
            layout.container = container;
            layout.displayed = displayed;
        }
    }

    // --- Dispatch ---

    /// Single entry point for host events.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { screen, button } => self.on_pointer_down(screen, button),
            InputEvent::PointerMove { screen } => self.on_pointer_move(screen),
            InputEvent::PointerUp { screen, button } => self.on_pointer_up(screen, button),
            InputEvent::PointerLeave { screen } => self.on_pointer_leave(screen),
            InputEvent::Wheel { delta, modifiers, .. } => self.on_wheel(delta, modifiers),
            InputEvent::KeyDown { key, text_input_focused, .. } => self.on_key_down(&key, text_input_focused),
        }
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        let Some(layout) = self.layout else {
            return Vec::new();
        };
        if !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }

        match button {
            Button::Middle | Button::Secondary => {
                self.input = InputState::Panning { last_screen: screen };
                Vec::new()
            }
            Button::Primary if self.ui.erasing => {
                self.input = InputState::Erasing;
                let at = self.viewport.screen_to_canvas(screen, &layout);
                self.erase_at(at)
            }
            Button::Primary => {
                let at = self.viewport.screen_to_canvas(screen, &layout);
                let (light, color, size) = (self.ui.light, self.ui.active_color(), self.ui.brush_size);
                if let Some(compositor) = self.compositor.as_mut() {
                    compositor.begin_in_progress(at, color, size);
                }
                self.input = InputState::Drawing { points: vec![at], light, color, size };
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let Some(layout) = self.layout else {
            return Vec::new();
        };
        let at = self.viewport.screen_to_canvas(screen, &layout);

        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                self.viewport.pan_by(dx, dy);
                vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
            }
            InputState::Erasing => self.erase_at(at),
            InputState::Drawing { points, light, color, size } => {
                let Some(compositor) = self.compositor.as_mut() else {
                    return Vec::new();
                };
                if *light == LightType::Linear {
                    compositor.preview_segment(points[0], at, *color, *size);
                } else {
                    let from = points.last().copied().unwrap_or(at);
                    compositor.extend_in_progress(from, at, *color, *size);
                    points.push(at);
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Primary ends a draw or erase, middle/secondary ends a pan. Other
    /// combinations leave the gesture running.
    pub fn on_pointer_up(&mut self, screen: Point, button: Button) -> Vec<Action> {
        let ends = match (&self.input, button) {
            (InputState::Drawing { .. } | InputState::Erasing, Button::Primary)
            | (InputState::Panning { .. }, Button::Middle | Button::Secondary) => true,
            _ => false,
        };
        if !ends {
            return Vec::new();
        }
        self.finish_gesture(screen)
    }

    /// Leaving the container releases whatever gesture is active.
    pub fn on_pointer_leave(&mut self, screen: Point) -> Vec<Action> {
        self.finish_gesture(screen)
    }

    /// Ctrl/Meta+wheel belongs to the host. Alt+wheel resizes the brush,
    /// a plain wheel zooms.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.ctrl || modifiers.meta {
            return Vec::new();
        }
        if modifiers.alt {
            let size = if delta.dy > 0.0 { self.ui.shrink_brush() } else { self.ui.grow_brush() };
            return vec![Action::BrushSizeChanged(size)];
        }
        self.viewport.zoom_by_wheel(delta.dy);
        vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, text_input_focused: bool) -> Vec<Action> {
        if text_input_focused {
            return Vec::new();
        }
        let mut chars = key.0.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        if let Some(light) = single.and_then(LightType::from_shortcut) {
            self.ui.select_light(light);
            return vec![self.tool_changed()];
        }
        if key.0 == COLOR_PICKER_KEY {
            return vec![Action::OpenColorPicker(self.ui.light)];
        }
        match single {
            Some('e' | 'E') => {
                self.ui.toggle_erase();
                vec![self.tool_changed()]
            }
            Some('[') => vec![Action::BrushSizeChanged(self.ui.shrink_brush())],
            Some(']') => vec![Action::BrushSizeChanged(self.ui.grow_brush())],
            _ => Vec::new(),
        }
    }

    // --- Tool / color ---

    /// Apply free-text color input to the active light type.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidColor`] unless `raw` is exactly
    /// `#RRGGBB`; the previous color is kept.
    pub fn set_active_color(&mut self, raw: &str) -> Result<Action, EngineError> {
        let color = Rgb::parse_hex(raw).ok_or_else(|| EngineError::InvalidColor(raw.to_owned()))?;
        self.ui.colors.set(self.ui.light, color);
        Ok(Action::ColorChanged { light: self.ui.light, color })
    }

    pub fn select_light(&mut self, light: LightType) -> Action {
        self.ui.select_light(light);
        self.tool_changed()
    }

    pub fn toggle_erase(&mut self) -> Action {
        self.ui.toggle_erase();
        self.tool_changed()
    }

    pub fn set_brush_size(&mut self, size: f64) -> Action {
        Action::BrushSizeChanged(self.ui.set_brush_size(size))
    }

    // --- Layers ---

    pub fn toggle_visibility(&mut self, id: &StrokeId) -> Vec<Action> {
        let Some(visible) = self.strokes.toggle_visibility(id) else {
            return Vec::new();
        };
        self.redraw_committed();
        vec![Action::StrokeVisibilityChanged { id: *id, visible }, Action::RenderNeeded]
    }

    pub fn delete_stroke(&mut self, id: &StrokeId) -> Vec<Action> {
        if self.strokes.remove(id).is_none() {
            return Vec::new();
        }
        self.redraw_committed();
        vec![Action::StrokeDeleted(*id), Action::RenderNeeded]
    }

    // --- Queries ---

    /// Committed strokes, oldest first.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    #[must_use]
    pub fn compositor(&self) -> Option<&Compositor> {
        self.compositor.as_ref()
    }

    /// Canvas-pixel position under a screen point.
    #[must_use]
    pub fn canvas_point(&self, screen: Point) -> Option<Point> {
        let layout = self.layout?;
        Some(self.viewport.screen_to_canvas(screen, &layout))
    }

    /// Where the canvas is drawn on screen right now.
    #[must_use]
    pub fn on_screen_rect(&self) -> Option<ScreenRect> {
        let layout = self.layout?;
        Some(self.viewport.on_screen_rect(&layout))
    }

    /// Brush indicator for a pointer at `screen`, or `None` when the pointer
    /// is off the canvas.
    #[must_use]
    pub fn brush_cursor(&self, screen: Point) -> Option<BrushCursor> {
        let layout = self.layout?;
        let rect = self.viewport.on_screen_rect(&layout);
        if !rect.contains(screen) {
            return None;
        }
        let style = if self.ui.erasing { CursorStyle::Erase } else { CursorStyle::Paint(self.ui.active_color()) };
        Some(BrushCursor {
            center: screen,
            diameter: self.viewport.canvas_len_to_screen(self.ui.brush_size, &layout),
            style,
        })
    }

    // --- Outputs ---

    /// # Errors
    ///
    /// [`EngineError::NoImage`] before the first load, or an encode failure.
    pub fn base_png(&self) -> Result<Vec<u8>, EngineError> {
        self.compositor.as_ref().ok_or(EngineError::NoImage)?.base_png()
    }

    /// # Errors
    ///
    /// [`EngineError::NoImage`] before the first load, or an encode failure.
    pub fn mask_png(&self) -> Result<Vec<u8>, EngineError> {
        self.compositor.as_ref().ok_or(EngineError::NoImage)?.mask_png()
    }

    /// PNG of the flattened on-screen view.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoImage`] before the first load, or an encode failure.
    pub fn composite_png(&self) -> Result<Vec<u8>, EngineError> {
        let compositor = self.compositor.as_ref().ok_or(EngineError::NoImage)?;
        crate::render::encode_png(&compositor.composite())
    }

    // --- Internals ---

    fn tool_changed(&self) -> Action {
        Action::ToolChanged { light: self.ui.light, erasing: self.ui.erasing }
    }

    fn redraw_committed(&mut self) {
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.redraw_committed(&self.strokes);
        }
    }

    fn erase_at(&mut self, at: Point) -> Vec<Action> {
        let erased = self.strokes.erase_at(at, self.ui.brush_size / 2.0);
        if erased.is_empty() {
            return Vec::new();
        }
        debug!(count = erased.len(), x = at.x, y = at.y, "strokes erased");
        self.redraw_committed();
        vec![Action::StrokesErased(erased), Action::RenderNeeded]
    }

    fn finish_gesture(&mut self, screen: Point) -> Vec<Action> {
        match mem::take(&mut self.input) {
            InputState::Idle | InputState::Erasing => Vec::new(),
            InputState::Panning { last_screen } => {
                self.viewport.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
            }
            InputState::Drawing { points, light, color, size } => {
                let points = match (light, self.layout) {
                    (LightType::Linear, Some(layout)) => {
                        let end = self.viewport.screen_to_canvas(screen, &layout);
                        vec![points[0], clamp_to(end, layout.native)]
                    }
                    _ => points,
                };
                self.commit(points, light, color, size)
            }
        }
    }

    fn commit(&mut self, points: Vec<Point>, light: LightType, color: Rgb, size: f64) -> Vec<Action> {
        if let Some(compositor) = self.compositor.as_mut() {
            compositor.clear_in_progress();
        }
        let Some(stroke) = Stroke::new(points, light, color, size) else {
            return vec![Action::RenderNeeded];
        };
        let points = stroke.points.len();
        let id = self.strokes.push(stroke);
        debug!(%id, ?light, points, "stroke committed");
        self.redraw_committed();
        vec![Action::StrokeCommitted(id), Action::RenderNeeded]
    }
}

fn clamp_to(p: Point, bounds: Size) -> Point {
    Point::new(p.x.clamp(0.0, bounds.width.max(0.0)), p.y.clamp(0.0, bounds.height.max(0.0)))
}
