//! Input model: events, modifier keys, tool state, and the gesture state machine.
//!
//! `InputEvent` is the closed set of host events the engine understands; the
//! host translates raw pointer, wheel and keyboard events into it and hands
//! each one to [`crate::engine::EngineCore::handle`]. `UiState` captures the
//! user's tool choices. `InputState` is the active gesture between
//! pointer-down and pointer-up, carrying everything needed to finish it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::consts::{BRUSH_STEP, DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::strokes::LightType;
use crate::viewport::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button. Draws or erases.
    Primary,
    /// Middle mouse button (scroll wheel click). Pans.
    Middle,
    /// Right mouse button. Pans.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"e"`, `"["`, `"7"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    #[serde(default)]
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// One host event, positions in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        screen: Point,
        button: Button,
    },
    PointerMove {
        screen: Point,
    },
    PointerUp {
        screen: Point,
        button: Button,
    },
    /// The pointer left the tracked container. Treated as a release.
    PointerLeave {
        screen: Point,
    },
    Wheel {
        #[serde(default = "origin")]
        screen: Point,
        delta: WheelDelta,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        /// A text field owns the keyboard; shortcuts must not fire.
        #[serde(default)]
        text_input_focused: bool,
    },
}

fn origin() -> Point {
    Point::new(0.0, 0.0)
}

/// One color per light type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolColors([Rgb; 6]);

impl Default for ToolColors {
    fn default() -> Self {
        Self(LightType::ALL.map(LightType::default_color))
    }
}

impl ToolColors {
    #[must_use]
    pub fn get(&self, light: LightType) -> Rgb {
        self.0[light.index()]
    }

    pub fn set(&mut self, light: LightType, color: Rgb) {
        self.0[light.index()] = color;
    }
}

/// Tool selection visible to the host's toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Light type new strokes are tagged with.
    pub light: LightType,
    /// Primary button erases instead of drawing.
    pub erasing: bool,
    /// Brush diameter in canvas pixels, within `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]`.
    pub brush_size: f64,
    pub colors: ToolColors,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            light: LightType::default(),
            erasing: false,
            brush_size: DEFAULT_BRUSH_SIZE,
            colors: ToolColors::default(),
        }
    }
}

impl UiState {
    /// Color of the active light type.
    #[must_use]
    pub fn active_color(&self) -> Rgb {
        self.colors.get(self.light)
    }

    /// Switch light type and leave erase mode.
    pub fn select_light(&mut self, light: LightType) {
        self.light = light;
        self.erasing = false;
    }

    pub fn toggle_erase(&mut self) {
        self.erasing = !self.erasing;
    }

    /// Set the brush diameter, clamped. Returns the value actually applied.
    pub fn set_brush_size(&mut self, size: f64) -> f64 {
        if size.is_finite() {
            self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        }
        self.brush_size
    }

    pub fn grow_brush(&mut self) -> f64 {
        self.set_brush_size(self.brush_size + BRUSH_STEP)
    }

    pub fn shrink_brush(&mut self) -> f64 {
        self.set_brush_size(self.brush_size - BRUSH_STEP)
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Middle/secondary drag moving the viewport.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// Primary drag in erase mode; every sample deletes strokes under the brush.
    Erasing,
    /// Primary drag accumulating a new stroke.
    ///
    /// Light, color and size are captured at press time so the in-progress
    /// surface and the committed stroke always agree.
    Drawing {
        /// Canvas-pixel points so far. The press point is always first.
        points: Vec<Point>,
        light: LightType,
        color: Rgb,
        size: f64,
    },
}
