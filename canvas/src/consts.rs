//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the viewport accepts.
pub const MIN_SCALE: f64 = 0.1;

/// Largest zoom factor the viewport accepts.
pub const MAX_SCALE: f64 = 10.0;

/// Scale change per wheel-delta unit. Additive, not multiplicative.
pub const ZOOM_SENSITIVITY: f64 = 0.001;

// ── Brush ───────────────────────────────────────────────────────

/// Brush diameter in canvas pixels when the engine starts.
pub const DEFAULT_BRUSH_SIZE: f64 = 50.0;

/// Smallest brush diameter in canvas pixels.
pub const MIN_BRUSH_SIZE: f64 = 5.0;

/// Largest brush diameter in canvas pixels.
pub const MAX_BRUSH_SIZE: f64 = 300.0;

/// Brush diameter change for one `[`/`]` press or one Alt+wheel notch.
pub const BRUSH_STEP: f64 = 5.0;
