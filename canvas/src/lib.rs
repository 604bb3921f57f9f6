//! Annotation engine for photo relighting.
//!
//! The user paints colored light strokes over a loaded photo; this crate owns
//! everything between raw input events and the flattened base and mask
//! images that get sent to an image model. It keeps the stroke list,
//! maps screen positions through pan, zoom and display scaling, rasterizes
//! the three canvas layers, and interprets pointer, wheel and keyboard input.
//! The host is responsible only for delivering events and acting on the
//! returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The controller, [`engine::EngineCore`], and its single event dispatch point |
//! | [`strokes`] | Light types, strokes, and the ordered stroke store |
//! | [`viewport`] | Screen/canvas coordinate conversions under pan, zoom and display scaling |
//! | [`input`] | Input event types, tool state, and the gesture state machine |
//! | [`hit`] | Eraser hit-testing against committed strokes |
//! | [`render`] | Base, committed and in-progress raster layers |
//! | [`color`] | RGB colors and strict hex parsing |
//! | [`consts`] | Shared numeric constants (zoom limits, brush sizes) |

pub mod color;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod strokes;
pub mod viewport;
