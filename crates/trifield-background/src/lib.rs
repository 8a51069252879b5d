//! Animated triangle field for the trifield terminal app.
//!
//! This crate owns everything between the pure geometry in
//! `trifield-core` and a drawing surface: the per-viewport field state,
//! the frame-driven animation driver, and the renderers (SVG, pixel
//! canvas, and a ratatui widget on top of the canvas).

mod color;
pub mod driver;
mod field;
pub mod render;
mod state;

pub use color::{flatten, rgba_to_color};
pub use driver::{
    AnimationDriver, Clock, DriverState, FrameId, FrameScheduler, MonotonicClock,
    RepaintScheduler,
};
pub use field::{FieldFrame, FieldState, PaintedTriangle};
pub use render::Renderer;
pub use render::canvas::{PixelCanvasRenderer, pixel_rgba};
pub use tiny_skia::Pixmap;
pub use render::terminal::FieldWidget;
pub use render::vector::{Overlay, VectorRenderer};
pub use state::{BackgroundState, FieldSettings};
