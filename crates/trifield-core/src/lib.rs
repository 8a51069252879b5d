//! Core geometry and colour for the trifield background.
//!
//! The field is a tiling of equilateral triangles over a rectangular
//! viewport. Each triangle's fill is a pure function of its index in
//! tiling order and the elapsed time, so a frame can be recomputed from
//! scratch at any moment.

pub mod colour;
pub mod geometry;
mod modes;
pub mod tiling;

pub use colour::{Hsla, Rgba, colour};
pub use geometry::{Orientation, Point, Triangle};
pub use modes::{FillMode, ViewportMode};
pub use tiling::{MAX_TRIANGLES, MIN_TRIANGLE_SIZE, Sizing, TilingParameters, generate};
