//! Backends that draw a [`FieldFrame`](crate::FieldFrame).
//!
//! Every backend fills each triangle and then strokes it in black, in
//! tiling order, so they agree on what a frame looks like.

pub mod canvas;
pub mod terminal;
pub mod vector;

use trifield_core::Rgba;

use crate::field::FieldFrame;

/// Colour of every triangle outline.
pub const STROKE_COLOUR: Rgba = Rgba::BLACK;

/// Outline width the vector backend uses by default.
pub const VECTOR_STROKE_WIDTH: f64 = 0.15;

/// Outline width the pixel canvas backend uses by default.
pub const CANVAS_STROKE_WIDTH: f64 = 0.5;

/// Something that can draw a coloured triangle list.
pub trait Renderer {
    /// Draw `frame`, replacing whatever was drawn before.
    fn render(&mut self, frame: &FieldFrame);
}
