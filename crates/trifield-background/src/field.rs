//! Triangle list for the current viewport plus the animation clock.

use log::debug;
use trifield_core::{Hsla, Point, TilingParameters, Triangle, colour, generate};

/// A triangle with its fill for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedTriangle {
    pub index: usize,
    pub points: [Point; 3],
    pub fill: Hsla,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFrame {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
    /// Seconds since the animation started.
    pub time: f64,
    /// Triangles in tiling order.
    pub triangles: Vec<PaintedTriangle>,
}

/// Tiling of the current viewport and the time it is shown at.
///
/// The triangle list is rebuilt wholesale whenever the tiling parameters
/// change; it is never patched.
#[derive(Debug, Clone)]
pub struct FieldState {
    params: TilingParameters,
    triangles: Vec<Triangle>,
    elapsed: f64,
}

impl FieldState {
    /// Tile the viewport described by `params`.
    pub fn new(params: TilingParameters) -> Self {
        Self {
            params,
            triangles: generate(&params),
            elapsed: 0.0,
        }
    }

    /// Retile if `params` differ from the current ones.
    ///
    /// Returns whether the triangle list was rebuilt.
    pub fn resize(&mut self, params: TilingParameters) -> bool {
        if params == self.params {
            return false;
        }
        debug!(
            "retiling {}x{} -> {}x{}",
            self.params.width(),
            self.params.height(),
            params.width(),
            params.height()
        );
        self.params = params;
        self.triangles = generate(&params);
        true
    }

    pub fn params(&self) -> &TilingParameters {
        &self.params
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Seconds the field is currently shown at.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Move the animation clock.
    pub fn set_elapsed(&mut self, seconds: f64) {
        self.elapsed = seconds;
    }

    /// Colour every triangle for the current time.
    pub fn frame(&self) -> FieldFrame {
        self.frame_at(self.elapsed)
    }

    /// Colour every triangle for time `t`.
    pub fn frame_at(&self, t: f64) -> FieldFrame {
        FieldFrame {
            width: self.params.width(),
            height: self.params.height(),
            time: t,
            triangles: self
                .triangles
                .iter()
                .map(|tri| PaintedTriangle {
                    index: tri.index,
                    points: tri.points,
                    fill: colour(tri.index, t),
                })
                .collect(),
        }
    }
}
