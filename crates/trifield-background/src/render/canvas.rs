//! Pixel canvas backend on top of tiny-skia.

use log::debug;
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};
use trifield_core::{Point, Rgba};

use super::{CANVAS_STROKE_WIDTH, Renderer, STROKE_COLOUR};
use crate::field::FieldFrame;

/// Straight-alpha colour of pixel `(x, y)`.
pub fn pixel_rgba(pixmap: &Pixmap, x: u32, y: u32) -> Option<Rgba> {
    let pixel = pixmap.pixel(x, y)?.demultiply();
    let channel = |v: u8| v as f64 / 255.0;
    Some(Rgba::new(
        channel(pixel.red()),
        channel(pixel.green()),
        channel(pixel.blue()),
        channel(pixel.alpha()),
    ))
}

fn skia_color(rgba: Rgba) -> Color {
    let [r, g, b, a] = rgba.to_bytes();
    Color::from_rgba8(r, g, b, a)
}

fn triangle_path(points: &[Point; 3]) -> Option<Path> {
    let [a, b, c] = points;
    let mut pb = PathBuilder::new();
    pb.move_to(a.x as f32, a.y as f32);
    pb.line_to(b.x as f32, b.y as f32);
    pb.line_to(c.x as f32, c.y as f32);
    pb.close();
    pb.finish()
}

/// Rasterises frames onto a [`Pixmap`].
///
/// The viewport is stretched over the whole pixmap, so pixels need not be
/// square in viewport units.
#[derive(Debug, Clone)]
pub struct PixelCanvasRenderer {
    /// `None` while either side is zero.
    pixmap: Option<Pixmap>,
    stroke_width: f64,
    background: Option<Rgba>,
}

impl PixelCanvasRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
            stroke_width: CANVAS_STROKE_WIDTH,
            background: None,
        }
    }

    /// Outline width in viewport units.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width.max(0.0);
        self
    }

    /// Clear to `colour` instead of transparent.
    pub fn with_background(mut self, colour: Rgba) -> Self {
        self.background = Some(colour);
        self
    }

    /// Pixmap size, `(0, 0)` when there is no surface.
    pub fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |pixmap| (pixmap.width(), pixmap.height()))
    }

    /// Change the pixmap size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() != (width, height) {
            self.pixmap = Pixmap::new(width, height);
        }
    }

    /// The drawing surface, if it has any pixels.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }
}

impl Renderer for PixelCanvasRenderer {
    fn render(&mut self, frame: &FieldFrame) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            debug!("no drawing surface, skipping frame");
            return;
        };
        if frame.width <= 0.0 || frame.height <= 0.0 {
            debug!("empty viewport, skipping frame");
            return;
        }
        pixmap.fill(self.background.map_or(Color::TRANSPARENT, skia_color));

        let transform = Transform::from_scale(
            pixmap.width() as f32 / frame.width as f32,
            pixmap.height() as f32 / frame.height as f32,
        );
        let mut fill = Paint::default();
        fill.anti_alias = true;
        let mut outline = Paint::default();
        outline.anti_alias = true;
        outline.set_color(skia_color(STROKE_COLOUR));
        // tiny-skia draws a hairline for width zero.
        let stroke = (self.stroke_width > 0.0).then(|| Stroke {
            width: self.stroke_width as f32,
            ..Default::default()
        });

        for tri in &frame.triangles {
            let Some(path) = triangle_path(&tri.points) else {
                continue;
            };
            fill.set_color(skia_color(tri.fill.to_rgba()));
            pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);
            if let Some(stroke) = &stroke {
                pixmap.stroke_path(&path, &outline, stroke, transform, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldState, PaintedTriangle};
    use trifield_core::{Hsla, TilingParameters};

    fn opaque_red() -> Hsla {
        Hsla {
            hue: 0.0,
            saturation: 100.0,
            lightness: 50.0,
            alpha: 1.0,
        }
    }

    fn single(points: [(f64, f64); 3], fill: Hsla) -> FieldFrame {
        FieldFrame {
            width: 10.0,
            height: 10.0,
            time: 0.0,
            triangles: vec![PaintedTriangle {
                index: 0,
                points: points.map(Point::from),
                fill,
            }],
        }
    }

    fn bytes(renderer: &PixelCanvasRenderer, x: u32, y: u32) -> [u8; 4] {
        pixel_rgba(renderer.pixmap().unwrap(), x, y)
            .unwrap()
            .to_bytes()
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 1, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_fills_inside_only() {
        let frame = single([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], opaque_red());
        let mut renderer = PixelCanvasRenderer::new(10, 10).with_stroke_width(0.0);
        renderer.render(&frame);

        assert_eq!(bytes(&renderer, 1, 1), [255, 0, 0, 255]);
        assert_eq!(bytes(&renderer, 9, 9), [0, 0, 0, 0]);
        assert!(pixel_rgba(renderer.pixmap().unwrap(), 10, 0).is_none());
    }

    #[test]
    fn test_transparent_fill_leaves_background() {
        let clear = Hsla {
            alpha: 0.0,
            ..opaque_red()
        };
        let bg = Rgba::from_hex("#3b82f6").unwrap();
        let frame = single([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], clear);
        let mut renderer = PixelCanvasRenderer::new(10, 10)
            .with_stroke_width(0.0)
            .with_background(bg);
        renderer.render(&frame);

        assert_eq!(bytes(&renderer, 2, 2), bg.to_bytes());
    }

    #[test]
    fn test_alpha_blends_over_background() {
        let half = Hsla {
            alpha: 0.5,
            ..opaque_red()
        };
        let frame = single([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], half);
        let mut renderer = PixelCanvasRenderer::new(10, 10)
            .with_stroke_width(0.0)
            .with_background(Rgba::new(0.0, 0.0, 1.0, 1.0));
        renderer.render(&frame);

        assert_close(bytes(&renderer, 1, 1), [128, 0, 127, 255]);
    }

    #[test]
    fn test_stroke_darkens_edges() {
        let frame = single(
            [(0.0, 5.0), (10.0, 5.0), (5.0, 10.0)],
            Hsla {
                alpha: 0.0,
                ..opaque_red()
            },
        );
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0);
        let mut renderer = PixelCanvasRenderer::new(10, 10)
            .with_stroke_width(1.0)
            .with_background(white);
        renderer.render(&frame);

        // Row 4 straddles the top edge at y = 5.
        assert!(bytes(&renderer, 5, 4)[0] < 255);
        // Far from every edge.
        assert_eq!(bytes(&renderer, 5, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_stroke_draws_no_outline() {
        let frame = single(
            [(0.0, 5.0), (10.0, 5.0), (5.0, 10.0)],
            Hsla {
                alpha: 0.0,
                ..opaque_red()
            },
        );
        let mut renderer = PixelCanvasRenderer::new(10, 10)
            .with_stroke_width(0.0)
            .with_background(Rgba::new(1.0, 1.0, 1.0, 1.0));
        renderer.render(&frame);

        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(bytes(&renderer, x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn test_missing_surface_is_skipped() {
        let frame = single([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], opaque_red());
        let mut renderer = PixelCanvasRenderer::new(0, 0);
        renderer.render(&frame);
        assert!(renderer.pixmap().is_none());
        assert_eq!(renderer.size(), (0, 0));

        let mut renderer = PixelCanvasRenderer::new(4, 4);
        renderer.render(&FieldFrame {
            width: 0.0,
            ..frame
        });
        assert_eq!(bytes(&renderer, 0, 0)[3], 0);
    }

    #[test]
    fn test_scales_viewport_to_pixmap() {
        let mut field = FieldState::new(TilingParameters::new(300.0, 200.0, 100.0, true));
        field.set_elapsed(4.0);
        let frame = field.frame();

        let bg = Rgba::from_hex("#3b82f6").unwrap();
        let mut renderer = PixelCanvasRenderer::new(30, 20).with_background(bg);
        renderer.render(&frame);
        assert_eq!(renderer.size(), (30, 20));
        // Field triangles are translucent so the background always shows.
        for y in 0..20 {
            for x in 0..30 {
                assert_eq!(bytes(&renderer, x, y)[3], 255);
            }
        }
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut renderer = PixelCanvasRenderer::new(2, 2).with_background(Rgba::BLACK);
        renderer.render(&single([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)], opaque_red()));
        renderer.resize(3, 1);
        assert_eq!(renderer.size(), (3, 1));
        assert_eq!(bytes(&renderer, 0, 0)[3], 0);
        assert_eq!(renderer.pixmap().unwrap().data().len(), 3 * 4);

        renderer.resize(0, 5);
        assert!(renderer.pixmap().is_none());
    }
}
