//! SVG output: one `<polygon>` per triangle.

use trifield_core::Rgba;

use super::{Renderer, VECTOR_STROKE_WIDTH};
use crate::field::FieldFrame;

/// Text drawn centred on top of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub text: String,
    /// Font size in viewport units.
    pub font_size: f64,
}

/// Renders frames to an SVG document.
#[derive(Debug, Clone)]
pub struct VectorRenderer {
    stroke_width: f64,
    background: Option<Rgba>,
    overlay: Option<Overlay>,
    document: String,
}

impl Default for VectorRenderer {
    fn default() -> Self {
        Self::new(VECTOR_STROKE_WIDTH)
    }
}

impl VectorRenderer {
    pub fn new(stroke_width: f64) -> Self {
        Self {
            stroke_width: stroke_width.max(0.0),
            background: None,
            overlay: None,
            document: String::new(),
        }
    }

    /// Fill the viewport with `colour` before drawing triangles.
    pub fn with_background(mut self, colour: Rgba) -> Self {
        self.background = Some(colour);
        self
    }

    /// Draw `overlay` over the triangles.
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// The last rendered document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

impl Renderer for VectorRenderer {
    fn render(&mut self, frame: &FieldFrame) {
        let (w, h) = (frame.width, frame.height);
        let mut svg = String::with_capacity(frame.triangles.len() * 128 + 256);

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        svg.push('\n');

        if let Some(bg) = self.background {
            svg.push_str(&format!(
                r#"<rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_hex()
            ));
            svg.push('\n');
        }

        for tri in &frame.triangles {
            let points = tri
                .points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            svg.push_str(&format!(
                r#"<polygon points="{points}" stroke="black" stroke-width="{}" fill="{}"/>"#,
                self.stroke_width, tri.fill
            ));
            svg.push('\n');
        }

        if let Some(overlay) = &self.overlay {
            svg.push_str(&format!(
                r#"<text x="50%" y="50%" text-anchor="middle" dominant-baseline="central" fill="white" font-weight="bold" font-size="{}">{}</text>"#,
                overlay.font_size,
                escape(&overlay.text)
            ));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        self.document = svg;
    }
}

/// Escape text for use as XML character data.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
