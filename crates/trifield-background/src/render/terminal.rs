//! Shows a [`Pixmap`] in a terminal, two pixels per cell.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tiny_skia::Pixmap;
use trifield_core::Rgba;

use super::canvas::pixel_rgba;
use crate::color::flatten;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

/// Draws a pixmap whose height is twice the area's height.
#[derive(Debug, Clone, Copy)]
pub struct FieldWidget<'a> {
    pixmap: &'a Pixmap,
    /// Shown where the pixmap is transparent.
    backdrop: Rgba,
}

impl<'a> FieldWidget<'a> {
    pub fn new(pixmap: &'a Pixmap, backdrop: Rgba) -> Self {
        Self { pixmap, backdrop }
    }
}

impl Widget for FieldWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let top = pixel_rgba(self.pixmap, col as u32, row as u32 * 2);
                let bottom = pixel_rgba(self.pixmap, col as u32, row as u32 * 2 + 1);
                let (Some(top), Some(bottom)) = (top, bottom) else {
                    continue;
                };
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                cell.set_char(HALF_BLOCK)
                    .set_fg(flatten(top, self.backdrop))
                    .set_bg(flatten(bottom, self.backdrop));
            }
        }
    }
}
