//! Background field state for the terminal.

use log::debug;
use ratatui::{Frame, layout::Rect};
use trifield_core::{Rgba, Sizing, TilingParameters};

use crate::field::FieldState;
use crate::render::canvas::PixelCanvasRenderer;
use crate::render::terminal::FieldWidget;
use crate::render::vector::{Overlay, VectorRenderer};
use crate::render::{CANVAS_STROKE_WIDTH, Renderer};

/// How the field is laid out and drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSettings {
    /// Edge length rule.
    pub sizing: Sizing,
    /// Start the first row half a triangle above the viewport.
    pub overscan: bool,
    /// Outline width in viewport units.
    pub stroke_width: f64,
    /// Colour behind the translucent triangles.
    pub background: Rgba,
    /// Viewport units per terminal column.
    pub cell_width: f64,
    /// Viewport units per terminal row.
    pub cell_height: f64,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            sizing: Sizing::default(),
            overscan: true,
            stroke_width: CANVAS_STROKE_WIDTH,
            background: Rgba::new(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0, 1.0),
            cell_width: 8.0,
            cell_height: 16.0,
        }
    }
}

impl FieldSettings {
    /// Tiling parameters for a terminal area of the given size.
    pub fn tiling_for(&self, columns: u16, rows: u16) -> TilingParameters {
        TilingParameters::for_viewport(
            columns as f64 * self.cell_width,
            rows as f64 * self.cell_height,
            self.sizing,
            self.overscan,
        )
    }
}

/// Background animation state.
#[derive(Debug)]
pub struct BackgroundState {
    settings: FieldSettings,
    /// Created on first layout.
    field: Option<FieldState>,
    canvas: PixelCanvasRenderer,
    /// Last laid out terminal width.
    last_width: u16,
    /// Last laid out terminal height.
    last_height: u16,
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self::new(FieldSettings::default())
    }
}

impl BackgroundState {
    /// Create a new background state.
    pub fn new(settings: FieldSettings) -> Self {
        Self {
            settings,
            field: None,
            canvas: PixelCanvasRenderer::new(0, 0)
                .with_stroke_width(settings.stroke_width)
                .with_background(settings.background),
            last_width: 0,
            last_height: 0,
        }
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    /// Replace the settings and retile the current field.
    pub fn set_settings(&mut self, settings: FieldSettings) {
        self.settings = settings;
        self.canvas = PixelCanvasRenderer::new(0, 0)
            .with_stroke_width(settings.stroke_width)
            .with_background(settings.background);
        if self.field.is_some() {
            self.layout(self.last_width, self.last_height);
        }
    }

    /// Current field, if one has been laid out.
    pub fn field(&self) -> Option<&FieldState> {
        self.field.as_ref()
    }

    /// Tile an area of `columns` by `rows` cells.
    ///
    /// Returns whether the triangle list was rebuilt.
    pub fn layout(&mut self, columns: u16, rows: u16) -> bool {
        let params = self.settings.tiling_for(columns, rows);
        self.last_width = columns;
        self.last_height = rows;

        match &mut self.field {
            Some(field) => field.resize(params),
            None => {
                debug!("first layout {columns}x{rows}");
                self.field = Some(FieldState::new(params));
                true
            }
        }
    }

    /// Render the field into `area` at `elapsed` seconds.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, elapsed: f64) {
        if area.is_empty() {
            return;
        }
        self.layout(area.width, area.height);
        let Some(field) = &mut self.field else {
            return;
        };
        field.set_elapsed(elapsed);

        self.canvas.resize(area.width as u32, area.height as u32 * 2);
        self.canvas.render(&field.frame());
        if let Some(pixmap) = self.canvas.pixmap() {
            frame.render_widget(FieldWidget::new(pixmap, self.settings.background), area);
        }
    }

    /// SVG of the field as last rendered.
    pub fn snapshot_svg(&self, overlay: Option<Overlay>) -> Option<String> {
        let field = self.field.as_ref()?;
        let mut renderer = VectorRenderer::new(self.settings.stroke_width)
            .with_background(self.settings.background);
        if let Some(overlay) = overlay {
            renderer = renderer.with_overlay(overlay);
        }
        renderer.render(&field.frame());
        Some(renderer.into_document())
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[test]
    fn test_layout_creates_then_reuses_field() {
        let mut state = BackgroundState::default();
        assert!(state.field().is_none());

        assert!(state.layout(80, 24));
        let count = state.field().unwrap().triangles().len();
        assert!(count > 0);

        assert!(!state.layout(80, 24));
        assert!(state.layout(120, 24));
        assert!(state.field().unwrap().triangles().len() > count);
    }

    #[test]
    fn test_tiling_uses_cell_metrics() {
        let settings = FieldSettings::default();
        let params = settings.tiling_for(80, 24);
        assert_eq!(params.width(), 640.0);
        assert_eq!(params.height(), 384.0);
        // 384 / 8 is below the floor of 100.
        assert_eq!(params.size(), 100.0);
    }

    #[test]
    fn test_render_fills_area_with_half_blocks() {
        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let mut state = BackgroundState::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                state.render(frame, area, 1.0);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        for y in 0..6 {
            for x in 0..20 {
                assert_eq!(buffer[(x, y)].symbol(), "▀");
            }
        }
        assert_eq!(state.field().unwrap().elapsed(), 1.0);
    }

    #[test]
    fn test_render_into_empty_area_is_skipped() {
        let mut terminal = Terminal::new(TestBackend::new(4, 4)).unwrap();
        let mut state = BackgroundState::default();
        terminal
            .draw(|frame| state.render(frame, Rect::new(0, 0, 0, 0), 1.0))
            .unwrap();
        assert!(state.field().is_none());
    }

    #[test]
    fn test_settings_change_retiles() {
        let mut state = BackgroundState::default();
        state.layout(80, 24);
        let before = state.field().unwrap().params().size();

        let mut settings = *state.settings();
        settings.sizing.floor = 50.0;
        state.set_settings(settings);
        assert_eq!(state.field().unwrap().params().size(), 50.0);
        assert_ne!(before, 50.0);
    }

    #[test]
    fn test_snapshot_svg() {
        let mut state = BackgroundState::default();
        assert!(state.snapshot_svg(None).is_none());

        state.layout(40, 10);
        let svg = state
            .snapshot_svg(Some(Overlay {
                text: "海".to_string(),
                font_size: 64.0,
            }))
            .unwrap();
        let triangles = state.field().unwrap().triangles().len();
        assert_eq!(svg.matches("<polygon").count(), triangles);
        assert!(svg.contains("海</text>"));
    }
}
