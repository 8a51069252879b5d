//! Render a single frame to a file without a terminal.

use std::fs;

use color_eyre::eyre::{WrapErr, bail, eyre};
use log::info;
use trifield_background::render::{CANVAS_STROKE_WIDTH, VECTOR_STROKE_WIDTH};
use trifield_background::{FieldState, Overlay, PixelCanvasRenderer, Renderer, VectorRenderer};
use trifield_config::Config;
use trifield_core::{MAX_TRIANGLES, TilingParameters};

use crate::cli::{ExportFormat, ExportOptions};

/// Largest pixmap side the PNG export will allocate.
const MAX_PIXELS_PER_SIDE: f64 = 16_384.0;

/// Glyph size relative to the viewport height.
const GLYPH_SCALE: f64 = 0.6;

/// Render the frame described by `options` and write it out.
pub fn run(options: &ExportOptions, config: &Config) -> color_eyre::Result<()> {
    let (width, height) = (options.width, options.height);
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        bail!("viewport must be positive, got {width}x{height}");
    }
    let time = options.time.unwrap_or(config.static_time);
    if !time.is_finite() {
        bail!("time must be a finite number of seconds");
    }

    let overscan = options.overscan.unwrap_or(config.overscan);
    let params = TilingParameters::for_viewport(width, height, config.sizing(), overscan);
    if params.exceeds_limit() {
        bail!(
            "a {width}x{height} viewport needs {} triangles, the limit is {MAX_TRIANGLES}",
            params.triangle_count()
        );
    }
    let frame = FieldState::new(params).frame_at(time);
    let background = config.background_rgba();

    match options.format {
        ExportFormat::Svg => {
            let mut renderer =
                VectorRenderer::new(options.stroke_width.unwrap_or(VECTOR_STROKE_WIDTH))
                    .with_background(background);
            if !config.glyph.is_empty() {
                renderer = renderer.with_overlay(Overlay {
                    text: config.glyph.clone(),
                    font_size: (height * GLYPH_SCALE).round(),
                });
            }
            renderer.render(&frame);
            fs::write(&options.output, renderer.document())?;
        }
        ExportFormat::Png => {
            if width > MAX_PIXELS_PER_SIDE || height > MAX_PIXELS_PER_SIDE {
                bail!("PNG export is limited to {MAX_PIXELS_PER_SIDE} pixels per side");
            }
            let mut renderer = PixelCanvasRenderer::new(width.ceil() as u32, height.ceil() as u32)
                .with_stroke_width(options.stroke_width.unwrap_or(CANVAS_STROKE_WIDTH))
                .with_background(background);
            renderer.render(&frame);
            renderer
                .pixmap()
                .ok_or_else(|| eyre!("no pixels to export"))?
                .save_png(&options.output)
                .wrap_err_with(|| format!("failed to write {}", options.output.display()))?;
        }
    }

    info!(
        "exported {} triangles at t={time}s to {}",
        frame.triangles.len(),
        options.output.display()
    );
    Ok(())
}
