//! Conversions from field colours to terminal colours.

use ratatui::style::Color;
use trifield_core::Rgba;

/// Drop alpha and convert to a 24-bit terminal colour.
///
/// Callers composite over an opaque background first.
pub fn rgba_to_color(rgba: Rgba) -> Color {
    let [r, g, b, _] = rgba.to_bytes();
    Color::Rgb(r, g, b)
}

/// Composite `rgba` over an opaque `background` and convert.
pub fn flatten(rgba: Rgba, background: Rgba) -> Color {
    let a = rgba.a.clamp(0.0, 1.0);
    let mix = |s: f64, d: f64| s * a + d * (1.0 - a);
    rgba_to_color(Rgba::new(
        mix(rgba.r, background.r),
        mix(rgba.g, background.g),
        mix(rgba.b, background.b),
        1.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_color() {
        assert_eq!(rgba_to_color(Rgba::new(1.0, 0.5, 0.0, 0.2)), Color::Rgb(255, 128, 0));
    }

    #[test]
    fn test_flatten() {
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(flatten(Rgba::new(0.0, 0.0, 0.0, 0.0), white), Color::Rgb(255, 255, 255));
        assert_eq!(flatten(Rgba::new(0.0, 0.0, 0.0, 0.5), white), Color::Rgb(128, 128, 128));
    }
}
