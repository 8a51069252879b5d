//! Per-triangle fill colour as a function of index and elapsed time.

use std::f64::consts::PI;
use std::fmt;

/// Fractional part of the golden ratio.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.61803398875;

/// Centre of the hue band, in degrees.
const BASE_HUE: f64 = 220.0;
/// How far the hue strays from [`BASE_HUE`].
const HUE_SPREAD: f64 = 15.0;
/// Fixed saturation, in percent.
const SATURATION: f64 = 50.0;
/// Centre of the lightness band, in percent.
const BASE_LIGHTNESS: f64 = 50.0;
/// How far lightness follows the wave, in percent.
const LIGHTNESS_SPREAD: f64 = 5.0;
/// Alpha at the crest of the wave.
const MAX_ALPHA: f64 = 0.25;

/// Colour in HSL space with alpha.
///
/// Hue is in degrees, saturation and lightness in percent, alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

/// Straight (non-premultiplied) RGBA with components in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Components scaled to bytes.
    pub fn to_bytes(self) -> [u8; 4] {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(self.r), byte(self.g), byte(self.b), byte(self.a)]
    }

    /// Parse a `#rrggbb` string into an opaque colour.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f64 / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 1.0))
    }

    /// `#rrggbb` form, ignoring alpha.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Hsla {
    /// Convert to RGBA, keeping alpha.
    pub fn to_rgba(self) -> Rgba {
        let h = self.hue.rem_euclid(360.0) / 360.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let l = (self.lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgba::new(l, l, l, self.alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgba::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
            self.alpha,
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// CSS form, e.g. `hsla(221.3, 50%, 52.1%, 0.137)`.
impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {:.3})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// Low-discrepancy value in `[0, 1)` for a triangle index.
pub fn seed(index: usize) -> f64 {
    (index as f64 * GOLDEN_RATIO_CONJUGATE).fract()
}

fn phase(seed: f64) -> f64 {
    seed * PI * 3.0
}

/// Angular frequency of a triangle's pulse, in radians per second.
pub fn frequency(index: usize) -> f64 {
    0.5 + seed(index)
}

/// Seconds between two identical colours of a triangle.
pub fn period(index: usize) -> f64 {
    2.0 * PI / frequency(index)
}

/// The wave driving lightness and alpha, in `[-1, 1]`.
pub fn wave(index: usize, t: f64) -> f64 {
    let seed = seed(index);
    (t * (0.5 + seed) + phase(seed)).sin()
}

/// Fill colour of triangle `index` at `t` seconds.
///
/// Alpha is zero whenever the wave is negative, so each triangle is
/// invisible for half of its cycle.
pub fn colour(index: usize, t: f64) -> Hsla {
    let seed = seed(index);
    let phase = phase(seed);
    let wave = wave(index, t);

    let hue = BASE_HUE + (phase * 3.0).sin() * HUE_SPREAD;
    let lightness = BASE_LIGHTNESS + wave * LIGHTNESS_SPREAD;
    let alpha = wave.max(0.0) * MAX_ALPHA;

    Hsla {
        hue,
        saturation: SATURATION,
        lightness,
        alpha: quantize_alpha(alpha),
    }
}

/// Round to three decimal places.
fn quantize_alpha(alpha: f64) -> f64 {
    (alpha * 1000.0).round() / 1000.0
}
