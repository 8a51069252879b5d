//! Display modes shared by the config file and the app.

use serde::{Deserialize, Serialize};

/// Whether triangle colours follow the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Animated,
    /// Colours frozen at a fixed time.
    Static,
}

impl FillMode {
    /// Toggle between animated and static fill.
    pub fn toggle(&self) -> Self {
        match self {
            FillMode::Animated => FillMode::Static,
            FillMode::Static => FillMode::Animated,
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            FillMode::Animated => "animated",
            FillMode::Static => "static",
        }
    }
}

/// How much of the window the field occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportMode {
    /// The whole window.
    #[default]
    Full,
    /// A band of the given number of rows, vertically centred.
    Fixed(u16),
}

impl ViewportMode {
    /// Rows used out of `available`.
    pub fn rows(&self, available: u16) -> u16 {
        match self {
            ViewportMode::Full => available,
            ViewportMode::Fixed(rows) => (*rows).min(available),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_mode_toggle() {
        assert_eq!(FillMode::Animated.toggle(), FillMode::Static);
        assert_eq!(FillMode::Static.toggle(), FillMode::Animated);
        assert_eq!(FillMode::default().name(), "animated");
    }

    #[test]
    fn test_viewport_rows() {
        assert_eq!(ViewportMode::Full.rows(40), 40);
        assert_eq!(ViewportMode::Fixed(12).rows(40), 12);
        assert_eq!(ViewportMode::Fixed(60).rows(40), 40);
    }
}
