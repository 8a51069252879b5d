//! Configuration file for trifield.
//!
//! The file lives at `<config dir>/trifield/config.toml`. Every key is
//! optional; a missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trifield_core::{FillMode, Rgba, Sizing, ViewportMode};

/// Name of the configuration file.
const CONFIG_FILE: &str = "config.toml";

/// Highest accepted frame rate.
pub const MAX_FRAME_RATE: u32 = 240;

/// Errors from reading, writing or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text shown in the middle of the field.
    pub glyph: String,
    /// Animated or frozen colours.
    pub fill: FillMode,
    /// Time the colours are frozen at in static mode.
    pub static_time: f64,
    /// Start the first row half a triangle above the viewport.
    pub overscan: bool,
    /// Viewport height divided by this gives the triangle edge length.
    pub size_divisor: f64,
    /// Smallest triangle edge length.
    pub min_triangle_size: f64,
    /// Outline width in viewport units.
    pub stroke_width: f64,
    /// `#rrggbb` colour behind the field.
    pub background: String,
    /// Frames per second while animating.
    pub frame_rate: u32,
    /// Viewport units per terminal column.
    pub cell_width: f64,
    /// Viewport units per terminal row.
    pub cell_height: f64,
    /// Full window or a fixed band. Kept last so it serializes after the
    /// plain keys.
    pub viewport: ViewportMode,
}

impl Default for Config {
    fn default() -> Self {
        let sizing = Sizing::default();
        Self {
            glyph: "海".to_string(),
            fill: FillMode::Animated,
            static_time: 0.0,
            overscan: true,
            size_divisor: sizing.divisor,
            min_triangle_size: sizing.floor,
            stroke_width: 0.5,
            background: "#3b82f6".to_string(),
            frame_rate: 60,
            cell_width: 8.0,
            cell_height: 16.0,
            viewport: ViewportMode::Full,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "trifield").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)
    }

    /// Reject values the field cannot be drawn with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key, reason: &str| {
            Err(ConfigError::Invalid {
                key,
                reason: reason.to_string(),
            })
        };

        if !(self.size_divisor.is_finite() && self.size_divisor > 0.0) {
            return invalid("size_divisor", "must be a positive number");
        }
        if !(self.min_triangle_size.is_finite() && self.min_triangle_size > 0.0) {
            return invalid("min_triangle_size", "must be a positive number");
        }
        if !(self.stroke_width.is_finite() && self.stroke_width >= 0.0) {
            return invalid("stroke_width", "must not be negative");
        }
        if !self.static_time.is_finite() {
            return invalid("static_time", "must be a finite number");
        }
        if !(1..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return invalid("frame_rate", "must be between 1 and 240");
        }
        if !(self.cell_width.is_finite() && self.cell_width > 0.0)
            || !(self.cell_height.is_finite() && self.cell_height > 0.0)
        {
            return invalid("cell_width", "cell dimensions must be positive");
        }
        if Rgba::from_hex(&self.background).is_none() {
            return invalid("background", "expected a colour like #3b82f6");
        }
        if let ViewportMode::Fixed(0) = self.viewport {
            return invalid("viewport", "fixed height must be at least one row");
        }
        Ok(())
    }

    /// Edge length rule from `size_divisor` and `min_triangle_size`.
    pub fn sizing(&self) -> Sizing {
        Sizing {
            divisor: self.size_divisor,
            floor: self.min_triangle_size,
        }
    }

    /// Background colour, or the default blue if the value does not parse.
    pub fn background_rgba(&self) -> Rgba {
        Rgba::from_hex(&self.background)
            .or_else(|| Rgba::from_hex(&Self::default().background))
            .unwrap_or(Rgba::BLACK)
    }
}
