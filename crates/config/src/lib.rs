//! Shared configuration for Atelier
//!
//! This crate is the single source of truth for window dimensions and the
//! tuning constants of the viewport (camera speeds, transform sensitivity,
//! highlight colours). Every struct deserializes with defaults for missing
//! fields so a settings file only needs to list what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1600;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 900;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Environment variable naming a JSON settings file
pub const SETTINGS_ENV_VAR: &str = "ATELIER_SETTINGS";

/// Errors raised while loading configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Closest any camera may get to its target
pub const MIN_CAMERA_DISTANCE: f64 = 0.1;

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Orbit camera tuning and starting pose
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians of orbit per pixel of drag
    pub rotate_speed: f64,
    /// World units of pan per pixel of drag
    pub pan_speed: f64,
    /// Distance multiplier per wheel notch (must be in (0, 1))
    pub zoom_factor: f64,
    /// Closest the camera may get to its target
    pub min_distance: f64,
    /// Margin keeping the polar angle away from the poles
    pub phi_margin: f64,
    /// Vertical field of view in degrees
    pub fov_degrees: f64,
    /// Starting distance from the target
    pub distance: f64,
    /// Starting azimuth in radians
    pub theta: f64,
    /// Starting polar angle in radians
    pub phi: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.01,
            zoom_factor: 0.95,
            min_distance: 0.1,
            phi_margin: 0.1,
            fov_degrees: 75.0,
            // (5, 5, 5)-ish view of the origin
            distance: 8.66,
            theta: std::f64::consts::FRAC_PI_4,
            phi: std::f64::consts::FRAC_PI_4,
        }
    }
}

impl CameraSettings {
    /// Check the values the orbit invariants depend on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("camera.rotate_speed", self.rotate_speed),
            ("camera.pan_speed", self.pan_speed),
            ("camera.zoom_factor", self.zoom_factor),
            ("camera.min_distance", self.min_distance),
            ("camera.phi_margin", self.phi_margin),
            ("camera.fov_degrees", self.fov_degrees),
            ("camera.distance", self.distance),
            ("camera.theta", self.theta),
            ("camera.phi", self.phi),
        ] {
            require_finite(field, value)?;
        }
        if self.zoom_factor <= 0.0 || self.zoom_factor >= 1.0 {
            return Err(invalid("camera.zoom_factor", "must be in (0, 1)"));
        }
        if self.min_distance < MIN_CAMERA_DISTANCE {
            return Err(invalid("camera.min_distance", "must be at least 0.1"));
        }
        if self.phi_margin <= 0.0 || self.phi_margin >= std::f64::consts::FRAC_PI_2 {
            return Err(invalid("camera.phi_margin", "must be in (0, pi/2)"));
        }
        if self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        Ok(())
    }

    /// Copy with every out-of-range value replaced by its default
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let pick = |value: f64, ok: bool, fallback: f64| {
            if value.is_finite() && ok { value } else { fallback }
        };
        Self {
            rotate_speed: pick(self.rotate_speed, true, defaults.rotate_speed),
            pan_speed: pick(self.pan_speed, true, defaults.pan_speed),
            zoom_factor: pick(
                self.zoom_factor,
                self.zoom_factor > 0.0 && self.zoom_factor < 1.0,
                defaults.zoom_factor,
            ),
            min_distance: pick(
                self.min_distance,
                self.min_distance >= MIN_CAMERA_DISTANCE,
                MIN_CAMERA_DISTANCE,
            ),
            phi_margin: pick(
                self.phi_margin,
                self.phi_margin > 0.0 && self.phi_margin < std::f64::consts::FRAC_PI_2,
                defaults.phi_margin,
            ),
            fov_degrees: pick(
                self.fov_degrees,
                self.fov_degrees > 0.0 && self.fov_degrees < 180.0,
                defaults.fov_degrees,
            ),
            distance: pick(self.distance, true, defaults.distance),
            theta: pick(self.theta, true, defaults.theta),
            phi: pick(self.phi, true, defaults.phi),
        }
    }
}

/// Modal transform tool tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// World units (or radians, or scale factor) per pixel of pointer travel
    pub sensitivity: f64,
    /// Pointer travel (pixels, per axis) below which a press/release counts as a click
    pub click_threshold: f64,
    /// X offset applied to duplicated objects
    pub duplicate_offset: f64,
    /// X offset applied to new objects placed next to the selection
    pub spawn_offset: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            click_threshold: 3.0,
            duplicate_offset: 1.0,
            spawn_offset: 2.0,
        }
    }
}

impl ToolSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tools.sensitivity", self.sensitivity),
            ("tools.click_threshold", self.click_threshold),
            ("tools.duplicate_offset", self.duplicate_offset),
            ("tools.spawn_offset", self.spawn_offset),
        ] {
            require_finite(field, value)?;
        }
        if self.click_threshold < 0.0 {
            return Err(invalid("tools.click_threshold", "must not be negative"));
        }
        Ok(())
    }
}

/// Selection highlight appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Emissive overlay colour as 0xRRGGBB
    pub emissive_color: u32,
    /// Emissive overlay intensity
    pub emissive_intensity: f32,
    /// Bounding box outline colour as 0xRRGGBB
    pub outline_color: u32,
    /// Bounding box outline opacity
    pub outline_opacity: f32,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            emissive_color: 0x666666,
            emissive_intensity: 0.4,
            outline_color: 0xffff00,
            outline_opacity: 0.3,
        }
    }
}

impl HighlightSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("highlight.emissive_intensity", self.emissive_intensity as f64)?;
        if !(0.0..=1.0).contains(&self.outline_opacity) {
            return Err(invalid("highlight.outline_opacity", "must be in [0, 1]"));
        }
        Ok(())
    }
}

/// All viewport tuning in one place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct ViewportSettings {
    pub camera: CameraSettings,
    pub tools: ToolSettings,
    pub highlight: HighlightSettings,
}

impl ViewportSettings {
    /// Parse and validate settings from a JSON string; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.tools.validate()?;
        self.highlight.validate()
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load from the file named by `ATELIER_SETTINGS`, or defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(SETTINGS_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Convert a 0xRRGGBB colour into linear-agnostic `[r, g, b]` in 0..=1
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
