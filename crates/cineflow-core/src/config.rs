//! Editor configuration loaded from JSON, with defaults for every field.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{CineFlowError, Result};
use crate::geometry::{Size, Vec2};
use crate::{logical, MAX_ZOOM, MIN_ZOOM};

/// Tunables for the canvas editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas width.
    pub logical_width: f32,
    /// Logical canvas height.
    pub logical_height: f32,
    /// Pinch zoom range, within [`MIN_ZOOM`]..[`MAX_ZOOM`].
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Grid cell size in logical units.
    pub grid_size: f32,
    pub grid_enabled: bool,
    /// Maximum gap between two taps for a double-tap, in milliseconds.
    pub double_tap_ms: f64,
    /// Maximum distance between two taps for a double-tap, in pixels.
    pub double_tap_slop: f32,
    /// Lower bound on element width during handle resize.
    pub min_element_width: f32,
    /// Size of elements created from dropped assets.
    pub default_element_width: f32,
    pub default_element_height: f32,
    /// Where double-clicked assets are inserted.
    pub default_insert_x: f32,
    pub default_insert_y: f32,
    /// Default duration of inserted elements, in seconds.
    pub default_element_duration: f64,
    /// Minimum interval between drag/resize updates, in milliseconds.
    pub throttle_ms: f64,
    pub default_aspect_ratio: String,
    /// Default document duration, in seconds.
    pub default_total_duration: f64,
    /// Base URL for the asset/template catalog.
    pub catalog_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            logical_width: logical::WIDTH,
            logical_height: logical::HEIGHT,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            grid_size: 20.0,
            grid_enabled: false,
            double_tap_ms: 300.0,
            double_tap_slop: 30.0,
            min_element_width: 200.0,
            default_element_width: 300.0,
            default_element_height: 200.0,
            default_insert_x: 100.0,
            default_insert_y: 100.0,
            default_element_duration: 5.0,
            throttle_ms: 16.0,
            default_aspect_ratio: "16:9".into(),
            default_total_duration: 30.0,
            catalog_url: "http://localhost:3000".into(),
        }
    }
}

impl EditorConfig {
    /// Logical canvas size.
    pub fn logical_size(&self) -> Size {
        Size::new(self.logical_width, self.logical_height)
    }

    /// Size of elements created from dropped assets.
    pub fn default_element_size(&self) -> Size {
        Size::new(self.default_element_width, self.default_element_height)
    }

    /// Position of elements inserted without a drop point.
    pub fn default_insert_position(&self) -> Vec2 {
        Vec2::new(self.default_insert_x, self.default_insert_y)
    }

    /// Check the configuration for values the editor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.logical_width > 0.0 && self.logical_height > 0.0) {
            return Err(CineFlowError::Config(format!(
                "logical resolution must be positive, got {}x{}",
                self.logical_width, self.logical_height
            )));
        }
        let zoom_range = MIN_ZOOM..=MAX_ZOOM;
        if !(zoom_range.contains(&self.min_zoom)
            && zoom_range.contains(&self.max_zoom)
            && self.min_zoom <= self.max_zoom)
        {
            return Err(CineFlowError::Config(format!(
                "invalid zoom bounds [{}, {}], must lie within [{}, {}]",
                self.min_zoom, self.max_zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if !(self.grid_size > 0.0) {
            return Err(CineFlowError::Config(format!(
                "grid size must be positive, got {}",
                self.grid_size
            )));
        }
        if self.min_element_width < 0.0 || self.throttle_ms < 0.0 || self.double_tap_ms < 0.0 {
            return Err(CineFlowError::Config(
                "element width, throttle and double-tap intervals must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a config from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| CineFlowError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| CineFlowError::Serialization(format!("Failed to write config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Default config location: `<config dir>/cineflow/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cineflow").join("config.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded editor config");
                config
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unusable config, using defaults"
                );
                Self::default()
            }
        }
    }
}
