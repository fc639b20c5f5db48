//! Configurator settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::DimensionSnapshot;

/// Camera framing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingSettings {
    /// Multiplier applied to the largest dimension (>= 1)
    pub padding_factor: f64,
    /// Extra room for dimension labels, in millimeters
    pub additive_padding: f64,
    /// Minimum relative change of the largest dimension that triggers a re-frame
    pub reframe_threshold: f64,
    /// Vertical field of view of the 3D camera (degrees)
    pub fov_degrees: f64,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            padding_factor: 1.4,
            additive_padding: 60.0,
            reframe_threshold: 0.2,
            fov_degrees: 40.0,
        }
    }
}

/// Geometry generation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometrySettings {
    /// Segments per quarter circle (corner arcs, cylinder walls)
    pub curve_segments: u32,
    /// Thickness of internal divider walls
    pub divider_thickness: f64,
    /// Corner radius of compartment corners formed by two dividers
    pub divider_fillet: f64,
    /// Minimum gap between a divider and the cavity wall
    pub divider_edge_margin: f64,
    /// Pick distance for divider hit testing in the top view
    pub hit_margin: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            curve_segments: 24,
            divider_thickness: 2.0,
            divider_fillet: 4.0,
            divider_edge_margin: 2.0,
            hit_margin: 10.0,
        }
    }
}

/// All configurator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Dimensions the session starts with (and returns to on reset)
    #[serde(default)]
    pub defaults: DimensionSnapshot,
    /// Camera framing
    #[serde(default)]
    pub framing: FramingSettings,
    /// Geometry generation
    #[serde(default)]
    pub geometry: GeometrySettings,
}

impl AppSettings {
    /// Load settings from the user config dir, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "boxconf", "box-configurator") {
            let config_path = dirs.config_dir().join("settings.json");
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring settings file: {e}"),
                }
            }
        }
        Self::default()
    }

    /// Load and check settings from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let settings: AppSettings = serde_json::from_str(&json)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the user config dir, returning the written path
    pub fn save(&self) -> Result<PathBuf, String> {
        let dirs = directories::ProjectDirs::from("com", "boxconf", "box-configurator")
            .ok_or("No user config directory available")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)
            .map_err(|e| format!("Failed to create {}: {e}", config_dir.display()))?;
        let config_path = config_dir.join("settings.json");
        let json = serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize settings: {e}"))?;
        std::fs::write(&config_path, json)
            .map_err(|e| format!("Failed to write {}: {e}", config_path.display()))?;
        Ok(config_path)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<(), String> {
        self.defaults
            .validate()
            .map_err(|e| format!("Default dimensions: {e}"))?;

        let f = &self.framing;
        if !(f.padding_factor >= 1.0) {
            return Err(format!("padding_factor must be >= 1, got {}", f.padding_factor));
        }
        if !(f.additive_padding >= 0.0) {
            return Err(format!("additive_padding must be >= 0, got {}", f.additive_padding));
        }
        if !(f.reframe_threshold >= 0.0) {
            return Err(format!("reframe_threshold must be >= 0, got {}", f.reframe_threshold));
        }
        if !(f.fov_degrees > 0.0 && f.fov_degrees < 180.0) {
            return Err(format!("fov_degrees must be in (0, 180), got {}", f.fov_degrees));
        }

        let g = &self.geometry;
        if g.curve_segments == 0 {
            return Err("curve_segments must be at least 1".to_string());
        }
        if !(g.divider_thickness > 0.0) {
            return Err(format!("divider_thickness must be > 0, got {}", g.divider_thickness));
        }
        Ok(())
    }
}
