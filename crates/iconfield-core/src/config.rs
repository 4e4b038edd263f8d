//! Container configuration, stored as JSON.

use crate::error::{ConfigError, ConfigResult};
use crate::icon::{IconMetrics, LabelPosition};
use crate::layout::LayoutMode;
use crate::dnd::session::DEFAULT_DRAG_THRESHOLD;
use crate::viewport::{Margins, ZoomLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "iconfield.json";

/// Settings a container starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub layout_mode: LayoutMode,
    pub label_position: LabelPosition,
    pub auto_layout: bool,
    pub keep_aligned: bool,
    pub tighter_layout: bool,
    pub is_desktop: bool,
    pub zoom_level: ZoomLevel,
    /// Pointer travel in pixels before a press becomes a drag.
    pub drag_threshold: f64,
    pub margins: Margins,
    /// Metrics given to icons the host has not measured.
    pub default_metrics: IconMetrics,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            label_position: LabelPosition::default(),
            auto_layout: true,
            keep_aligned: false,
            tighter_layout: false,
            is_desktop: false,
            zoom_level: ZoomLevel::default(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            margins: Margins::default(),
            default_metrics: IconMetrics::default(),
        }
    }
}

impl ContainerConfig {
    /// Settings for a desktop: top-to-bottom columns, manual positions kept.
    pub fn desktop() -> Self {
        Self {
            layout_mode: LayoutMode::TopBottomLeftRight,
            is_desktop: true,
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json).map_err(|e| {
            ConfigError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Write the configuration, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let json = self
            .to_json()
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Load from a path if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Default configuration path.
///
/// On Unix: `~/.config/iconfield/iconfield.json`
#[cfg(not(target_arch = "wasm32"))]
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("iconfield").join(CONFIG_FILE_NAME))
}

#[cfg(target_arch = "wasm32")]
pub fn default_config_path() -> ConfigResult<PathBuf> {
    Err(ConfigError::NoConfigDir)
}
