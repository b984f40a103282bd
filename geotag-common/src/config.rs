//! Application configuration with TOML file persistence

use crate::photo::SortOrder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// All user-facing settings. Unknown keys in a config file are ignored and
/// missing keys take their defaults, so older files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeotagConfig {
    /// Map tile provider for the browser UI: "osm", "esri" or "google"
    pub map_provider: String,
    /// Altitude lookup used when a manual placement has no altitude:
    /// "none", "open-elevation", "opentopodata" or "google"
    pub elevation_service: String,
    /// strftime template for generated photo names
    pub filename_format: String,
    /// Whether folder scans descend into subfolders
    pub include_subfolders: bool,
    /// Photo sequence order
    pub sort_by: SortOrder,
    /// Thumbnail edge length in pixels (browser UI)
    pub thumbnail_size: u32,
    /// Last scanned folder
    pub folder_path: String,
    /// Write the config file back automatically on changes
    pub auto_save_config: bool,
}

impl Default for GeotagConfig {
    fn default() -> Self {
        Self {
            map_provider: "osm".to_string(),
            elevation_service: "open-elevation".to_string(),
            filename_format: "%Y%m%d_%H%M%S".to_string(),
            include_subfolders: false,
            sort_by: SortOrder::Time,
            thumbnail_size: 150,
            folder_path: String::new(),
            auto_save_config: true,
        }
    }
}

/// Partial settings update, as received from the settings UI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    pub map_provider: Option<String>,
    pub elevation_service: Option<String>,
    pub filename_format: Option<String>,
    pub include_subfolders: Option<bool>,
    pub sort_by: Option<SortOrder>,
    pub thumbnail_size: Option<u32>,
    pub folder_path: Option<String>,
    pub auto_save_config: Option<bool>,
}

impl GeotagConfig {
    /// Apply the set fields of a partial update
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(v) = update.map_provider {
            self.map_provider = v;
        }
        if let Some(v) = update.elevation_service {
            self.elevation_service = v;
        }
        if let Some(v) = update.filename_format {
            self.filename_format = v;
        }
        if let Some(v) = update.include_subfolders {
            self.include_subfolders = v;
        }
        if let Some(v) = update.sort_by {
            self.sort_by = v;
        }
        if let Some(v) = update.thumbnail_size {
            self.thumbnail_size = v;
        }
        if let Some(v) = update.folder_path {
            self.folder_path = v;
        }
        if let Some(v) = update.auto_save_config {
            self.auto_save_config = v;
        }
    }
}

/// Owns the live configuration and its optional backing file
#[derive(Debug)]
pub struct ConfigManager {
    config_file: Option<PathBuf>,
    pub config: GeotagConfig,
}

impl ConfigManager {
    /// Create a manager. With a path, an existing file is loaded over the
    /// defaults immediately; load failures fall back to defaults with a
    /// warning rather than refusing to start.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        let mut manager = Self {
            config_file,
            config: GeotagConfig::default(),
        };
        if manager
            .config_file
            .as_ref()
            .is_some_and(|p| p.exists())
        {
            if let Err(e) = manager.load() {
                warn!("Could not load configuration: {}", e);
                manager.config = GeotagConfig::default();
            }
        }
        manager
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Reload from the backing file. Missing keys take defaults.
    pub fn load(&mut self) -> Result<()> {
        let path = self
            .config_file
            .as_ref()
            .ok_or_else(|| Error::Config("no configuration file set".to_string()))?;
        let text = std::fs::read_to_string(path)?;
        self.config = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid configuration file: {e}")))?;
        info!("Configuration loaded from {}", path.display());
        Ok(())
    }

    /// Write the current configuration to the backing file, creating parent
    /// directories as needed. Returns `Ok(false)` when no file is set.
    pub fn save(&self) -> Result<bool> {
        let Some(path) = self.config_file.as_ref() else {
            return Ok(false);
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("could not serialize configuration: {e}")))?;
        std::fs::write(path, text)?;
        info!("Configuration saved to {}", path.display());
        Ok(true)
    }

    /// Save to a new path and adopt it as the backing file
    pub fn save_as(&mut self, path: PathBuf) -> Result<bool> {
        self.config_file = Some(path);
        self.save()
    }
}

/// Platform default location for the config file
/// (e.g. `~/.config/geotag/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("geotag").join("config.toml"))
}
