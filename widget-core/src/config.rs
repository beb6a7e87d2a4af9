use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::Arc};

use crate::{
    icon::WmoIconLookup,
    render::{ItemViewRenderer, RowLabels},
    store::{CACHE_KEY, FileStore},
};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Directory holding the preferences file; platform data dir when unset.
    pub store_dir: Option<PathBuf>,

    /// Key the location list is cached under.
    pub cache_key: String,

    /// Example TOML:
    /// [labels]
    /// unknown_location = "Desconocido"
    /// error_loading = "Error al cargar"
    pub labels: RowLabels,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            cache_key: CACHE_KEY.to_string(),
            labels: RowLabels::default(),
        }
    }
}

impl WidgetConfig {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Open the file store this config points at.
    pub fn open_store(&self) -> Result<FileStore> {
        match &self.store_dir {
            Some(dir) => Ok(FileStore::in_dir(dir)),
            None => FileStore::default_location(),
        }
    }

    pub fn renderer(&self) -> ItemViewRenderer {
        ItemViewRenderer::new(Arc::new(WmoIconLookup), self.labels.clone())
    }
}
