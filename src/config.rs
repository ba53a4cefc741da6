//! Runtime configuration
//!
//! A small RON file controlling where data is read from and how items
//! are rolled. Every field has a default, so an empty file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, ForgeResult};
use crate::generation::SelectionMode;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "RELICFORGE_CONFIG";

const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Directory with `materials.json` and `categories/`; built-in data when unset
    pub data_dir: Option<PathBuf>,
    /// Draw affixes by their `weight` instead of uniformly
    pub honor_affix_weights: bool,
    pub art: ArtConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    /// Generate sprites; when off every item gets the placeholder image
    pub enabled: bool,
    /// Sprite edge length in pixels
    pub sprite_size: u32,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            honor_affix_weights: false,
            art: ArtConfig::default(),
        }
    }
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sprite_size: 16,
        }
    }
}

impl ForgeConfig {
    /// Resolve the config: explicit path, then `RELICFORGE_CONFIG`, then the
    /// platform config dir, then defaults
    pub fn load(explicit: Option<&Path>) -> ForgeResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            if path.exists() {
                return Self::from_file(&path);
            }
            log::warn!("{} points to {:?}, which does not exist", CONFIG_ENV_VAR, path);
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("{}, using defaults", e),
                }
            } else {
                log::debug!("No config at {:?}, using defaults", path);
            }
        }

        Ok(Self::default())
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> ForgeResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
        let config = ron::from_str(&content).map_err(|source| ForgeError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    /// Platform config location (`~/.config/relicforge/config.ron` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "relicforge", "relicforge")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn to_ron(&self) -> ForgeResult<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Write the config, creating parent directories
    pub fn save(&self, path: &Path) -> ForgeResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
        }
        fs::write(path, self.to_ron()?).map_err(|e| ForgeError::io(path, e))?;
        log::info!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn selection_mode(&self) -> SelectionMode {
        if self.honor_affix_weights {
            SelectionMode::Weighted
        } else {
            SelectionMode::Uniform
        }
    }
}
