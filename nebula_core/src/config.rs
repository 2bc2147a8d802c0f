/// Engine configuration
///
/// Loaded from TOML:
///
/// ```toml
/// [log]
/// min_severity = "info"
///
/// [plugins]
/// paths = ["plugins"]
/// recursive = true
/// ```
///
/// Every section and key is optional.

use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::{Error, Result};
use crate::log::LogSeverity;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub log: LogConfig,
    pub plugins: PluginConfig,
}

/// `[log]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Entries below this severity are discarded
    pub min_severity: LogSeverity,
}

/// `[plugins]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Directories scanned for `*.plugin` manifests, in order
    pub paths: Vec<PathBuf>,
    /// Also scan subdirectories
    pub recursive: bool,
}

impl EngineConfig {
    /// Parse configuration text
    ///
    /// # Errors
    ///
    /// `ConfigError` on malformed TOML or mistyped keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError(format!("Invalid engine configuration: {}", e)))
    }

    /// Read and parse a configuration file.
    ///
    /// Relative plugin paths are resolved against the directory of the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Cannot read engine configuration '{}': {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(dir) = path.parent() {
            for plugin_path in config.plugins.paths.iter_mut() {
                if plugin_path.is_relative() {
                    *plugin_path = dir.join(&plugin_path);
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
