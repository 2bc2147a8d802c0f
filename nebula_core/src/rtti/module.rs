/// Modules and plugin manifests.
///
/// A module is a group of classes registered together. Modules are either
/// installed statically at startup or activated as plugins through a
/// manifest file naming one of the registered plugin entry points.

use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::{Error, Result};
use super::class_manager::ClassManager;

/// Module identifier
pub type ModuleId = u32;

/// Id of the core module, registered before any other
pub const CORE_MODULE_ID: ModuleId = 1;

/// Descriptive module information
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub vendor: String,
    pub license: String,
    pub description: String,
}

impl ModuleInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn vendor(mut self, vendor: &str) -> Self {
        self.vendor = vendor.to_string();
        self
    }

    pub fn license(mut self, license: &str) -> Self {
        self.license = license.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// A registered module
#[derive(Debug, Clone)]
pub struct Module {
    pub(crate) id: ModuleId,
    pub(crate) info: ModuleInfo,
    pub(crate) is_plugin: bool,
    pub(crate) manifest: Option<PathBuf>,
    pub(crate) classes: Vec<String>,
}

impl Module {
    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Whether the module was loaded through a plugin manifest
    pub fn is_plugin(&self) -> bool {
        self.is_plugin
    }

    /// Manifest file the plugin was loaded from
    pub fn manifest(&self) -> Option<&Path> {
        self.manifest.as_deref()
    }

    /// Qualified names of the classes registered by this module
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Registration entry point of a module.
///
/// `register` is called once with the id the manager assigned to the
/// module and registers the module's classes.
pub trait ModuleRegistrar: Send + Sync {
    fn module_info(&self) -> ModuleInfo;

    fn register(&self, manager: &mut ClassManager, module: ModuleId) -> Result<()>;
}

// ===== PLUGIN MANIFEST =====

/// Highest manifest format version understood
pub const PLUGIN_MANIFEST_VERSION: i64 = 1;

/// Contents of a `*.plugin` manifest
///
/// ```toml
/// [plugin]
/// version = 1
/// active = true
/// module = "NebulaScene"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginManifest {
    pub version: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub module: String,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
struct PluginManifestFile {
    plugin: PluginManifest,
}

impl PluginManifest {
    /// Parse manifest text.
    ///
    /// # Errors
    ///
    /// `PluginError` if the text is not a valid manifest, if the version is
    /// negative or newer than `PLUGIN_MANIFEST_VERSION`.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: PluginManifestFile = toml::from_str(text)
            .map_err(|e| Error::PluginError(format!("Invalid plugin manifest: {}", e)))?;
        let manifest = file.plugin;

        if manifest.version < 0 {
            return Err(Error::PluginError(format!(
                "Invalid plugin manifest version {}", manifest.version
            )));
        }
        if manifest.version > PLUGIN_MANIFEST_VERSION {
            return Err(Error::PluginError(format!(
                "Unknown plugin manifest version {} (newest known is {})",
                manifest.version, PLUGIN_MANIFEST_VERSION
            )));
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::PluginError(format!("Cannot read plugin manifest '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Version 0 manifests are still loaded but deprecated
    pub fn is_deprecated(&self) -> bool {
        self.version == 0
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
