/// ClassManager - registry of classes and modules.
///
/// Classes are looked up by exact qualified name. Registration happens in an
/// explicit startup phase: the core module first, then statically installed
/// modules in order, then plugins activated through manifests. After that
/// the registry is read-mostly; only plugin unloading removes classes.
///
/// Four events report registry changes, each with signature `void(string)`:
/// `class_loaded` / `class_unloaded` carry the qualified class name,
/// `module_loaded` / `module_unloaded` carry the module name. Handlers run
/// while the manager is being modified and must not access it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use super::class::{Class, ClassRef};
use super::event::DynEvent;
use super::module::{Module, ModuleId, ModuleInfo, ModuleRegistrar, PluginManifest};
use super::params::DynParams;
use super::signature::Signature;
use super::var::{Var, VarType};

/// First id handed out by `unique_module_id`
pub const FIRST_MODULE_ID: ModuleId = 10000;

/// File extension of plugin manifests
pub const PLUGIN_EXTENSION: &str = "plugin";

bitflags! {
    /// Options of `ClassManager::find_classes`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassFilter: u32 {
        /// Include indirectly derived classes, not only direct children
        const RECURSIVE = 1 << 0;
        /// Include the base class itself
        const INCLUDE_BASE = 1 << 1;
        /// Include classes without any constructor
        const INCLUDE_ABSTRACT = 1 << 2;
    }
}

impl Default for ClassFilter {
    fn default() -> Self {
        ClassFilter::RECURSIVE | ClassFilter::INCLUDE_BASE | ClassFilter::INCLUDE_ABSTRACT
    }
}

pub struct ClassManager {
    classes: FxHashMap<String, Class>,
    order: Vec<String>,
    modules: BTreeMap<ModuleId, Module>,
    next_module_id: ModuleId,
    plugin_entries: FxHashMap<String, Arc<dyn ModuleRegistrar>>,
    loaded_manifests: FxHashMap<PathBuf, ModuleId>,

    /// Emitted after a class was registered
    pub class_loaded: DynEvent,
    /// Emitted after a class was unregistered
    pub class_unloaded: DynEvent,
    /// Emitted after a module was registered
    pub module_loaded: DynEvent,
    /// Emitted after a module and its classes were unregistered
    pub module_unloaded: DynEvent,
}

impl ClassManager {
    pub fn new() -> Self {
        Self {
            classes: FxHashMap::default(),
            order: Vec::new(),
            modules: BTreeMap::new(),
            next_module_id: FIRST_MODULE_ID,
            plugin_entries: FxHashMap::default(),
            loaded_manifests: FxHashMap::default(),
            class_loaded: DynEvent::new(Self::event_signature()),
            class_unloaded: DynEvent::new(Self::event_signature()),
            module_loaded: DynEvent::new(Self::event_signature()),
            module_unloaded: DynEvent::new(Self::event_signature()),
        }
    }

    /// Signature of the registry events: `void(string)`
    pub fn event_signature() -> Signature {
        Signature::new(VarType::Void, vec![VarType::String])
    }

    fn notify(event: &DynEvent, name: &str) {
        event.emit(&DynParams::from_values(VarType::Void, vec![Var::String(name.to_string())]));
    }

    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::PluginError(msg) => {
                crate::engine_error!("nebula::ClassManager", "Plugin error: {}", msg);
            }
            _ => {
                crate::engine_error!("nebula::ClassManager", "ClassManager error: {}", error);
            }
        }
        error
    }

    // ===== CLASSES =====

    /// Class by exact qualified name
    pub fn class(&self, name: &str) -> Option<ClassRef<'_>> {
        self.classes.get(name).map(|class| ClassRef::new(self, class))
    }

    /// All classes, in registration order
    pub fn classes(&self) -> Vec<ClassRef<'_>> {
        self.order
            .iter()
            .filter_map(|name| self.class(name))
            .collect()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Classes related to `base`, in registration order.
    ///
    /// Without `RECURSIVE` only direct children of `base` qualify. `base`
    /// itself is included with `INCLUDE_BASE`, classes without constructors
    /// only with `INCLUDE_ABSTRACT`. `module` restricts the result to the
    /// classes of one module.
    pub fn find_classes(&self, base: &str, filter: ClassFilter, module: Option<ModuleId>) -> Vec<ClassRef<'_>> {
        self.classes()
            .into_iter()
            .filter(|class| module.map_or(true, |id| class.module() == id))
            .filter(|class| filter.contains(ClassFilter::INCLUDE_ABSTRACT) || class.has_constructor())
            .filter(|class| {
                if class.class_name() == base {
                    filter.contains(ClassFilter::INCLUDE_BASE)
                } else if filter.contains(ClassFilter::RECURSIVE) {
                    class.is_derived_from(base)
                } else {
                    class.base_class_name() == base
                }
            })
            .collect()
    }

    /// Register a class for a module.
    ///
    /// The module is created (with empty information) if it does not exist
    /// yet.
    ///
    /// # Errors
    ///
    /// `NameConflict` if a class with the same qualified name is already
    /// registered; the registered class is kept.
    pub fn register_class(&mut self, module: ModuleId, mut class: Class) -> Result<()> {
        let name = class.class_name().to_string();
        if let Some(existing) = self.classes.get(&name) {
            crate::engine_warn!("nebula::ClassManager",
                "Name conflict for class '{}' (module {} and module {}), keeping the first",
                name, existing.module(), module);
            return Err(Error::NameConflict(format!("Class '{}' is already registered", name)));
        }

        if !self.modules.contains_key(&module) {
            self.insert_module(module, ModuleInfo::default(), false, None);
        }
        if let Some(entry) = self.modules.get_mut(&module) {
            entry.classes.push(name.clone());
        }

        class.set_module(module);
        self.classes.insert(name.clone(), class);
        self.order.push(name.clone());

        crate::engine_trace!("nebula::ClassManager", "Registered class '{}' (module {})", name, module);
        Self::notify(&self.class_loaded, &name);
        Ok(())
    }

    /// Unregister a class. Returns false if it is not registered.
    pub fn unregister_class(&mut self, name: &str) -> bool {
        let Some(class) = self.classes.remove(name) else {
            return false;
        };
        self.order.retain(|n| n != name);
        if let Some(module) = self.modules.get_mut(&class.module()) {
            module.classes.retain(|n| n != name);
        }

        crate::engine_trace!("nebula::ClassManager", "Unregistered class '{}'", name);
        Self::notify(&self.class_unloaded, name);
        true
    }

    // ===== MODULES =====

    /// A module id that has never been handed out
    pub fn unique_module_id(&mut self) -> ModuleId {
        while self.modules.contains_key(&self.next_module_id) {
            self.next_module_id += 1;
        }
        let id = self.next_module_id;
        self.next_module_id += 1;
        id
    }

    /// Register a module, or update the information of an existing one
    pub fn register_module(&mut self, id: ModuleId, info: ModuleInfo) {
        match self.modules.get_mut(&id) {
            Some(module) => module.info = info,
            None => self.insert_module(id, info, false, None),
        }
    }

    fn insert_module(&mut self, id: ModuleId, info: ModuleInfo, is_plugin: bool, manifest: Option<PathBuf>) {
        let name = info.name.clone();
        self.modules.insert(id, Module {
            id,
            info,
            is_plugin,
            manifest,
            classes: Vec::new(),
        });
        crate::engine_debug!("nebula::ClassManager", "Registered module {} '{}'", id, name);
        Self::notify(&self.module_loaded, &name);
    }

    /// Unregister a module: its classes first, then the module itself.
    ///
    /// Returns false if the module is not registered.
    pub fn unregister_module(&mut self, id: ModuleId) -> bool {
        let Some(classes) = self.modules.get(&id).map(|m| m.classes.clone()) else {
            return false;
        };
        for class in classes.iter().rev() {
            self.unregister_class(class);
        }

        let Some(module) = self.modules.remove(&id) else {
            return false;
        };
        self.loaded_manifests.retain(|_, loaded| *loaded != id);

        crate::engine_debug!("nebula::ClassManager", "Unregistered module {} '{}'", id, module.name());
        Self::notify(&self.module_unloaded, module.name());
        true
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    /// Module by name
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.values().find(|m| m.name() == name)
    }

    /// All modules, by id
    pub fn modules(&self) -> Vec<&Module> {
        self.modules.values().collect()
    }

    /// Install a statically linked module: assigns a fresh id, registers the
    /// module and lets the registrar register its classes.
    ///
    /// If the registrar fails, everything it registered is removed again.
    pub fn install(&mut self, registrar: &dyn ModuleRegistrar) -> Result<ModuleId> {
        let id = self.unique_module_id();
        self.install_as(registrar, id, false, None)?;
        Ok(id)
    }

    /// Install a registrar under a fixed id
    pub(crate) fn install_as(
        &mut self,
        registrar: &dyn ModuleRegistrar,
        id: ModuleId,
        is_plugin: bool,
        manifest: Option<PathBuf>,
    ) -> Result<()> {
        let info = registrar.module_info();
        let name = info.name.clone();
        self.insert_module(id, info, is_plugin, manifest);

        if let Err(error) = registrar.register(self, id) {
            self.unregister_module(id);
            return Err(Self::log_and_return_error(Error::PluginError(format!(
                "Module '{}' failed to register: {}", name, error
            ))));
        }

        crate::engine_info!("nebula::ClassManager", "Module '{}' installed with id {}", name, id);
        Ok(())
    }

    // ===== PLUGINS =====

    /// Make a registrar loadable through plugin manifests naming its module
    pub fn add_plugin_entry(&mut self, registrar: Arc<dyn ModuleRegistrar>) {
        let name = registrar.module_info().name;
        crate::engine_trace!("nebula::ClassManager", "Plugin entry point '{}' available", name);
        self.plugin_entries.insert(name, registrar);
    }

    /// Whether a plugin entry point with this module name exists
    pub fn has_plugin_entry(&self, module: &str) -> bool {
        self.plugin_entries.contains_key(module)
    }

    /// Load the plugin described by a manifest file.
    ///
    /// Returns the plugin's module id, or None if the manifest is inactive.
    /// A manifest that is already loaded is not loaded twice; its module id
    /// is returned again.
    ///
    /// # Errors
    ///
    /// `PluginError` if the manifest cannot be read or parsed, has an
    /// unsupported version, or names an unknown module.
    pub fn load_plugin(&mut self, path: &Path) -> Result<Option<ModuleId>> {
        if let Some(&id) = self.loaded_manifests.get(path) {
            crate::engine_debug!("nebula::ClassManager", "Plugin '{}' already loaded", path.display());
            return Ok(Some(id));
        }

        let manifest = PluginManifest::from_file(path).map_err(Self::log_and_return_error)?;

        if manifest.is_deprecated() {
            crate::engine_warn!("nebula::ClassManager",
                "Plugin manifest '{}' uses deprecated format version 0", path.display());
        }
        if !manifest.active {
            crate::engine_info!("nebula::ClassManager",
                "Plugin '{}' is inactive, ignored", path.display());
            return Ok(None);
        }

        let registrar = self.plugin_entries.get(&manifest.module).cloned().ok_or_else(|| {
            Self::log_and_return_error(Error::PluginError(format!(
                "Plugin '{}' names unknown module '{}'", path.display(), manifest.module
            )))
        })?;

        let id = self.unique_module_id();
        self.install_as(registrar.as_ref(), id, true, Some(path.to_path_buf()))?;
        self.loaded_manifests.insert(path.to_path_buf(), id);
        Ok(Some(id))
    }

    /// Load every `*.plugin` manifest in a directory, in file name order.
    ///
    /// A manifest that fails to load is logged and skipped. Returns the ids
    /// of the loaded plugins.
    ///
    /// # Errors
    ///
    /// `PluginError` if the directory cannot be read.
    pub fn scan_plugins(&mut self, dir: &Path, recursive: bool) -> Result<Vec<ModuleId>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            Self::log_and_return_error(Error::PluginError(format!(
                "Cannot scan plugin directory '{}': {}", dir.display(), e
            )))
        })?;
        let mut paths: Vec<PathBuf> = entries.filter_map(|entry| entry.ok().map(|e| e.path())).collect();
        paths.sort();

        let mut loaded = Vec::new();
        for path in paths {
            if path.is_dir() {
                if recursive {
                    loaded.extend(self.scan_plugins(&path, true)?);
                }
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(PLUGIN_EXTENSION) {
                continue;
            }
            // Failures are already logged
            if let Ok(Some(id)) = self.load_plugin(&path) {
                loaded.push(id);
            }
        }
        Ok(loaded)
    }

    /// Unload a plugin module. Returns false if the id is not a loaded plugin.
    pub fn unload_plugin(&mut self, id: ModuleId) -> bool {
        match self.modules.get(&id) {
            Some(module) if module.is_plugin() => self.unregister_module(id),
            _ => false,
        }
    }

    /// Unload every plugin module
    pub fn unload_all_plugins(&mut self) {
        let plugins: Vec<ModuleId> = self
            .modules
            .values()
            .filter(|m| m.is_plugin())
            .map(|m| m.id())
            .collect();
        for id in plugins.into_iter().rev() {
            self.unload_plugin(id);
        }
    }
}

impl Default for ClassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "class_manager_tests.rs"]
mod tests;
