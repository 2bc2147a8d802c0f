/// Nebula Engine - Singleton manager for engine subsystems
///
/// This module provides global singleton management for the class manager,
/// the engine configuration and the logger. It uses thread-safe static
/// storage with RwLock for safe concurrent access.
///
/// Logging works at any time, including before `initialize()`.

use std::path::Path;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::rtti::{Class, ClassManager, ModuleId, ModuleInfo, ModuleRegistrar, CORE_MODULE_ID};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are discarded
static MIN_SEVERITY: RwLock<LogSeverity> = RwLock::new(LogSeverity::Trace);

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Active configuration
    config: RwLock<EngineConfig>,
    /// Class manager singleton
    class_manager: RwLock<Option<Arc<RwLock<ClassManager>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            config: RwLock::new(EngineConfig::default()),
            class_manager: RwLock::new(None),
        }
    }
}

/// Core module: the root class every reflected class derives from
struct CoreModule;

impl ModuleRegistrar for CoreModule {
    fn module_info(&self) -> ModuleInfo {
        ModuleInfo::new("Nebula")
            .vendor("Nebula")
            .description("Core classes")
    }

    fn register(&self, manager: &mut ClassManager, module: ModuleId) -> Result<()> {
        manager.register_class(
            module,
            Class::builder("Nebula", "Object")
                .description("Root of the reflected class hierarchy")
                .build(),
        )
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// Manages the lifecycle of the class manager and the logging setup.
///
/// # Example
///
/// ```no_run
/// use nebula_core::nebula::Engine;
///
/// Engine::initialize()?;
/// Engine::create_class_manager(&[], Vec::new())?;
///
/// let manager = Engine::class_manager()?;
/// assert!(manager.read().unwrap().class("Nebula::Object").is_some());
///
/// Engine::shutdown();
/// # Ok::<(), nebula_core::nebula::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("nebula::Engine", "Initialization failed: {}", msg);
            }
            _ => {
                crate::engine_error!("nebula::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(Error::InitializationFailed(
                "Engine not initialized. Call Engine::initialize() first.".to_string(),
            ))
        })
    }

    /// Initialize the engine with the default configuration
    ///
    /// Idempotent: calling it again keeps the current configuration.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Initialize the engine with a configuration
    ///
    /// If the engine is already initialized, the configuration replaces the
    /// current one. The log filter is set from `config.log.min_severity`.
    pub fn initialize_with(config: EngineConfig) -> Result<()> {
        let state = ENGINE_STATE.get_or_init(EngineState::new);
        Self::set_min_severity(config.log.min_severity);

        let mut lock = state.config.write().map_err(|_| {
            Self::log_and_return_error(Error::InitializationFailed("Config lock poisoned".to_string()))
        })?;
        *lock = config;
        Ok(())
    }

    /// Initialize the engine from a configuration file
    pub fn initialize_from_file(path: &Path) -> Result<()> {
        let config = EngineConfig::from_file(path).map_err(Self::log_and_return_error)?;
        Self::initialize_with(config)
    }

    /// Shutdown the engine and destroy all singletons
    ///
    /// Plugins are unloaded before the class manager is released.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut lock) = state.class_manager.write() {
                if let Some(manager) = lock.take() {
                    if let Ok(mut manager) = manager.write() {
                        manager.unload_all_plugins();
                    }
                }
            }
            if let Ok(mut config) = state.config.write() {
                *config = EngineConfig::default();
            }
        }
    }

    /// Copy of the active configuration
    pub fn config() -> Result<EngineConfig> {
        let state = Self::state()?;
        let lock = state.config.read().map_err(|_| {
            Self::log_and_return_error(Error::InitializationFailed("Config lock poisoned".to_string()))
        })?;
        Ok(lock.clone())
    }

    // ===== CLASS MANAGER API =====

    /// Create and register the class manager singleton
    ///
    /// Registration order is fixed: the core module (id `CORE_MODULE_ID`,
    /// class `Nebula::Object`), then `modules` in the given order, then the
    /// manifests found in the configured plugin paths, which may activate
    /// any of `plugin_entries`. A plugin directory that cannot be scanned
    /// is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A class manager already exists
    /// - A static module fails to register (no class manager is created)
    pub fn create_class_manager(
        modules: &[&dyn ModuleRegistrar],
        plugin_entries: Vec<Arc<dyn ModuleRegistrar>>,
    ) -> Result<()> {
        let state = Self::state()?;
        let config = Self::config()?;

        let mut lock = state.class_manager.write().map_err(|_| {
            Self::log_and_return_error(Error::InitializationFailed("ClassManager lock poisoned".to_string()))
        })?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(Error::InitializationFailed(
                "ClassManager already exists. Call Engine::destroy_class_manager() first.".to_string(),
            )));
        }

        let mut manager = ClassManager::new();
        manager.install_as(&CoreModule, CORE_MODULE_ID, false, None)?;
        for module in modules {
            manager.install(*module)?;
        }
        for entry in plugin_entries {
            manager.add_plugin_entry(entry);
        }
        for path in &config.plugins.paths {
            // Failures are already logged
            let _ = manager.scan_plugins(path, config.plugins.recursive);
        }

        crate::engine_info!("nebula::Engine",
            "ClassManager singleton created ({} modules, {} classes)",
            manager.modules().len(), manager.class_count());

        *lock = Some(Arc::new(RwLock::new(manager)));
        Ok(())
    }

    /// Get the class manager singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - The class manager has not been created
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_core::nebula::Engine;
    ///
    /// let manager = Engine::class_manager()?;
    /// let manager_guard = manager.read().unwrap();
    /// // Use manager_guard...
    /// # Ok::<(), nebula_core::nebula::Error>(())
    /// ```
    pub fn class_manager() -> Result<Arc<RwLock<ClassManager>>> {
        let state = Self::state()?;

        let lock = state.class_manager.read().map_err(|_| {
            Self::log_and_return_error(Error::InitializationFailed("ClassManager lock poisoned".to_string()))
        })?;

        lock.clone().ok_or_else(|| {
            Self::log_and_return_error(Error::InitializationFailed(
                "ClassManager not created. Call Engine::create_class_manager() first.".to_string(),
            ))
        })
    }

    /// Destroy the class manager singleton
    ///
    /// Existing references remain valid until dropped.
    pub fn destroy_class_manager() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.class_manager.write().map_err(|_| {
            Self::log_and_return_error(Error::InitializationFailed("ClassManager lock poisoned".to_string()))
        })?;

        *lock = None;

        crate::engine_info!("nebula::Engine", "ClassManager singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut lock) = state.class_manager.write() {
                *lock = None;
            }
            if let Ok(mut config) = state.config.write() {
                *config = EngineConfig::default();
            }
        }
        Self::reset_logger();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nebula_core::nebula::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger) and clear the severity filter
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
        Self::set_min_severity(LogSeverity::Trace);
    }

    /// Discard entries below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = MIN_SEVERITY.write() {
            *lock = severity;
        }
    }

    pub fn min_severity() -> LogSeverity {
        MIN_SEVERITY.read().map(|lock| *lock).unwrap_or_default()
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
