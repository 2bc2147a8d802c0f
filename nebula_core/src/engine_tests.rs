//! Unit tests for Engine singleton manager
//!
//! Tests initialization, ClassManager lifecycle, configuration and logging APIs.
//!
//! IMPORTANT: ENGINE_STATE is a global OnceLock shared across all tests.
//! All tests are marked with #[serial] to run sequentially.

use crate::nebula::{Engine, EngineConfig, Error};
use crate::nebula::log::{Logger, LogEntry, LogSeverity};
use crate::nebula::rtti::{Class, ClassManager, ModuleId, ModuleInfo, ModuleRegistrar, CORE_MODULE_ID, FIRST_MODULE_ID};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

const TEST_SOURCE: &str = "test::engine";

/// Test logger that captures entries logged from this test file
struct TestLogger {
    entries: Arc<Mutex<Vec<String>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        // Other tests log concurrently
        if entry.source == TEST_SOURCE {
            let mut entries = self.entries.lock().unwrap();
            entries.push(format!("{:?}: {}", entry.severity, entry.message));
        }
    }
}

struct TestModule {
    name: &'static str,
    fail: bool,
}

impl ModuleRegistrar for TestModule {
    fn module_info(&self) -> ModuleInfo {
        ModuleInfo::new(self.name)
    }

    fn register(&self, manager: &mut ClassManager, module: ModuleId) -> crate::nebula::Result<()> {
        if self.fail {
            return Err(Error::InitializationFailed("broken module".to_string()));
        }
        manager.register_class(
            module,
            Class::builder(self.name, "Thing").base("Nebula::Object").build(),
        )
    }
}

/// Setup function to reset engine state before each test
fn setup() {
    Engine::reset_for_testing();
    let _ = Engine::initialize(); // Always initialize (idempotent)
}

// ============================================================================
// INITIALIZATION AND SHUTDOWN TESTS
// ============================================================================

#[test]
#[serial]
fn test_engine_initialize() {
    setup();
    assert!(Engine::initialize().is_ok());
    assert_eq!(Engine::config().unwrap(), EngineConfig::default());
}

#[test]
#[serial]
fn test_engine_initialize_with_config() {
    setup();
    let config = EngineConfig::from_toml_str("[log]\nmin_severity = \"warn\"\n").unwrap();

    Engine::initialize_with(config.clone()).unwrap();
    assert_eq!(Engine::config().unwrap(), config);
    assert_eq!(Engine::min_severity(), LogSeverity::Warn);

    Engine::reset_for_testing();
}

#[test]
#[serial]
fn test_engine_shutdown_clears_state() {
    setup();
    Engine::create_class_manager(&[], Vec::new()).unwrap();
    assert!(Engine::class_manager().is_ok());

    Engine::shutdown();
    assert!(Engine::class_manager().is_err());
}

// ============================================================================
// CLASS MANAGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_class_manager_not_created() {
    setup();
    let result = Engine::class_manager();
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
#[serial]
fn test_create_class_manager_core_module() {
    setup();
    Engine::create_class_manager(&[], Vec::new()).unwrap();

    let manager = Engine::class_manager().unwrap();
    let manager = manager.read().unwrap();
    let object = manager.class("Nebula::Object").unwrap();
    assert_eq!(object.module(), CORE_MODULE_ID);
    assert!(!object.has_constructor());
    assert_eq!(manager.module(CORE_MODULE_ID).unwrap().name(), "Nebula");
}

#[test]
#[serial]
fn test_create_class_manager_static_order() {
    setup();
    let first = TestModule { name: "First", fail: false };
    let second = TestModule { name: "Second", fail: false };
    Engine::create_class_manager(&[&first, &second], Vec::new()).unwrap();

    let manager = Engine::class_manager().unwrap();
    let manager = manager.read().unwrap();
    assert_eq!(manager.module_by_name("First").unwrap().id(), FIRST_MODULE_ID);
    assert_eq!(manager.module_by_name("Second").unwrap().id(), FIRST_MODULE_ID + 1);
    assert!(manager.class("Second::Thing").unwrap().is_derived_from("Nebula::Object"));
}

#[test]
#[serial]
fn test_create_class_manager_twice() {
    setup();
    Engine::create_class_manager(&[], Vec::new()).unwrap();
    let result = Engine::create_class_manager(&[], Vec::new());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));

    Engine::destroy_class_manager().unwrap();
    assert!(Engine::create_class_manager(&[], Vec::new()).is_ok());
}

#[test]
#[serial]
fn test_create_class_manager_failing_module() {
    setup();
    let broken = TestModule { name: "Broken", fail: true };
    let result = Engine::create_class_manager(&[&broken], Vec::new());

    assert!(matches!(result, Err(Error::PluginError(_))));
    assert!(Engine::class_manager().is_err());
}

#[test]
#[serial]
fn test_create_class_manager_scans_plugins() {
    setup();
    let dir = std::env::temp_dir().join(format!("nebula_engine_plugins_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("extra.plugin"), "[plugin]\nversion = 1\nmodule = \"Extra\"\n").unwrap();

    let mut config = EngineConfig::default();
    config.plugins.paths = vec![dir.clone(), dir.join("missing")];
    Engine::initialize_with(config).unwrap();

    let entries: Vec<Arc<dyn ModuleRegistrar>> = vec![
        Arc::new(TestModule { name: "Extra", fail: false }),
        Arc::new(TestModule { name: "Unused", fail: false }),
    ];
    Engine::create_class_manager(&[], entries).unwrap();

    let manager = Engine::class_manager().unwrap();
    {
        let manager = manager.read().unwrap();
        assert!(manager.module_by_name("Extra").unwrap().is_plugin());
        assert!(manager.class("Extra::Thing").is_some());
        assert!(manager.class("Unused::Thing").is_none());
        assert!(manager.has_plugin_entry("Unused"));
    }

    Engine::shutdown();
    // Plugins are unloaded on shutdown, even while a reference is held
    assert!(manager.read().unwrap().class("Extra::Thing").is_none());

    let _ = std::fs::remove_dir_all(&dir);
    Engine::reset_for_testing();
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_custom_logger() {
    setup();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    Engine::log(LogSeverity::Info, TEST_SOURCE, "hello".to_string());
    Engine::log_detailed(LogSeverity::Error, TEST_SOURCE, "boom".to_string(), file!(), line!());

    assert_eq!(*entries.lock().unwrap(), vec!["Info: hello", "Error: boom"]);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_min_severity_filter() {
    setup();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::set_min_severity(LogSeverity::Warn);

    Engine::log(LogSeverity::Debug, TEST_SOURCE, "dropped".to_string());
    Engine::log(LogSeverity::Info, TEST_SOURCE, "dropped".to_string());
    Engine::log(LogSeverity::Warn, TEST_SOURCE, "kept".to_string());
    Engine::log(LogSeverity::Error, TEST_SOURCE, "kept".to_string());
    assert_eq!(entries.lock().unwrap().len(), 2);

    Engine::reset_logger();
    assert_eq!(Engine::min_severity(), LogSeverity::Trace);
}

#[test]
#[serial]
fn test_reset_logger_detaches_custom_logger() {
    setup();
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::reset_logger();

    Engine::log(LogSeverity::Info, TEST_SOURCE, "to console".to_string());
    assert!(entries.lock().unwrap().is_empty());
}
