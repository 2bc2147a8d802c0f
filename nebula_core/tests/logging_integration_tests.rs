//! Integration tests for Engine logging system
//!
//! These tests verify logging through the public API: custom loggers,
//! severity filtering, and entries produced by engine subsystems.
//!
//! Run with: cargo test --test logging_integration_tests

use nebula_core::nebula::{Engine, EngineConfig};
use nebula_core::nebula::log::{Logger, LogEntry, LogSeverity};
use nebula_core::nebula::resource::{ResourceManager, ResourceType};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    Engine::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Engine::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Engine::log_detailed(LogSeverity::Error, "test::module", "Test error message".to_string(), "main.rs", 42);

    {
        let entries = entries.lock().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].severity, LogSeverity::Info);
        assert_eq!(entries[0].source, "test::module");
        assert_eq!(entries[1].message, "Test warning message");
        assert_eq!(entries[2].file, Some("main.rs"));
        assert_eq!(entries[2].line, Some(42));
        assert!(entries[0].file.is_none());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_logging_before_initialize() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    // The logger is independent of the engine state
    Engine::log(LogSeverity::Debug, "test::early", "Early message".to_string());
    assert_eq!(entries.lock().unwrap().len(), 1);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_severity_filter_from_config() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let config = EngineConfig::from_toml_str("[log]\nmin_severity = \"error\"\n").unwrap();
    Engine::initialize_with(config).unwrap();

    Engine::log(LogSeverity::Warn, "test::filter", "Filtered".to_string());
    Engine::log(LogSeverity::Error, "test::filter", "Passed".to_string());

    {
        let entries = entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Passed");
    }

    Engine::shutdown();
    Engine::reset_logger();
    assert_eq!(Engine::min_severity(), LogSeverity::Trace);
}

#[test]
#[serial]
fn test_integration_subsystem_warnings() {
    let (test_logger, entries) = TestLogger::new();
    Engine::set_logger(test_logger);

    let manager: ResourceManager<u32> = ResourceManager::new("Textures");
    manager.create("Tex1", ResourceType::Texture, 1).unwrap();
    assert!(manager.create("Tex1", ResourceType::Texture, 2).is_err());

    {
        let entries = entries.lock().unwrap();
        let warning = entries
            .iter()
            .find(|e| e.severity == LogSeverity::Warn && e.source == "nebula::ResourceManager")
            .expect("duplicate resource name should be logged");
        assert!(warning.message.contains("Tex1"));
    }

    Engine::reset_logger();
}
