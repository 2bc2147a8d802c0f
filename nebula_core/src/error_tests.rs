//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("Engine not initialized".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("Engine not initialized"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Texture not found".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("Texture not found"));
}

#[test]
fn test_name_conflict_display() {
    let err = Error::NameConflict("Class 'Demo::Base' already registered".to_string());
    assert_eq!(
        format!("{}", err),
        "Name conflict: Class 'Demo::Base' already registered"
    );
}

#[test]
fn test_plugin_error_display() {
    let err = Error::PluginError("unknown format version 2".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Plugin error"));
    assert!(display.contains("version 2"));
}

#[test]
fn test_config_error_display() {
    let err = Error::ConfigError("expected a table".to_string());
    assert_eq!(format!("{}", err), "Configuration error: expected a table");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::PluginError("x".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::NameConflict("a".to_string()));
    assert!(debug.contains("NameConflict"));

    let debug = format!("{:?}", Error::ConfigError("b".to_string()));
    assert!(debug.contains("ConfigError"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("res".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::InitializationFailed("inner".to_string()))
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    let result = outer();
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{}", e).contains("inner"));
    }
}
