//! Error types for the Nebula core
//!
//! Lookup failures and signature mismatches are reported through `Option`
//! and `bool` sentinels. This enum covers the operations that can fail
//! for a reason the caller must report: registration, resource creation,
//! configuration and plugin loading.

use std::fmt;

/// Result type for Nebula core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nebula core errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Initialization failed (engine, class manager, subsystems)
    InitializationFailed(String),

    /// Invalid resource (unknown key, bad payload, ...)
    InvalidResource(String),

    /// A name is already taken (class, resource, module)
    NameConflict(String),

    /// A plugin manifest could not be loaded or activated
    PluginError(String),

    /// Configuration could not be read or parsed
    ConfigError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::NameConflict(msg) => write!(f, "Name conflict: {}", msg),
            Error::PluginError(msg) => write!(f, "Plugin error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
