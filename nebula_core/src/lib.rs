/*!
# Nebula Core

Core services of the Nebula engine.

## Architecture

- **Resources**: `ResourceManager` owns named resources; `ResourceHandler`s
  reference them softly and are notified and cleared when a resource is
  destroyed
- **RefCount / SyncRefCount**: explicit reference counters, non-atomic and atomic
- **RTTI**: reflected classes with typed attributes, methods and
  constructors, registered per module in the `ClassManager`
- **Dynamic dispatch**: `DynFunc` / `DynEvent` calls through signature-checked
  `DynParams`
- **Engine**: singleton holding the class manager, the configuration and the logger

Plugins are statically linked modules activated through `*.plugin` manifest files.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod utils;
pub mod resource;
pub mod rtti;

// Main nebula namespace module
pub mod nebula {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{EngineConfig, LogConfig, PluginConfig};

    // Logging sub-module (types only; the engine_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Reflection and dynamic dispatch sub-module
    pub mod rtti {
        pub use crate::rtti::*;
    }

    // Utilities sub-module
    pub mod utils {
        pub use crate::utils::*;
    }
}

// Re-export math library at crate root
pub use glam;
