//! Resource management module
//!
//! Resources are owned by a `ResourceManager` and softly referenced by any
//! number of `ResourceHandler`s. Destroying a resource notifies and clears
//! every attached handler before the payload is released.

mod resource;
mod resource_manager;
mod resource_handler;

pub use resource::{Resource, ResourceKey, HandlerKey, ResourceType};
pub use resource_manager::ResourceManager;
pub use resource_handler::ResourceHandler;
