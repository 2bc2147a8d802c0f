/// Resource entry types.
///
/// A `Resource<T>` is the manager-owned record around a payload `T`
/// (texture data, sound buffer, database connection, ...). Besides the
/// payload it carries its name, a type tag, and the ordered list of
/// handlers currently attached to it.

use slotmap::new_key_type;

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for a Resource within a ResourceManager.
    ///
    /// Keys are generation-checked: once the resource is destroyed the key
    /// never resolves again, even if its slot is reused.
    pub struct ResourceKey;
}

new_key_type! {
    /// Identity of a ResourceHandler within its manager's handler table.
    pub struct HandlerKey;
}

// ===== RESOURCE TYPE =====

/// Concrete resource category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Texture,
    Material,
    Mesh,
    Shader,
    SoundBuffer,
    Font,
    Database,
    Generic,
}

// ===== RESOURCE =====

/// A named, manager-owned resource with its attached handlers.
pub struct Resource<T> {
    key: ResourceKey,
    name: String,
    resource_type: ResourceType,
    handlers: Vec<HandlerKey>,
    data: T,
}

impl<T> Resource<T> {
    pub(crate) fn new(key: ResourceKey, name: String, resource_type: ResourceType, data: T) -> Self {
        Self {
            key,
            name,
            resource_type,
            handlers: Vec::new(),
            data,
        }
    }

    /// Key of this resource in its manager (stale once destroyed)
    pub fn key(&self) -> ResourceKey {
        self.key
    }

    /// Resource name (unique within the owning manager)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource category
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Number of handlers currently attached
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Attached handlers, in attach order
    pub fn handlers(&self) -> &[HandlerKey] {
        &self.handlers
    }

    /// Whether the given handler is attached to this resource
    pub fn has_handler(&self, handler: HandlerKey) -> bool {
        self.handlers.contains(&handler)
    }

    /// The payload
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The payload (mutable)
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn add_handler(&mut self, handler: HandlerKey) {
        if !self.handlers.contains(&handler) {
            self.handlers.push(handler);
        }
    }

    pub(crate) fn remove_handler(&mut self, handler: HandlerKey) {
        if let Some(index) = self.handlers.iter().position(|&h| h == handler) {
            self.handlers.remove(index);
        }
    }
}
