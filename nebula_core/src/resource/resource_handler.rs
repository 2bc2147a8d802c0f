/// ResourceHandler: a weak, self-updating reference to a Resource.
///
/// The handler's state (its target key and its lost callback) is stored in
/// the manager's handler table, which keeps both directions of the
/// handler ↔ resource relation in one place. The handler itself only holds
/// its handler key and a weak reference to the manager's state: once the
/// manager is dropped every handler reports no resource.
///
/// The handler slot is allocated on first attach (or first `on_lost`), so
/// an unattached handler costs nothing in the manager.

use std::rc::{Rc, Weak};
use super::resource::{Resource, ResourceKey, HandlerKey};
use super::resource_manager::{refuse_busy, HandlerSlot, ResourceManager, ResourceStore, Shared};

pub struct ResourceHandler<T> {
    shared: Weak<Shared<T>>,
    key: HandlerKey,
}

impl<T> ResourceHandler<T> {
    /// Create an unattached handler for resources of the given manager
    pub fn new(manager: &ResourceManager<T>) -> Self {
        Self {
            shared: Rc::downgrade(manager.shared()),
            key: HandlerKey::default(),
        }
    }

    /// Create a handler already attached to `resource` (if it is alive)
    pub fn with_resource(manager: &ResourceManager<T>, resource: ResourceKey) -> Self {
        let mut handler = Self::new(manager);
        handler.set_resource(Some(resource));
        handler
    }

    /// Identity of this handler in its resource's handler list
    ///
    /// Null until the handler is first attached or given a callback.
    pub fn id(&self) -> HandlerKey {
        self.key
    }

    /// Slot of this handler in `store`, allocated on demand
    fn slot(&mut self, store: &mut ResourceStore<T>) -> HandlerKey {
        if !store.handlers.contains_key(self.key) {
            self.key = store.handlers.insert(HandlerSlot::empty());
        }
        self.key
    }

    /// Key of the resource this handler points at
    ///
    /// Returns None if unattached, if the resource was destroyed (or is
    /// being destroyed), or if the owning manager is gone.
    pub fn resource(&self) -> Option<ResourceKey> {
        let shared = self.shared.upgrade()?;
        let store = shared.read()?;
        store.resource_of(self.key)
    }

    /// Whether the handler currently points at a live resource
    pub fn is_valid(&self) -> bool {
        self.resource().is_some()
    }

    /// Point this handler at another resource (or at none).
    ///
    /// Re-targeting to the current resource is a no-op. Otherwise the
    /// handler is first removed from its previous resource's list, then
    /// added to the new one. Returns false if `resource` is stale or the
    /// manager is gone (the handler is then left unattached), and also if
    /// called from inside an access closure of the manager (nothing changes).
    pub fn set_resource(&mut self, resource: Option<ResourceKey>) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let Some(mut store) = shared.write() else {
            refuse_busy("nebula::ResourceHandler", "set_resource", shared.namespace());
            return false;
        };

        let current = store.resource_of(self.key);
        if current.is_some() && current == resource {
            return true;
        }

        store.detach(self.key);
        match resource {
            Some(key) => {
                let handler = self.slot(&mut store);
                store.attach(handler, key)
            }
            None => true,
        }
    }

    /// Register the "resource lost" notification.
    ///
    /// Replaces any previously registered callback. The callback receives
    /// the destroyed resource, payload included, once per destroyed resource
    /// this handler was attached to.
    pub fn on_lost(&mut self, callback: impl FnMut(&Resource<T>) + 'static) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let Some(mut store) = shared.write() else {
            refuse_busy("nebula::ResourceHandler", "on_lost", shared.namespace());
            return;
        };
        let handler = self.slot(&mut store);
        if let Some(slot) = store.handlers.get_mut(handler) {
            slot.on_lost = Some(Box::new(callback));
        }
    }

    /// Run `f` on the attached resource.
    ///
    /// Lookups may nest inside `f`; mutations of the manager are refused.
    pub fn with<R>(&self, f: impl FnOnce(&Resource<T>) -> R) -> Option<R> {
        let shared = self.shared.upgrade()?;
        let result = {
            let store = shared.read()?;
            let key = store.resource_of(self.key)?;
            store.resource(key).map(f)
        };
        shared.reap();
        result
    }

    /// Run `f` on the attached resource (mutable)
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Resource<T>) -> R) -> Option<R> {
        let shared = self.shared.upgrade()?;
        let result = {
            let mut store = shared.write()?;
            let key = store.resource_of(self.key)?;
            store.resource_mut(key).map(f)
        };
        shared.reap();
        result
    }
}

impl<T> Clone for ResourceHandler<T> {
    /// The copy is attached to the same resource as the source. Inside an
    /// access closure of the manager it stays unattached.
    fn clone(&self) -> Self {
        let mut handler = Self {
            shared: self.shared.clone(),
            key: HandlerKey::default(),
        };
        if let Some(resource) = self.resource() {
            handler.set_resource(Some(resource));
        }
        handler
    }
}

impl<T> Drop for ResourceHandler<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            // Queued if the store is borrowed, detached once it is released
            shared.release(self.key);
        }
    }
}

#[cfg(test)]
#[path = "resource_handler_tests.rs"]
mod tests;
