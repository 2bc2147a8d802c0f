/// ResourceManager: owner of a namespace of resources.
///
/// Resources live in a SlotMap with generation-checked keys. Handlers are
/// tracked in a second SlotMap inside the same store, so the
/// resource → handler list and the handler → resource back-reference are
/// always updated together.
///
/// The store is never borrowed outside this module: resources are reached
/// through the `with` / `with_mut` closures. A mutation requested from
/// inside such a closure (create, destroy, re-targeting a handler) is
/// refused and logged. A handler dropped inside one is queued and detached
/// as soon as the closure returns.
///
/// The manager is single-threaded: neither the manager nor its handlers
/// are `Send`. Callers that need cross-thread sharing must serialize access
/// themselves.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use crate::error::{Error, Result};
use super::resource::{Resource, ResourceKey, HandlerKey, ResourceType};

/// Callback invoked when a handler's resource is destroyed
pub(crate) type LostCallback<T> = Box<dyn FnMut(&Resource<T>)>;

/// Per-handler state, owned by the store
pub(crate) struct HandlerSlot<T> {
    pub(crate) resource: Option<ResourceKey>,
    pub(crate) on_lost: Option<LostCallback<T>>,
}

impl<T> HandlerSlot<T> {
    pub(crate) fn empty() -> Self {
        Self {
            resource: None,
            on_lost: None,
        }
    }
}

/// Resources and handlers of one manager
pub(crate) struct ResourceStore<T> {
    resources: SlotMap<ResourceKey, Resource<T>>,
    names: FxHashMap<String, ResourceKey>,
    pub(crate) handlers: SlotMap<HandlerKey, HandlerSlot<T>>,
}

impl<T> ResourceStore<T> {
    /// Resource the handler currently points at, if it is still alive
    pub(crate) fn resource_of(&self, handler: HandlerKey) -> Option<ResourceKey> {
        self.handlers
            .get(handler)
            .and_then(|slot| slot.resource)
            .filter(|&key| self.resources.contains_key(key))
    }

    pub(crate) fn resource(&self, key: ResourceKey) -> Option<&Resource<T>> {
        self.resources.get(key)
    }

    pub(crate) fn resource_mut(&mut self, key: ResourceKey) -> Option<&mut Resource<T>> {
        self.resources.get_mut(key)
    }

    /// Attach a handler to a live resource (both directions)
    pub(crate) fn attach(&mut self, handler: HandlerKey, key: ResourceKey) -> bool {
        let Some(resource) = self.resources.get_mut(key) else {
            return false;
        };
        let Some(slot) = self.handlers.get_mut(handler) else {
            return false;
        };
        resource.add_handler(handler);
        slot.resource = Some(key);
        true
    }

    /// Detach a handler from whatever resource it points at (both directions)
    pub(crate) fn detach(&mut self, handler: HandlerKey) {
        let Some(slot) = self.handlers.get_mut(handler) else {
            return;
        };
        if let Some(key) = slot.resource.take() {
            if let Some(resource) = self.resources.get_mut(key) {
                resource.remove_handler(handler);
            }
        }
    }

    /// Detach a handler and free its slot
    fn release(&mut self, handler: HandlerKey) {
        self.detach(handler);
        self.handlers.remove(handler);
    }
}

/// State shared by a manager and its handlers
pub(crate) struct Shared<T> {
    namespace: String,
    store: RefCell<ResourceStore<T>>,
    /// Handlers dropped while the store was borrowed
    orphans: RefCell<Vec<HandlerKey>>,
}

impl<T> Shared<T> {
    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Borrow the store for reading, None while a `with_mut` closure runs
    pub(crate) fn read(&self) -> Option<Ref<'_, ResourceStore<T>>> {
        self.reap();
        self.store.try_borrow().ok()
    }

    /// Borrow the store for writing, None while any access closure runs
    pub(crate) fn write(&self) -> Option<RefMut<'_, ResourceStore<T>>> {
        let mut store = self.store.try_borrow_mut().ok()?;
        self.reap_into(&mut store);
        Some(store)
    }

    /// Free the slots of handlers dropped during an access closure
    pub(crate) fn reap(&self) {
        if let Ok(mut store) = self.store.try_borrow_mut() {
            self.reap_into(&mut store);
        }
    }

    fn reap_into(&self, store: &mut ResourceStore<T>) {
        let orphans = std::mem::take(&mut *self.orphans.borrow_mut());
        for handler in orphans {
            store.release(handler);
        }
    }

    /// Called when a handler is dropped
    pub(crate) fn release(&self, handler: HandlerKey) {
        match self.write() {
            Some(mut store) => store.release(handler),
            None => self.orphans.borrow_mut().push(handler),
        }
    }
}

/// Log a mutation refused because the store is borrowed by an access closure
pub(crate) fn refuse_busy(source: &str, operation: &str, namespace: &str) {
    crate::engine_warn!(source,
        "{} refused: resources of '{}' are borrowed by an access closure", operation, namespace);
}

/// Central owner of a namespace of resources.
///
/// # Example
///
/// ```ignore
/// let textures = ResourceManager::new("textures");
/// let key = textures.create("Tex1", ResourceType::Texture, pixels)?;
///
/// let mut handler = ResourceHandler::new(&textures);
/// handler.set_resource(Some(key));
///
/// textures.destroy(key);
/// assert_eq!(handler.resource(), None);
/// ```
pub struct ResourceManager<T> {
    shared: Rc<Shared<T>>,
}

impl<T> ResourceManager<T> {
    /// Create a new empty resource manager for the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            shared: Rc::new(Shared {
                namespace: namespace.into(),
                store: RefCell::new(ResourceStore {
                    resources: SlotMap::with_key(),
                    names: FxHashMap::default(),
                    handlers: SlotMap::with_key(),
                }),
                orphans: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn shared(&self) -> &Rc<Shared<T>> {
        &self.shared
    }

    /// Namespace in which resource names are unique
    pub fn namespace(&self) -> &str {
        &self.shared.namespace
    }

    fn read(&self, operation: &str) -> Option<Ref<'_, ResourceStore<T>>> {
        let store = self.shared.read();
        if store.is_none() {
            refuse_busy("nebula::ResourceManager", operation, &self.shared.namespace);
        }
        store
    }

    fn write(&self, operation: &str) -> Option<RefMut<'_, ResourceStore<T>>> {
        let store = self.shared.write();
        if store.is_none() {
            refuse_busy("nebula::ResourceManager", operation, &self.shared.namespace);
        }
        store
    }

    // ===== CREATION / LOOKUP =====

    /// Create a resource and take ownership of its payload.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` if the name is empty, or if called from inside an
    ///   access closure of this manager
    /// - `NameConflict` if a resource with the same name already exists
    pub fn create(
        &self,
        name: impl Into<String>,
        resource_type: ResourceType,
        data: T,
    ) -> Result<ResourceKey> {
        let name = name.into();
        let namespace = &self.shared.namespace;

        if name.is_empty() {
            return Err(Error::InvalidResource(format!(
                "Resource name must not be empty (namespace '{}')", namespace
            )));
        }
        let Some(mut store) = self.write("create") else {
            return Err(Error::InvalidResource(format!(
                "Cannot create '{}' while resources of '{}' are borrowed", name, namespace
            )));
        };
        if store.names.contains_key(&name) {
            crate::engine_warn!("nebula::ResourceManager",
                "Resource '{}' already exists in namespace '{}'", name, namespace);
            return Err(Error::NameConflict(format!(
                "Resource '{}' already exists in namespace '{}'", name, namespace
            )));
        }

        let key = store.resources.insert_with_key(|key| {
            Resource::new(key, name.clone(), resource_type, data)
        });
        crate::engine_trace!("nebula::ResourceManager",
            "Created {:?} resource '{}' in '{}'", resource_type, name, namespace);
        store.names.insert(name, key);
        Ok(key)
    }

    /// Run `f` on a resource. Returns None if the key is stale.
    ///
    /// Lookups and `with` calls may nest inside `f`; mutations are refused.
    pub fn with<R>(&self, key: ResourceKey, f: impl FnOnce(&Resource<T>) -> R) -> Option<R> {
        let result = {
            let store = self.read("with")?;
            store.resource(key).map(f)
        };
        self.shared.reap();
        result
    }

    /// Run `f` on a resource (mutable). Returns None if the key is stale.
    ///
    /// The manager cannot be used at all from inside `f`.
    pub fn with_mut<R>(&self, key: ResourceKey, f: impl FnOnce(&mut Resource<T>) -> R) -> Option<R> {
        let result = {
            let mut store = self.write("with_mut")?;
            store.resource_mut(key).map(f)
        };
        self.shared.reap();
        result
    }

    /// Run `f` on a resource found by name
    pub fn with_by_name<R>(&self, name: &str, f: impl FnOnce(&Resource<T>) -> R) -> Option<R> {
        let key = self.key_of(name)?;
        self.with(key, f)
    }

    /// Key of a resource by name
    pub fn key_of(&self, name: &str) -> Option<ResourceKey> {
        self.read("key_of")?.names.get(name).copied()
    }

    /// Whether the key still resolves to a live resource
    pub fn contains(&self, key: ResourceKey) -> bool {
        self.read("contains").is_some_and(|store| store.resources.contains_key(key))
    }

    /// Number of live resources
    pub fn resource_count(&self) -> usize {
        self.read("resource_count").map_or(0, |store| store.resources.len())
    }

    /// Keys of all live resources
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.read("keys").map_or_else(Vec::new, |store| store.resources.keys().collect())
    }

    /// Names of all live resources
    pub fn names(&self) -> Vec<String> {
        self.read("names").map_or_else(Vec::new, |store| {
            store.resources.values().map(|r| r.name().to_string()).collect()
        })
    }

    /// Number of handlers attached to a resource
    pub fn handler_count(&self, key: ResourceKey) -> Option<usize> {
        self.read("handler_count")?.resources.get(key).map(|r| r.handler_count())
    }

    // ===== DESTRUCTION =====

    /// Destroy a resource.
    ///
    /// The resource leaves the lookup tables first. Then, one handler at a
    /// time in attach order, the handler's `on_lost` callback receives the
    /// resource (payload included) and only afterwards is the handler's
    /// back-reference cleared. The payload is dropped once every handler
    /// was processed. Callbacks run without the store borrowed, so they may
    /// use the manager and other handlers.
    ///
    /// Returns false if the key is invalid or the manager is borrowed.
    pub fn destroy(&self, key: ResourceKey) -> bool {
        let mut resource = {
            let Some(mut store) = self.write("destroy") else {
                return false;
            };
            let Some(resource) = store.resources.remove(key) else {
                return false;
            };
            store.names.remove(resource.name());
            resource
        };

        let attached = resource.handlers().to_vec();
        let mut notified = 0;
        for handler in attached {
            // An earlier callback may have dropped or re-targeted this handler
            let callback = match self.shared.write() {
                Some(mut store) => match store.handlers.get_mut(handler) {
                    Some(slot) if slot.resource == Some(key) => slot.on_lost.take(),
                    _ => {
                        resource.remove_handler(handler);
                        continue;
                    }
                },
                None => None,
            };

            if let Some(mut callback) = callback {
                callback(&resource);
                if let Some(mut store) = self.shared.write() {
                    if let Some(slot) = store.handlers.get_mut(handler) {
                        if slot.on_lost.is_none() {
                            slot.on_lost = Some(callback);
                        }
                    }
                }
            }

            if let Some(mut store) = self.shared.write() {
                if let Some(slot) = store.handlers.get_mut(handler) {
                    if slot.resource == Some(key) {
                        slot.resource = None;
                    }
                }
            }
            resource.remove_handler(handler);
            notified += 1;
        }

        crate::engine_debug!("nebula::ResourceManager",
            "Destroyed resource '{}' ({} handler(s) notified)", resource.name(), notified);
        drop(resource);
        true
    }

    /// Destroy a resource by name. Returns false if no such resource exists.
    pub fn destroy_by_name(&self, name: &str) -> bool {
        match self.key_of(name) {
            Some(key) => self.destroy(key),
            None => false,
        }
    }

    /// Destroy every resource, notifying their handlers
    pub fn clear(&self) {
        for key in self.keys() {
            self.destroy(key);
        }
    }
}

impl<T> Drop for ResourceManager<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
