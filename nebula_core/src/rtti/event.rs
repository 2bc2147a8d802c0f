/// DynEvent / DynEventHandler - publish/subscribe with bidirectional bookkeeping.
///
/// An event keeps the ordered list of its connected handlers, and every
/// handler keeps the list of events it is connected to. Both sides are
/// updated together on connect and disconnect:
///
/// - dropping an event disconnects every handler still connected to it
/// - dropping a handler disconnects it from every event
///
/// Events are owned by the shared class registry, so the bookkeeping sits
/// behind `Arc<Mutex<..>>`. No lock is held while a handler runs, which
/// lets handlers connect or disconnect (themselves or others) during
/// emission.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use super::func::{DynFunc, IntoDynFunc};
use super::params::DynParams;
use super::signature::Signature;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct EventState {
    signature: Signature,
    handlers: Vec<Arc<HandlerState>>,
}

struct HandlerState {
    func: DynFunc,
    events: Mutex<Vec<Weak<Mutex<EventState>>>>,
}

// ===== EVENT =====

/// An event with a fixed signature
pub struct DynEvent {
    state: Arc<Mutex<EventState>>,
}

impl DynEvent {
    pub fn new(signature: Signature) -> Self {
        Self {
            state: Arc::new(Mutex::new(EventState {
                signature,
                handlers: Vec::new(),
            })),
        }
    }

    pub fn signature(&self) -> Signature {
        lock(&self.state).signature.clone()
    }

    /// Connect a handler.
    ///
    /// Refused (false, nothing recorded) unless the handler's signature is
    /// exactly the event's. Connecting an already connected handler is a
    /// no-op that returns true.
    pub fn connect(&self, handler: &DynEventHandler) -> bool {
        {
            let mut state = lock(&self.state);
            if handler.state.func.signature() != Some(&state.signature) {
                return false;
            }
            if state.handlers.iter().any(|h| Arc::ptr_eq(h, &handler.state)) {
                return true;
            }
            state.handlers.push(handler.state.clone());
        }
        lock(&handler.state.events).push(Arc::downgrade(&self.state));
        true
    }

    /// Disconnect a handler. Returns false if it was not connected.
    pub fn disconnect(&self, handler: &DynEventHandler) -> bool {
        let removed = {
            let mut state = lock(&self.state);
            let before = state.handlers.len();
            state.handlers.retain(|h| !Arc::ptr_eq(h, &handler.state));
            state.handlers.len() != before
        };
        if removed {
            let event = Arc::downgrade(&self.state);
            lock(&handler.state.events).retain(|e| !e.ptr_eq(&event));
        }
        removed
    }

    /// Whether the handler is connected to this event
    pub fn is_connected(&self, handler: &DynEventHandler) -> bool {
        lock(&self.state).handlers.iter().any(|h| Arc::ptr_eq(h, &handler.state))
    }

    /// Number of connected handlers
    pub fn num_of_connects(&self) -> usize {
        lock(&self.state).handlers.len()
    }

    /// Call every connected handler in connection order.
    ///
    /// Each handler gets its own copy of `params`. A handler disconnected by
    /// an earlier one during the same emission is skipped. Returns false
    /// without calling anything on signature mismatch.
    pub fn emit(&self, params: &DynParams) -> bool {
        let snapshot = {
            let state = lock(&self.state);
            if params.signature() != &state.signature {
                return false;
            }
            state.handlers.clone()
        };

        for handler in snapshot {
            let connected = lock(&self.state).handlers.iter().any(|h| Arc::ptr_eq(h, &handler));
            if connected {
                let mut params = params.clone();
                handler.func.call(&mut params);
            }
        }
        true
    }

    /// Emit with parameters deserialized from `Param0="..." ...`
    pub fn emit_str(&self, text: &str) -> bool {
        self.emit(&DynParams::from_string(self.signature(), text))
    }

    /// Emit with parameters deserialized from a TOML table
    pub fn emit_table(&self, table: &toml::Table) -> bool {
        self.emit(&DynParams::from_table(self.signature(), table))
    }
}

impl Drop for DynEvent {
    fn drop(&mut self) {
        let handlers = std::mem::take(&mut lock(&self.state).handlers);
        let event = Arc::downgrade(&self.state);
        for handler in handlers {
            lock(&handler.events).retain(|e| !e.ptr_eq(&event));
        }
    }
}

impl fmt::Debug for DynEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("DynEvent")
            .field("signature", &state.signature.to_string())
            .field("connects", &state.handlers.len())
            .finish()
    }
}

// ===== EVENT HANDLER =====

/// A subscriber wrapping a `DynFunc`
pub struct DynEventHandler {
    state: Arc<HandlerState>,
}

impl DynEventHandler {
    /// Handler calling a typed closure
    pub fn new<Args, F: IntoDynFunc<Args>>(func: F) -> Self {
        Self::from_func(func.into_dyn_func())
    }

    /// Handler calling an existing `DynFunc` (an unbound one never connects)
    pub fn from_func(func: DynFunc) -> Self {
        Self {
            state: Arc::new(HandlerState {
                func,
                events: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.state.func.signature()
    }

    /// Number of live events this handler is connected to
    pub fn num_of_connects(&self) -> usize {
        lock(&self.state.events).iter().filter(|e| e.strong_count() > 0).count()
    }

    /// Disconnect from every event
    pub fn disconnect_all(&self) {
        let events = std::mem::take(&mut *lock(&self.state.events));
        for event in events.iter().filter_map(Weak::upgrade) {
            lock(&event).handlers.retain(|h| !Arc::ptr_eq(h, &self.state));
        }
    }
}

impl fmt::Debug for DynEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynEventHandler")
            .field("signature", &self.state.func.signature_string())
            .field("connects", &self.num_of_connects())
            .finish()
    }
}

impl Drop for DynEventHandler {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
