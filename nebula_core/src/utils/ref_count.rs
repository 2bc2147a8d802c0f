/// Explicit reference counters for shared low-level handles.
///
/// Two flavours exist and the choice is made per resource category:
///
/// - [`RefCount`]: plain `u32` counter mutated through `&mut self`.
///   Single-owner-thread discipline, no synchronization.
/// - [`SyncRefCount`]: `AtomicU32` counter mutated through `&self`,
///   for handles shared across threads.
///
/// Neither type destroys the counted value on its own. When `release()`
/// returns 0, the container decides what to do (usually `into_inner()`
/// followed by a drop).
///
/// # Example
///
/// ```ignore
/// let mut lib = RefCount::new(LibraryHandle::open("scene")?);
/// lib.add_reference();   // 1
/// lib.add_reference();   // 2
/// if lib.release() == 0 {
///     drop(lib.into_inner());
/// }
/// ```

use std::sync::atomic::{AtomicU32, Ordering};

pub struct RefCount<T> {
    value: T,
    ref_count: u32,
}

impl<T> RefCount<T> {
    /// Wrap a value with a reference count of 0
    pub fn new(value: T) -> Self {
        Self {
            value,
            ref_count: 0,
        }
    }

    /// Increase the reference count, returns the new count
    pub fn add_reference(&mut self) -> u32 {
        self.ref_count = self.ref_count.saturating_add(1);
        self.ref_count
    }

    /// Decrease the reference count, returns the new count
    ///
    /// Releasing at 0 is a caller bug; the count stays at 0.
    pub fn release(&mut self) -> u32 {
        self.ref_count = self.ref_count.saturating_sub(1);
        self.ref_count
    }

    /// Decrease the reference count without signalling destruction intent.
    ///
    /// Used by containers that keep the value alive after the last
    /// reference is gone (cached handles).
    pub fn soft_release(&mut self) -> u32 {
        self.release()
    }

    /// Current reference count
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// The counted value
    pub fn pointer(&self) -> &T {
        &self.value
    }

    /// The counted value (mutable)
    pub fn pointer_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Give the value back to the container
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Thread-safe variant of [`RefCount`] using an atomic counter.
pub struct SyncRefCount<T> {
    value: T,
    ref_count: AtomicU32,
}

impl<T> SyncRefCount<T> {
    /// Wrap a value with a reference count of 0
    pub fn new(value: T) -> Self {
        Self {
            value,
            ref_count: AtomicU32::new(0),
        }
    }

    /// Increase the reference count, returns the new count
    pub fn add_reference(&self) -> u32 {
        let previous = self.ref_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)))
            .unwrap_or_else(|n| n);
        previous.saturating_add(1)
    }

    /// Decrease the reference count, returns the new count (never below 0)
    pub fn release(&self) -> u32 {
        let previous = self.ref_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_sub(1)))
            .unwrap_or_else(|n| n);
        previous.saturating_sub(1)
    }

    /// Current reference count
    pub fn ref_count(&self) -> u32 {
        self.ref_count.load(Ordering::Acquire)
    }

    /// The counted value
    pub fn pointer(&self) -> &T {
        &self.value
    }

    /// Give the value back to the container
    pub fn into_inner(self) -> T {
        self.value
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "ref_count_tests.rs"]
mod tests;
