//! Signal/slot notifications.
//!
//! A trimmed take on the lattice signal: every slot is invoked directly on the
//! emitting thread. Navigation runs on the UI thread, so there is no queued
//! delivery; the type stays `Send + Sync` so observers living elsewhere (a
//! logger, a test harness) can hold connections.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use horizon_waypoint_core::Signal;
//!
//! let progressed = Signal::<f32>::new();
//! let frames = Arc::new(AtomicUsize::new(0));
//! let counter = frames.clone();
//! let id = progressed.connect(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! progressed.emit(0.5);
//! progressed.disconnect(id);
//! progressed.emit(1.0);
//! assert_eq!(frames.load(Ordering::SeqCst), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Identifies a connected slot until it is disconnected.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot. Returns an id usable with [`disconnect`](Self::disconnect).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a slot. Returns `false` if the id was unknown.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppress or re-enable emission.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`.
    ///
    /// Slots are snapshotted before invocation, so a slot may connect or
    /// disconnect without deadlocking; changes apply from the next emit.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<f32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn test_emit_reaches_all_slots() {
        let signal = Signal::<i32>::new();
        let total = Arc::new(AtomicI32::new(0));
        for _ in 0..3 {
            let total = total.clone();
            signal.connect(move |v| {
                total.fetch_add(*v, Ordering::SeqCst);
            });
        }
        signal.emit(2);
        assert_eq!(total.load(Ordering::SeqCst), 6);
        assert_eq!(signal.connection_count(), 3);
    }

    #[test]
    fn test_blocked_signal_is_silent() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicI32::new(0));
        let counter = hits.clone();
        signal.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slot_may_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let inner = signal.clone();
        signal.connect(move |_| inner.disconnect_all());
        signal.emit(());
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_disconnect_unknown_id() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
    }
}
