//! Late-bound callback slots.
//!
//! [`Operation`] and [`Event`] are the two slot flavors a port is built
//! from. Both hold an `Arc<RwLock<Option<Arc<dyn Fn ...>>>>`, so a slot
//! can be cloned into whatever needs to call it later (a mock's wiring
//! closure, a timer pump callback) while the port struct itself stays
//! where it was constructed.
//!
//! Slots are rebindable: wiring a slot twice replaces the previous
//! callback. The harness relies on this to re-wire a fixture between
//! test phases without rebuilding the component.

use crate::PortError;
use parking_lot::RwLock;
use std::sync::Arc;

type Slot<A, R> = Arc<RwLock<Option<Arc<dyn Fn(A) -> R + Send + Sync>>>>;

/// An inbound operation slot: a call *into* a component or dependency.
///
/// Invoking an unbound operation is a wiring bug and reports
/// [`PortError::Unbound`]; run the owning port's `check_bindings` first
/// to catch this before the component is exercised.
///
/// # Example
///
/// ```
/// use portico_port::Operation;
///
/// let op: Operation<u64, u64> = Operation::new("get_time");
/// assert!(op.invoke(0).is_err());
///
/// op.bind(|t| t * 2);
/// assert_eq!(op.invoke(21).expect("bound"), 42);
/// ```
pub struct Operation<A, R = ()> {
    port: &'static str,
    name: &'static str,
    slot: Slot<A, R>,
}

impl<A, R> Operation<A, R> {
    /// Creates an unbound operation slot.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            port: "",
            name,
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates an unbound operation slot tagged with its port name.
    #[must_use]
    pub fn for_port(port: &'static str, name: &'static str) -> Self {
        Self {
            port,
            name,
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the slot name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether a callback has been wired.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Wires (or re-wires) the callback behind this slot.
    pub fn bind<F>(&self, f: F)
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        *self.slot.write() = Some(Arc::new(f));
    }

    /// Calls the wired callback synchronously on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Unbound`] if no callback is wired.
    pub fn invoke(&self, args: A) -> Result<R, PortError> {
        // Clone out of the lock so the callback runs unlocked and may
        // itself touch this port.
        let f = self.slot.read().clone();
        match f {
            Some(f) => Ok(f(args)),
            None => Err(PortError::Unbound {
                port: self.port.to_string(),
                slot: self.name.to_string(),
            }),
        }
    }
}

impl<A, R> Clone for Operation<A, R> {
    fn clone(&self) -> Self {
        Self {
            port: self.port,
            name: self.name,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<A, R> std::fmt::Debug for Operation<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("port", &self.port)
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// An outbound event slot: a notification raised *by* a component.
///
/// Events may be emitted from any thread, including a timer pump's
/// dispatch thread, and may race observer teardown. Emitting on an
/// unbound slot is therefore a silent no-op; [`Event::emit`] reports
/// whether the event was actually delivered.
///
/// # Example
///
/// ```
/// use portico_port::Event;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let event: Event = Event::new("timeout");
///
/// assert!(!event.emit(()));  // Unbound: dropped
///
/// let observer = Arc::clone(&seen);
/// event.bind(move |()| {
///     observer.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert!(event.emit(()));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct Event<A = ()> {
    name: &'static str,
    slot: Slot<A, ()>,
}

impl<A> Event<A> {
    /// Creates an unbound event slot.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the slot name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns whether an observer has been wired.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Wires (or re-wires) the observer callback.
    pub fn bind<F>(&self, f: F)
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        *self.slot.write() = Some(Arc::new(f));
    }

    /// Raises the event on the calling thread.
    ///
    /// Returns `true` if an observer was wired and ran, `false` if the
    /// event was dropped.
    pub fn emit(&self, args: A) -> bool {
        let f = self.slot.read().clone();
        match f {
            Some(f) => {
                f(args);
                true
            }
            None => false,
        }
    }
}

impl<A> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<A> std::fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_types::ErrorCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unbound_operation_reports_error() {
        let op: Operation<(), ()> = Operation::for_port("timer", "create");
        let err = op.invoke(()).expect_err("unbound invoke must fail");

        assert_eq!(err.code(), "PORT_UNBOUND");
        assert!(err.to_string().contains("create"));
        assert!(err.to_string().contains("timer"));
    }

    #[test]
    fn bound_operation_forwards_args_and_return() {
        let op: Operation<(u64, u64), u64> = Operation::new("add");
        op.bind(|(a, b)| a + b);
        assert_eq!(op.invoke((40, 2)).expect("bound"), 42);
    }

    #[test]
    fn rebinding_replaces_callback() {
        let op: Operation<(), u64> = Operation::new("value");
        op.bind(|()| 1);
        op.bind(|()| 2);
        assert_eq!(op.invoke(()).expect("bound"), 2);
    }

    #[test]
    fn unbound_event_is_silent() {
        let event: Event<u64> = Event::new("timeout");
        assert!(!event.emit(7));
    }

    #[test]
    fn clones_share_the_slot() {
        let event: Event = Event::new("timeout");
        let emitter = event.clone();

        let count = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&count);
        event.bind(move |()| {
            observer.fetch_add(1, Ordering::SeqCst);
        });

        // Binding through the original is visible through the clone.
        assert!(emitter.emit(()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emit_from_foreign_thread() {
        let event: Event = Event::new("timeout");
        let count = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&count);
        event.bind(move |()| {
            observer.fetch_add(1, Ordering::SeqCst);
        });

        let remote = event.clone();
        std::thread::spawn(move || remote.emit(()))
            .join()
            .expect("emitter thread should not panic");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_reenter_the_port() {
        // The slot lock is released before the callback runs, so a
        // callback can inspect its own slot without deadlocking.
        let op: Operation<(), bool> = Operation::new("probe");
        let probe = op.clone();
        op.bind(move |()| probe.is_bound());
        assert!(op.invoke(()).expect("bound"));
    }
}
