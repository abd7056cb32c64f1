//! Reusable one-shot rendezvous signal.
//!
//! A [`Signal`] lets a test thread block, with a timeout, until an
//! asynchronous notification occurs, then automatically rearms for the
//! next request/response cycle. One `Signal` field serves a whole
//! test's lifetime; no fresh instance per cycle.
//!
//! # Cycle Semantics
//!
//! ```text
//!  ready ──trigger()──► signaled ──await_triggered() Ok──► ready
//!    ▲                                                       │
//!    └────────────────────── (rearmed) ──────────────────────┘
//! ```
//!
//! - A trigger that happens **before** the wait begins is retained and
//!   observed as success by the next wait (no lost-wakeup window).
//! - A timed-out wait changes nothing: a later trigger is still
//!   observable by a subsequent wait.
//! - Extra triggers before observation are coalesced at the next rearm
//!   (last-trigger-wins); triggering is never an error.
//!
//! # Implementation
//!
//! Internally a single-use `std::sync::mpsc` handoff pair, replaced on
//! every rearm. `recv_timeout` natively yields the three-way outcome
//! the harness needs: ready, timed out, or producer torn down.

use crate::SignalError;
use parking_lot::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::debug;

/// A reusable cross-thread rendezvous point.
///
/// The producer side ([`trigger`](Self::trigger)) is callable from any
/// thread, including a timer pump's dispatch thread, and never blocks.
/// The consumer side ([`await_triggered`](Self::await_triggered))
/// blocks the calling thread with a hard wall-clock bound.
///
/// Waits are serialized: the signal supports exactly one waiting
/// thread per cycle, which is the discipline a deterministic harness
/// wants anyway.
///
/// # Example
///
/// ```
/// use portico_sync::Signal;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let signal = Arc::new(Signal::named("ok"));
///
/// let producer = Arc::clone(&signal);
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_millis(20));
///     producer.trigger();
/// });
///
/// signal
///     .await_triggered(Duration::from_millis(500))
///     .expect("producer triggers within the bound");
///
/// // Rearmed: the same instance serves the next cycle.
/// signal.trigger();
/// signal
///     .await_triggered(Duration::from_millis(500))
///     .expect("second cycle succeeds independently");
/// ```
pub struct Signal {
    name: String,
    tx: Mutex<Sender<()>>,
    rx: Mutex<Receiver<()>>,
}

impl Signal {
    /// Creates a signal in the ready-to-wait state.
    #[must_use]
    pub fn new() -> Self {
        Self::named("signal")
    }

    /// Creates a named signal; the name appears in wait failures so a
    /// timed-out test states what it was waiting for.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            name: name.into(),
            tx: Mutex::new(tx),
            rx: Mutex::new(rx),
        }
    }

    /// Returns the signal's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the signal as satisfied. Never blocks.
    ///
    /// Safe to call with nobody waiting: the trigger is retained and
    /// the next wait observes it. Triggering an already-signaled
    /// instance is not an error; surplus triggers are discarded when
    /// the signal next rearms.
    pub fn trigger(&self) {
        // Send can only fail against a receiver replaced mid-rearm; the
        // trigger is then aimed at a finished cycle and dropping it is
        // exactly the coalescing the contract promises.
        let _ = self.tx.lock().send(());
        debug!(signal = %self.name, "triggered");
    }

    /// Blocks until the signal is triggered or `timeout` elapses.
    ///
    /// On success the signal atomically rearms, so the same instance
    /// can serve the next trigger/wait cycle without caller action.
    /// On timeout the pending state is left untouched.
    ///
    /// # Errors
    ///
    /// - [`SignalError::TimedOut`] when the bound elapsed first; the
    ///   error carries the attempted duration.
    /// - [`SignalError::Disconnected`] when the handoff was torn down
    ///   without a trigger (a harness fault, not an absent event).
    pub fn await_triggered(&self, timeout: Duration) -> Result<(), SignalError> {
        let rx = self.rx.lock();
        match rx.recv_timeout(timeout) {
            Ok(()) => {
                drop(rx);
                self.rearm();
                debug!(signal = %self.name, "observed trigger and rearmed");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => Err(SignalError::TimedOut {
                signal: self.name.clone(),
                waited: timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(SignalError::Disconnected {
                signal: self.name.clone(),
            }),
        }
    }

    /// Explicitly returns the signal to the ready-to-wait state.
    ///
    /// Idempotent and safe to call redundantly. Discards any stale
    /// unconsumed trigger, which is how a test protocol draws a line
    /// between unrelated request/response cycles.
    pub fn reset(&self) {
        self.rearm();
        debug!(signal = %self.name, "reset");
    }

    /// Replaces the handoff pair, discarding queued triggers.
    fn rearm(&self) {
        let (tx, rx) = mpsc::channel();
        let mut rx_slot = self.rx.lock();
        *self.tx.lock() = tx;
        *rx_slot = rx;
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("name", &self.name).finish()
    }
}
