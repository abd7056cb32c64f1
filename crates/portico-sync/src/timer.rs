//! Delay timer facility: the provider behind a component's timer port.
//!
//! A [`DelayTimer`] translates the port operations "start a countdown
//! for N milliseconds" and "cancel the countdown" into [`TimerPump`]
//! scheduling calls, and re-delivers the eventual timeout as the
//! port's own outbound `timeout` event.
//!
//! The pump is an explicit constructor dependency, never ambient
//! state, so a timer can be exercised in isolation with a private
//! pump.

use crate::TimerPump;
use portico_port::TimerPort;
use portico_types::TimerHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One-shot countdown provider wired onto a [`TimerPort`].
///
/// # Identity
///
/// Each timer owns a registry-issued [`TimerHandle`] for its whole
/// lifetime and uses it for every registration, so the pump holds at
/// most one pending entry per timer: a `create` while a previous
/// countdown is pending replaces it.
///
/// # Threading
///
/// `create` and `cancel` run synchronously on the calling thread and
/// never block. The `timeout` event is raised on the pump's dispatch
/// thread; observers must expect cross-thread delivery.
///
/// # Lifecycle
///
/// Dropping the timer unschedules any pending countdown so a dangling
/// callback cannot fire into a destroyed observer. A cancel racing an
/// in-flight dispatch is pump-defined: the event may still arrive.
///
/// # Example
///
/// ```
/// use portico_sync::{DelayTimer, Signal, TimerPump};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let pump = Arc::new(TimerPump::new());
/// let timer = DelayTimer::new(Arc::clone(&pump));
///
/// let fired = Arc::new(Signal::named("timeout"));
/// let observer = Arc::clone(&fired);
/// timer.port().timeout.bind(move |()| observer.trigger());
///
/// timer.create(10);
/// fired
///     .await_triggered(Duration::from_millis(500))
///     .expect("countdown elapses");
/// ```
pub struct DelayTimer {
    pump: Arc<TimerPump>,
    handle: TimerHandle,
    port: TimerPort,
}

impl DelayTimer {
    /// Creates a timer bound to the given pump and wires its port's
    /// inbound operations.
    ///
    /// The port's `timeout` event is left for the observer to bind.
    #[must_use]
    pub fn new(pump: Arc<TimerPump>) -> Self {
        let handle = TimerHandle::next();
        let port = TimerPort::new();

        let create_pump = Arc::clone(&pump);
        let timeout = port.timeout.clone();
        port.create.bind(move |delay_ms| {
            arm(&create_pump, handle, delay_ms, timeout.clone());
        });

        let cancel_pump = Arc::clone(&pump);
        port.cancel.bind(move |()| cancel_pump.unschedule(handle));

        debug!(%handle, "delay timer constructed");
        Self { pump, handle, port }
    }

    /// Returns the timer's port for wiring into a component.
    #[must_use]
    pub fn port(&self) -> &TimerPort {
        &self.port
    }

    /// Returns the handle identifying this timer's registration slot.
    #[must_use]
    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    /// Starts a countdown for `delay_ms` milliseconds.
    ///
    /// Replaces a still-pending countdown, keeping at most one pending
    /// registration for this timer. No return value; a missed or
    /// duplicated timeout is a pump contract violation, not something
    /// the timer compensates for.
    pub fn create(&self, delay_ms: u64) {
        arm(&self.pump, self.handle, delay_ms, self.port.timeout.clone());
    }

    /// Removes the pending countdown, if any. No-op otherwise.
    pub fn cancel(&self) {
        self.pump.unschedule(self.handle);
    }
}

impl Drop for DelayTimer {
    fn drop(&mut self) {
        self.pump.unschedule(self.handle);
    }
}

impl std::fmt::Debug for DelayTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayTimer")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Registers the timeout emission under the timer's handle.
///
/// The emission runs on the pump thread with no stack to report into;
/// an unbound observer makes `emit` a silent no-op and an observer
/// panic is contained by the pump's dispatch boundary.
fn arm(pump: &TimerPump, handle: TimerHandle, delay_ms: u64, timeout: portico_port::Event) {
    pump.schedule_with(handle, Duration::from_millis(delay_ms), move || {
        timeout.emit(());
    });
}
