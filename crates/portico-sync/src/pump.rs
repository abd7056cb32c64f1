//! Shared timer pump: the reactor behind every [`DelayTimer`].
//!
//! The pump owns a schedule of pending one-shot callbacks keyed by
//! opaque [`TimerHandle`]s and a dedicated dispatch thread that invokes
//! due callbacks on its own execution context, never the scheduler's.
//!
//! # Scheduling Contract
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `schedule` / `schedule_with` | Registers a one-shot callback; a second registration under the same handle **replaces** the pending one |
//! | `unschedule` | Best-effort removal; silently a no-op for unknown or already-fired handles |
//! | drop | Stops the dispatch thread; pending entries are dropped without firing |
//!
//! # Race Semantics
//!
//! A cancel that reaches the pump before the entry's deadline
//! guarantees the callback never runs. Once the dispatch thread has
//! popped an entry, `unschedule` no longer suppresses it: the callback
//! fires anyway. Callers that need stronger guarantees must serialize
//! against their own observer, not against the pump.
//!
//! # Fault Containment
//!
//! A scheduled callback runs outside any test's stack, so there is no
//! channel to report its failure back. Panics are caught at the
//! dispatch boundary and logged; the pump keeps running.
//!
//! [`DelayTimer`]: crate::DelayTimer

use parking_lot::{Condvar, Mutex, MutexGuard};
use portico_types::TimerHandle;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

type Callback = Box<dyn FnOnce() + Send + 'static>;

struct Entry {
    deadline: Instant,
    callback: Callback,
}

#[derive(Default)]
struct State {
    entries: HashMap<TimerHandle, Entry>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<State>,
    wakeup: Condvar,
}

/// A shared one-shot callback scheduler with its own dispatch thread.
///
/// One pump serves all timers in a harness; each timer owns only its
/// registration slot, identified by the handle it holds.
///
/// # Example
///
/// ```
/// use portico_sync::TimerPump;
/// use std::sync::mpsc;
/// use std::time::Duration;
///
/// let pump = TimerPump::new();
/// let (tx, rx) = mpsc::channel();
///
/// pump.schedule(Duration::from_millis(5), move || {
///     tx.send("fired").ok();
/// });
///
/// assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok("fired"));
/// ```
pub struct TimerPump {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl TimerPump {
    /// Creates a pump and starts its dispatch thread.
    #[must_use]
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            wakeup: Condvar::new(),
        });

        let loop_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("portico-pump".into())
            .spawn(move || dispatch_loop(&loop_shared))
            .expect("failed to spawn timer pump thread");

        Self {
            shared,
            thread: Some(thread),
        }
    }

    /// Registers a one-shot callback under a freshly issued handle.
    ///
    /// Returns the handle the caller now owns; pass it to
    /// [`unschedule`](Self::unschedule) to remove the entry before it
    /// fires, or to [`schedule_with`](Self::schedule_with) to replace
    /// it. Never blocks.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = TimerHandle::next();
        self.schedule_with(handle, delay, callback);
        handle
    }

    /// Registers a one-shot callback under the caller's handle.
    ///
    /// If an entry for `handle` is already pending it is **replaced**:
    /// the old callback is dropped without firing and the deadline is
    /// recomputed from now. This is what keeps "at most one pending
    /// registration per handle" a structural property rather than a
    /// caller obligation. Never blocks.
    pub fn schedule_with<F>(&self, handle: TimerHandle, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        let mut state = self.shared.state.lock();
        let replaced = state
            .entries
            .insert(
                handle,
                Entry {
                    deadline,
                    callback: Box::new(callback),
                },
            )
            .is_some();
        drop(state);

        debug!(%handle, ?delay, replaced, "scheduled one-shot callback");
        self.shared.wakeup.notify_all();
    }

    /// Removes the pending entry for `handle`, if any.
    ///
    /// No effect and no error if the handle is unknown or its callback
    /// already fired. Never blocks on the dispatch of other entries.
    pub fn unschedule(&self, handle: TimerHandle) {
        let removed = self.shared.state.lock().entries.remove(&handle).is_some();
        if removed {
            debug!(%handle, "unscheduled pending callback");
            self.shared.wakeup.notify_all();
        }
    }

    /// Returns the number of registrations currently pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.state.lock().entries.len()
    }
}

impl Default for TimerPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerPump {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
        }
        self.shared.wakeup.notify_all();

        if let Some(thread) = self.thread.take() {
            // The loop contains callback panics, so join only fails if
            // the pump thread itself is broken; nothing to salvage then.
            let _ = thread.join();
        }
    }
}

impl std::fmt::Debug for TimerPump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerPump")
            .field("pending", &self.pending())
            .finish()
    }
}

fn dispatch_loop(shared: &Shared) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            break;
        }

        let next = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.deadline)
            .map(|(handle, entry)| (*handle, entry.deadline));

        match next {
            None => shared.wakeup.wait(&mut state),
            Some((handle, deadline)) => {
                if deadline <= Instant::now() {
                    if let Some(entry) = state.entries.remove(&handle) {
                        // Run unlocked so callbacks can schedule or
                        // cancel without deadlocking the pump.
                        MutexGuard::unlocked(&mut state, || dispatch(handle, entry.callback));
                    }
                } else {
                    let _ = shared.wakeup.wait_until(&mut state, deadline);
                }
            }
        }
    }

    if !state.entries.is_empty() {
        debug!(
            dropped = state.entries.len(),
            "pump shutting down; dropping pending entries unfired"
        );
        state.entries.clear();
    }
}

fn dispatch(handle: TimerHandle, callback: Callback) {
    debug!(%handle, "dispatching due callback");
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        warn!(%handle, "scheduled callback panicked; contained at dispatch boundary");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn callback_fires_after_delay() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        let started = Instant::now();
        pump.schedule(Duration::from_millis(30), move || {
            tx.send(Instant::now()).ok();
        });

        let fired_at = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("callback should fire");
        assert!(fired_at.duration_since(started) >= Duration::from_millis(30));
    }

    #[test]
    fn callback_fires_on_pump_thread() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        pump.schedule(Duration::from_millis(5), move || {
            tx.send(std::thread::current().id()).ok();
        });

        let fired_on = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("callback should fire");
        assert_ne!(fired_on, std::thread::current().id());
    }

    #[test]
    fn zero_delay_fires_promptly() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        pump.schedule(Duration::ZERO, move || {
            tx.send(()).ok();
        });

        assert!(rx.recv_timeout(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn unschedule_before_deadline_suppresses_callback() {
        let pump = TimerPump::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let handle = pump.schedule(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(10));
        pump.unschedule(handle);

        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(pump.pending(), 0);
    }

    #[test]
    fn unschedule_unknown_handle_is_noop() {
        let pump = TimerPump::new();
        pump.unschedule(TimerHandle::next());
        assert_eq!(pump.pending(), 0);
    }

    #[test]
    fn reschedule_replaces_pending_entry() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        let stale = tx.clone();
        let handle = pump.schedule(Duration::from_millis(20), move || {
            stale.send("stale").ok();
        });
        pump.schedule_with(handle, Duration::from_millis(40), move || {
            tx.send("fresh").ok();
        });

        assert_eq!(pump.pending(), 1);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok("fresh"),
            "the replaced callback must not fire"
        );
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn callbacks_fire_in_deadline_order() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        let late = tx.clone();
        pump.schedule(Duration::from_millis(60), move || {
            late.send("late").ok();
        });
        pump.schedule(Duration::from_millis(15), move || {
            tx.send("early").ok();
        });

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok("early"));
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok("late"));
    }

    #[test]
    fn panicking_callback_does_not_kill_the_pump() {
        let pump = TimerPump::new();
        let (tx, rx) = mpsc::channel();

        pump.schedule(Duration::from_millis(5), || panic!("mock assertion failed"));
        pump.schedule(Duration::from_millis(25), move || {
            tx.send(()).ok();
        });

        assert!(
            rx.recv_timeout(Duration::from_secs(2)).is_ok(),
            "pump must survive a contained callback panic"
        );
    }

    #[test]
    fn drop_discards_pending_entries_without_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let pump = TimerPump::new();
            let counter = Arc::clone(&fired);
            pump.schedule(Duration::from_millis(100), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn callback_may_schedule_into_the_pump() {
        let pump = Arc::new(TimerPump::new());
        let (tx, rx) = mpsc::channel();

        let inner_pump = Arc::clone(&pump);
        pump.schedule(Duration::from_millis(5), move || {
            inner_pump.schedule(Duration::from_millis(5), move || {
                tx.send(()).ok();
            });
        });

        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
    }
}
