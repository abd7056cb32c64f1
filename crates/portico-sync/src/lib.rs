//! Synchronization core of the Portico conformance harness.
//!
//! This crate owns the only pieces of the harness with real concurrency
//! and timing semantics:
//!
//! - [`TimerPump`]: a shared reactor that runs scheduled one-shot
//!   callbacks on its own dedicated thread, keyed by opaque
//!   [`TimerHandle`](portico_types::TimerHandle)s.
//! - [`DelayTimer`]: adapts a component's "start countdown" / "cancel
//!   countdown" port operations onto the pump and re-emits the eventual
//!   timeout as the component's own outbound `timeout` event.
//! - [`Signal`]: a reusable one-shot rendezvous point. A producer on
//!   any thread triggers it exactly once per cycle; a consumer thread
//!   awaits it with a bounded timeout, and a successful wait atomically
//!   rearms the signal for the next cycle.
//!
//! # Control Flow
//!
//! ```text
//!  driver thread                         pump thread
//!  ─────────────                         ───────────
//!  timer.create(d) ──► pump.schedule ┐
//!                                    │ (d elapses)
//!                                    └──► callback ──► port.timeout.emit()
//!                                                            │
//!  signal.await_triggered(t) ◄── signal.trigger() ◄──────────┘
//! ```
//!
//! # Blocking Discipline
//!
//! Only [`Signal::await_triggered`] blocks, and only the calling
//! thread, with a hard wall-clock bound. `create`, `cancel`, and
//! `trigger` never block.
//!
//! # Example
//!
//! ```
//! use portico_sync::{Signal, TimerPump};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let pump = Arc::new(TimerPump::new());
//! let signal = Arc::new(Signal::named("fired"));
//!
//! let producer = Arc::clone(&signal);
//! pump.schedule(Duration::from_millis(5), move || producer.trigger());
//!
//! signal
//!     .await_triggered(Duration::from_secs(1))
//!     .expect("callback should fire well within a second");
//! ```

#![warn(missing_docs)]

mod error;
mod pump;
mod signal;
mod timer;

pub use error::SignalError;
pub use pump::TimerPump;
pub use signal::Signal;
pub use timer::DelayTimer;
