//! Conformance test harness for the toaster component family.
//!
//! This crate sits on top of the port contracts (`portico-port`) and
//! the synchronization core (`portico-sync`) and provides everything a
//! test needs to drive an asynchronously-operating component:
//!
//! - **Mock port adapters** ([`HeaterElementMock`], [`PowerCordMock`],
//!   [`ConfigurationMock`], [`LedMock`]): forward each inbound call to
//!   a programmed expectation, supply canned return values, and can
//!   emit spontaneous outbound events back into the component.
//! - **Strict ordering** ([`Sequence`]): one ordering domain shared by
//!   all mocks, so a test can assert the component touches its
//!   dependencies in exactly the programmed order.
//! - **The component under test** ([`ToasterSystem`]): a small
//!   asynchronous component assembled from the ports, with a real
//!   countdown running on the shared timer pump.
//! - **The bench** ([`ToasterBench`]): assembles system + mocks +
//!   completion [`Signal`](portico_sync::Signal)s, and runs the
//!   binding-completeness checks before handing the system to a test.
//!
//! # A Complete Cycle
//!
//! ```
//! use portico_harness::ToasterBench;
//! use std::time::Duration;
//!
//! let bench = ToasterBench::new().expect("bench wires completely");
//!
//! bench.heater.expect_initialize(&bench.seq);
//! bench.cord.expect_initialize(&bench.seq, portico_port::Ack::Ok);
//! bench.led.expect_initialize(&bench.seq);
//! bench.config.expect_get_toasting_time(&bench.seq, 50);
//!
//! bench.system.api.initialize.invoke(()).expect("api is wired");
//!
//! bench.cord.expect_is_connected(&bench.seq, true);
//! bench.heater.expect_on(&bench.seq);
//! bench.heater.expect_off(&bench.seq);
//!
//! bench.system.api.toast.invoke("sandwich".into()).expect("api is wired");
//! bench
//!     .ok
//!     .await_triggered(Duration::from_secs(5))
//!     .expect("toast cycle completes");
//!
//! bench.verify().expect("all expectations consumed");
//! ```

#![warn(missing_docs)]

mod bench;
mod error;
mod expect;
mod mocks;
mod sequence;
mod system;

pub use bench::ToasterBench;
pub use error::MockError;
pub use expect::{CallLog, CallRecord, ExpectationQueue};
pub use mocks::{ConfigurationMock, HeaterElementMock, LedMock, PowerCordMock};
pub use sequence::Sequence;
pub use system::ToasterSystem;
