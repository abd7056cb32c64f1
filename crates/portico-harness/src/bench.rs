//! The assembled test bench: system, mocks, pump, and completion
//! signals in one fixture.
//!
//! Constructing a [`ToasterBench`] performs the whole wiring dance a
//! test would otherwise repeat: every dependency port gets its mock,
//! the API's outbound events get [`Signal`]s a test thread can block
//! on, and a binding-completeness sweep over all ports turns a wiring
//! gap into a construction error instead of a mid-test panic.

use crate::{
    ConfigurationMock, HeaterElementMock, LedMock, MockError, PowerCordMock, Sequence,
    ToasterSystem,
};
use parking_lot::Mutex;
use portico_port::{Port, PortError, ResultInfo};
use portico_sync::{Signal, TimerPump};
use std::sync::Arc;
use tracing::debug;

/// Fully wired conformance fixture around one [`ToasterSystem`].
///
/// All fields a test drives are public: program expectations on the
/// mocks, invoke operations through `system.api`, then block on the
/// completion signals and finish with [`verify`](Self::verify).
/// See the crate-level example for a complete cycle.
pub struct ToasterBench {
    /// The component under test.
    pub system: ToasterSystem,
    /// Mocked heater element provider.
    pub heater: HeaterElementMock,
    /// Mocked power cord provider.
    pub cord: PowerCordMock,
    /// Mocked configuration provider.
    pub config: ConfigurationMock,
    /// Mocked indicator led provider.
    pub led: LedMock,
    /// Shared strict-ordering domain, passed to `expect_*` calls.
    pub seq: Sequence,
    /// Trips when the API raises `ok`.
    pub ok: Arc<Signal>,
    /// Trips when the API raises `fail`.
    pub fail: Arc<Signal>,
    /// Trips when the API raises `error`.
    pub error: Arc<Signal>,
    pump: Arc<TimerPump>,
    failures: Arc<Mutex<Vec<ResultInfo>>>,
    errors: Arc<Mutex<Vec<ResultInfo>>>,
}

impl ToasterBench {
    /// Assembles and fully wires a fresh bench.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Unbound`] naming the first unwired slot if
    /// the assembly leaves any port incomplete.
    pub fn new() -> Result<Self, PortError> {
        let pump = Arc::new(TimerPump::new());
        let system = ToasterSystem::new(Arc::clone(&pump));

        let heater = HeaterElementMock::new();
        let cord = PowerCordMock::new();
        let config = ConfigurationMock::new();
        let led = LedMock::new();
        heater.wire(&system.heater);
        cord.wire(&system.cord);
        config.wire(&system.config);
        led.wire(&system.led);

        let ok = Arc::new(Signal::named("ok"));
        let fail = Arc::new(Signal::named("fail"));
        let error = Arc::new(Signal::named("error"));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));

        {
            let signal = Arc::clone(&ok);
            system.api.ok.bind(move |()| {
                debug!("api raised 'ok'");
                signal.trigger();
            });
        }
        {
            let (signal, sink) = (Arc::clone(&fail), Arc::clone(&failures));
            system.api.fail.bind(move |info: ResultInfo| {
                debug!(reason = %info.reason, "api raised 'fail'");
                sink.lock().push(info);
                signal.trigger();
            });
        }
        {
            let (signal, sink) = (Arc::clone(&error), Arc::clone(&errors));
            system.api.error.bind(move |info: ResultInfo| {
                debug!(reason = %info.reason, "api raised 'error'");
                sink.lock().push(info);
                signal.trigger();
            });
        }

        system.api.check_bindings()?;
        system.heater.check_bindings()?;
        system.cord.check_bindings()?;
        system.config.check_bindings()?;
        system.led.check_bindings()?;
        system.timer().port().check_bindings()?;

        Ok(Self {
            system,
            heater,
            cord,
            config,
            led,
            seq: Sequence::new(),
            ok,
            fail,
            error,
            pump,
            failures,
            errors,
        })
    }

    /// Asserts every programmed expectation on every mock was consumed.
    ///
    /// # Errors
    ///
    /// Returns the first [`MockError::UnmetExpectation`] found.
    pub fn verify(&self) -> Result<(), MockError> {
        self.heater.verify()?;
        self.cord.verify()?;
        self.config.verify()?;
        self.led.verify()
    }

    /// Returns the payloads of all `fail` events raised so far.
    #[must_use]
    pub fn failures(&self) -> Vec<ResultInfo> {
        self.failures.lock().clone()
    }

    /// Returns the payloads of all `error` events raised so far.
    #[must_use]
    pub fn errors(&self) -> Vec<ResultInfo> {
        self.errors.lock().clone()
    }

    /// Returns the timer pump driving the bench's countdowns.
    #[must_use]
    pub fn pump(&self) -> &Arc<TimerPump> {
        &self.pump
    }
}

impl std::fmt::Debug for ToasterBench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToasterBench")
            .field("system", &self.system)
            .field("outstanding", &self.seq.outstanding())
            .finish()
    }
}
