//! Mock adapters for the toaster dependency ports.
//!
//! Each mock forwards every inbound port operation, synchronously on
//! the calling thread, to its programmed [`ExpectationQueue`], records
//! the call in a [`CallLog`], and (where the contract has spontaneous
//! outbound events) exposes `trigger_*` methods to emit them back into
//! the component on demand.
//!
//! The mocks assert eagerly: an unexpected or mis-ordered call panics
//! inside the component's own synchronous call, which puts the failure
//! at the exact operation that went wrong. Undershoot (calls that never
//! happened) is caught afterwards by [`verify`](HeaterElementMock::verify).

use crate::{CallLog, CallRecord, ExpectationQueue, MockError, Sequence};
use parking_lot::Mutex;
use portico_port::{
    Ack, ConfigurationPort, HeaterElementPort, LedPort, PowerCordPort, ResultInfo,
};
use serde_json::{json, Value};
use tracing::debug;

/// Mock provider for [`HeaterElementPort`].
///
/// # Example
///
/// ```
/// use portico_harness::{HeaterElementMock, Sequence};
/// use portico_port::HeaterElementPort;
///
/// let seq = Sequence::new();
/// let port = HeaterElementPort::new();
/// let mock = HeaterElementMock::new();
/// mock.wire(&port);
///
/// mock.expect_on(&seq);
/// port.on.invoke(()).expect("wired");
/// mock.verify().expect("all expectations consumed");
/// ```
pub struct HeaterElementMock {
    log: CallLog,
    initialize: ExpectationQueue<()>,
    uninitialize: ExpectationQueue<()>,
    on: ExpectationQueue<()>,
    off: ExpectationQueue<()>,
}

impl HeaterElementMock {
    /// Creates a mock with no programmed expectations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            initialize: ExpectationQueue::new("heater_element", "initialize"),
            uninitialize: ExpectationQueue::new("heater_element", "uninitialize"),
            on: ExpectationQueue::new("heater_element", "on"),
            off: ExpectationQueue::new("heater_element", "off"),
        }
    }

    /// Forwards the port's inbound operations to this mock.
    pub fn wire(&self, port: &HeaterElementPort) {
        let (queue, log) = (self.initialize.clone(), self.log.clone());
        port.initialize.bind(move |()| {
            log.record("heater_element", "initialize", Value::Null);
            queue.consume();
        });

        let (queue, log) = (self.uninitialize.clone(), self.log.clone());
        port.uninitialize.bind(move |()| {
            log.record("heater_element", "uninitialize", Value::Null);
            queue.consume();
        });

        let (queue, log) = (self.on.clone(), self.log.clone());
        port.on.bind(move |()| {
            log.record("heater_element", "on", Value::Null);
            queue.consume();
        });

        let (queue, log) = (self.off.clone(), self.log.clone());
        port.off.bind(move |()| {
            log.record("heater_element", "off", Value::Null);
            queue.consume();
        });
    }

    /// Expects one `initialize` call at the next slot of `seq`.
    pub fn expect_initialize(&self, seq: &Sequence) {
        self.initialize.expect_in(seq, ());
    }

    /// Expects one `uninitialize` call at the next slot of `seq`.
    pub fn expect_uninitialize(&self, seq: &Sequence) {
        self.uninitialize.expect_in(seq, ());
    }

    /// Expects one `on` call at the next slot of `seq`.
    pub fn expect_on(&self, seq: &Sequence) {
        self.on.expect_in(seq, ());
    }

    /// Expects one `off` call at the next slot of `seq`.
    pub fn expect_off(&self, seq: &Sequence) {
        self.off.expect_in(seq, ());
    }

    /// Asserts every programmed expectation was consumed.
    ///
    /// # Errors
    ///
    /// Returns the first [`MockError::UnmetExpectation`] found.
    pub fn verify(&self) -> Result<(), MockError> {
        self.initialize.verify()?;
        self.uninitialize.verify()?;
        self.on.verify()?;
        self.off.verify()
    }

    /// Returns the observed call log.
    #[must_use]
    pub fn call_log(&self) -> Vec<CallRecord> {
        self.log.snapshot()
    }
}

impl Default for HeaterElementMock {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock provider for [`PowerCordPort`], including spontaneous
/// `connected`/`disconnected` event injection.
pub struct PowerCordMock {
    log: CallLog,
    peer: Mutex<Option<PowerCordPort>>,
    initialize: ExpectationQueue<Ack>,
    uninitialize: ExpectationQueue<()>,
    is_connected_to_outlet: ExpectationQueue<bool>,
    get_voltage: ExpectationQueue<i32>,
}

impl PowerCordMock {
    /// Creates a mock with no programmed expectations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            peer: Mutex::new(None),
            initialize: ExpectationQueue::new("power_cord", "initialize"),
            uninitialize: ExpectationQueue::new("power_cord", "uninitialize"),
            is_connected_to_outlet: ExpectationQueue::new("power_cord", "is_connected_to_outlet"),
            get_voltage: ExpectationQueue::new("power_cord", "get_voltage"),
        }
    }

    /// Forwards the port's inbound operations to this mock and keeps
    /// the peer port for event injection.
    pub fn wire(&self, port: &PowerCordPort) {
        *self.peer.lock() = Some(port.clone());

        let (queue, log) = (self.initialize.clone(), self.log.clone());
        port.initialize.bind(move |label: String| {
            log.record("power_cord", "initialize", json!({ "label": label }));
            queue.consume()
        });

        let (queue, log) = (self.uninitialize.clone(), self.log.clone());
        port.uninitialize.bind(move |()| {
            log.record("power_cord", "uninitialize", Value::Null);
            queue.consume();
        });

        let (queue, log) = (self.is_connected_to_outlet.clone(), self.log.clone());
        port.is_connected_to_outlet.bind(move |()| {
            log.record("power_cord", "is_connected_to_outlet", Value::Null);
            queue.consume()
        });

        let (queue, log) = (self.get_voltage.clone(), self.log.clone());
        port.get_voltage.bind(move |()| {
            log.record("power_cord", "get_voltage", Value::Null);
            queue.consume()
        });
    }

    /// Expects one `initialize` call, returning `ack`.
    pub fn expect_initialize(&self, seq: &Sequence, ack: Ack) {
        self.initialize.expect_in(seq, ack);
    }

    /// Expects one `uninitialize` call.
    pub fn expect_uninitialize(&self, seq: &Sequence) {
        self.uninitialize.expect_in(seq, ());
    }

    /// Expects one `is_connected_to_outlet` call, returning `connected`.
    pub fn expect_is_connected(&self, seq: &Sequence, connected: bool) {
        self.is_connected_to_outlet.expect_in(seq, connected);
    }

    /// Expects one `get_voltage` call, returning `voltage`.
    pub fn expect_get_voltage(&self, seq: &Sequence, voltage: i32) {
        self.get_voltage.expect_in(seq, voltage);
    }

    /// Emits a spontaneous `connected` event into the component.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::NotWired`] if [`wire`](Self::wire) has not
    /// run yet.
    pub fn trigger_connected(&self) -> Result<(), MockError> {
        let peer = self.peer.lock();
        let port = peer.as_ref().ok_or(MockError::NotWired {
            port: "power_cord".into(),
        })?;
        debug!("power_cord mock raising spontaneous 'connected'");
        port.connected.emit(());
        Ok(())
    }

    /// Emits a spontaneous `disconnected` event into the component.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::NotWired`] if [`wire`](Self::wire) has not
    /// run yet.
    pub fn trigger_disconnected(&self, info: ResultInfo) -> Result<(), MockError> {
        let peer = self.peer.lock();
        let port = peer.as_ref().ok_or(MockError::NotWired {
            port: "power_cord".into(),
        })?;
        debug!(reason = %info.reason, "power_cord mock raising spontaneous 'disconnected'");
        port.disconnected.emit(info);
        Ok(())
    }

    /// Asserts every programmed expectation was consumed.
    ///
    /// # Errors
    ///
    /// Returns the first [`MockError::UnmetExpectation`] found.
    pub fn verify(&self) -> Result<(), MockError> {
        self.initialize.verify()?;
        self.uninitialize.verify()?;
        self.is_connected_to_outlet.verify()?;
        self.get_voltage.verify()
    }

    /// Returns the observed call log.
    #[must_use]
    pub fn call_log(&self) -> Vec<CallRecord> {
        self.log.snapshot()
    }
}

impl Default for PowerCordMock {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock provider for [`ConfigurationPort`].
pub struct ConfigurationMock {
    log: CallLog,
    get_toasting_time: ExpectationQueue<u64>,
}

impl ConfigurationMock {
    /// Creates a mock with no programmed expectations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            get_toasting_time: ExpectationQueue::new("configuration", "get_toasting_time"),
        }
    }

    /// Forwards the port's inbound operations to this mock.
    pub fn wire(&self, port: &ConfigurationPort) {
        let (queue, log) = (self.get_toasting_time.clone(), self.log.clone());
        port.get_toasting_time.bind(move |()| {
            log.record("configuration", "get_toasting_time", Value::Null);
            queue.consume()
        });
    }

    /// Expects one `get_toasting_time` call, returning `time_ms`.
    pub fn expect_get_toasting_time(&self, seq: &Sequence, time_ms: u64) {
        self.get_toasting_time.expect_in(seq, time_ms);
    }

    /// Asserts every programmed expectation was consumed.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::UnmetExpectation`] when expectations remain.
    pub fn verify(&self) -> Result<(), MockError> {
        self.get_toasting_time.verify()
    }

    /// Returns the observed call log.
    #[must_use]
    pub fn call_log(&self) -> Vec<CallRecord> {
        self.log.snapshot()
    }
}

impl Default for ConfigurationMock {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock provider for [`LedPort`].
pub struct LedMock {
    log: CallLog,
    initialize: ExpectationQueue<()>,
    uninitialize: ExpectationQueue<()>,
}

impl LedMock {
    /// Creates a mock with no programmed expectations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            initialize: ExpectationQueue::new("led", "initialize"),
            uninitialize: ExpectationQueue::new("led", "uninitialize"),
        }
    }

    /// Forwards the port's inbound operations to this mock.
    pub fn wire(&self, port: &LedPort) {
        let (queue, log) = (self.initialize.clone(), self.log.clone());
        port.initialize.bind(move |()| {
            log.record("led", "initialize", Value::Null);
            queue.consume();
        });

        let (queue, log) = (self.uninitialize.clone(), self.log.clone());
        port.uninitialize.bind(move |()| {
            log.record("led", "uninitialize", Value::Null);
            queue.consume();
        });
    }

    /// Expects one `initialize` call at the next slot of `seq`.
    pub fn expect_initialize(&self, seq: &Sequence) {
        self.initialize.expect_in(seq, ());
    }

    /// Expects one `uninitialize` call at the next slot of `seq`.
    pub fn expect_uninitialize(&self, seq: &Sequence) {
        self.uninitialize.expect_in(seq, ());
    }

    /// Asserts every programmed expectation was consumed.
    ///
    /// # Errors
    ///
    /// Returns the first [`MockError::UnmetExpectation`] found.
    pub fn verify(&self) -> Result<(), MockError> {
        self.initialize.verify()?;
        self.uninitialize.verify()
    }

    /// Returns the observed call log.
    #[must_use]
    pub fn call_log(&self) -> Vec<CallRecord> {
        self.log.snapshot()
    }
}

impl Default for LedMock {
    fn default() -> Self {
        Self::new()
    }
}
