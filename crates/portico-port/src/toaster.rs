//! Port contracts of the toaster component family.
//!
//! These are the concrete contracts the conformance harness wires up:
//! one topside API port and the dependency ports a `ToasterSystem`
//! consumes (heater element, power cord, configuration, indicator led,
//! timer service).
//!
//! # Contract Map
//!
//! ```text
//!                    ┌───────────────────────┐
//!  test driver ────► │      ToasterApiPort   │ (inbound ops, outbound ok/fail/error)
//!                    ├───────────────────────┤
//!                    │     ToasterSystem     │
//!                    ├───────┬───────┬───────┤
//!                    │heater │ cord  │ led   │ ◄── mocks
//!                    ├───────┴───┬───┴───────┤
//!                    │  config   │   timer   │ ◄── mock / DelayTimer
//!                    └───────────┴───────────┘
//! ```
//!
//! Every port is a plain struct of [`Operation`] and [`Event`] slots
//! with a [`Port`] completeness check; none of them prescribe who
//! provides the implementation behind a slot.

use crate::{Event, Operation, Port};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Synchronous acknowledgement returned by valued operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ack {
    /// The operation was accepted.
    Ok,
    /// The operation was refused; details travel on an outbound event.
    Fail,
}

/// Diagnostic payload carried by failure notifications.
///
/// # Example
///
/// ```
/// use portico_port::ResultInfo;
/// use serde_json::json;
///
/// let info = ResultInfo::new("cord disconnected").with_details(json!({"voltage": 0}));
/// assert_eq!(info.reason, "cord disconnected");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultInfo {
    /// Human-readable reason for the failure.
    pub reason: String,
    /// Structured context (free-form).
    pub details: Value,
}

impl ResultInfo {
    /// Creates a [`ResultInfo`] with the given reason and no details.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: Value::Null,
        }
    }

    /// Attaches structured context.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Topside API port of the toaster system.
#[derive(Debug, Clone)]
pub struct ToasterApiPort {
    /// Brings the system to operational state.
    pub initialize: Operation<()>,
    /// Returns the system to idle state.
    pub uninitialize: Operation<()>,
    /// Reports the configured toasting time in milliseconds.
    pub get_time: Operation<(), u64>,
    /// Overrides the toasting time in milliseconds.
    pub set_time: Operation<u64>,
    /// Starts a toast cycle for the named item.
    pub toast: Operation<String, Ack>,
    /// A toast cycle completed successfully.
    pub ok: Event<()>,
    /// A toast cycle failed or was refused.
    pub fail: Event<ResultInfo>,
    /// The system hit an unexpected internal condition.
    pub error: Event<ResultInfo>,
}

impl ToasterApiPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialize: Operation::for_port("toaster_api", "initialize"),
            uninitialize: Operation::for_port("toaster_api", "uninitialize"),
            get_time: Operation::for_port("toaster_api", "get_time"),
            set_time: Operation::for_port("toaster_api", "set_time"),
            toast: Operation::for_port("toaster_api", "toast"),
            ok: Event::new("ok"),
            fail: Event::new("fail"),
            error: Event::new("error"),
        }
    }
}

impl Default for ToasterApiPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for ToasterApiPort {
    fn name(&self) -> &'static str {
        "toaster_api"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.initialize.is_bound() {
            missing.push("initialize");
        }
        if !self.uninitialize.is_bound() {
            missing.push("uninitialize");
        }
        if !self.get_time.is_bound() {
            missing.push("get_time");
        }
        if !self.set_time.is_bound() {
            missing.push("set_time");
        }
        if !self.toast.is_bound() {
            missing.push("toast");
        }
        if !self.ok.is_bound() {
            missing.push("ok");
        }
        if !self.fail.is_bound() {
            missing.push("fail");
        }
        if !self.error.is_bound() {
            missing.push("error");
        }
        missing
    }
}

/// Timer service port: schedule and cancel a one-shot countdown.
///
/// The `timeout` event is raised on the scheduling pump's thread, not
/// the thread that called `create` (explicit contract; tests depend on
/// observing genuine cross-thread delivery).
#[derive(Debug, Clone)]
pub struct TimerPort {
    /// Starts a countdown for the given number of milliseconds.
    pub create: Operation<u64>,
    /// Removes a pending countdown (no-op if none is pending).
    pub cancel: Operation<()>,
    /// The countdown elapsed without being canceled.
    pub timeout: Event<()>,
}

impl TimerPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            create: Operation::for_port("timer", "create"),
            cancel: Operation::for_port("timer", "cancel"),
            timeout: Event::new("timeout"),
        }
    }
}

impl Default for TimerPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for TimerPort {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.create.is_bound() {
            missing.push("create");
        }
        if !self.cancel.is_bound() {
            missing.push("cancel");
        }
        if !self.timeout.is_bound() {
            missing.push("timeout");
        }
        missing
    }
}

/// Heater element dependency port.
#[derive(Debug, Clone)]
pub struct HeaterElementPort {
    /// Prepares the heater hardware.
    pub initialize: Operation<()>,
    /// Releases the heater hardware.
    pub uninitialize: Operation<()>,
    /// Switches the element on.
    pub on: Operation<()>,
    /// Switches the element off.
    pub off: Operation<()>,
}

impl HeaterElementPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialize: Operation::for_port("heater_element", "initialize"),
            uninitialize: Operation::for_port("heater_element", "uninitialize"),
            on: Operation::for_port("heater_element", "on"),
            off: Operation::for_port("heater_element", "off"),
        }
    }
}

impl Default for HeaterElementPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for HeaterElementPort {
    fn name(&self) -> &'static str {
        "heater_element"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.initialize.is_bound() {
            missing.push("initialize");
        }
        if !self.uninitialize.is_bound() {
            missing.push("uninitialize");
        }
        if !self.on.is_bound() {
            missing.push("on");
        }
        if !self.off.is_bound() {
            missing.push("off");
        }
        missing
    }
}

/// Power cord dependency port.
///
/// Carries the only *spontaneous* dependency events in the family:
/// `connected`/`disconnected` may be raised by the provider at any
/// time, unprompted by an inbound operation.
#[derive(Debug, Clone)]
pub struct PowerCordPort {
    /// Prepares the cord driver, labeled for diagnostics.
    pub initialize: Operation<String, Ack>,
    /// Releases the cord driver.
    pub uninitialize: Operation<()>,
    /// Reports whether mains power is present.
    pub is_connected_to_outlet: Operation<(), bool>,
    /// Reports the measured outlet voltage.
    pub get_voltage: Operation<(), i32>,
    /// Mains power appeared.
    pub connected: Event<()>,
    /// Mains power disappeared.
    pub disconnected: Event<ResultInfo>,
}

impl PowerCordPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialize: Operation::for_port("power_cord", "initialize"),
            uninitialize: Operation::for_port("power_cord", "uninitialize"),
            is_connected_to_outlet: Operation::for_port("power_cord", "is_connected_to_outlet"),
            get_voltage: Operation::for_port("power_cord", "get_voltage"),
            connected: Event::new("connected"),
            disconnected: Event::new("disconnected"),
        }
    }
}

impl Default for PowerCordPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for PowerCordPort {
    fn name(&self) -> &'static str {
        "power_cord"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.initialize.is_bound() {
            missing.push("initialize");
        }
        if !self.uninitialize.is_bound() {
            missing.push("uninitialize");
        }
        if !self.is_connected_to_outlet.is_bound() {
            missing.push("is_connected_to_outlet");
        }
        if !self.get_voltage.is_bound() {
            missing.push("get_voltage");
        }
        if !self.connected.is_bound() {
            missing.push("connected");
        }
        if !self.disconnected.is_bound() {
            missing.push("disconnected");
        }
        missing
    }
}

/// Configuration dependency port.
#[derive(Debug, Clone)]
pub struct ConfigurationPort {
    /// Reads the configured toasting time in milliseconds.
    pub get_toasting_time: Operation<(), u64>,
}

impl ConfigurationPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            get_toasting_time: Operation::for_port("configuration", "get_toasting_time"),
        }
    }
}

impl Default for ConfigurationPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for ConfigurationPort {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        if self.get_toasting_time.is_bound() {
            Vec::new()
        } else {
            vec!["get_toasting_time"]
        }
    }
}

/// Indicator led dependency port.
#[derive(Debug, Clone)]
pub struct LedPort {
    /// Prepares the led driver.
    pub initialize: Operation<()>,
    /// Releases the led driver.
    pub uninitialize: Operation<()>,
}

impl LedPort {
    /// Creates the port with all slots unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialize: Operation::for_port("led", "initialize"),
            uninitialize: Operation::for_port("led", "uninitialize"),
        }
    }
}

impl Default for LedPort {
    fn default() -> Self {
        Self::new()
    }
}

impl Port for LedPort {
    fn name(&self) -> &'static str {
        "led"
    }

    fn unbound_slots(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.initialize.is_bound() {
            missing.push("initialize");
        }
        if !self.uninitialize.is_bound() {
            missing.push("uninitialize");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PortError;

    #[test]
    fn fresh_timer_port_fails_completeness_check() {
        let port = TimerPort::new();
        let err = port.check_bindings().expect_err("nothing is wired");
        assert_eq!(
            err,
            PortError::Unbound {
                port: "timer".into(),
                slot: "create".into(),
            }
        );
    }

    #[test]
    fn fully_wired_timer_port_passes() {
        let port = TimerPort::new();
        port.create.bind(|_| {});
        port.cancel.bind(|()| {});
        port.timeout.bind(|()| {});
        assert!(port.check_bindings().is_ok());
        assert!(port.unbound_slots().is_empty());
    }

    #[test]
    fn partially_wired_port_names_the_gap() {
        let port = PowerCordPort::new();
        port.initialize.bind(|_label| Ack::Ok);
        port.uninitialize.bind(|()| {});
        port.is_connected_to_outlet.bind(|()| true);
        port.get_voltage.bind(|()| 230);
        port.connected.bind(|()| {});
        // `disconnected` left unwired on purpose.

        assert_eq!(port.unbound_slots(), vec!["disconnected"]);
    }

    #[test]
    fn api_port_round_trip() {
        let port = ToasterApiPort::new();
        port.get_time.bind(|()| 10_000);
        port.toast.bind(|name: String| {
            assert_eq!(name, "sandwich");
            Ack::Ok
        });

        assert_eq!(port.get_time.invoke(()).expect("bound"), 10_000);
        assert_eq!(port.toast.invoke("sandwich".into()).expect("bound"), Ack::Ok);
    }

    #[test]
    fn result_info_serializes() {
        let info = ResultInfo::new("no power").with_details(serde_json::json!({"voltage": 0}));
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["reason"], "no power");
        assert_eq!(json["details"]["voltage"], 0);
    }
}
