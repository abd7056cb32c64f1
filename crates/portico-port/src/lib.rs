//! Port contracts for the Portico conformance harness.
//!
//! A *port* is the boundary of a component: a bundle of **inbound
//! operations** (called into the component, or into one of its
//! dependencies) and **outbound events** (raised by the component toward
//! whatever is listening). Both directions are late-bound callback
//! slots: a port is constructed unbound, wiring code fills the slots,
//! and a binding-completeness check verifies nothing was forgotten
//! before the component is exercised.
//!
//! # Port Anatomy
//!
//! ```text
//! ┌──────────────────────┐        inbound operation         ┌─────────┐
//! │       caller         │ ──── port.create.invoke(..) ───► │ provider│
//! │  (component / test)  │                                  │         │
//! │                      │ ◄──── port.timeout.emit(..) ──── │         │
//! └──────────────────────┘        outbound event            └─────────┘
//! ```
//!
//! # Direction Semantics
//!
//! | Direction | Type | Unbound behavior |
//! |-----------|------|------------------|
//! | Inbound | [`Operation`] | `invoke` returns [`PortError::Unbound`] |
//! | Outbound | [`Event`] | `emit` is a silent no-op |
//!
//! Outbound events may be raised from a foreign thread (a timer pump
//! dispatching a due callback), possibly racing component teardown, so
//! an unbound event slot is never an error at emit time. The
//! completeness check exists precisely to catch forgotten wiring
//! *before* the asynchronous phase starts.
//!
//! # Example
//!
//! ```
//! use portico_port::{Port, TimerPort};
//!
//! let port = TimerPort::new();
//! assert!(port.check_bindings().is_err());  // Nothing wired yet
//!
//! port.create.bind(|_delay_ms| {});
//! port.cancel.bind(|()| {});
//! port.timeout.bind(|()| {});
//! assert!(port.check_bindings().is_ok());
//!
//! port.create.invoke(2_000).expect("create is bound");
//! ```

#![warn(missing_docs)]

mod binding;
mod error;
mod toaster;

pub use binding::{Event, Operation};
pub use error::PortError;
pub use toaster::{
    Ack, ConfigurationPort, HeaterElementPort, LedPort, PowerCordPort, ResultInfo, TimerPort,
    ToasterApiPort,
};

/// Common surface of every port: a name and a binding-completeness check.
///
/// The check is the runtime analog of the generated-code binding
/// verification in behavioral-interface toolchains: every inbound
/// operation and outbound event slot must be wired before the component
/// is exercised.
pub trait Port {
    /// Returns the port's contract name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Returns the names of all slots that are still unbound.
    fn unbound_slots(&self) -> Vec<&'static str>;

    /// Verifies that every slot on this port has been wired.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Unbound`] naming the first missing slot.
    fn check_bindings(&self) -> Result<(), PortError> {
        match self.unbound_slots().first() {
            Some(slot) => Err(PortError::Unbound {
                port: self.name().to_string(),
                slot: (*slot).to_string(),
            }),
            None => Ok(()),
        }
    }
}
