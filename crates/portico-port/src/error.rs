//! Port layer errors.
//!
//! # Error Code Convention
//!
//! All port errors use the `PORT_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`PortError::Unbound`] | `PORT_UNBOUND` | No |
//!
//! An unbound slot is always a wiring bug in the harness or the
//! component assembly; retrying the call cannot succeed until the
//! wiring code changes.

use portico_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port layer error.
///
/// # Example
///
/// ```
/// use portico_port::{Operation, PortError};
/// use portico_types::ErrorCode;
///
/// let op: Operation<(), ()> = Operation::for_port("timer", "cancel");
/// let err = op.invoke(()).unwrap_err();
///
/// assert_eq!(err.code(), "PORT_UNBOUND");
/// assert!(!err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum PortError {
    /// An operation was invoked, or a completeness check ran, while a
    /// slot had no callback wired.
    #[error("port '{port}' has unbound slot '{slot}'")]
    Unbound {
        /// Name of the port contract.
        port: String,
        /// Name of the missing slot.
        slot: String,
    },
}

impl ErrorCode for PortError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unbound { .. } => "PORT_UNBOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[PortError::Unbound {
                port: "timer".into(),
                slot: "create".into(),
            }],
            "PORT_",
        );
    }

    #[test]
    fn unbound_message_names_port_and_slot() {
        let err = PortError::Unbound {
            port: "power_cord".into(),
            slot: "is_connected_to_outlet".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("power_cord"));
        assert!(msg.contains("is_connected_to_outlet"));
    }
}
