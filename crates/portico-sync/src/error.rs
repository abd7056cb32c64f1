//! Synchronization layer errors.
//!
//! # Error Code Convention
//!
//! All sync errors use the `SYNC_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`SignalError::TimedOut`] | `SYNC_WAIT_TIMEOUT` | Yes |
//! | [`SignalError::Disconnected`] | `SYNC_WAIT_DISCONNECTED` | No |
//!
//! A timed-out wait means the test observed nothing within its bound;
//! the awaited outcome may still occur later, so waiting again with a
//! longer bound can succeed. A disconnected handoff means the signal's
//! internals were torn down without ever being triggered: something is
//! wrong in the harness itself, not in the timing of the test.

use portico_types::ErrorCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure outcome of a bounded signal wait.
///
/// The two variants deliberately keep "nothing happened in time" and
/// "the wait primitive itself failed" apart, so tests can assert on
/// exactly the case they mean.
///
/// # Example
///
/// ```
/// use portico_sync::{Signal, SignalError};
/// use portico_types::ErrorCode;
/// use std::time::Duration;
///
/// let signal = Signal::named("ok");
/// let err = signal
///     .await_triggered(Duration::from_millis(10))
///     .expect_err("nothing was triggered");
///
/// assert_eq!(err.code(), "SYNC_WAIT_TIMEOUT");
/// assert!(err.to_string().contains("10ms"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum SignalError {
    /// The wait bound elapsed before a trigger was observed.
    ///
    /// The message carries the attempted duration so a failing test
    /// names both what was awaited and for how long.
    #[error("timed out after {waited:?} waiting for signal '{signal}'")]
    TimedOut {
        /// Name of the awaited signal.
        signal: String,
        /// The configured wait bound.
        waited: Duration,
    },

    /// The underlying handoff was torn down without ever triggering.
    ///
    /// Distinct from a timeout: this reports a fault in the harness
    /// (the producer side disappeared), not an absent event.
    #[error("handoff torn down without a trigger for signal '{signal}'")]
    Disconnected {
        /// Name of the awaited signal.
        signal: String,
    },
}

impl ErrorCode for SignalError {
    fn code(&self) -> &'static str {
        match self {
            Self::TimedOut { .. } => "SYNC_WAIT_TIMEOUT",
            Self::Disconnected { .. } => "SYNC_WAIT_DISCONNECTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::TimedOut { .. } => true,
            Self::Disconnected { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_types::assert_error_codes;

    fn all_variants() -> Vec<SignalError> {
        vec![
            SignalError::TimedOut {
                signal: "ok".into(),
                waited: Duration::from_millis(50),
            },
            SignalError::Disconnected { signal: "ok".into() },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "SYNC_");
    }

    #[test]
    fn timeout_message_carries_duration_and_name() {
        let err = SignalError::TimedOut {
            signal: "toast_done".into(),
            waited: Duration::from_millis(500),
        };
        let msg = err.to_string();
        assert!(msg.contains("500ms"));
        assert!(msg.contains("toast_done"));
    }

    #[test]
    fn variants_survive_serialization() {
        for err in all_variants() {
            let json = serde_json::to_string(&err).expect("serialize");
            let back: SignalError = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, err);
        }
    }

    #[test]
    fn only_timeout_is_recoverable() {
        assert!(SignalError::TimedOut {
            signal: "x".into(),
            waited: Duration::ZERO,
        }
        .is_recoverable());
        assert!(!SignalError::Disconnected { signal: "x".into() }.is_recoverable());
    }
}
