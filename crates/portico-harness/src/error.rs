//! Harness layer errors.
//!
//! # Error Code Convention
//!
//! All harness errors use the `MOCK_` prefix:
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`MockError::UnmetExpectation`] | `MOCK_UNMET_EXPECTATION` | No |
//! | [`MockError::NotWired`] | `MOCK_NOT_WIRED` | No |
//!
//! Unexpected and mis-ordered calls are reported by panicking on the
//! driver thread (they are test assertions, like any failed `assert!`);
//! these error values cover the conditions a test inspects *after* the
//! exercise phase instead.

use portico_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Harness layer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum MockError {
    /// `verify()` found programmed expectations that were never
    /// consumed: the component under test made fewer calls than the
    /// test declared.
    #[error("mock '{port}' has {remaining} unconsumed expectation(s) for '{operation}'")]
    UnmetExpectation {
        /// Name of the mocked port.
        port: String,
        /// Operation whose queue is not empty.
        operation: String,
        /// Number of leftover expectations.
        remaining: usize,
    },

    /// A spontaneous event trigger was requested before the mock was
    /// wired to a peer port.
    #[error("mock '{port}' is not wired to a peer port")]
    NotWired {
        /// Name of the mocked port.
        port: String,
    },
}

impl ErrorCode for MockError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnmetExpectation { .. } => "MOCK_UNMET_EXPECTATION",
            Self::NotWired { .. } => "MOCK_NOT_WIRED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
