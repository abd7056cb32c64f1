//! Unified error interface for Portico crates.
//!
//! Every Portico error type implements [`ErrorCode`] so harness code can
//! branch on stable machine-readable codes instead of display strings.
//!
//! # Code Convention
//!
//! | Crate | Prefix | Example |
//! |-------|--------|---------|
//! | portico-port | `PORT_` | `PORT_UNBOUND` |
//! | portico-sync | `SYNC_` | `SYNC_WAIT_TIMEOUT` |
//! | portico-harness | `MOCK_` | `MOCK_UNMET_EXPECTATION` |
//!
//! # Example
//!
//! ```
//! use portico_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum WaitError {
//!     TimedOut,
//!     Disconnected,
//! }
//!
//! impl ErrorCode for WaitError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::TimedOut => "WAIT_TIMEOUT",
//!             Self::Disconnected => "WAIT_DISCONNECTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         // A timed-out wait can simply be retried with a longer bound;
//!         // a torn-down handoff cannot.
//!         matches!(self, Self::TimedOut)
//!     }
//! }
//!
//! assert_eq!(WaitError::TimedOut.code(), "WAIT_TIMEOUT");
//! assert!(WaitError::TimedOut.is_recoverable());
//! ```

/// Stable machine-readable error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"SYNC_WAIT_TIMEOUT"`
/// - **Prefixed per crate**: `PORT_`, `SYNC_`, `MOCK_`
/// - **Stable**: a published code never changes (API contract)
///
/// # Recoverability
///
/// An error is recoverable when retrying the operation may succeed
/// (a longer wait bound, a component that became ready). Misuse errors
/// (unbound ports, mis-ordered expectations) are not: they indicate a
/// bug in the test or the wiring and will not change on retry.
pub trait ErrorCode {
    /// Returns the machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying the failed operation may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows Portico conventions.
///
/// # Checks
///
/// 1. Code is non-empty
/// 2. Code starts with the expected crate prefix
/// 3. Code is UPPER_SNAKE_CASE
///
/// # Panics
///
/// Panics with a descriptive message if any check fails. Intended for
/// use in tests, typically through [`assert_error_codes`] over every
/// variant of an error enum.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in a slice with [`assert_error_code`].
///
/// Use this from a single test that enumerates all variants of an error
/// enum, so adding a variant with a malformed code fails loudly.
///
/// # Example
///
/// ```
/// use portico_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { A, B }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::A => "MY_A",
///             Self::B => "MY_B",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[MyError::A, MyError::B], "MY_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
