//! Opaque scheduler handle.
//!
//! A [`TimerHandle`] identifies one pending scheduled callback inside a
//! timer pump. Handles are issued from a process-wide monotonic counter,
//! so two live handles never collide and a handle never outlives its
//! meaning (a fired or unscheduled handle simply becomes unknown to the
//! pump and any further operation on it is a no-op).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide handle counter. Starts at 1 so 0 is never issued.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque token identifying a pending scheduled callback.
///
/// # Identity Semantics
///
/// Equality compares the issued token value. A component that owns a
/// handle owns exactly one registration slot in the pump; it must never
/// operate on another component's handle.
///
/// # Example
///
/// ```
/// use portico_types::TimerHandle;
///
/// let h1 = TimerHandle::next();
/// let h2 = TimerHandle::next();
///
/// assert_ne!(h1, h2);
/// assert_eq!(h1, h1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Issues a fresh, process-unique handle.
    ///
    /// Handles are monotonically increasing; the counter is shared by
    /// all pumps in the process so a handle can be moved between pumps
    /// without ambiguity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw token value.
    ///
    /// Intended for logging and diagnostics only; the value carries no
    /// meaning outside the issuing process.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}
