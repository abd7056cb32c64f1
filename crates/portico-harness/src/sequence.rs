//! Strict cross-mock call ordering.
//!
//! A [`Sequence`] is an ordering domain shared by every expectation
//! registered against it, across all mocks. Expectations must be
//! consumed in registration order; a call that arrives out of turn is
//! a test failure and panics with a diagnostic naming both the actual
//! and the expected call.
//!
//! Two independent `Sequence` instances do not constrain each other,
//! so a test that only cares about ordering within one dependency can
//! give each mock its own sequence.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Default)]
struct SequenceState {
    next_ticket: u64,
    cursor: u64,
    labels: BTreeMap<u64, String>,
}

/// A shared strict-ordering domain for mock expectations.
///
/// Cloning is cheap and shares the domain; pass clones (or references)
/// of one sequence to every `expect_*` call whose relative order the
/// test asserts.
///
/// # Example
///
/// ```
/// use portico_harness::Sequence;
///
/// let seq = Sequence::new();
/// let first = seq.register("heater_element.on");
/// let second = seq.register("heater_element.off");
///
/// seq.consume(first);   // In order: fine
/// seq.consume(second);
/// ```
#[derive(Clone, Default)]
pub struct Sequence {
    state: Arc<Mutex<SequenceState>>,
}

impl Sequence {
    /// Creates an empty ordering domain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the next slot in the ordering and returns its ticket.
    ///
    /// The label (conventionally `port.operation`) appears in order
    /// violation diagnostics.
    #[must_use]
    pub fn register(&self, label: impl Into<String>) -> u64 {
        let mut state = self.state.lock();
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.labels.insert(ticket, label.into());
        ticket
    }

    /// Consumes a ticket, asserting it is the next one in order.
    ///
    /// # Panics
    ///
    /// Panics when `ticket` is not the ordering cursor, naming the call
    /// that arrived and the call that was expected instead.
    pub fn consume(&self, ticket: u64) {
        let mut state = self.state.lock();
        if ticket != state.cursor {
            let got = state
                .labels
                .get(&ticket)
                .cloned()
                .unwrap_or_else(|| format!("ticket {ticket}"));
            let expected = state
                .labels
                .get(&state.cursor)
                .cloned()
                .unwrap_or_else(|| format!("ticket {}", state.cursor));
            panic!("strict order violated: '{got}' arrived but '{expected}' was expected next");
        }
        state.labels.remove(&ticket);
        state.cursor += 1;
    }

    /// Returns the number of registered-but-unconsumed slots.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.state.lock().labels.len()
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_consumption_passes() {
        let seq = Sequence::new();
        let a = seq.register("cord.initialize");
        let b = seq.register("heater.on");
        let c = seq.register("heater.off");

        seq.consume(a);
        seq.consume(b);
        seq.consume(c);
        assert_eq!(seq.outstanding(), 0);
    }

    #[test]
    #[should_panic(expected = "strict order violated")]
    fn out_of_order_consumption_panics() {
        let seq = Sequence::new();
        let _first = seq.register("heater.on");
        let second = seq.register("heater.off");

        seq.consume(second);
    }

    #[test]
    fn violation_names_both_calls() {
        let seq = Sequence::new();
        let _first = seq.register("heater.on");
        let second = seq.register("heater.off");

        let panic = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            seq.consume(second);
        }))
        .expect_err("consumption out of order must panic");

        let msg = panic
            .downcast_ref::<String>()
            .expect("panic payload is a String");
        assert!(msg.contains("heater.off"));
        assert!(msg.contains("heater.on"));
    }

    #[test]
    fn independent_sequences_do_not_interact() {
        let left = Sequence::new();
        let right = Sequence::new();

        let l = left.register("a");
        let r = right.register("b");

        // Either order is fine across domains.
        right.consume(r);
        left.consume(l);
    }

    #[test]
    fn clones_share_the_domain() {
        let seq = Sequence::new();
        let alias = seq.clone();

        let t = seq.register("x");
        assert_eq!(alias.outstanding(), 1);
        alias.consume(t);
        assert_eq!(seq.outstanding(), 0);
    }
}
