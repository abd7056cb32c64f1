//! Expectation queues and call recording.
//!
//! Each mocked operation owns an [`ExpectationQueue`]: the test pushes
//! one expectation per anticipated call (optionally with a canned
//! return value and a slot in a shared [`Sequence`]), and the mock's
//! wiring closure pops one per actual call. An actual call with no
//! queued expectation is a test failure and panics immediately, on the
//! driver thread that made it.
//!
//! Every consumed call is also appended to a [`CallLog`] for
//! snapshot-style assertions after the exercise phase.

use crate::Sequence;
use crate::MockError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Record of one inbound call observed by a mock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Name of the mocked port.
    pub port: String,
    /// Operation that was called.
    pub operation: String,
    /// Arguments, serialized for inspection.
    pub args: Value,
}

/// Shared, append-only log of calls observed by one mock.
#[derive(Clone, Default)]
pub struct CallLog {
    records: Arc<Mutex<Vec<CallRecord>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&self, port: &str, operation: &str, args: Value) {
        self.records.lock().push(CallRecord {
            port: port.to_string(),
            operation: operation.to_string(),
            args,
        });
    }

    /// Returns a snapshot of all records so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CallRecord> {
        self.records.lock().clone()
    }

    /// Returns how many calls have been observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns whether no calls have been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl std::fmt::Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog").field("len", &self.len()).finish()
    }
}

struct Expectation<R> {
    ticket: Option<(Sequence, u64)>,
    ret: R,
}

/// A queue of programmed expectations for one mocked operation.
///
/// # Protocol
///
/// - One queued expectation satisfies exactly one actual call.
/// - Calls consume expectations front to back.
/// - A call with an empty queue panics (`unexpected call`).
/// - An expectation registered in a [`Sequence`] additionally asserts
///   its cross-mock position when consumed.
///
/// # Example
///
/// ```
/// use portico_harness::{ExpectationQueue, Sequence};
///
/// let seq = Sequence::new();
/// let queue: ExpectationQueue<bool> = ExpectationQueue::new("power_cord", "is_connected_to_outlet");
///
/// queue.expect_in(&seq, true);
/// assert!(queue.consume());
/// assert!(queue.verify().is_ok());
/// ```
pub struct ExpectationQueue<R> {
    port: &'static str,
    operation: &'static str,
    queue: Arc<Mutex<VecDeque<Expectation<R>>>>,
}

impl<R> ExpectationQueue<R> {
    /// Creates an empty queue for `port.operation`.
    #[must_use]
    pub fn new(port: &'static str, operation: &'static str) -> Self {
        Self {
            port,
            operation,
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queues one expectation outside any ordering domain.
    pub fn expect(&self, ret: R) {
        self.queue.lock().push_back(Expectation { ticket: None, ret });
    }

    /// Queues one expectation holding the next slot in `seq`.
    pub fn expect_in(&self, seq: &Sequence, ret: R) {
        let ticket = seq.register(format!("{}.{}", self.port, self.operation));
        self.queue.lock().push_back(Expectation {
            ticket: Some((seq.clone(), ticket)),
            ret,
        });
    }

    /// Consumes the front expectation and returns its canned value.
    ///
    /// # Panics
    ///
    /// Panics when no expectation is queued, or when the expectation's
    /// sequence slot is not the next one in order.
    pub fn consume(&self) -> R {
        let front = self.queue.lock().pop_front();
        let Some(expectation) = front else {
            panic!(
                "unexpected call to '{}.{}': no expectation queued",
                self.port, self.operation
            );
        };
        if let Some((seq, ticket)) = expectation.ticket {
            seq.consume(ticket);
        }
        debug!(port = self.port, operation = self.operation, "expectation consumed");
        expectation.ret
    }

    /// Returns the number of unconsumed expectations.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Asserts the queue was fully consumed.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::UnmetExpectation`] when expectations remain.
    pub fn verify(&self) -> Result<(), MockError> {
        let remaining = self.pending();
        if remaining == 0 {
            Ok(())
        } else {
            Err(MockError::UnmetExpectation {
                port: self.port.to_string(),
                operation: self.operation.to_string(),
                remaining,
            })
        }
    }
}

impl<R> Clone for ExpectationQueue<R> {
    fn clone(&self) -> Self {
        Self {
            port: self.port,
            operation: self.operation,
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<R> std::fmt::Debug for ExpectationQueue<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpectationQueue")
            .field("port", &self.port)
            .field("operation", &self.operation)
            .field("pending", &self.pending())
            .finish()
    }
}
