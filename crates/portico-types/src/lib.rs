//! Core types for the Portico conformance harness.
//!
//! This crate provides the foundational vocabulary shared by every other
//! Portico crate: the opaque [`TimerHandle`] scheduler token and the
//! [`ErrorCode`] trait for unified error handling.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Contract Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  portico-types : TimerHandle, ErrorCode          ◄── HERE   │
//! │  portico-port  : Binding slots, port contracts              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Synchronization Core                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  portico-sync  : TimerPump, DelayTimer, Signal              │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Test Harness Layer                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  portico-harness : mock ports, Sequence, ToasterBench       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Handle Design
//!
//! Scheduler handles are **registry-issued monotonic tokens**, never
//! derived from object addresses. This keeps the pump free to store its
//! schedule in any indexed structure and removes any reliance on
//! allocation stability.
//!
//! # Example
//!
//! ```
//! use portico_types::TimerHandle;
//!
//! let a = TimerHandle::next();
//! let b = TimerHandle::next();
//!
//! assert_ne!(a, b);  // Every issued handle is unique
//! ```

#![warn(missing_docs)]

mod error;
mod handle;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use handle::TimerHandle;
