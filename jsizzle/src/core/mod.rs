//! Deterministic, pure logic for the execution/view state machine.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod capture;
pub mod dispatch;
pub mod layout;
pub mod session;
pub mod text_buffer;
pub mod types;
