//! Two-pane terminal scratchpad for JavaScript.
//!
//! The user edits source in one pane, triggers a run, and reads the captured
//! `console.log` output or the engine's diagnostic in the other. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (dispatcher, view state machine,
//!   result protocol, geometry). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (script engine, worker scheduling,
//!   configuration, files). Isolated behind traits to enable fakes in tests.
//!
//! [`tui`] drives the interactive loop; [`batch`] runs a file without it.

pub mod batch;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tui;
