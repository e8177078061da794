//! Stable exit codes for the jsizzle binary.

/// Interface exited normally, or a batch script completed.
pub const OK: i32 = 0;
/// Invalid invocation: unreadable script or config, terminal setup failure.
pub const INVALID: i32 = 1;
/// A batch script raised a diagnostic.
pub const SCRIPT_FAILED: i32 = 2;
