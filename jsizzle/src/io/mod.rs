//! I/O helpers: script engine, scheduling, configuration, files.

pub mod config;
pub mod engine;
pub mod scheduler;
pub mod source;
