//! Execution-scoped accumulator of logged lines.

use std::fmt::Display;

/// Separator placed between the arguments of a single log call.
pub const ARG_DELIMITER: &str = " ";

/// Append-only, ordered sequence of log entries owned by one execution unit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CaptureBuffer {
    lines: Vec<String>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry for a single log call.
    ///
    /// Every argument goes through the same `Display` conversion before being
    /// joined with [`ARG_DELIMITER`].
    pub fn log<I, T>(&mut self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let line = args
            .into_iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .join(ARG_DELIMITER);
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
