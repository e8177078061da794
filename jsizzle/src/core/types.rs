//! Shared deterministic types for the execution protocol.
//!
//! These types are the contract between the dispatcher, the engine adapter and
//! the view state machine. They carry no I/O and no terminal state.

use std::fmt;

use serde::Deserialize;

/// Monotonic identifier of one accepted trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(u64);

impl RunId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable snapshot of the source text taken at trigger time.
///
/// Consumed exactly once by the engine adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    id: RunId,
    source: String,
}

impl ExecutionRequest {
    pub fn new(id: RunId, source: impl Into<String>) -> Self {
        Self {
            id,
            source: source.into(),
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Outcome of one execution unit. Exactly one variant is ever populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Captured log lines, in emission order.
    Success { output: Vec<String> },
    /// Diagnostic from the engine. Partial output is never carried.
    Failure { message: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Text shown in the result pane: newline-joined output or the diagnostic.
    pub fn display_text(&self) -> String {
        match self {
            Self::Success { output } => output.join("\n"),
            Self::Failure { message } => message.clone(),
        }
    }
}

/// Message delivered back to the event loop when an execution unit finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: RunId,
    pub result: ExecutionResult,
}

/// Which pane receives navigation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Output,
}

impl Focus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Logical view state derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState<'a> {
    Idle,
    Running,
    Displaying(&'a ExecutionResult),
}

impl ViewState<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Displaying(result) if result.is_success() => "ok",
            Self::Displaying(_) => "error",
        }
    }
}

/// What to do with a trigger that arrives while an execution is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusyPolicy {
    /// Discard the trigger.
    #[default]
    Drop,
    /// Hold the newest snapshot and dispatch it when the in-flight run completes.
    QueueLatest,
}
