//! Seam between the view state machine and the editable text widget.
//!
//! The session never copies the source text; it asks the buffer for its value
//! only when a snapshot is needed.

use thiserror::Error;

/// Opaque failure reported by a text buffer while applying input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("source exceeds {limit} bytes; edit discarded")]
    CapacityExceeded { limit: usize },
}

/// Editable text widget driven by the session.
pub trait TextBuffer {
    /// Input understood by the widget (keystrokes, pastes).
    type Input;

    /// Current text, lines joined with `\n`.
    fn value(&self) -> String;

    fn focus(&mut self);

    fn blur(&mut self);

    fn is_focused(&self) -> bool;

    /// Content area available to the widget, excluding borders.
    fn set_size(&mut self, width: u16, height: u16);

    fn update(&mut self, input: Self::Input) -> Result<(), WidgetError>;
}
