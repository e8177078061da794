//! Test-only collaborators: an in-memory text buffer and a scripted engine.

use crate::core::text_buffer::{TextBuffer, WidgetError};
use crate::io::engine::{Console, EngineError, ScriptEngine};

/// Text buffer backed by a `String`. Each input is appended verbatim.
#[derive(Debug, Clone, Default)]
pub struct FakeBuffer {
    text: String,
    focused: bool,
    size: (u16, u16),
    capacity: Option<usize>,
}

impl FakeBuffer {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Reject inputs that would grow the text past `bytes`.
    pub fn set_capacity(&mut self, bytes: usize) {
        self.capacity = Some(bytes);
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}

impl TextBuffer for FakeBuffer {
    type Input = String;

    fn value(&self) -> String {
        self.text.clone()
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn update(&mut self, input: String) -> Result<(), WidgetError> {
        if let Some(limit) = self.capacity
            && self.text.len() + input.len() > limit
        {
            return Err(WidgetError::CapacityExceeded { limit });
        }
        self.text.push_str(&input);
        Ok(())
    }
}

/// Engine that ignores the source and replays a fixed script of log calls.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    lines: Vec<String>,
    failure: Option<String>,
    panic: Option<String>,
}

impl ScriptedEngine {
    /// Log each entry, then complete.
    pub fn logging(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            failure: None,
            panic: None,
        }
    }

    /// Log each entry, then fail with `message`.
    pub fn failing(lines: &[&str], message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::logging(lines)
        }
    }
}

impl ScriptedEngine {
    /// Panic with `message` instead of completing.
    pub fn panicking(message: &str) -> Self {
        Self {
            panic: Some(message.to_string()),
            ..Self::logging(&[])
        }
    }
}

impl ScriptEngine for ScriptedEngine {
    fn eval(&self, _source: &str, console: Console) -> Result<(), EngineError> {
        if let Some(message) = &self.panic {
            panic!("{message}");
        }
        for line in &self.lines {
            console.log([line]);
        }
        match &self.failure {
            Some(message) => Err(EngineError::Exception(message.clone())),
            None => Ok(()),
        }
    }
}
