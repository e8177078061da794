//! Source pane text buffer built on `tui-textarea`.

use crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use tui_textarea::TextArea;

use crate::core::text_buffer::{TextBuffer, WidgetError};

const PLACEHOLDER: &str = "// write JavaScript here, ctrl+g runs it";

/// Input accepted by the source editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorInput {
    Key(KeyEvent),
    Paste(String),
}

pub struct SourceEditor {
    textarea: TextArea<'static>,
    focused: bool,
    size: (u16, u16),
    max_bytes: usize,
}

impl SourceEditor {
    pub fn new(max_bytes: usize) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);
        textarea.set_cursor_line_style(Style::default());
        let mut editor = Self {
            textarea,
            focused: false,
            size: (0, 0),
            max_bytes,
        };
        editor.apply_cursor_style();
        editor
    }

    /// Widget to render inside the source pane.
    pub fn widget(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    fn byte_len(&self) -> usize {
        let lines = self.textarea.lines();
        lines.iter().map(String::len).sum::<usize>() + lines.len().saturating_sub(1)
    }

    fn apply_cursor_style(&mut self) {
        let style = if self.focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(style);
    }
}

impl TextBuffer for SourceEditor {
    type Input = EditorInput;

    fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    fn focus(&mut self) {
        self.focused = true;
        self.apply_cursor_style();
    }

    fn blur(&mut self) {
        self.focused = false;
        self.apply_cursor_style();
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn update(&mut self, input: EditorInput) -> Result<(), WidgetError> {
        let modified = match input {
            EditorInput::Key(key) => self.textarea.input(key),
            EditorInput::Paste(text) => self.textarea.insert_str(text.replace("\r\n", "\n")),
        };
        if modified && self.byte_len() > self.max_bytes {
            self.textarea.undo();
            return Err(WidgetError::CapacityExceeded {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> EditorInput {
        EditorInput::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(editor: &mut SourceEditor, text: &str) {
        for ch in text.chars() {
            let input = if ch == '\n' {
                key(KeyCode::Enter)
            } else {
                key(KeyCode::Char(ch))
            };
            editor.update(input).expect("update");
        }
    }

    #[test]
    fn typed_text_becomes_value() {
        let mut editor = SourceEditor::new(1024);
        type_str(&mut editor, "console.log(1)\nconsole.log(2)");
        assert_eq!(editor.value(), "console.log(1)\nconsole.log(2)");
    }

    #[test]
    fn paste_inserts_text_and_normalizes_newlines() {
        let mut editor = SourceEditor::new(1024);
        editor
            .update(EditorInput::Paste("let a = 1;\r\nconsole.log(a)".to_string()))
            .expect("paste");
        assert_eq!(editor.value(), "let a = 1;\nconsole.log(a)");
    }

    #[test]
    fn edit_past_capacity_is_rejected_and_undone() {
        let mut editor = SourceEditor::new(4);
        type_str(&mut editor, "abcd");
        let err = editor.update(key(KeyCode::Char('e'))).expect_err("too big");
        assert_eq!(err, WidgetError::CapacityExceeded { limit: 4 });
        assert_eq!(editor.value(), "abcd");

        editor.update(key(KeyCode::Backspace)).expect("shrink");
        assert_eq!(editor.value(), "abc");
    }

    #[test]
    fn focus_and_blur_are_tracked() {
        let mut editor = SourceEditor::new(16);
        assert!(!editor.is_focused());
        editor.focus();
        assert!(editor.is_focused());
        editor.blur();
        assert!(!editor.is_focused());
    }

    #[test]
    fn set_size_records_dimensions() {
        let mut editor = SourceEditor::new(16);
        editor.set_size(38, 16);
        assert_eq!(editor.size(), (38, 16));
    }
}
