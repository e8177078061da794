//! Translation of terminal events into session events.
//!
//! | key          | effect                          |
//! |--------------|---------------------------------|
//! | ctrl+g       | run the source                  |
//! | shift+tab    | switch focus between panes      |
//! | esc          | release the editor              |
//! | ctrl+c       | quit                            |
//! | up/down/k/j  | scroll output (output focused)  |
//! | pgup/pgdn    | page output (output focused)    |
//! | home/g       | top of output (output focused)  |

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::session::{Event, Scroll};
use crate::core::types::Focus;
use crate::tui::editor::EditorInput;

pub const HELP: &str = "// ctrl+g to run // shift+tab to switch sides // ctrl+c to quit //";

/// Map a terminal event to a session event. `None` means the event is ignored.
pub fn translate(event: TermEvent, focus: Focus) -> Option<Event<EditorInput>> {
    match event {
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => translate_key(key, focus),
        TermEvent::Paste(text) if focus == Focus::Input => {
            Some(Event::Input(EditorInput::Paste(text)))
        }
        TermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: KeyEvent, focus: Focus) -> Option<Event<EditorInput>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Event::Quit),
        KeyCode::Char('g') if ctrl => return Some(Event::Trigger),
        KeyCode::BackTab => return Some(Event::SwitchFocus),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            return Some(Event::SwitchFocus);
        }
        KeyCode::Esc => return Some(Event::Escape),
        _ => {}
    }

    match focus {
        Focus::Input => Some(Event::Input(EditorInput::Key(key))),
        Focus::Output => {
            let scroll = match key.code {
                KeyCode::Up | KeyCode::Char('k') => Scroll::Up,
                KeyCode::Down | KeyCode::Char('j') => Scroll::Down,
                KeyCode::PageUp => Scroll::PageUp,
                KeyCode::PageDown | KeyCode::Char(' ') => Scroll::PageDown,
                KeyCode::Home | KeyCode::Char('g') => Scroll::Top,
                _ => return None,
            };
            Some(Event::Scroll(scroll))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_keys_work_in_both_panes() {
        for focus in [Focus::Input, Focus::Output] {
            assert_eq!(
                translate(press(KeyCode::Char('g'), KeyModifiers::CONTROL), focus),
                Some(Event::Trigger)
            );
            assert_eq!(
                translate(press(KeyCode::Char('c'), KeyModifiers::CONTROL), focus),
                Some(Event::Quit)
            );
            assert_eq!(
                translate(press(KeyCode::BackTab, KeyModifiers::SHIFT), focus),
                Some(Event::SwitchFocus)
            );
            assert_eq!(
                translate(press(KeyCode::Esc, KeyModifiers::NONE), focus),
                Some(Event::Escape)
            );
        }
    }

    #[test]
    fn plain_keys_go_to_editor_when_input_focused() {
        let key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(
            translate(TermEvent::Key(key), Focus::Input),
            Some(Event::Input(EditorInput::Key(key)))
        );
    }

    #[test]
    fn navigation_keys_scroll_when_output_focused() {
        assert_eq!(
            translate(press(KeyCode::Char('j'), KeyModifiers::NONE), Focus::Output),
            Some(Event::Scroll(Scroll::Down))
        );
        assert_eq!(
            translate(press(KeyCode::PageUp, KeyModifiers::NONE), Focus::Output),
            Some(Event::Scroll(Scroll::PageUp))
        );
        assert_eq!(
            translate(press(KeyCode::Char('x'), KeyModifiers::NONE), Focus::Output),
            None
        );
    }

    #[test]
    fn paste_only_reaches_focused_editor() {
        let paste = TermEvent::Paste("console.log(1)".to_string());
        assert_eq!(
            translate(paste.clone(), Focus::Input),
            Some(Event::Input(EditorInput::Paste("console.log(1)".to_string())))
        );
        assert_eq!(translate(paste, Focus::Output), None);
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(
            translate(TermEvent::Resize(100, 30), Focus::Output),
            Some(Event::Resize {
                width: 100,
                height: 30
            })
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(translate(TermEvent::Key(key), Focus::Input), None);
    }
}
