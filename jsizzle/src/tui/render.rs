//! Projects a session into a drawable frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::layout::{FOOTER_ROWS, MARGIN_COLS, PaneRect};
use crate::core::session::Session;
use crate::core::text_buffer::TextBuffer;
use crate::core::types::{ExecutionResult, Focus, ViewState};
use crate::tui::editor::SourceEditor;
use crate::tui::keymap::HELP;

pub const TITLE: &str = "jsizzle";
const IDLE_HINT: &str = "press ctrl+g to run";
const TOO_SMALL: &str = "terminal too small";

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

fn focused_border() -> Style {
    Style::default().fg(Color::LightBlue)
}

impl From<PaneRect> for Rect {
    fn from(pane: PaneRect) -> Self {
        Rect::new(pane.x, pane.y, pane.width, pane.height)
    }
}

/// Draw header, both panes and footer.
pub fn draw(frame: &mut Frame<'_>, session: &Session<SourceEditor>) {
    let area = frame.area();
    let geometry = session.geometry();
    if !geometry.is_usable() {
        frame.render_widget(Paragraph::new(TOO_SMALL).wrap(Wrap { trim: true }), area);
        return;
    }
    let source_area = Rect::from(geometry.source).intersection(area);
    let result_area = Rect::from(geometry.result).intersection(area);

    draw_header(frame, area);
    draw_source(frame, source_area, session);
    draw_result(frame, result_area, session);
    draw_footer(frame, area, session);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect) {
    if area.height < 2 {
        return;
    }
    let title = Rect::new(area.x + MARGIN_COLS.min(area.width), area.y + 1, area.width, 1)
        .intersection(area);
    frame.render_widget(
        Paragraph::new(Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD))),
        title,
    );
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block.border_style(focused_border())
    } else {
        block
    }
}

fn draw_source(frame: &mut Frame<'_>, area: Rect, session: &Session<SourceEditor>) {
    if area.is_empty() {
        return;
    }
    let block = pane_block("source".to_string(), session.focus() == Focus::Input);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(session.buffer().widget(), inner);
}

fn draw_result(frame: &mut Frame<'_>, area: Rect, session: &Session<SourceEditor>) {
    if area.is_empty() {
        return;
    }
    let title = if session.is_running() {
        "output (running…)".to_string()
    } else {
        "output".to_string()
    };
    let block = pane_block(title, session.focus() == Focus::Output);
    let paragraph = Paragraph::new(result_text(session))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((session.output_scroll(), 0));
    frame.render_widget(paragraph, area);
}

/// Content of the result pane. While running, the previous result stays
/// visible; with nothing to show, a hint or a running indicator is shown.
pub fn result_text(session: &Session<impl TextBuffer>) -> Text<'static> {
    match (session.view_state(), session.result()) {
        (ViewState::Running, Some(previous)) => result_body(previous),
        (ViewState::Running, None) => Text::styled("running…", dim()),
        (ViewState::Displaying(result), _) => result_body(result),
        (ViewState::Idle, _) => Text::styled(IDLE_HINT, dim()),
    }
}

fn result_body(result: &ExecutionResult) -> Text<'static> {
    let text = Text::from(result.display_text());
    if result.is_success() {
        text
    } else {
        text.style(error_style())
    }
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, session: &Session<SourceEditor>) {
    if area.height < FOOTER_ROWS {
        return;
    }
    let focus = match session.focus() {
        Focus::Input => "source",
        Focus::Output => "output",
    };
    let mut lines = vec![
        Line::from(HELP),
        Line::from(format!(
            "status: {} | focus: {}",
            session.view_state().label(),
            focus
        )),
    ];
    if let Some(err) = session.widget_error() {
        lines.push(Line::styled(err.to_string(), error_style()));
    }
    let footer = Rect::new(
        area.x + MARGIN_COLS.min(area.width),
        area.y + area.height - FOOTER_ROWS,
        area.width.saturating_sub(MARGIN_COLS),
        FOOTER_ROWS,
    );
    frame.render_widget(Paragraph::new(lines), footer);
}
