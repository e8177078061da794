//! Interactive event loop.
//!
//! A single task owns the session and consumes terminal events and execution
//! completions in arrival order. Script execution never runs on this task.

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::ExecutableCommand;
use crossterm::cursor::Show;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, EventStream};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::core::session::{Effect, Event, Session};
use crate::io::config::AppConfig;
use crate::io::engine::{QuickJsEngine, ScriptEngine};
use crate::io::scheduler::Scheduler;
use crate::tui::editor::SourceEditor;
use crate::tui::{keymap, render};

/// Owns the terminal for the lifetime of the interface and restores it on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    alt_screen: bool,
}

impl TerminalGuard {
    fn enter(alt_screen: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if alt_screen {
            stdout.execute(EnterAlternateScreen)?;
        }
        stdout.execute(EnableBracketedPaste)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            alt_screen,
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableBracketedPaste);
        if self.alt_screen {
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
        let _ = io::stdout().execute(Show);
    }
}

/// Run the interface until the user quits.
///
/// Blocks the calling thread on a dedicated tokio runtime.
pub fn run(config: &AppConfig, alt_screen: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let outcome = runtime.block_on(event_loop(config, alt_screen));
    // A script still running after quit must not hold the process open.
    runtime.shutdown_background();
    outcome
}

async fn event_loop(config: &AppConfig, alt_screen: bool) -> Result<()> {
    let engine: Arc<dyn ScriptEngine> = Arc::new(QuickJsEngine::new(&config.execution));
    let (completions_tx, mut completions) = mpsc::unbounded_channel();
    let scheduler = Scheduler::new(engine, completions_tx);

    let mut guard = TerminalGuard::enter(alt_screen).context("set up terminal")?;
    let size = guard.terminal.size().context("read terminal size")?;
    let editor = SourceEditor::new(config.interface.max_source_bytes);
    let (mut session, _) = Session::new(editor, config.interface.busy_policy).update(
        Event::Resize {
            width: size.width,
            height: size.height,
        },
    );

    let mut terminal_events = EventStream::new();
    info!(
        width = size.width,
        height = size.height,
        policy = ?config.interface.busy_policy,
        "interactive session started"
    );

    loop {
        guard
            .terminal
            .draw(|frame| render::draw(frame, &session))
            .context("draw frame")?;

        let event = tokio::select! {
            input = terminal_events.next() => match input {
                Some(Ok(input)) => match keymap::translate(input, session.focus()) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(err)) => return Err(err).context("read terminal event"),
                None => break,
            },
            Some(completion) = completions.recv() => Event::Finished(completion),
        };

        let (next, effect) = session.update(event);
        session = next;
        match effect {
            Effect::None => {}
            Effect::Execute(request) => {
                scheduler.schedule(request);
            }
            Effect::Quit => break,
        }
    }

    debug!(running = session.is_running(), "interactive session ended");
    Ok(())
}
