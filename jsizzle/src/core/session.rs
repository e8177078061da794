//! View state machine for one interactive session.
//!
//! The session is an explicit value threaded through the event loop. Each
//! event consumes it and returns the next session together with one
//! [`Effect`] for the loop to carry out.

use tracing::{debug, warn};

use crate::core::dispatch;
use crate::core::layout::{self, PaneGeometry};
use crate::core::text_buffer::TextBuffer;
use crate::core::types::{
    BusyPolicy, Completion, ExecutionRequest, ExecutionResult, Focus, RunId, ViewState,
};

/// Result-pane scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<I> {
    Trigger,
    SwitchFocus,
    Escape,
    Quit,
    Resize { width: u16, height: u16 },
    Input(I),
    Scroll(Scroll),
    Finished(Completion),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Execute(ExecutionRequest),
    Quit,
}

impl From<Option<ExecutionRequest>> for Effect {
    fn from(request: Option<ExecutionRequest>) -> Self {
        request.map_or(Self::None, Self::Execute)
    }
}

#[derive(Debug)]
pub struct Session<B> {
    pub(crate) buffer: B,
    pub(crate) result: Option<ExecutionResult>,
    pub(crate) running: bool,
    pub(crate) focus: Focus,
    pub(crate) policy: BusyPolicy,
    pub(crate) last_run: RunId,
    pub(crate) in_flight: Option<RunId>,
    pub(crate) pending: Option<ExecutionRequest>,
    pub(crate) widget_error: Option<String>,
    pub(crate) geometry: PaneGeometry,
    pub(crate) output_scroll: u16,
}

impl<B: TextBuffer> Session<B> {
    /// Initial state: idle, input pane focused.
    pub fn new(mut buffer: B, policy: BusyPolicy) -> Self {
        buffer.focus();
        Self {
            buffer,
            result: None,
            running: false,
            focus: Focus::Input,
            policy,
            last_run: RunId::default(),
            in_flight: None,
            pending: None,
            widget_error: None,
            geometry: PaneGeometry::default(),
            output_scroll: 0,
        }
    }

    /// Apply one event.
    pub fn update(self, event: Event<B::Input>) -> (Self, Effect) {
        match event {
            Event::Trigger => {
                let (request, session) = dispatch::trigger(self);
                (session, request.into())
            }
            Event::Finished(completion) => {
                let (request, session) = dispatch::complete(self, completion);
                (session, request.into())
            }
            Event::SwitchFocus => (self.switch_focus(), Effect::None),
            Event::Escape => (self.escape(), Effect::None),
            Event::Quit => {
                debug!(running = self.running, "quit requested");
                (self, Effect::Quit)
            }
            Event::Resize { width, height } => (self.resize(width, height), Effect::None),
            Event::Input(input) => (self.edit(input), Effect::None),
            Event::Scroll(scroll) => (self.scroll(scroll), Effect::None),
        }
    }

    fn switch_focus(mut self) -> Self {
        self.focus = self.focus.toggled();
        match self.focus {
            Focus::Input => self.buffer.focus(),
            Focus::Output => self.buffer.blur(),
        }
        debug!(focus = ?self.focus, "focus switched");
        self
    }

    fn escape(mut self) -> Self {
        if self.focus == Focus::Input && self.buffer.is_focused() {
            self.buffer.blur();
        }
        self
    }

    fn resize(mut self, width: u16, height: u16) -> Self {
        self.geometry = layout::compute(width, height);
        let (inner_width, inner_height) = self.geometry.source.inner_size();
        self.buffer.set_size(inner_width, inner_height);
        debug!(width, height, "resized");
        self
    }

    fn edit(mut self, input: B::Input) -> Self {
        if self.focus != Focus::Input {
            return self;
        }
        if !self.buffer.is_focused() {
            self.buffer.focus();
        }
        match self.buffer.update(input) {
            Ok(()) => self.widget_error = None,
            Err(err) => {
                warn!(err = %err, "text buffer rejected input");
                self.widget_error = Some(err.to_string());
            }
        }
        self
    }

    fn scroll(mut self, scroll: Scroll) -> Self {
        if self.focus != Focus::Output {
            return self;
        }
        let (width, height) = self.geometry.result.inner_size();
        let page = height.max(1);
        let max_scroll = self.result_rows(width).saturating_sub(height);
        self.output_scroll = match scroll {
            Scroll::Up => self.output_scroll.saturating_sub(1),
            Scroll::Down => self.output_scroll.saturating_add(1),
            Scroll::PageUp => self.output_scroll.saturating_sub(page),
            Scroll::PageDown => self.output_scroll.saturating_add(page),
            Scroll::Top => 0,
        }
        .min(max_scroll);
        self
    }

    /// Rows the current result occupies when wrapped to `width` columns.
    fn result_rows(&self, width: u16) -> u16 {
        let Some(result) = &self.result else {
            return 0;
        };
        let width = usize::from(width.max(1));
        let rows: usize = result
            .display_text()
            .lines()
            .map(|line| line.chars().count().div_ceil(width).max(1))
            .sum();
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    pub fn view_state(&self) -> ViewState<'_> {
        if self.running {
            return ViewState::Running;
        }
        match &self.result {
            Some(result) => ViewState::Displaying(result),
            None => ViewState::Idle,
        }
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        self.result.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn in_flight(&self) -> Option<RunId> {
        self.in_flight
    }

    pub fn pending(&self) -> Option<&ExecutionRequest> {
        self.pending.as_ref()
    }

    pub fn widget_error(&self) -> Option<&str> {
        self.widget_error.as_deref()
    }

    pub fn geometry(&self) -> PaneGeometry {
        self.geometry
    }

    pub fn output_scroll(&self) -> u16 {
        self.output_scroll
    }
}
