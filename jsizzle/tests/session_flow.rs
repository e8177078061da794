//! End-to-end flows through the view state machine.
//!
//! Drives `Session::update` against the QuickJS engine and the tokio
//! scheduler, feeding completions back in the way the event loop does.

use std::sync::Arc;

use jsizzle::core::session::{Effect, Event, Session};
use jsizzle::core::text_buffer::TextBuffer;
use jsizzle::core::types::{BusyPolicy, Completion, ExecutionResult, Focus, ViewState};
use jsizzle::io::config::ExecutionConfig;
use jsizzle::io::engine::{self, QuickJsEngine, ScriptEngine};
use jsizzle::io::scheduler::Scheduler;
use jsizzle::test_support::{FakeBuffer, ScriptedEngine};
use tokio::sync::mpsc;

fn quickjs() -> QuickJsEngine {
    QuickJsEngine::new(&ExecutionConfig::default())
}

fn success(lines: &[&str]) -> ExecutionResult {
    ExecutionResult::Success {
        output: lines.iter().map(|line| line.to_string()).collect(),
    }
}

/// Trigger, run the unit inline, and deliver its completion.
fn run_inline<E: ScriptEngine>(session: Session<FakeBuffer>, engine: &E) -> Session<FakeBuffer> {
    let (session, effect) = session.update(Event::Trigger);
    let Effect::Execute(request) = effect else {
        panic!("expected execute, got {effect:?}");
    };
    assert!(session.is_running());
    let id = request.id();
    let result = engine::run(engine, request);
    let (session, effect) = session.update(Event::Finished(Completion { id, result }));
    assert_eq!(effect, Effect::None);
    session
}

#[test]
fn logs_one_then_two_in_order() {
    let session = Session::new(
        FakeBuffer::with_text("console.log(1)\nconsole.log(2)"),
        BusyPolicy::Drop,
    );
    let session = run_inline(session, &quickjs());

    assert!(!session.is_running());
    assert_eq!(session.result(), Some(&success(&["1", "2"])));
}

#[test]
fn failure_then_fix_replaces_result() {
    let mut session = Session::new(FakeBuffer::with_text("console.log("), BusyPolicy::Drop);
    session = run_inline(session, &quickjs());
    assert_eq!(session.view_state().label(), "error");

    session.buffer_mut().set_text("console.log('fixed')");
    let session = run_inline(session, &quickjs());
    let expected = success(&["fixed"]);
    assert_eq!(session.view_state(), ViewState::Displaying(&expected));
}

#[test]
fn focus_survives_execution() {
    let session = Session::new(FakeBuffer::with_text("ignored"), BusyPolicy::Drop);
    let (session, _) = session.update(Event::SwitchFocus);
    let session = run_inline(session, &ScriptedEngine::logging(&["x"]));
    assert_eq!(session.focus(), Focus::Output);
    assert!(!session.buffer().is_focused());

    let (session, _) = session.update(Event::SwitchFocus);
    assert!(session.buffer().is_focused());
    let (session, _) = session.update(Event::Escape);
    assert_eq!(session.focus(), Focus::Input);
    assert!(!session.buffer().is_focused());
}

#[tokio::test]
async fn scheduled_unit_round_trips_through_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine: Arc<dyn ScriptEngine> = Arc::new(quickjs());
    let scheduler = Scheduler::new(engine, tx);

    let session = Session::new(
        FakeBuffer::with_text("console.log('async')"),
        BusyPolicy::Drop,
    );
    let (session, effect) = session.update(Event::Trigger);
    let Effect::Execute(request) = effect else {
        panic!("expected execute");
    };
    scheduler.schedule(request);

    // In flight: a second trigger schedules nothing.
    let (session, effect) = session.update(Event::Trigger);
    assert_eq!(effect, Effect::None);

    let completion = rx.recv().await.expect("completion");
    let (session, effect) = session.update(Event::Finished(completion));
    assert_eq!(effect, Effect::None);
    assert!(!session.is_running());
    assert_eq!(session.result(), Some(&success(&["async"])));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn queue_latest_runs_newest_snapshot_after_current() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine: Arc<dyn ScriptEngine> = Arc::new(quickjs());
    let scheduler = Scheduler::new(engine, tx);

    let session = Session::new(
        FakeBuffer::with_text("console.log('first')"),
        BusyPolicy::QueueLatest,
    );
    let (mut session, effect) = session.update(Event::Trigger);
    let Effect::Execute(first) = effect else {
        panic!("expected execute");
    };
    scheduler.schedule(first);

    session.buffer_mut().set_text("console.log('second')");
    let (session, effect) = session.update(Event::Trigger);
    assert_eq!(effect, Effect::None);
    assert!(session.pending().is_some());

    let completion = rx.recv().await.expect("first completion");
    let (session, effect) = session.update(Event::Finished(completion));
    let Effect::Execute(second) = effect else {
        panic!("expected queued execute, got {effect:?}");
    };
    assert!(session.is_running());
    assert_eq!(session.result(), Some(&success(&["first"])));
    scheduler.schedule(second);

    let completion = rx.recv().await.expect("second completion");
    let (session, _) = session.update(Event::Finished(completion));
    assert!(!session.is_running());
    assert_eq!(session.result(), Some(&success(&["second"])));
}

#[tokio::test]
async fn panicking_unit_releases_running_flag() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine: Arc<dyn ScriptEngine> = Arc::new(ScriptedEngine::panicking("engine bug"));
    let scheduler = Scheduler::new(engine, tx);

    let session = Session::new(FakeBuffer::with_text("ignored"), BusyPolicy::Drop);
    let (session, effect) = session.update(Event::Trigger);
    let Effect::Execute(request) = effect else {
        panic!("expected execute");
    };
    scheduler.schedule(request);

    let completion = rx.recv().await.expect("completion");
    let (session, _) = session.update(Event::Finished(completion));
    assert!(!session.is_running());
    assert_eq!(session.view_state().label(), "error");

    let (session, effect) = session.update(Event::Trigger);
    assert!(matches!(effect, Effect::Execute(_)));
    assert!(session.is_running());
}
