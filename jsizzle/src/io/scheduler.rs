//! Runs execution units off the event-processing path.
//!
//! Each unit executes on tokio's blocking pool and delivers exactly one
//! [`Completion`] back to the event loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use crate::core::types::{Completion, ExecutionRequest, ExecutionResult};
use crate::io::engine::{self, ScriptEngine};

pub struct Scheduler {
    engine: Arc<dyn ScriptEngine>,
    completions: UnboundedSender<Completion>,
}

impl Scheduler {
    pub fn new(engine: Arc<dyn ScriptEngine>, completions: UnboundedSender<Completion>) -> Self {
        Self {
            engine,
            completions,
        }
    }

    /// Hand `request` to a worker. Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(run = %request.id()))]
    pub fn schedule(&self, request: ExecutionRequest) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let completions = self.completions.clone();
        debug!("scheduling execution unit");
        tokio::task::spawn_blocking(move || {
            let id = request.id();
            let run = AssertUnwindSafe(|| engine::run(engine.as_ref(), request));
            let result = panic::catch_unwind(run).unwrap_or_else(|payload| {
                let message = format!("engine panicked: {}", panic_message(&*payload));
                error!(run = %id, "{message}");
                ExecutionResult::Failure { message }
            });
            if completions.send(Completion { id, result }).is_err() {
                warn!(run = %id, "event loop gone; completion discarded");
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RunId;
    use crate::test_support::ScriptedEngine;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn delivers_exactly_one_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = Arc::new(ScriptedEngine::logging(&["1", "2"]));
        let scheduler = Scheduler::new(engine, tx);

        scheduler
            .schedule(ExecutionRequest::new(RunId::new(7), "ignored"))
            .await
            .expect("join");
        drop(scheduler);

        let completion = rx.recv().await.expect("completion");
        assert_eq!(completion.id, RunId::new(7));
        assert_eq!(
            completion.result,
            ExecutionResult::Success {
                output: vec!["1".to_string(), "2".to_string()]
            }
        );
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failure_is_delivered_as_data() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = Arc::new(ScriptedEngine::failing(&["partial"], "Error: nope"));
        let scheduler = Scheduler::new(engine, tx);

        scheduler
            .schedule(ExecutionRequest::new(RunId::new(1), "ignored"))
            .await
            .expect("join");

        let completion = rx.recv().await.expect("completion");
        assert_eq!(
            completion.result,
            ExecutionResult::Failure {
                message: "Error: nope".to_string()
            }
        );
    }

    #[tokio::test]
    async fn panicking_engine_still_delivers_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = Arc::new(ScriptedEngine::panicking("engine bug"));
        let scheduler = Scheduler::new(engine, tx);

        scheduler
            .schedule(ExecutionRequest::new(RunId::new(3), "ignored"))
            .await
            .expect("join");

        let completion = rx.recv().await.expect("completion");
        assert_eq!(completion.id, RunId::new(3));
        assert_eq!(
            completion.result,
            ExecutionResult::Failure {
                message: "engine panicked: engine bug".to_string()
            }
        );
    }
}
