//! Pure half of the execution dispatcher.
//!
//! Turns a trigger into an [`ExecutionRequest`] and flips the running flag.
//! Scheduling the request onto a worker is done by [`crate::io::scheduler`].

use tracing::{debug, warn};

use crate::core::session::Session;
use crate::core::text_buffer::TextBuffer;
use crate::core::types::{BusyPolicy, Completion, ExecutionRequest};

/// Handle a trigger.
///
/// While idle: snapshot the buffer, set `running`, return the request. While
/// running: the flag is untouched and nothing is returned; under
/// [`BusyPolicy::QueueLatest`] the snapshot replaces any pending one.
pub fn trigger<B: TextBuffer>(mut session: Session<B>) -> (Option<ExecutionRequest>, Session<B>) {
    let id = session.last_run.next();
    if session.running {
        match session.policy {
            BusyPolicy::Drop => {
                warn!(in_flight = ?session.in_flight, "trigger while running; dropped");
            }
            BusyPolicy::QueueLatest => {
                session.last_run = id;
                let request = ExecutionRequest::new(id, session.buffer.value());
                if let Some(replaced) = session.pending.replace(request) {
                    debug!(replaced = %replaced.id(), queued = %id, "replaced pending snapshot");
                } else {
                    debug!(queued = %id, "queued snapshot behind in-flight run");
                }
            }
        }
        return (None, session);
    }

    session.last_run = id;
    session.running = true;
    session.in_flight = Some(id);
    let request = ExecutionRequest::new(id, session.buffer.value());
    debug!(run = %id, bytes = request.source().len(), "dispatching execution");
    (Some(request), session)
}

/// Fold a completion into the session.
///
/// Returns the pending request, if any, which keeps `running` set so no gap
/// exists between the two units. Completions for an id other than the
/// in-flight one are ignored.
pub fn complete<B: TextBuffer>(
    mut session: Session<B>,
    completion: Completion,
) -> (Option<ExecutionRequest>, Session<B>) {
    if !session.running || session.in_flight != Some(completion.id) {
        warn!(
            run = %completion.id,
            in_flight = ?session.in_flight,
            "ignoring completion that is not in flight"
        );
        return (None, session);
    }

    debug!(run = %completion.id, ok = completion.result.is_success(), "execution finished");
    session.result = Some(completion.result);
    session.output_scroll = 0;

    match session.pending.take() {
        Some(next) => {
            session.in_flight = Some(next.id());
            debug!(run = %next.id(), "dispatching queued snapshot");
            (Some(next), session)
        }
        None => {
            session.running = false;
            session.in_flight = None;
            (None, session)
        }
    }
}
