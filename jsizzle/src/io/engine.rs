//! Script engine seam and the execution engine adapter.
//!
//! The [`ScriptEngine`] trait decouples execution from the concrete engine
//! (currently QuickJS). Tests use scripted engines that log predetermined
//! lines without starting a JavaScript runtime.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rquickjs::convert::Coerced;
use rquickjs::function::Rest;
use rquickjs::{
    CatchResultExt, CaughtError, Context, Ctx, Exception, Function, Object, Persistent, Runtime,
    Value,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::capture::CaptureBuffer;
use crate::core::types::{ExecutionRequest, ExecutionResult};
use crate::io::config::ExecutionConfig;

/// Diagnostic produced by a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The script raised (syntax error, runtime exception, rejected job).
    #[error("{0}")]
    Exception(String),
    #[error("script timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// The engine itself could not be set up.
    #[error("engine error: {0}")]
    Engine(String),
}

/// Logging capability handed to the engine for exactly one run.
///
/// Clones share the run's capture buffer. The handle is not `Send`; it lives
/// and dies on the worker executing the unit.
#[derive(Debug, Clone, Default)]
pub struct Console {
    buffer: Rc<RefCell<CaptureBuffer>>,
}

impl Console {
    fn new() -> Self {
        Self::default()
    }

    /// Record one log call.
    pub fn log<I, T>(&self, args: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.buffer.borrow_mut().log(args);
    }

    fn take_lines(&self) -> Vec<String> {
        std::mem::take(&mut *self.buffer.borrow_mut()).into_lines()
    }
}

/// Abstraction over script engines.
pub trait ScriptEngine: Send + Sync {
    /// Run `source` to completion. The only capability available to the
    /// script is `console`.
    fn eval(&self, source: &str, console: Console) -> Result<(), EngineError>;
}

/// Run one execution request and fold the outcome into an [`ExecutionResult`].
///
/// Output captured before a failure is discarded.
#[instrument(skip_all, fields(run = %request.id(), bytes = request.source().len()))]
pub fn run<E: ScriptEngine + ?Sized>(engine: &E, request: ExecutionRequest) -> ExecutionResult {
    let console = Console::new();
    let started = Instant::now();
    let outcome = engine.eval(request.source(), console.clone());
    let lines = console.take_lines();
    let elapsed_ms = started.elapsed().as_millis();

    match outcome {
        Ok(()) => {
            debug!(lines = lines.len(), elapsed_ms, "script completed");
            ExecutionResult::Success { output: lines }
        }
        Err(err) => {
            debug!(err = %err, discarded = lines.len(), elapsed_ms, "script failed");
            ExecutionResult::Failure {
                message: err.to_string(),
            }
        }
    }
}

/// QuickJS-backed engine. Every run gets a fresh runtime and context.
#[derive(Debug, Clone)]
pub struct QuickJsEngine {
    timeout: Option<Duration>,
    memory_limit_bytes: usize,
}

impl QuickJsEngine {
    pub fn new(config: &ExecutionConfig) -> Self {
        Self {
            timeout: config.timeout(),
            memory_limit_bytes: config.memory_limit_bytes,
        }
    }

    fn timed_out(&self, deadline: Option<Instant>) -> Option<EngineError> {
        match (self.timeout, deadline) {
            (Some(limit), Some(deadline)) if Instant::now() >= deadline => {
                Some(EngineError::Timeout(limit))
            }
            _ => None,
        }
    }
}

impl ScriptEngine for QuickJsEngine {
    fn eval(&self, source: &str, console: Console) -> Result<(), EngineError> {
        let runtime = Runtime::new().map_err(|err| EngineError::Engine(err.to_string()))?;
        runtime.set_memory_limit(self.memory_limit_bytes);

        let deadline = self.timeout.map(|limit| Instant::now() + limit);
        if let Some(deadline) = deadline {
            runtime.set_interrupt_handler(Some(Box::new(move || Instant::now() >= deadline)));
        }

        let rejections = Rejections::default();
        let tracker = rejections.clone();
        runtime.set_host_promise_rejection_tracker(Some(Box::new(
            move |ctx, promise, reason, is_handled| tracker.track(ctx, promise, reason, is_handled),
        )));

        let context = Context::full(&runtime).map_err(|err| EngineError::Engine(err.to_string()))?;

        let outcome = self.drive(&runtime, &context, source, console, deadline);
        // Tracked promises must be released inside the runtime that owns them.
        let unhandled = context.with(|ctx| rejections.take_first(&ctx));
        outcome?;
        match unhandled {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl QuickJsEngine {
    /// Evaluate the top level, then run queued jobs until the queue is empty.
    fn drive(
        &self,
        runtime: &Runtime,
        context: &Context,
        source: &str,
        console: Console,
        deadline: Option<Instant>,
    ) -> Result<(), EngineError> {
        let evaluated = context.with(|ctx| {
            install_console(&ctx, console)?;
            ctx.eval::<Value, _>(source)
                .catch(&ctx)
                .map(drop)
                .map_err(describe)
        });
        if let Err(err) = evaluated {
            return Err(self.timed_out(deadline).unwrap_or(err));
        }

        loop {
            match runtime.execute_pending_job() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(job) => {
                    let err = job.0.with(|ctx| {
                        describe(CaughtError::from_error(&ctx, rquickjs::Error::Exception))
                    });
                    warn!(err = %err, "pending job failed");
                    return Err(self.timed_out(deadline).unwrap_or(err));
                }
            }
        }
        Ok(())
    }
}

struct Rejection {
    promise: Persistent<Value<'static>>,
    error: EngineError,
}

/// Promises rejected with no handler attached, in rejection order.
///
/// QuickJS reports a rejection as unhandled when it happens and reports it
/// again as handled if a handler is attached later, so an entry only counts
/// once the job queue has drained.
#[derive(Clone, Default)]
struct Rejections {
    unhandled: Rc<RefCell<Vec<Rejection>>>,
}

impl Rejections {
    fn track<'js>(&self, ctx: Ctx<'js>, promise: Value<'js>, reason: Value<'js>, is_handled: bool) {
        if !is_handled {
            let error = describe_value(reason);
            debug!(err = %error, "promise rejected without handler");
            self.unhandled.borrow_mut().push(Rejection {
                promise: Persistent::save(&ctx, promise),
                error,
            });
            return;
        }

        let tracked = std::mem::take(&mut *self.unhandled.borrow_mut());
        let mut remaining = Vec::with_capacity(tracked.len());
        for rejection in tracked {
            if let Ok(value) = rejection.promise.restore(&ctx)
                && value != promise
            {
                remaining.push(Rejection {
                    promise: Persistent::save(&ctx, value),
                    error: rejection.error,
                });
            }
        }
        *self.unhandled.borrow_mut() = remaining;
    }

    /// Release every tracked promise and return the first rejection, if any.
    fn take_first(&self, ctx: &Ctx<'_>) -> Option<EngineError> {
        let tracked = std::mem::take(&mut *self.unhandled.borrow_mut());
        let mut first = None;
        for rejection in tracked {
            drop(rejection.promise.restore(ctx));
            first.get_or_insert(rejection.error);
        }
        first
    }
}

/// Expose `console.log(...args)` and nothing else.
fn install_console<'js>(ctx: &Ctx<'js>, console: Console) -> Result<(), EngineError> {
    let log = Function::new(ctx.clone(), move |args: Rest<Value<'js>>| {
        console.log(args.0.into_iter().map(display));
    })
    .map_err(|err| EngineError::Engine(err.to_string()))?;

    let object = Object::new(ctx.clone()).map_err(|err| EngineError::Engine(err.to_string()))?;
    object
        .set("log", log)
        .map_err(|err| EngineError::Engine(err.to_string()))?;
    ctx.globals()
        .set("console", object)
        .map_err(|err| EngineError::Engine(err.to_string()))?;
    Ok(())
}

/// String conversion for a logged value. Never fails: symbols print as
/// `Symbol(description)` and values whose coercion throws print their type.
fn display(value: Value<'_>) -> String {
    if let Some(symbol) = value.as_symbol() {
        return match symbol.description() {
            Ok(description) if !description.is_undefined() => {
                format!("Symbol({})", coerce(&description).unwrap_or_default())
            }
            _ => "Symbol()".to_string(),
        };
    }
    coerce(&value).unwrap_or_else(|| format!("[{}]", value.type_of().as_str()))
}

fn coerce(value: &Value<'_>) -> Option<String> {
    match value.get::<Coerced<String>>() {
        Ok(coerced) => Some(coerced.0),
        Err(_) => {
            // Clear the exception raised by a throwing toString.
            drop(value.ctx().catch());
            None
        }
    }
}

/// Render a rejection reason the same way as a thrown value.
fn describe_value(value: Value<'_>) -> EngineError {
    match value.as_object().cloned().and_then(Exception::from_object) {
        Some(exception) => describe(CaughtError::Exception(exception)),
        None => describe(CaughtError::Value(value)),
    }
}

/// Render a caught JavaScript error as `Name: message`.
fn describe(err: CaughtError<'_>) -> EngineError {
    match err {
        CaughtError::Exception(exception) => {
            let name: Option<String> = exception.get("name").ok().flatten();
            let message = exception.message().unwrap_or_default();
            let text = match name {
                Some(name) if message.is_empty() => name,
                Some(name) => format!("{name}: {message}"),
                None => message,
            };
            EngineError::Exception(text)
        }
        CaughtError::Value(value) => {
            EngineError::Exception(format!("Uncaught {}", display(value)))
        }
        CaughtError::Error(err) => EngineError::Engine(err.to_string()),
    }
}
