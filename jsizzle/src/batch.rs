//! Non-interactive execution of a script file.
//!
//! Runs the same adapter as the interface, synchronously on the calling
//! thread, since there is no event loop to protect.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::types::{ExecutionRequest, ExecutionResult, RunId};
use crate::exit_codes;
use crate::io::engine::{self, ScriptEngine};
use crate::io::source::read_source;

/// Run the script at `path` and report to `out` / `diag`.
///
/// Captured lines go to `out` only on success. On failure only the diagnostic
/// is written, to `diag`. Returns the process exit code; an unreadable file is
/// an error.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn run_file<E, O, D>(engine: &E, path: &Path, out: &mut O, diag: &mut D) -> Result<i32>
where
    E: ScriptEngine + ?Sized,
    O: Write,
    D: Write,
{
    let source = read_source(path)?;
    let request = ExecutionRequest::new(RunId::new(1), source);

    match engine::run(engine, request) {
        ExecutionResult::Success { output } => {
            for line in &output {
                writeln!(out, "{line}").context("write script output")?;
            }
            out.flush().context("flush script output")?;
            info!(lines = output.len(), "script completed");
            Ok(exit_codes::OK)
        }
        ExecutionResult::Failure { message } => {
            writeln!(diag, "{message}").context("write diagnostic")?;
            info!("script failed");
            Ok(exit_codes::SCRIPT_FAILED)
        }
    }
}
