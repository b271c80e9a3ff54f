use thiserror::Error;
use tracing::trace;

use crate::diff::{DEFAULT_CONTEXT, unified_diff};
use crate::emitter::{EmitError, EmitRequest, Emitter};

#[derive(Debug, Error)]
pub enum DeterminismError {
    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("run {run} produced different output than run 1")]
    Diverged { run: usize, diff: String },
}

/// Emit `request` `runs` times (at least twice) and require byte-identical output.
///
/// Returns the output of the first run.
pub fn check_determinism(
    emitter: &dyn Emitter,
    request: &EmitRequest,
    runs: usize,
) -> Result<String, DeterminismError> {
    let runs = runs.max(2);
    let first = emitter.emit(request)?;
    for run in 2..=runs {
        let next = emitter.emit(request)?;
        trace!(run, bytes = next.len(), "determinism run");
        if next.as_bytes() != first.as_bytes() {
            let (diff, _) = unified_diff(&first, &next, DEFAULT_CONTEXT);
            return Err(DeterminismError::Diverged { run, diff });
        }
    }
    Ok(first)
}
