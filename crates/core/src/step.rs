//! Per-step fatality policy for orchestrated workflows
//!
//! Each workflow step declares up front whether its failure aborts the
//! remaining workflow or is merely logged. One decision point applies the
//! policy, so the orchestrator never tracks "is this already logged?" state.

use crate::error::VersionError;
use crate::model::DocumentId;

/// Declared severity of a step's failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatality {
    /// Failure aborts the remaining workflow and propagates to the caller
    Fatal,
    /// Failure is logged at warning severity; sibling steps still run
    Recoverable,
}

/// Result of running one guarded step
#[derive(Debug)]
pub enum StepOutcome<T> {
    /// Step ran to completion
    Completed(T),
    /// Step failed but was declared recoverable; already logged
    Recovered,
}

impl<T> StepOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            StepOutcome::Completed(value) => Some(value),
            StepOutcome::Recovered => None,
        }
    }
}

/// Apply the fatality policy to one step's result
///
/// Fatal failures log at error severity with document/operation/step context
/// and propagate. Recoverable failures log at warning severity and yield
/// [`StepOutcome::Recovered`] so sibling steps still run.
pub fn run_step<T>(
    operation: &str,
    step: &str,
    document: &DocumentId,
    fatality: Fatality,
    result: Result<T, VersionError>,
) -> Result<StepOutcome<T>, VersionError> {
    match result {
        Ok(value) => Ok(StepOutcome::Completed(value)),
        Err(err) => match fatality {
            Fatality::Fatal => {
                tracing::error!(
                    %document,
                    operation,
                    step,
                    error = %err,
                    "fatal step failure, aborting workflow"
                );
                Err(err)
            }
            Fatality::Recoverable => {
                tracing::warn!(
                    %document,
                    operation,
                    step,
                    error = %err,
                    "non-fatal step failure, continuing"
                );
                Ok(StepOutcome::Recovered)
            }
        },
    }
}

/// Run a step whose failure aborts the workflow
pub fn fatal_step<T>(
    operation: &str,
    step: &str,
    document: &DocumentId,
    result: Result<T, VersionError>,
) -> Result<T, VersionError> {
    match run_step(operation, step, document, Fatality::Fatal, result)? {
        StepOutcome::Completed(value) => Ok(value),
        StepOutcome::Recovered => unreachable!("fatal steps never recover"),
    }
}

/// Run a step whose failure is logged and absorbed
pub fn recoverable_step<T>(
    operation: &str,
    step: &str,
    document: &DocumentId,
    result: Result<T, VersionError>,
) -> Option<T> {
    match run_step(operation, step, document, Fatality::Recoverable, result) {
        Ok(outcome) => outcome.completed(),
        Err(_) => unreachable!("recoverable steps never propagate"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DocumentId {
        DocumentId::new("test.md")
    }

    fn boom() -> Result<u32, VersionError> {
        Err(VersionError::persistence("test", "disk on fire"))
    }

    #[test]
    fn test_fatal_step_propagates() {
        let result = run_step("save", "persist-metadata", &doc(), Fatality::Fatal, boom());
        assert!(result.is_err());
    }

    #[test]
    fn test_recoverable_step_is_absorbed() {
        let result = run_step("save", "append-history", &doc(), Fatality::Recoverable, boom());
        assert!(matches!(result, Ok(StepOutcome::Recovered)));
    }

    #[test]
    fn test_success_passes_value_through() {
        let result = run_step("save", "increment", &doc(), Fatality::Fatal, Ok(42u32));
        assert_eq!(result.unwrap().completed(), Some(42));
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(fatal_step("save", "s", &doc(), Ok(1u32)).unwrap(), 1);
        assert!(fatal_step("save", "s", &doc(), boom()).is_err());
        assert_eq!(recoverable_step("save", "s", &doc(), Ok(1u32)), Some(1));
        assert_eq!(recoverable_step("save", "s", &doc(), boom()), None);
    }
}
