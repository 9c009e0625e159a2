use crate::gh::FetchError;
use crate::runner::CommandError;
use crate::state::StepKind;
use thiserror::Error;

/// Recoverable outcomes of a workflow operation.
///
/// These never reach the tool caller as errors. [`crate::WorkflowEngine::call_tool`]
/// renders them as the text of the result.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Error: {program} not found. Please install it first.")]
    ExternalToolMissing { program: String },
    #[error("Error {action}: {detail}")]
    ExternalCommandFailed { action: &'static str, detail: String },
    #[error("Error parsing {what} data: {raw}")]
    MalformedResponse { what: &'static str, raw: String },
    #[error("{0}")]
    PreconditionNotMet(&'static str),
    #[error("Invalid {what} number. Please select between 1 and {max}")]
    OutOfRange { what: &'static str, max: usize },
    #[error("Cannot {operation} while {step}. Call 'reset_session' to start over.")]
    StepOutOfOrder {
        operation: &'static str,
        step: StepKind,
    },
    #[error("Error listing cloned repositories: {0}")]
    WorkspaceUnreadable(String),
}

impl WorkflowError {
    /// Classifies a failed `gh` call made while doing `action`
    /// (e.g. "fetching assignments") for data described as `what`.
    pub(crate) fn from_fetch(action: &'static str, what: &'static str, err: FetchError) -> Self {
        match err {
            FetchError::Command(err) => Self::from_command(action, err),
            FetchError::Malformed { raw, .. } => Self::MalformedResponse { what, raw },
        }
    }

    pub(crate) fn from_command(action: &'static str, err: CommandError) -> Self {
        match err {
            CommandError::NotFound { program } => Self::ExternalToolMissing { program },
            err @ (CommandError::Failed { .. } | CommandError::Io { .. }) => {
                Self::ExternalCommandFailed {
                    action,
                    detail: err.to_string(),
                }
            }
        }
    }
}
