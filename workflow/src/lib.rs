mod error;
mod gh;
mod layout;
mod model;
mod orchestrator;
mod remote;
pub mod report;
mod runner;
mod session;
mod state;
#[cfg(test)]
mod testing;
mod tools;

pub use error::WorkflowError;
pub use gh::ClassroomCli;
pub use gh::FetchError;
pub use layout::WorkspaceLayout;
pub use model::Assignment;
pub use model::Classroom;
pub use model::ClonedRepo;
pub use model::EntityId;
pub use model::PullRequest;
pub use model::PullRequestAuthor;
pub use orchestrator::EngineOptions;
pub use orchestrator::WorkflowEngine;
pub use remote::RemoteLookupError;
pub use remote::RepoSlug;
pub use remote::repo_slug_from_remote;
pub use runner::CommandError;
pub use runner::CommandOutput;
pub use runner::CommandRequest;
pub use runner::CommandRunner;
pub use runner::OutputMode;
pub use runner::ProcessRunner;
pub use session::SessionStore;
pub use state::Session;
pub use state::StepKind;
pub use state::WorkflowStep;
pub use tools::DEFAULT_SESSION_ID;
pub use tools::DispatchError;
pub use tools::ToolCall;
pub use tools::ToolSpec;
pub use tools::tool_specs;
