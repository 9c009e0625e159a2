use crate::error::WorkflowError;
use crate::gh::ClassroomCli;
use crate::gh::FetchError;
use crate::layout::WorkspaceLayout;
use crate::model::ClonedRepo;
use crate::model::PullRequest;
use crate::remote::RemoteLookupError;
use crate::remote::repo_slug_from_remote;
use crate::report;
use crate::runner::CommandRunner;
use crate::runner::ProcessRunner;
use crate::session::SessionStore;
use crate::state::StepKind;
use crate::state::WorkflowStep;
use crate::tools::DispatchError;
use crate::tools::ToolCall;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing::info;
use tracing::warn;

const NEEDS_CLASSROOMS: &str =
    "No classrooms available. Please call 'start_classroom_workflow' first.";
const NEEDS_ASSIGNMENTS: &str = "No assignments available. Please select a classroom first.";
const NEEDS_REPOS: &str = "No student repositories available. Please select an assignment first.";

pub struct EngineOptions {
    pub gh_bin: PathBuf,
    pub git_bin: PathBuf,
    /// Where student repositories are cloned and discovered.
    pub workspace_dir: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            gh_bin: PathBuf::from("gh"),
            git_bin: PathBuf::from("git"),
            workspace_dir: PathBuf::from("."),
        }
    }
}

/// Drives sessions through classroom, assignment, clone and student
/// selection.
///
/// Every operation takes `&mut self` and runs to completion, external
/// processes included, before the next one can start.
pub struct WorkflowEngine {
    sessions: SessionStore,
    cli: ClassroomCli,
    layout: WorkspaceLayout,
}

impl WorkflowEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_runner(options, Arc::new(ProcessRunner))
    }

    pub fn with_runner(options: EngineOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            sessions: SessionStore::new(),
            cli: ClassroomCli::new(runner, options.gh_bin, options.git_bin),
            layout: WorkspaceLayout::new(options.workspace_dir),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    /// Entry point for the tool-invocation host.
    ///
    /// Only contract violations (unknown tool, bad arguments) are errors.
    /// Everything else comes back as the text of the result.
    pub async fn call_tool(&mut self, name: &str, arguments: &Value) -> Result<String, DispatchError> {
        let call = ToolCall::parse(name, arguments)?;
        Ok(self.execute(call).await)
    }

    pub async fn execute(&mut self, call: ToolCall) -> String {
        let result = match call {
            ToolCall::StartClassroomWorkflow { session_id } => {
                self.list_classrooms(&session_id).await
            }
            ToolCall::SelectClassroom { session_id, number } => {
                self.select_classroom(&session_id, number).await
            }
            ToolCall::SelectAssignment { session_id, number } => {
                self.select_assignment(&session_id, number).await
            }
            ToolCall::SelectStudent { session_id, number } => {
                self.select_student(&session_id, number).await
            }
            ToolCall::ResetSession { session_id } => Ok(self.reset_session(&session_id)),
        };
        result.unwrap_or_else(|err| err.to_string())
    }

    pub async fn list_classrooms(&mut self, session_id: &str) -> Result<String, WorkflowError> {
        let session = self.sessions.get_or_create(session_id);
        if !matches!(session.step, WorkflowStep::SelectingClassroom { .. }) {
            return Err(WorkflowError::StepOutOfOrder {
                operation: "list classrooms",
                step: session.current_step(),
            });
        }

        let classrooms = self.cli.list_classrooms().await.map_err(|err| {
            warn!(session_id, error = %err, "listing classrooms failed");
            WorkflowError::from_fetch("listing classrooms", "classroom", err)
        })?;
        if classrooms.is_empty() {
            return Ok(report::NO_CLASSROOMS.to_string());
        }

        let text = report::classroom_menu(&classrooms);
        info!(session_id, count = classrooms.len(), "classrooms listed");
        session.step = WorkflowStep::SelectingClassroom { classrooms };
        Ok(text)
    }

    pub async fn select_classroom(
        &mut self,
        session_id: &str,
        number: i64,
    ) -> Result<String, WorkflowError> {
        let session = self.sessions.get_or_create(session_id);
        let classrooms = match &session.step {
            WorkflowStep::SelectingClassroom { classrooms } => classrooms,
            // The assignment fetch never landed, so the pick can be redone.
            WorkflowStep::SelectingAssignment {
                classrooms,
                assignments,
                ..
            } if assignments.is_empty() => classrooms,
            other => {
                return Err(WorkflowError::StepOutOfOrder {
                    operation: "select a classroom",
                    step: other.kind(),
                });
            }
        };
        if classrooms.is_empty() {
            return Err(WorkflowError::PreconditionNotMet(NEEDS_CLASSROOMS));
        }
        let classroom = pick(classrooms, number, "classroom")?.clone();
        let classrooms = classrooms.clone();

        info!(session_id, classroom = %classroom.id, step = ?StepKind::SelectingAssignment, "classroom selected");
        session.step = WorkflowStep::SelectingAssignment {
            classrooms,
            classroom: classroom.clone(),
            assignments: Vec::new(),
        };

        let assignments = self.cli.list_assignments(&classroom.id).await.map_err(|err| {
            warn!(session_id, classroom = %classroom.id, error = %err, "fetching assignments failed");
            WorkflowError::from_fetch("fetching assignments", "assignment", err)
        })?;
        if assignments.is_empty() {
            return Ok(report::no_assignments(&classroom));
        }

        let text = report::assignment_menu(&classroom, &assignments);
        if let WorkflowStep::SelectingAssignment {
            assignments: slot, ..
        } = &mut session.step
        {
            *slot = assignments;
        }
        Ok(text)
    }

    pub async fn select_assignment(
        &mut self,
        session_id: &str,
        number: i64,
    ) -> Result<String, WorkflowError> {
        let session = self.sessions.get_or_create(session_id);
        let (classroom, assignments) = match &session.step {
            WorkflowStep::SelectingClassroom { .. } => {
                return Err(WorkflowError::PreconditionNotMet(NEEDS_ASSIGNMENTS));
            }
            // A clone that did not complete can be retried from `Cloning`.
            WorkflowStep::SelectingAssignment {
                classroom,
                assignments,
                ..
            }
            | WorkflowStep::Cloning {
                classroom,
                assignments,
                ..
            } => (classroom, assignments),
            WorkflowStep::SelectingStudent { .. } => {
                return Err(WorkflowError::StepOutOfOrder {
                    operation: "select an assignment",
                    step: StepKind::SelectingStudent,
                });
            }
        };
        if assignments.is_empty() {
            return Err(WorkflowError::PreconditionNotMet(NEEDS_ASSIGNMENTS));
        }
        let assignment = pick(assignments, number, "assignment")?.clone();
        // Spawning in a missing directory also fails with NotFound, which
        // would read as a missing gh.
        if !self.layout.root().is_dir() {
            return Err(WorkflowError::WorkspaceUnreadable(format!(
                "{} is not a directory",
                self.layout.root().display()
            )));
        }
        let classroom = classroom.clone();
        let assignments = assignments.clone();

        info!(session_id, assignment = %assignment.id, step = ?StepKind::Cloning, "assignment selected");
        session.step = WorkflowStep::Cloning {
            classroom: classroom.clone(),
            assignments,
            assignment: assignment.clone(),
        };

        self.cli
            .clone_student_repos(&assignment.id, self.layout.root())
            .await
            .map_err(|err| {
                warn!(session_id, assignment = %assignment.id, error = %err, "cloning failed");
                WorkflowError::from_command("cloning repositories", err)
            })?;

        let cloned_repos = self.layout.cloned_repos().map_err(|err| {
            warn!(session_id, error = %err, "listing cloned repositories failed");
            WorkflowError::WorkspaceUnreadable(format!("{err:#}"))
        })?;

        let text = report::clone_summary(&assignment, &cloned_repos);
        if cloned_repos.is_empty() {
            // Stay in `Cloning` so the assignment can be picked again.
            warn!(session_id, assignment = %assignment.id, "clone produced no repositories");
            return Ok(text);
        }
        info!(session_id, count = cloned_repos.len(), step = ?StepKind::SelectingStudent, "repositories cloned");
        session.step = WorkflowStep::SelectingStudent {
            classroom,
            assignment,
            cloned_repos,
        };
        Ok(text)
    }

    pub async fn select_student(
        &mut self,
        session_id: &str,
        number: i64,
    ) -> Result<String, WorkflowError> {
        let session = self.sessions.get_or_create(session_id);
        let repos = session.cloned_repos();
        if repos.is_empty() {
            return Err(WorkflowError::PreconditionNotMet(NEEDS_REPOS));
        }
        let repo = pick(repos, number, "student")?.clone();

        info!(session_id, repo = %repo.name, "student selected");
        let pull_requests = lookup_pull_requests(&self.cli, &repo).await;
        if let Err(err) = &pull_requests {
            warn!(session_id, repo = %repo.name, error = %err, "pull request lookup degraded");
        }
        Ok(report::student_review(&repo, &pull_requests))
    }

    /// Drops the session entirely. Resetting an unknown session is a no-op.
    pub fn reset_session(&mut self, session_id: &str) -> String {
        if self.sessions.delete(session_id) {
            info!(session_id, "session reset");
        }
        report::session_reset()
    }
}

/// Maps a 1-based menu number onto `items`.
fn pick<'a, T>(items: &'a [T], number: i64, what: &'static str) -> Result<&'a T, WorkflowError> {
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| items.get(index))
        .ok_or(WorkflowError::OutOfRange {
            what,
            max: items.len(),
        })
}

async fn lookup_pull_requests(
    cli: &ClassroomCli,
    repo: &ClonedRepo,
) -> Result<Vec<PullRequest>, RemoteLookupError> {
    if !repo.path.is_dir() {
        return Err(RemoteLookupError::RepoMissing);
    }
    let url = cli.origin_url(&repo.path).await.map_err(|err| {
        debug!(repo = %repo.name, error = %err, "no origin remote");
        RemoteLookupError::NoRemote
    })?;
    let slug = repo_slug_from_remote(&url)?;
    debug!(repo = %repo.name, slug = %slug, "listing pull requests");
    cli.list_pull_requests(&slug).await.map_err(|err| match err {
        FetchError::Command(err) => RemoteLookupError::QueryFailed(err.to_string()),
        FetchError::Malformed { .. } => RemoteLookupError::MalformedResponse,
    })
}
