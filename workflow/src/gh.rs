use crate::model::Assignment;
use crate::model::Classroom;
use crate::model::EntityId;
use crate::model::PullRequest;
use crate::remote::RepoSlug;
use crate::runner::CommandError;
use crate::runner::CommandRequest;
use crate::runner::CommandRunner;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const CLASSROOM_FIELDS: &str = "id,name,title";
const ASSIGNMENT_FIELDS: &str = "id,title,name,deadline";
const PULL_REQUEST_FIELDS: &str = "number,title,author,state,createdAt";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("unparseable output: {source}")]
    Malformed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed front for the `gh` and `git` invocations the workflow needs.
#[derive(Clone)]
pub struct ClassroomCli {
    runner: Arc<dyn CommandRunner>,
    gh_bin: PathBuf,
    git_bin: PathBuf,
}

impl ClassroomCli {
    pub fn new(runner: Arc<dyn CommandRunner>, gh_bin: PathBuf, git_bin: PathBuf) -> Self {
        Self {
            runner,
            gh_bin,
            git_bin,
        }
    }

    pub async fn list_classrooms(&self) -> Result<Vec<Classroom>, FetchError> {
        self.gh_json(["classroom", "list", "--json", CLASSROOM_FIELDS])
            .await
    }

    pub async fn list_assignments(&self, classroom: &EntityId) -> Result<Vec<Assignment>, FetchError> {
        self.gh_json([
            "classroom",
            "list-assignments",
            "--classroom-id",
            classroom.as_str(),
            "--json",
            ASSIGNMENT_FIELDS,
        ])
        .await
    }

    /// Clones every student repository of `assignment` into `dest`.
    pub async fn clone_student_repos(
        &self,
        assignment: &EntityId,
        dest: &Path,
    ) -> Result<(), CommandError> {
        let request = CommandRequest::new(
            &self.gh_bin,
            ["classroom", "clone", "student-repos", "-a", assignment.as_str()],
        )
        .current_dir(dest)
        .passthrough();
        self.runner.run(request).await?;
        Ok(())
    }

    pub async fn list_pull_requests(&self, repo: &RepoSlug) -> Result<Vec<PullRequest>, FetchError> {
        let repo = repo.to_string();
        self.gh_json([
            "pr",
            "list",
            "--repo",
            repo.as_str(),
            "--json",
            PULL_REQUEST_FIELDS,
        ])
        .await
    }

    /// URL of the `origin` remote of the checkout at `repo_dir`.
    pub async fn origin_url(&self, repo_dir: &Path) -> Result<String, CommandError> {
        let request =
            CommandRequest::new(&self.git_bin, ["remote", "get-url", "origin"]).current_dir(repo_dir);
        let output = self.runner.run(request).await?;
        Ok(output.stdout.trim().to_string())
    }

    async fn gh_json<T, const N: usize>(&self, args: [&str; N]) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let output = self
            .runner
            .run(CommandRequest::new(&self.gh_bin, args))
            .await?;
        serde_json::from_str(&output.stdout).map_err(|source| FetchError::Malformed {
            raw: output.stdout,
            source,
        })
    }
}
