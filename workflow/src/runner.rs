use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout and stderr for the caller.
    Capture,
    /// Let the child write progress to our stderr. Only the exit status is
    /// observed.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub output: OutputMode,
}

impl CommandRequest {
    pub fn new<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            output: OutputMode::Capture,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn passthrough(mut self) -> Self {
        self.output = OutputMode::Passthrough;
        self
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{program} not found. Please install it first.")]
    NotFound { program: String },
    #[error("{}", failure_text(.program, .status_code, .stderr))]
    Failed {
        program: String,
        status_code: Option<i32>,
        stderr: String,
    },
    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn failure_text(program: &str, status_code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match status_code {
        Some(code) => format!("{program} exited with status {code}"),
        None => format!("{program} was terminated by a signal"),
    }
}

/// Runs external programs on behalf of the workflow.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `request` to completion. A non-zero exit becomes
    /// [`CommandError::Failed`].
    async fn run(&self, request: CommandRequest) -> Result<CommandOutput, CommandError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, request: CommandRequest) -> Result<CommandOutput, CommandError> {
        let program = request.program_name();
        debug!(program = %program, args = ?request.args, cwd = ?request.cwd, "running command");

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);
        if let Some(dir) = &request.cwd {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        let spawn_error = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                CommandError::NotFound {
                    program: program.clone(),
                }
            } else {
                CommandError::Io {
                    program: program.clone(),
                    source,
                }
            }
        };

        let (status, output) = match request.output {
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
                let output = cmd.output().await.map_err(spawn_error)?;
                let captured = CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                (output.status, captured)
            }
            OutputMode::Passthrough => {
                // `output()` would force pipes, so spawn and wait instead.
                cmd.stdout(io::stderr());
                cmd.stderr(Stdio::inherit());
                let mut child = cmd.spawn().map_err(spawn_error)?;
                let status = child.wait().await.map_err(spawn_error)?;
                (status, CommandOutput::default())
            }
        };
        debug!(program = %program, status = ?status.code(), "command finished");

        if !status.success() {
            return Err(CommandError::Failed {
                program,
                status_code: status.code(),
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}
