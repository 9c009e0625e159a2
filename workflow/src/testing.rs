use crate::runner::CommandError;
use crate::runner::CommandOutput;
use crate::runner::CommandRequest;
use crate::runner::CommandRunner;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

/// Replays queued results in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<CommandOutput, CommandError>>>,
    calls: Mutex<Vec<CommandRequest>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_stdout(&self, stdout: &str) {
        self.push(Ok(CommandOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
    }

    pub(crate) fn push_failure(&self, program: &str, stderr: &str) {
        self.push(Err(CommandError::Failed {
            program: program.to_string(),
            status_code: Some(1),
            stderr: stderr.to_string(),
        }));
    }

    pub(crate) fn push_not_found(&self, program: &str) {
        self.push(Err(CommandError::NotFound {
            program: program.to_string(),
        }));
    }

    fn push(&self, response: Result<CommandOutput, CommandError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn calls(&self) -> Vec<CommandRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, request: CommandRequest) -> Result<CommandOutput, CommandError> {
        let program = request.program_name();
        let args = request.args.join(" ");
        self.calls.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for `{program} {args}`"))
    }
}
