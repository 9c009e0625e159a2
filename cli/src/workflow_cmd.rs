use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Subcommand;
use classroom_workflow::EngineOptions;
use classroom_workflow::WorkflowEngine;
use classroom_workflow::tool_specs;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tracing::debug;

#[derive(Debug, Args)]
pub struct EngineArgs {
    /// Path to the GitHub CLI executable.
    #[arg(long = "gh-bin", value_name = "PATH", default_value = "gh", global = true)]
    pub gh_bin: PathBuf,

    /// Path to the git executable used to read repository remotes.
    #[arg(long = "git-bin", value_name = "PATH", default_value = "git", global = true)]
    pub git_bin: PathBuf,

    /// Directory student repositories are cloned into. Defaults to the
    /// current directory.
    #[arg(long = "workdir", value_name = "DIR", global = true)]
    pub workdir: Option<PathBuf>,
}

impl EngineArgs {
    fn into_options(self) -> Result<EngineOptions> {
        let workspace_dir = match self.workdir {
            Some(dir) => dir,
            None => std::env::current_dir().context("failed to read the current directory")?,
        };
        Ok(EngineOptions {
            gh_bin: self.gh_bin,
            git_bin: self.git_bin,
            workspace_dir,
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum WorkflowSubcommand {
    /// Print the tool catalogue (names, descriptions, input schemas) as JSON.
    Tools,
    /// Run a single tool call against a fresh session store.
    Call(CallArgs),
    /// Read `<tool> [ARGS_JSON]` lines from stdin and run them in order,
    /// keeping sessions between lines.
    Repl,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool name, e.g. `start_classroom_workflow`.
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Tool arguments as a JSON object.
    #[arg(value_name = "ARGS_JSON")]
    pub arguments: Option<String>,
}

pub async fn execute(action: WorkflowSubcommand, engine_args: EngineArgs) -> Result<()> {
    match action {
        WorkflowSubcommand::Tools => print_tools(),
        WorkflowSubcommand::Call(call_args) => {
            let mut engine = WorkflowEngine::new(engine_args.into_options()?);
            call(&mut engine, call_args).await
        }
        WorkflowSubcommand::Repl => {
            let mut engine = WorkflowEngine::new(engine_args.into_options()?);
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            repl(&mut engine, stdin, &mut stdout).await
        }
    }
}

fn print_tools() -> Result<()> {
    let json = serde_json::to_string_pretty(&tool_specs()).context("serialize tool catalogue")?;
    println!("{json}");
    Ok(())
}

async fn call(engine: &mut WorkflowEngine, args: CallArgs) -> Result<()> {
    let arguments = parse_arguments(args.arguments.as_deref())?;
    let text = engine.call_tool(&args.tool, &arguments).await?;
    println!("{text}");
    Ok(())
}

/// Runs one tool call per input line until EOF or `quit`.
///
/// Contract violations (unknown tool, bad arguments) are reported on stderr
/// and do not end the loop.
pub async fn repl<R, W>(engine: &mut WorkflowEngine, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        let (tool, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        debug!(tool, "repl call");

        let result = match parse_arguments(Some(rest)) {
            Ok(arguments) => engine.call_tool(tool, &arguments).await.map_err(anyhow::Error::from),
            Err(err) => Err(err),
        };
        match result {
            Ok(text) => {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n\n").await?;
                output.flush().await?;
            }
            Err(err) => eprintln!("error: {err:#}"),
        }
    }
    Ok(())
}

fn parse_arguments(raw: Option<&str>) -> Result<Value> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Value::Null),
        Some(raw) => serde_json::from_str(raw).with_context(|| format!("invalid arguments JSON: {raw}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn engine() -> WorkflowEngine {
        WorkflowEngine::new(EngineOptions {
            gh_bin: PathBuf::from("/nonexistent/gh"),
            git_bin: PathBuf::from("/nonexistent/git"),
            workspace_dir: std::env::temp_dir(),
        })
    }

    #[test]
    fn arguments_default_to_null() {
        assert_eq!(parse_arguments(None).expect("none"), Value::Null);
        assert_eq!(parse_arguments(Some("  ")).expect("blank"), Value::Null);
        assert_eq!(
            parse_arguments(Some(r#"{"classroom_number": 1}"#)).expect("object"),
            json!({"classroom_number": 1})
        );
        assert!(parse_arguments(Some("{oops")).is_err());
    }

    #[tokio::test]
    async fn repl_keeps_going_after_contract_violations() {
        let mut engine = engine();
        let input = b"# comment\n\nunknown_tool\nselect_classroom {oops\nselect_classroom {\"classroom_number\": 1}\nreset_session\nquit\nreset_session\n";
        let mut output = Vec::new();

        repl(&mut engine, &input[..], &mut output).await.expect("repl");

        let text = String::from_utf8(output).expect("utf8");
        assert_eq!(
            text,
            format!(
                "No classrooms available. Please call 'start_classroom_workflow' first.\n\n{}\n\n",
                classroom_workflow::report::session_reset()
            )
        );
    }

    #[tokio::test]
    async fn repl_reports_missing_gh() {
        let mut engine = engine();
        let mut output = Vec::new();

        repl(&mut engine, &b"start_classroom_workflow\n"[..], &mut output)
            .await
            .expect("repl");

        let text = String::from_utf8(output).expect("utf8");
        assert!(
            text.contains("/nonexistent/gh not found. Please install it first."),
            "{text}"
        );
    }
}
