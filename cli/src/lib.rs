pub mod workflow_cmd;

use clap::Parser;
use workflow_cmd::EngineArgs;
use workflow_cmd::WorkflowSubcommand;

/// Walk GitHub Classroom classrooms, assignments and student pull requests
/// through the `gh` CLI.
#[derive(Debug, Parser)]
#[command(name = "classroom", version)]
pub struct Cli {
    #[clap(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub action: WorkflowSubcommand,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    workflow_cmd::execute(cli.action, cli.engine).await
}
