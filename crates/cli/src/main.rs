use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tidyup_core::types::{TidyupError, GENERIC_FAILURE_EXIT_CODE};
use tidyup_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};

mod commands;
mod logging;

/// tidyup - run a project's formatter and linter targets
#[derive(Parser)]
#[command(name = "tidyup")]
#[command(about = "Run the formatter and linter targets declared in tidyup.yml")]
#[command(version)]
struct Cli {
    /// Target to run (defaults to the target file's default target)
    target: Option<String>,

    /// Working tree root (defaults to current directory)
    #[arg(short = 'C', long, default_value = ".")]
    directory: PathBuf,

    /// Target file (defaults to tidyup.yml in the working tree root)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Show the execution plan without running anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// List declared targets
    #[arg(short, long, conflicts_with_all = ["dry_run", "graph", "schema"])]
    list: bool,

    /// Show the target dependency graph
    #[arg(long, conflicts_with_all = ["dry_run", "schema"])]
    graph: bool,

    /// Print the JSON schema of the target file
    #[arg(long, conflicts_with = "dry_run")]
    schema: bool,

    /// Only print the external tools' own output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            let code = e
                .downcast_ref::<TidyupError>()
                .map(TidyupError::exit_code)
                .unwrap_or(GENERIC_FAILURE_EXIT_CODE);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    // The schema does not depend on any target file
    if cli.schema {
        return commands::schema::execute();
    }

    let manager = WorkspaceManager::new(WorkspaceManagerConfig {
        workspace_root: cli.directory,
        targets_file: cli.file,
    })
    .context("Failed to load targets")?;

    let target = cli.target.as_deref();
    if cli.list {
        commands::list::execute(&manager)
    } else if cli.graph {
        commands::list::execute_graph(&manager)
    } else if cli.dry_run {
        commands::plan::execute(&manager, target)
    } else {
        commands::run::execute(&manager, target, cli.quiet).await
    }
}
