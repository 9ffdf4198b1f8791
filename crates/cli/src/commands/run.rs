use anyhow::Result;
use colored::*;
use tidyup_core::execution::{ExecutorConfig, ProcessRunner};
use tidyup_core::workspace_manager::WorkspaceManager;
use tracing::debug;

pub async fn execute(manager: &WorkspaceManager, target: Option<&str>, quiet: bool) -> Result<()> {
    let root = target.unwrap_or(manager.default_target());
    debug!(target_name = root, requested = target.is_some(), "running target");

    let report = manager
        .run_target(target, &ProcessRunner, ExecutorConfig { quiet })
        .await?;

    if !quiet {
        println!();
        println!(
            "{} {} {}",
            "✓".green().bold(),
            format!("'{}' finished:", report.root).bold(),
            format!(
                "{} action(s) run in {:.2}s",
                report.invoked(),
                report.elapsed.as_secs_f64()
            )
            .bright_black()
        );
    }

    Ok(())
}
