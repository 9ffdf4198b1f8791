use anyhow::Result;
use colored::*;
use tidyup_core::execution::PreparedAction;
use tidyup_core::workspace_manager::WorkspaceManager;

pub fn execute(manager: &WorkspaceManager, target: Option<&str>) -> Result<()> {
    let result = manager
        .describe_plan(target)
        .map_err(|e| anyhow::anyhow!("Failed to get execution plan: {}", e))?;

    println!("{} {}", "Execution plan for".bold(), result.root.cyan());

    println!("\n{}:", "Execution order".bold());
    for (i, step) in result.steps.iter().enumerate() {
        let label = match result.target_colors.get(&step.target) {
            Some(color) => step.target.color(*color).bold(),
            None => step.target.bold(),
        };
        println!("  {}. {}", i + 1, label);

        match &step.action {
            PreparedAction::None => println!("     {}", "no action".dimmed()),
            PreparedAction::NoMatchingFiles => {
                println!("     {}", "no matching files, would be skipped".dimmed())
            }
            PreparedAction::Invoke {
                invocation,
                file_count,
            } => {
                println!("     {} {}", "$".bright_black(), invocation);
                if *file_count > 0 {
                    println!("     {}", format!("{} file(s)", file_count).dimmed());
                }
            }
        }
    }

    Ok(())
}
