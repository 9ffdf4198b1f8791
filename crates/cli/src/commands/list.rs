use anyhow::Result;
use colored::*;
use tidyup_core::workspace_manager::WorkspaceManager;

pub fn execute(manager: &WorkspaceManager) -> Result<()> {
    let result = manager.list_targets();

    let heading = match &result.name {
        Some(name) => format!("Targets ({})", name),
        None => "Targets".to_string(),
    };
    println!("{}", heading.bold().underline());

    if result.targets.is_empty() {
        println!("  {}", "No targets found".dimmed());
        return Ok(());
    }

    for target in &result.targets {
        let name = match result.target_colors.get(&target.name) {
            Some(color) => target.name.color(*color).bold(),
            None => target.name.bold(),
        };

        let mut markers = Vec::new();
        if target.is_default {
            markers.push("default".green().to_string());
        }
        if !target.phony {
            markers.push("file".yellow().to_string());
        }
        if !target.has_action {
            markers.push("no action".dimmed().to_string());
        }

        if markers.is_empty() {
            println!("{}", name);
        } else {
            println!("{} [{}]", name, markers.join(", "));
        }

        if let Some(description) = &target.description {
            println!("  {}", description.dimmed());
        }
        if !target.dependencies.is_empty() {
            println!(
                "  {} {}",
                "depends on:".dimmed(),
                target.dependencies.join(", ")
            );
        }
    }

    Ok(())
}

/// List every target with the targets it needs and the targets needing it
pub fn execute_graph(manager: &WorkspaceManager) -> Result<()> {
    let result = manager.get_dependency_graph();
    println!("{}", "Dependency graph".bold().underline());

    let edges = result.edges();
    if edges.is_empty() {
        println!("  {}", "No targets found".dimmed());
        return Ok(());
    }

    for target in &edges {
        println!("{}", target.name.bold());
        print_edge_line("needs:", &target.needs);
        print_edge_line("needed by:", &target.needed_by);
    }

    if !result.cycles.is_empty() {
        println!();
        println!("{}", "Cycles".red().bold());
        for cycle in &result.cycles {
            let closing = cycle.first().map(String::as_str).into_iter();
            let path: Vec<&str> = cycle.iter().map(String::as_str).chain(closing).collect();
            println!("  {}", path.join(" -> ").red());
        }
    }

    Ok(())
}

fn print_edge_line(label: &str, names: &[String]) {
    if names.is_empty() {
        println!("  {} {}", label.dimmed(), "-".dimmed());
    } else {
        println!("  {} {}", label.dimmed(), names.join(", "));
    }
}
