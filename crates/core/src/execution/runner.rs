//! Plan executor
//!
//! Runs the targets of an [`ExecutionPlan`] one at a time, in plan order. The
//! first action that does not exit successfully stops the run; effects of the
//! targets that already completed are left in place.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use colored::*;
use tracing::{debug, info, warn};

use crate::execution::command::{ActionStatus, InterruptFlag, Invocation, Runnable};
use crate::execution::files::collect_matching_files;
use crate::plan::ExecutionPlan;
use crate::registry::Target;
use crate::tasks::get_target_color;
use crate::types::{TidyupError, TidyupResult};

/// Configuration for the executor
#[derive(Debug, Default, Clone)]
pub struct ExecutorConfig {
    /// Suppress the per-target headers printed to stdout
    pub quiet: bool,
}

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Pending,
    /// Index into the plan of the target currently running
    Running(usize),
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Succeeded,
    /// The target has no action
    Skipped,
    /// The action selects files by glob and none matched
    NoMatchingFiles,
}

#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub outcome: TargetOutcome,
    pub elapsed: Duration,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub root: String,
    pub targets: Vec<TargetReport>,
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of targets whose action was actually invoked
    pub fn invoked(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.outcome == TargetOutcome::Succeeded)
            .count()
    }
}

/// Sequential executor for execution plans
pub struct Executor<'a, R: Runnable> {
    runner: &'a R,
    working_root: PathBuf,
    config: ExecutorConfig,
    state: RunState,
    interrupt: InterruptFlag,
}

impl<'a, R: Runnable> Executor<'a, R> {
    pub fn new(runner: &'a R, working_root: impl Into<PathBuf>) -> Self {
        Self::with_config(runner, working_root, ExecutorConfig::default())
    }

    pub fn with_config(
        runner: &'a R,
        working_root: impl Into<PathBuf>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            runner,
            working_root: working_root.into(),
            config,
            state: RunState::Pending,
            interrupt: InterruptFlag::default(),
        }
    }

    /// Use `interrupt` instead of a fresh flag, so callers can stop the run
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run every target of `plan` in order, stopping at the first failure.
    ///
    /// Ctrl-C is watched for the whole run. Once received, no further target
    /// is started.
    pub async fn run(&mut self, plan: &ExecutionPlan<'_>) -> TidyupResult<RunReport> {
        let listener = self.interrupt.listen();
        tokio::task::yield_now().await;

        let result = self.run_plan(plan).await;
        listener.abort();
        result
    }

    async fn run_plan(&mut self, plan: &ExecutionPlan<'_>) -> TidyupResult<RunReport> {
        let started = Instant::now();
        let mut reports = Vec::with_capacity(plan.len());

        for (index, target) in plan.targets.iter().enumerate() {
            self.state = RunState::Running(index);
            let target_started = Instant::now();

            match self.run_target(target).await {
                Ok(outcome) => reports.push(TargetReport {
                    name: target.name.clone(),
                    outcome,
                    elapsed: target_started.elapsed(),
                }),
                Err(e) => {
                    self.state = RunState::Aborted;
                    return Err(e);
                }
            }
        }

        self.state = RunState::Completed;
        info!(root = %plan.root, targets = reports.len(), "run completed");
        Ok(RunReport {
            root: plan.root.clone(),
            targets: reports,
            elapsed: started.elapsed(),
        })
    }

    async fn run_target(&self, target: &Target) -> TidyupResult<TargetOutcome> {
        self.check_interrupt(target)?;
        let (invocation, file_count) = match prepare_action(&self.working_root, target)? {
            PreparedAction::None => {
                debug!(target_name = %target.name, "no action, skipping");
                return Ok(TargetOutcome::Skipped);
            }
            PreparedAction::NoMatchingFiles => {
                self.print_no_files(&target.name);
                return Ok(TargetOutcome::NoMatchingFiles);
            }
            PreparedAction::Invoke {
                invocation,
                file_count,
            } => (invocation, file_count),
        };

        self.check_interrupt(target)?;
        self.print_header(&target.name, file_count);

        match self.runner.invoke(&invocation).await? {
            status if status.success() => {
                self.print_completion(&target.name);
                Ok(TargetOutcome::Succeeded)
            }
            ActionStatus::Interrupted => Err(TidyupError::Interrupted {
                target: target.name.clone(),
            }),
            status => Err(TidyupError::ActionFailed {
                target: target.name.clone(),
                status: status.code(),
            }),
        }
    }

    fn check_interrupt(&self, target: &Target) -> TidyupResult<()> {
        if self.interrupt.is_raised() {
            warn!(target_name = %target.name, "interrupt received, not starting target");
            return Err(TidyupError::Interrupted {
                target: target.name.clone(),
            });
        }
        Ok(())
    }

    fn print_header(&self, target_name: &str, file_count: usize) {
        if self.config.quiet {
            return;
        }
        let color = get_target_color(target_name);
        println!();
        if file_count > 0 {
            println!(
                "┌─ {} {}",
                format!("Running target '{}'", target_name).color(color).bold(),
                format!("on {} file(s)", file_count).bright_black()
            );
        } else {
            println!(
                "┌─ {}",
                format!("Running target '{}'", target_name).color(color).bold()
            );
        }
    }

    fn print_completion(&self, target_name: &str) {
        if self.config.quiet {
            return;
        }
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("Completed {}", target_name).color(get_target_color(target_name))
        );
    }

    fn print_no_files(&self, target_name: &str) {
        if self.config.quiet {
            return;
        }
        println!(
            "{} {}",
            "-".bright_black(),
            format!("No matching files for {}, skipping", target_name).bright_black()
        );
    }
}

/// What running a target amounts to, resolved against the working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedAction {
    /// The target has no action
    None,
    /// The action selects files by glob and none matched
    NoMatchingFiles,
    Invoke {
        invocation: Invocation,
        file_count: usize,
    },
}

/// Resolve the working directory and file selection of `target`'s action
pub fn prepare_action(working_root: &Path, target: &Target) -> TidyupResult<PreparedAction> {
    let Some(action) = &target.action else {
        return Ok(PreparedAction::None);
    };

    let working_directory =
        resolve_working_directory(working_root, action.working_directory.as_deref());

    let files = if action.files.is_empty() {
        Vec::new()
    } else {
        let files = collect_matching_files(&working_directory, &action.files, &action.exclude)?;
        if files.is_empty() {
            return Ok(PreparedAction::NoMatchingFiles);
        }
        files
    };

    Ok(PreparedAction::Invoke {
        invocation: Invocation::from_action(&target.name, action, &working_directory, &files),
        file_count: files.len(),
    })
}

fn resolve_working_directory(root: &Path, relative: Option<&Path>) -> PathBuf {
    match relative {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => root.join(dir),
        None => root.to_path_buf(),
    }
}
