//! High-level workspace management interface
//!
//! This module provides the [`WorkspaceManager`] which serves as the primary
//! interface for every operation the CLI exposes. It loads the target file once,
//! builds and validates the target registry, and then answers listing, graph,
//! planning and run requests against that immutable registry.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tidyup_core::execution::{ExecutorConfig, ProcessRunner};
//! use tidyup_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> tidyup_core::types::TidyupResult<()> {
//! let manager = WorkspaceManager::new(WorkspaceManagerConfig {
//!     workspace_root: PathBuf::from("."),
//!     targets_file: None,
//! })?;
//!
//! // Resolve the default target without running anything
//! let plan = manager.get_execution_plan(None)?;
//! println!("{:?}", plan.names());
//!
//! // Run it
//! manager
//!     .run_target(None, &ProcessRunner, ExecutorConfig::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::configs::targets::{parse_targets_config, TargetsFileConfig, DEFAULT_TARGETS_FILE};
use crate::execution::command::Runnable;
use crate::execution::runner::{prepare_action, Executor, ExecutorConfig, RunReport};
use crate::plan::{build_plan, ExecutionPlan};
use crate::registry::TargetRegistry;
use crate::results::{
    DependencyGraphResult, PlannedStep, TargetInfo, TargetListResult, TaskPlanResult,
};
use crate::tasks::get_target_color;
use crate::types::{TidyupError, TidyupResult};

/// Configuration for initializing a workspace manager
pub struct WorkspaceManagerConfig {
    /// Working tree the targets operate on
    pub workspace_root: PathBuf,
    /// Target file; defaults to `tidyup.yml` under the workspace root
    pub targets_file: Option<PathBuf>,
}

/// High-level workspace manager that encapsulates all target operations
#[derive(Debug)]
pub struct WorkspaceManager {
    pub root: PathBuf,
    pub targets_config: TargetsFileConfig,
    pub registry: TargetRegistry,
    default_target: String,
}

impl WorkspaceManager {
    /// Load the target file and build the registry.
    ///
    /// Every configuration error is reported here, before anything runs.
    pub fn new(config: WorkspaceManagerConfig) -> TidyupResult<Self> {
        let targets_path = config
            .targets_file
            .unwrap_or_else(|| config.workspace_root.join(DEFAULT_TARGETS_FILE));
        let targets_config = Self::load_targets_config(&targets_path)?;

        Self::from_targets_config(config.workspace_root, targets_config)
    }

    /// Build a manager from an already parsed target file
    pub fn from_targets_config(
        root: PathBuf,
        targets_config: TargetsFileConfig,
    ) -> TidyupResult<Self> {
        let registry = TargetRegistry::from_config(&targets_config)?;

        let default_target = targets_config.default_target_name()?.to_string();
        registry.resolve(&default_target).map_err(|_| {
            TidyupError::Config(format!(
                "Default target '{}' is not declared",
                default_target
            ))
        })?;

        debug!(root = %root.display(), default_target = %default_target, "workspace loaded");
        Ok(Self {
            root,
            targets_config,
            registry,
            default_target,
        })
    }

    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    /// List the declared targets in declaration order
    pub fn list_targets(&self) -> TargetListResult {
        let targets = self
            .registry
            .iter()
            .map(|target| TargetInfo {
                name: target.name.clone(),
                description: target.description.clone(),
                dependencies: target.dependencies.clone(),
                phony: target.phony,
                has_action: target.action.is_some(),
                is_default: target.name == self.default_target,
            })
            .collect();

        TargetListResult {
            name: self.targets_config.name.clone(),
            default_target: self.default_target.clone(),
            targets,
            target_colors: self.get_target_colors(),
        }
    }

    /// Resolve the execution plan for `target`, or for the default target
    pub fn get_execution_plan(&self, target: Option<&str>) -> TidyupResult<ExecutionPlan<'_>> {
        let root = target.unwrap_or(self.default_target.as_str());
        build_plan(&self.registry, root)
    }

    /// Resolve the plan and the command each step would run, without running it
    pub fn describe_plan(&self, target: Option<&str>) -> TidyupResult<TaskPlanResult> {
        let plan = self.get_execution_plan(target)?;

        let steps = plan
            .targets
            .iter()
            .map(|target| {
                Ok(PlannedStep {
                    target: target.name.clone(),
                    action: prepare_action(&self.root, target)?,
                })
            })
            .collect::<TidyupResult<Vec<_>>>()?;

        Ok(TaskPlanResult {
            root: plan.root,
            steps,
            target_colors: self.get_target_colors(),
        })
    }

    /// Resolve and run `target` (or the default target) with `runner`
    pub async fn run_target<R: Runnable>(
        &self,
        target: Option<&str>,
        runner: &R,
        config: ExecutorConfig,
    ) -> TidyupResult<RunReport> {
        let plan = self.get_execution_plan(target)?;
        info!(root = %plan.root, steps = plan.len(), "running plan");

        let mut executor = Executor::with_config(runner, &self.root, config);
        executor.run(&plan).await
    }

    /// Get dependency graph information
    pub fn get_dependency_graph(&self) -> DependencyGraphResult {
        let (graph, cycles) = self.registry.dependency_graph();
        DependencyGraphResult { graph, cycles }
    }

    fn load_targets_config(path: &Path) -> TidyupResult<TargetsFileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TidyupError::Config(format!(
                "Failed to read target file {}: {}",
                path.display(),
                e
            ))
        })?;

        parse_targets_config(&content).map_err(|e| {
            TidyupError::Config(format!(
                "Failed to parse target file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn get_target_colors(&self) -> HashMap<String, colored::Color> {
        self.registry
            .iter()
            .map(|target| (target.name.clone(), get_target_color(&target.name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::execution::command::{ActionStatus, Invocation};
    use crate::execution::runner::PreparedAction;

    const TARGETS: &str = r#"
name: sample
defaultTarget: all
targets:
  - name: format
    description: Reformat sources in place
    command: [black, -q]
    files: ["**/*.py"]
  - name: lint
    description: Report style findings
    command: [pylint]
    files: ["**/*.py"]
  - name: all
    dependencies: [format, lint]
"#;

    #[derive(Default)]
    struct RecordingRunner {
        failing: Option<&'static str>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl Runnable for RecordingRunner {
        async fn invoke(&self, invocation: &Invocation) -> TidyupResult<ActionStatus> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.failing == Some(invocation.target.as_str()) {
                Ok(ActionStatus::Exited(1))
            } else {
                Ok(ActionStatus::Exited(0))
            }
        }
    }

    fn workspace_with(targets: &str) -> (tempfile::TempDir, TidyupResult<WorkspaceManager>) {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(DEFAULT_TARGETS_FILE), targets).unwrap();
        std::fs::write(temp_dir.path().join("app.py"), "print('hi')\n").unwrap();
        let manager = WorkspaceManager::new(WorkspaceManagerConfig {
            workspace_root: temp_dir.path().to_path_buf(),
            targets_file: None,
        });
        (temp_dir, manager)
    }

    fn quiet() -> ExecutorConfig {
        ExecutorConfig { quiet: true }
    }

    #[test]
    fn test_default_target_plan() {
        let (_dir, manager) = workspace_with(TARGETS);
        let manager = manager.unwrap();
        assert_eq!(manager.default_target(), "all");

        let plan = manager.get_execution_plan(None).unwrap();
        assert_eq!(plan.names(), vec!["format", "lint", "all"]);
    }

    #[test]
    fn test_shipped_target_file() {
        let config = parse_targets_config(include_str!("../../../tidyup.yml")).unwrap();
        assert_eq!(config.default_target_name().unwrap(), "all");

        let registry = TargetRegistry::from_config(&config).unwrap();
        let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["format", "lint", "all"]);

        let plan = build_plan(&registry, "all").unwrap();
        assert_eq!(plan.names(), vec!["format", "lint", "all"]);

        for name in ["format", "lint"] {
            let action = registry.resolve(name).unwrap().action.as_ref().unwrap();
            assert_eq!(action.files, vec!["**/*.py".to_string()]);
        }
        assert!(registry.resolve("all").unwrap().action.is_none());
    }

    #[test]
    fn test_missing_target_file_is_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = WorkspaceManager::new(WorkspaceManagerConfig {
            workspace_root: temp_dir.path().to_path_buf(),
            targets_file: None,
        })
        .unwrap_err();
        assert!(matches!(err, TidyupError::Config(_)));
    }

    #[test]
    fn test_undeclared_default_target_is_rejected() {
        let (_dir, manager) =
            workspace_with("defaultTarget: ci\ntargets:\n  - name: lint\n    command: pylint\n");
        let err = manager.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Default target 'ci' is not declared"
        );
    }

    #[test]
    fn test_list_targets_marks_default() {
        let (_dir, manager) = workspace_with(TARGETS);
        let result = manager.unwrap().list_targets();

        assert_eq!(result.name.as_deref(), Some("sample"));
        let names: Vec<_> = result.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["format", "lint", "all"]);
        assert!(result.targets[2].is_default);
        assert!(!result.targets[2].has_action);
        assert_eq!(result.target_colors.len(), 3);
    }

    #[test]
    fn test_describe_plan_resolves_files() {
        let (_dir, manager) = workspace_with(TARGETS);
        let result = manager.unwrap().describe_plan(Some("format")).unwrap();

        assert_eq!(result.steps.len(), 1);
        match &result.steps[0].action {
            PreparedAction::Invoke {
                invocation,
                file_count,
            } => {
                assert_eq!(*file_count, 1);
                assert_eq!(invocation.args, vec!["-q", "app.py"]);
            }
            other => panic!("expected an invocation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_unknown_target_invokes_nothing() {
        let (_dir, manager) = workspace_with(TARGETS);
        let manager = manager.unwrap();
        let runner = RecordingRunner::default();

        let err = manager
            .run_target(Some("deploy"), &runner, quiet())
            .await
            .unwrap_err();
        assert!(matches!(err, TidyupError::UnknownTarget { .. }));
        assert!(runner.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_run_default_target_succeeds() {
        let (_dir, manager) = workspace_with(TARGETS);
        let manager = manager.unwrap();
        let runner = RecordingRunner::default();

        let report = manager.run_target(None, &runner, quiet()).await.unwrap();
        assert_eq!(report.root, "all");
        assert_eq!(report.invoked(), 2);
        let programs: Vec<_> = runner
            .calls
            .borrow()
            .iter()
            .map(|c| c.program.clone())
            .collect();
        assert_eq!(programs, vec!["black", "pylint"]);
    }

    #[tokio::test]
    async fn test_failing_format_never_reaches_lint() {
        let (_dir, manager) = workspace_with(TARGETS);
        let manager = manager.unwrap();
        let runner = RecordingRunner {
            failing: Some("format"),
            ..Default::default()
        };

        let err = manager.run_target(None, &runner, quiet()).await.unwrap_err();
        assert!(
            matches!(err, TidyupError::ActionFailed { ref target, status: Some(1) } if target == "format")
        );
        assert_eq!(runner.calls.borrow().len(), 1);
    }

    #[test]
    fn test_cyclic_targets_fail_before_running() {
        let (_dir, manager) = workspace_with(
            "targets:\n  - name: a\n    dependencies: [b]\n  - name: b\n    dependencies: [a]\n",
        );
        let manager = manager.unwrap();

        let err = manager.get_execution_plan(None).unwrap_err();
        assert!(matches!(err, TidyupError::CyclicDependency { .. }));

        let graph = manager.get_dependency_graph();
        assert_eq!(graph.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
    }
}
