//! Task execution module
//!
//! This module handles running an execution plan: selecting source files,
//! building the external command for each target and invoking it.

pub mod command;
pub mod files;
pub mod runner;

pub use command::{ActionStatus, InterruptFlag, Invocation, ProcessRunner, Runnable};
pub use files::collect_matching_files;
pub use runner::{
    prepare_action, Executor, ExecutorConfig, PreparedAction, RunReport, RunState, TargetOutcome,
};
