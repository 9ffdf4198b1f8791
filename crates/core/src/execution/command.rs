//! Command invocation
//!
//! Turns a target's action into a concrete [`Invocation`] and runs it through a
//! [`Runnable`]. [`ProcessRunner`] is the real implementation: it spawns the
//! child with inherited stdio so the external tool's own diagnostics reach the
//! user unmodified.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::configs::targets::Command;
use crate::registry::Action;
use crate::types::{TidyupError, TidyupResult};

/// Program used to run single-string commands
const SHELL: &str = "sh";

/// Name exported to children as `$0` of the shell wrapper
const SHELL_ARGV0: &str = "tidyup";

/// Fully resolved external command for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub target: String,
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
}

impl Invocation {
    /// Build the invocation for `action`, appending `files` as trailing arguments
    pub fn from_action(
        target: &str,
        action: &Action,
        working_directory: &Path,
        files: &[PathBuf],
    ) -> Self {
        let file_args = files.iter().map(|f| f.to_string_lossy().into_owned());

        let (program, args) = match &action.command {
            Command::Single(cmd) => {
                let mut args = vec!["-c".to_string()];
                if files.is_empty() {
                    args.push(cmd.clone());
                } else {
                    // Files reach the command line through "$@" so no quoting is needed
                    args.push(format!("{} \"$@\"", cmd));
                    args.push(SHELL_ARGV0.to_string());
                    args.extend(file_args);
                }
                (SHELL.to_string(), args)
            }
            Command::Multiple(argv) => {
                let mut parts = argv.iter().cloned();
                let program = parts.next().unwrap_or_default();
                let args = parts.chain(file_args).collect();
                (program, args)
            }
        };

        Self {
            target: target.to_string(),
            program,
            args,
            working_directory: working_directory.to_path_buf(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How an invoked action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Exited(i32),
    /// Terminated by a signal without an exit code
    Signaled,
    /// The runner received an interrupt while the action was running
    Interrupted,
}

impl ActionStatus {
    pub fn success(&self) -> bool {
        matches!(self, ActionStatus::Exited(0))
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ActionStatus::Exited(code) => Some(*code),
            _ => None,
        }
    }
}

/// Shared flag recording that an interrupt arrived during a run
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag on Ctrl-C until the returned task is aborted
    pub fn listen(&self) -> tokio::task::JoinHandle<()> {
        let flag = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => flag.raise(),
                Err(e) => warn!(error = %e, "could not listen for interrupts"),
            }
        })
    }
}

/// Capability to run an external command and report how it ended
#[allow(async_fn_in_trait)]
pub trait Runnable {
    async fn invoke(&self, invocation: &Invocation) -> TidyupResult<ActionStatus>;
}

/// Runs invocations as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runnable for ProcessRunner {
    async fn invoke(&self, invocation: &Invocation) -> TidyupResult<ActionStatus> {
        let mut command = tokio::process::Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_directory)
            .env("TIDYUP_TARGET", &invocation.target)
            .kill_on_drop(true);

        debug!(target_name = %invocation.target, command = %invocation, "spawning action");
        let mut child = command.spawn().map_err(|source| TidyupError::Spawn {
            target: invocation.target.clone(),
            program: invocation.program.clone(),
            source,
        })?;

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                debug!(target_name = %invocation.target, ?status, "action finished");
                Ok(match status.code() {
                    Some(code) => ActionStatus::Exited(code),
                    None => ActionStatus::Signaled,
                })
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                warn!(target_name = %invocation.target, "interrupt received, stopping action");
                child.kill().await?;
                Ok(ActionStatus::Interrupted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(command: Command) -> Action {
        Action::new(command)
    }

    #[test]
    fn test_argv_command_appends_files() {
        let invocation = Invocation::from_action(
            "lint",
            &action(Command::Multiple(vec!["pylint".into(), "--score=n".into()])),
            Path::new("/repo"),
            &[PathBuf::from("a.py"), PathBuf::from("pkg/b.py")],
        );
        assert_eq!(invocation.program, "pylint");
        assert_eq!(invocation.args, vec!["--score=n", "a.py", "pkg/b.py"]);
        assert_eq!(invocation.working_directory, PathBuf::from("/repo"));
    }

    #[test]
    fn test_shell_command_without_files() {
        let invocation = Invocation::from_action(
            "format",
            &action(Command::Single("black .".into())),
            Path::new("/repo"),
            &[],
        );
        assert_eq!(invocation.program, "sh");
        assert_eq!(invocation.args, vec!["-c", "black ."]);
    }

    #[test]
    fn test_shell_command_passes_files_positionally() {
        let invocation = Invocation::from_action(
            "format",
            &action(Command::Single("black -q".into())),
            Path::new("/repo"),
            &[PathBuf::from("my file.py")],
        );
        assert_eq!(
            invocation.args,
            vec!["-c", "black -q \"$@\"", "tidyup", "my file.py"]
        );
    }

    #[test]
    fn test_compound_shell_command_gives_files_to_last_command() {
        let invocation = Invocation::from_action(
            "format",
            &action(Command::Single("isort -q && black -q".into())),
            Path::new("/repo"),
            &[PathBuf::from("a.py")],
        );
        assert_eq!(
            invocation.args,
            vec!["-c", "isort -q && black -q \"$@\"", "tidyup", "a.py"]
        );
    }

    #[test]
    fn test_display_quotes_arguments_with_spaces() {
        let invocation = Invocation::from_action(
            "format",
            &action(Command::Single("black .".into())),
            Path::new("/repo"),
            &[],
        );
        assert_eq!(invocation.to_string(), "sh -c 'black .'");
    }

    #[test]
    fn test_action_status_success() {
        assert!(ActionStatus::Exited(0).success());
        assert!(!ActionStatus::Exited(2).success());
        assert!(!ActionStatus::Signaled.success());
        assert_eq!(ActionStatus::Exited(2).code(), Some(2));
        assert_eq!(ActionStatus::Interrupted.code(), None);
    }

    #[tokio::test]
    async fn test_process_runner_reports_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let invocation = Invocation::from_action(
            "lint",
            &action(Command::Single("exit 3".into())),
            temp_dir.path(),
            &[],
        );
        let status = ProcessRunner.invoke(&invocation).await.unwrap();
        assert_eq!(status, ActionStatus::Exited(3));
    }

    #[tokio::test]
    async fn test_process_runner_missing_program_is_spawn_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let invocation = Invocation::from_action(
            "lint",
            &action(Command::Multiple(vec!["tidyup-no-such-program".into()])),
            temp_dir.path(),
            &[],
        );
        let err = ProcessRunner.invoke(&invocation).await.unwrap_err();
        assert!(matches!(err, TidyupError::Spawn { .. }));
    }
}
