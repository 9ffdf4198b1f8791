use thiserror::Error;

/// Exit code reported when nothing more specific is available
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code reported when a run was interrupted (128 + SIGINT)
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The main error type for tidyup operations
#[derive(Debug, Error)]
pub enum TidyupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", unknown_target_message(.name, .referenced_by.as_deref()))]
    UnknownTarget {
        name: String,
        referenced_by: Option<String>,
    },

    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Failed to start '{program}' for target '{target}': {source}")]
    Spawn {
        target: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", action_failed_message(.target, .status))]
    ActionFailed { target: String, status: Option<i32> },

    #[error("Target '{target}' was interrupted")]
    Interrupted { target: String },
}

impl TidyupError {
    /// Process exit code that best represents this error.
    ///
    /// A failing child's own exit code is propagated; everything that happened
    /// before a child ran maps to [`GENERIC_FAILURE_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            TidyupError::ActionFailed {
                status: Some(code), ..
            } if *code != 0 => *code,
            TidyupError::Interrupted { .. } => INTERRUPTED_EXIT_CODE,
            _ => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

fn unknown_target_message(name: &str, referenced_by: Option<&str>) -> String {
    match referenced_by {
        Some(parent) => format!(
            "Dependency '{}' not found for target '{}'",
            name, parent
        ),
        None => format!("Target '{}' not found", name),
    }
}

fn action_failed_message(target: &str, status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("Target '{}' failed with exit code {}", target, code),
        None => format!("Target '{}' was terminated by a signal", target),
    }
}

/// Result type alias for tidyup operations
pub type TidyupResult<T> = Result<T, TidyupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_failed_propagates_child_code() {
        let err = TidyupError::ActionFailed {
            target: "lint".to_string(),
            status: Some(4),
        };
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "Target 'lint' failed with exit code 4");
    }

    #[test]
    fn test_signal_and_config_errors_use_generic_code() {
        let signaled = TidyupError::ActionFailed {
            target: "format".to_string(),
            status: None,
        };
        assert_eq!(signaled.exit_code(), GENERIC_FAILURE_EXIT_CODE);

        let unknown = TidyupError::UnknownTarget {
            name: "deploy".to_string(),
            referenced_by: None,
        };
        assert_eq!(unknown.exit_code(), GENERIC_FAILURE_EXIT_CODE);
        assert_eq!(unknown.to_string(), "Target 'deploy' not found");
    }

    #[test]
    fn test_cycle_message_lists_path() {
        let err = TidyupError::CyclicDependency {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_interrupted_exit_code() {
        let err = TidyupError::Interrupted {
            target: "format".to_string(),
        };
        assert_eq!(err.exit_code(), INTERRUPTED_EXIT_CODE);
    }
}
