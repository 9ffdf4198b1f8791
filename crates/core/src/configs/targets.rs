use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{TidyupError, TidyupResult};

/// File name looked up at the working tree root when no file is given
pub const DEFAULT_TARGETS_FILE: &str = "tidyup.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Command {
    /// A command line run through `sh -c`.
    ///
    /// Selected files are appended as `"$@"` at the very end of the line, so in
    /// a compound line such as `isort -q && black -q` only the last simple
    /// command receives them. Use the argv form, or one target per tool, when
    /// every command needs the files.
    Single(String),
    /// A program followed by its arguments, run without a shell
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub command: Option<Command>,
    /// Glob patterns selecting the source files passed to the command
    pub files: Option<Vec<String>>,
    /// Glob patterns removed from the `files` selection
    pub exclude: Option<Vec<String>>,
    /// Phony targets never correspond to a produced file. Defaults to true.
    pub phony: Option<bool>,
    /// Directory the command runs in, relative to the working tree root
    pub working_directory: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TargetsFileConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Target run when none is requested. Falls back to the first declared target.
    pub default_target: Option<String>,
    pub targets: Vec<TargetConfig>,
}

impl TargetsFileConfig {
    /// Name of the target to run when the caller does not request one
    pub fn default_target_name(&self) -> TidyupResult<&str> {
        if let Some(name) = &self.default_target {
            return Ok(name.as_str());
        }

        self.targets
            .first()
            .map(|t| t.name.as_str())
            .ok_or_else(|| TidyupError::Config("No targets declared".to_string()))
    }
}

pub fn parse_targets_config(yaml_str: &str) -> TidyupResult<TargetsFileConfig> {
    let config: TargetsFileConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// JSON schema describing the target file
pub fn targets_config_schema() -> TidyupResult<String> {
    let schema = schemars::schema_for!(TargetsFileConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| TidyupError::Config(format!("Failed to render schema: {}", e)))
}
