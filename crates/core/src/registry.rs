//! Target registry
//!
//! Holds every declared target by name. A registry is built once from the
//! target file, validated, and then only read by the plan builder and the
//! executor.

use std::collections::HashMap;
use std::path::PathBuf;

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;
use tracing::{debug, warn};

use crate::configs::targets::{Command, TargetConfig, TargetsFileConfig};
use crate::types::{TidyupError, TidyupResult};

/// External command attached to a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub command: Command,
    /// Globs selecting the files appended to the command line
    pub files: Vec<String>,
    pub exclude: Vec<String>,
    pub working_directory: Option<PathBuf>,
}

impl Action {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            files: Vec::new(),
            exclude: Vec::new(),
            working_directory: None,
        }
    }

    pub fn with_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = patterns.into_iter().map(Into::into).collect();
        self
    }

    fn is_empty(&self) -> bool {
        match &self.command {
            Command::Single(cmd) => cmd.trim().is_empty(),
            Command::Multiple(argv) => argv.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub action: Option<Action>,
    pub phony: bool,
}

impl Target {
    /// A phony target without dependencies or action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            dependencies: Vec::new(),
            action: None,
            phony: true,
        }
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn phony(mut self, phony: bool) -> Self {
        self.phony = phony;
        self
    }
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        let action = config
            .command
            .clone()
            .map(|command| Action {
                command,
                files: config.files.clone().unwrap_or_default(),
                exclude: config.exclude.clone().unwrap_or_default(),
                working_directory: config.working_directory.as_ref().map(PathBuf::from),
            })
            .filter(|action| !action.is_empty());

        Self {
            name: config.name.clone(),
            description: config.description.clone(),
            dependencies: config.dependencies.clone().unwrap_or_default(),
            action,
            phony: config.phony.unwrap_or(true),
        }
    }
}

/// Mapping from target name to target definition
#[derive(Debug, Default, Clone)]
pub struct TargetRegistry {
    targets: HashMap<String, Target>,
    /// Names in first-declaration order, used for listing
    order: Vec<String>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate a registry from a parsed target file
    pub fn from_config(config: &TargetsFileConfig) -> TidyupResult<Self> {
        let mut registry = Self::new();
        for target_config in &config.targets {
            if registry.contains(&target_config.name) {
                warn!(
                    target_name = %target_config.name,
                    "target declared more than once, last definition wins"
                );
            }
            registry.register(Target::from(target_config));
        }
        registry.validate()?;
        debug!(targets = registry.len(), "target registry built");
        Ok(registry)
    }

    /// Add a target, replacing any previous definition with the same name
    pub fn register(&mut self, target: Target) {
        if !self.targets.contains_key(&target.name) {
            self.order.push(target.name.clone());
        }
        self.targets.insert(target.name.clone(), target);
    }

    pub fn resolve(&self, name: &str) -> TidyupResult<&Target> {
        self.targets
            .get(name)
            .ok_or_else(|| TidyupError::UnknownTarget {
                name: name.to_string(),
                referenced_by: None,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.order.iter().filter_map(|name| self.targets.get(name))
    }

    /// Check that every dependency exists and that every non-phony target has an action
    pub fn validate(&self) -> TidyupResult<()> {
        for target in self.iter() {
            for dep in &target.dependencies {
                if !self.contains(dep) {
                    return Err(TidyupError::UnknownTarget {
                        name: dep.clone(),
                        referenced_by: Some(target.name.clone()),
                    });
                }
            }

            if !target.phony && target.action.is_none() {
                return Err(TidyupError::Config(format!(
                    "Target '{}' is not phony but has no command to execute",
                    target.name
                )));
            }
        }
        Ok(())
    }

    /// Build the dependency graph; edges point from a target to its dependencies
    pub fn dependency_graph(&self) -> (Graph<String, ()>, Vec<Vec<String>>) {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_indices = HashMap::new();

        for target in self.iter() {
            let node_index = graph.add_node(target.name.clone());
            node_indices.insert(target.name.clone(), node_index);
        }

        for target in self.iter() {
            let from_node = node_indices[&target.name];
            for dep in &target.dependencies {
                if let Some(&to_node) = node_indices.get(dep) {
                    graph.add_edge(from_node, to_node, ());
                }
            }
        }

        let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
            .into_iter()
            .filter_map(|component| {
                if component.len() > 1 {
                    let mut cycle = component
                        .iter()
                        .map(|node| graph[*node].clone())
                        .collect::<Vec<_>>();
                    cycle.sort();
                    Some(cycle)
                } else {
                    let node = component[0];
                    if graph.contains_edge(node, node) {
                        Some(vec![graph[node].clone()])
                    } else {
                        None
                    }
                }
            })
            .collect();
        cycles.sort();

        (graph, cycles)
    }
}
