//! Result types for workspace operations
//!
//! Presentation-neutral structures returned by [`crate::WorkspaceManager`];
//! the CLI decides how to print them.

use std::collections::HashMap;

use colored::Color;
use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::execution::runner::PreparedAction;

/// A declared target as shown by `--list`
#[derive(Debug, Clone)]
pub struct TargetInfo {
    pub name: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub phony: bool,
    pub has_action: bool,
    pub is_default: bool,
}

/// Result of listing the declared targets
#[derive(Debug)]
pub struct TargetListResult {
    pub name: Option<String>,
    pub default_target: String,
    pub targets: Vec<TargetInfo>,
    pub target_colors: HashMap<String, Color>,
}

/// Result of getting the dependency graph
#[derive(Debug)]
pub struct DependencyGraphResult {
    pub graph: petgraph::Graph<String, ()>,
    pub cycles: Vec<Vec<String>>,
}

/// A target's edges in both directions, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEdges {
    pub name: String,
    pub needs: Vec<String>,
    pub needed_by: Vec<String>,
}

impl DependencyGraphResult {
    pub fn edges(&self) -> Vec<TargetEdges> {
        self.graph
            .node_indices()
            .map(|node| TargetEdges {
                name: self.graph[node].clone(),
                needs: self.neighbor_names(node, Direction::Outgoing),
                needed_by: self.neighbor_names(node, Direction::Incoming),
            })
            .collect()
    }

    fn neighbor_names(&self, node: NodeIndex, direction: Direction) -> Vec<String> {
        // petgraph walks the most recently added edge first
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|neighbor| self.graph[neighbor].clone())
            .collect();
        names.reverse();
        names
    }
}

/// One step of a dry run
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub target: String,
    pub action: PreparedAction,
}

/// Result of resolving an execution plan without running it
#[derive(Debug)]
pub struct TaskPlanResult {
    pub root: String,
    pub steps: Vec<PlannedStep>,
    pub target_colors: HashMap<String, Color>,
}
