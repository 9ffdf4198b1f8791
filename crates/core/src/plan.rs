//! Execution planning
//!
//! Resolves a requested target into the ordered list of targets that must run
//! for it: dependencies first, in declared order, each target at most once.

use std::collections::HashSet;

use crate::registry::{Target, TargetRegistry};
use crate::types::{TidyupError, TidyupResult};

/// Ordered, deduplicated sequence of targets for one invocation
#[derive(Debug, Clone)]
pub struct ExecutionPlan<'a> {
    pub root: String,
    pub targets: Vec<&'a Target>,
}

impl ExecutionPlan<'_> {
    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Build the execution plan for `root`.
///
/// Fails with [`TidyupError::UnknownTarget`] if `root` or any dependency is not
/// registered, and with [`TidyupError::CyclicDependency`] if a target is reached
/// again while it is still being expanded.
pub fn build_plan<'a>(registry: &'a TargetRegistry, root: &str) -> TidyupResult<ExecutionPlan<'a>> {
    let mut planner = Planner {
        registry,
        visited: HashSet::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    planner.visit(root, None)?;

    Ok(ExecutionPlan {
        root: root.to_string(),
        targets: planner.order,
    })
}

struct Planner<'a> {
    registry: &'a TargetRegistry,
    visited: HashSet<&'a str>,
    /// Targets currently being expanded, outermost first
    path: Vec<&'a str>,
    order: Vec<&'a Target>,
}

impl<'a> Planner<'a> {
    fn visit(&mut self, name: &str, parent: Option<&str>) -> TidyupResult<()> {
        if let Some(start) = self.path.iter().position(|n| *n == name) {
            let mut cycle: Vec<String> = self.path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(name.to_string());
            return Err(TidyupError::CyclicDependency { cycle });
        }

        if self.visited.contains(name) {
            return Ok(());
        }

        let registry = self.registry;
        let target = registry.resolve(name).map_err(|e| match e {
            TidyupError::UnknownTarget { name, .. } => TidyupError::UnknownTarget {
                name,
                referenced_by: parent.map(str::to_string),
            },
            other => other,
        })?;

        self.path.push(&target.name);
        for dep in &target.dependencies {
            self.visit(dep, Some(target.name.as_str()))?;
        }
        self.path.pop();

        self.visited.insert(&target.name);
        self.order.push(target);
        Ok(())
    }
}
