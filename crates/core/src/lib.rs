//! tidyup Core Library
//!
//! This is the core library for the tidyup task runner. It provides the
//! target model, dependency-ordered plan resolution and sequential execution
//! of the external formatter and linter commands a target file declares.
//!
//! ## Architecture
//!
//! - [`workspace_manager`] - High-level interface used by the CLI
//! - [`registry`] - Target definitions and validation
//! - [`plan`] - Depth-first execution plan resolution with cycle detection
//! - [`execution`] - File selection, process invocation and the plan executor
//! - [`configs`] - Target file parsing
//! - [`tasks`] - Target label colors
//! - [`results`] - Result types for workspace operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tidyup_core::workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
//! use std::path::PathBuf;
//!
//! # fn example() -> tidyup_core::types::TidyupResult<()> {
//! let manager = WorkspaceManager::new(WorkspaceManagerConfig {
//!     workspace_root: PathBuf::from("."),
//!     targets_file: None,
//! })?;
//!
//! let targets = manager.list_targets();
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod execution;
pub mod plan;
pub mod registry;
pub mod results;
pub mod tasks;
pub mod types;
pub mod workspace_manager;

// Re-export the main types for easier usage
pub use types::{TidyupError, TidyupResult};
pub use workspace_manager::{WorkspaceManager, WorkspaceManagerConfig};
