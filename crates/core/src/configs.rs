//! Configuration parsing
//!
//! The target file is a YAML document listing named targets, their
//! dependencies and the command each one runs.

pub mod targets;
