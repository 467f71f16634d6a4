//! Shared deterministic types for workspace core logic.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use serde::{Deserialize, Serialize};

use crate::tree::ProjectTree;

/// Which side of the terminal produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Input,
    Output,
}

/// Effect a command asks its caller to perform after the transcript is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Hand the root document to the preview surface.
    RunPreview,
}

/// Result of running one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Text appended as an output entry; `None` only for `clear`.
    pub output: Option<String>,
    /// Tree after the command. Equal to the input tree unless the command
    /// created a node.
    pub tree: ProjectTree,
    /// Effects for the caller to perform, in order.
    pub side_effects: Vec<SideEffect>,
}
