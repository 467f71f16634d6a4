//! Deterministic, pure logic shared by the workspace.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod buffers;
pub mod commands;
pub mod error;
pub mod interpreter;
pub mod invariants;
pub mod path;
pub mod render;
pub mod transcript;
pub mod types;
