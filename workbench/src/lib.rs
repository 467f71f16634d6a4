//! In-memory project workbench: a file tree, editor buffers, a simulated
//! terminal, and a live preview of the project's root document.
//!
//! The crate keeps a strict split between:
//!
//! - **[`core`]**: Pure, deterministic logic (buffers, command table, interpreter,
//!   tree rendering, invariants). No I/O.
//! - **[`io`]**: Config files, seed project files, and the preview surface.
//!
//! [`workspace`] owns one session's state and routes every mutation through a
//! single place; [`repl`] drives it from a line-oriented stream.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod repl;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
pub mod workspace;
