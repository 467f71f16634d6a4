//! Stable exit codes for workbench CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, seed project, or other errors.
pub const INVALID: i32 = 1;
