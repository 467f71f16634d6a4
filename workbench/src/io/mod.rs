//! I/O helpers: config files, seed projects, and the preview surface.

pub mod config;
pub mod preview;
pub mod seed;
