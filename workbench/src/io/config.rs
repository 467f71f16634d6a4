//! Workbench configuration stored as TOML (default `workbench.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::commands::CommandSettings;

/// Workbench configuration (TOML).
///
/// Missing fields default to the values the built-in seed project expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Characters of file content `cat` prints before truncating.
    pub cat_limit_chars: usize,

    /// JSON project file to load instead of the built-in seed project.
    pub seed_path: Option<PathBuf>,

    pub preview: PreviewConfig,

    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreviewConfig {
    /// Node whose content `npm start` hands to the preview surface.
    pub root_id: String,

    /// Release an unconsumed preview handle after this many milliseconds.
    pub release_after_ms: u64,

    /// Never keep more than this many handles alive at once.
    pub max_live_handles: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalConfig {
    /// Output lines the transcript starts with.
    pub greeting: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            root_id: "index-html".to_string(),
            release_after_ms: 1_000,
            max_live_handles: 8,
        }
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            greeting: vec![
                "Welcome to the workbench terminal".to_string(),
                "Type \"help\" to list available commands".to_string(),
            ],
        }
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            cat_limit_chars: 500,
            seed_path: None,
            preview: PreviewConfig::default(),
            terminal: TerminalConfig::default(),
        }
    }
}

impl WorkbenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cat_limit_chars == 0 {
            return Err(anyhow!("cat_limit_chars must be > 0"));
        }
        if self.preview.root_id.trim().is_empty() {
            return Err(anyhow!("preview.root_id must be non-empty"));
        }
        if self.preview.release_after_ms == 0 {
            return Err(anyhow!("preview.release_after_ms must be > 0"));
        }
        if self.preview.max_live_handles == 0 {
            return Err(anyhow!("preview.max_live_handles must be > 0"));
        }
        Ok(())
    }

    pub fn command_settings(&self) -> CommandSettings {
        CommandSettings {
            cat_limit_chars: self.cat_limit_chars,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WorkbenchConfig::default()`.
pub fn load_config(path: &Path) -> Result<WorkbenchConfig> {
    if !path.exists() {
        let cfg = WorkbenchConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WorkbenchConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &WorkbenchConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
