//! Seed project load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::Draft;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::tree::{Node, ProjectTree};

const PROJECT_SCHEMA: &str = include_str!("../../schemas/project.v1.schema.json");

/// Load and validate a project tree from a JSON file.
pub fn load_project(path: &Path) -> Result<ProjectTree> {
    debug!(path = %path.display(), "loading seed project");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read project {}", path.display()))?;
    parse_project(&contents).with_context(|| format!("load project {}", path.display()))
}

/// Parse and validate project JSON: schema conformance + semantic invariants.
pub fn parse_project(raw: &str) -> Result<ProjectTree> {
    let value: Value = serde_json::from_str(raw).context("parse project json")?;
    validate_schema(&value)?;
    let root: Node = serde_json::from_value(value).context("deserialize project tree")?;
    let errors = validate_invariants(&root);
    if !errors.is_empty() {
        return Err(anyhow!("invariant violations:\n- {}", errors.join("\n- ")));
    }
    ProjectTree::new(root).map_err(|err| anyhow!("invalid project tree: {err}"))
}

/// Write a project tree as pretty-printed JSON with trailing newline.
pub fn write_project(path: &Path, tree: &ProjectTree) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(tree).context("serialize project json")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write project {}", path.display()))
}

/// Validate a JSON instance against the embedded project schema (Draft 2020-12).
fn validate_schema(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(PROJECT_SCHEMA).context("parse project schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .context("compile project schema")?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(anyhow!(
            "schema validation failed:\n- {}",
            messages.join("\n- ")
        ));
    }
    Ok(())
}
