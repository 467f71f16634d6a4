//! Whole-tree invariants not expressible via JSON Schema.

use std::collections::HashSet;

use crate::tree::Node;

/// Check semantic invariants of a project tree:
/// - The root is a folder
/// - No duplicate ids
/// - Ids and names are non-empty
pub fn validate_invariants(root: &Node) -> Vec<String> {
    let mut errors = Vec::new();
    if !root.is_folder() {
        errors.push(format!("root '{}' must be a folder", root.id));
    }
    let mut seen = HashSet::new();
    validate_node(root, &mut seen, &mut errors, root.id.as_str());
    errors
}

fn validate_node(node: &Node, seen: &mut HashSet<String>, errors: &mut Vec<String>, path: &str) {
    if !seen.insert(node.id.clone()) {
        errors.push(format!("duplicate id '{}' at {}", node.id, path));
    }

    if node.id.trim().is_empty() {
        errors.push(format!("{}: id must be non-empty", path));
    }

    if node.name.is_empty() {
        errors.push(format!("{}: name must be non-empty", path));
    }

    for child in node.children() {
        let child_path = format!("{}/{}", path, child.id);
        validate_node(child, seen, errors, &child_path);
    }
}

/// First id (pre-order) that appears more than once under `root`.
pub fn first_duplicate_id(root: &Node) -> Option<String> {
    let mut ids = Vec::new();
    collect_ids(root, &mut ids);
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(id.clone()))
}

/// Collect every id under `node` (inclusive) in pre-order.
pub fn collect_ids<E: Extend<String>>(node: &Node, out: &mut E) {
    out.extend(std::iter::once(node.id.clone()));
    for child in node.children() {
        collect_ids(child, out);
    }
}
