//! Helpers for rendering deterministic node paths.

use crate::tree::Node;

/// Return the `/`-separated name path to `target_id`, rooted at `root`.
pub fn node_path(root: &Node, target_id: &str) -> Option<String> {
    let mut path = Vec::new();
    if node_path_inner(root, target_id, &mut path) {
        return Some(path.join("/"));
    }
    None
}

fn node_path_inner<'a>(node: &'a Node, target_id: &str, path: &mut Vec<&'a str>) -> bool {
    path.push(node.name.as_str());
    if node.id == target_id {
        return true;
    }
    for child in node.children() {
        if node_path_inner(child, target_id, path) {
            return true;
        }
    }
    path.pop();
    false
}
