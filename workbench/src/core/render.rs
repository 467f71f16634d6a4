//! ASCII rendering of the project tree.

use std::collections::BTreeSet;

use crate::tree::Node;

/// Render the whole tree. Folders get a trailing `/`.
///
/// Example output:
/// ```text
/// my-project/
/// ├── index.html
/// └── assets/
///     └── images/
/// ```
pub fn render_tree(root: &Node) -> String {
    let mut output = String::new();
    render_node(&mut output, root, "", true, true, None);
    output
}

/// Render only the children of expanded folders, like a file explorer.
///
/// Collapsed folders are still listed but their children are hidden.
pub fn render_explorer(root: &Node, expanded: &BTreeSet<String>) -> String {
    let mut output = String::new();
    render_node(&mut output, root, "", true, true, Some(expanded));
    output
}

fn label(node: &Node) -> String {
    if node.is_folder() {
        format!("{}/", node.name)
    } else {
        node.name.clone()
    }
}

fn render_node(
    output: &mut String,
    node: &Node,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    expanded: Option<&BTreeSet<String>>,
) {
    if is_root {
        output.push_str(&label(node));
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        output.push_str(&label(node));
    }
    output.push('\n');

    if let Some(expanded) = expanded {
        if !expanded.contains(&node.id) {
            return;
        }
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let child_is_last = i == children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false, expanded);
    }
}
