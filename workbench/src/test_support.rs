//! Test-only helpers for constructing project trees and observing previews.

use crate::io::preview::PreviewSurface;
use crate::tree::{Node, ProjectTree};

/// Create a file node.
pub fn file(id: &str, name: &str, content: &str) -> Node {
    Node::file(id, name, content)
}

/// Create a folder node with children.
pub fn folder(id: &str, name: &str, children: Vec<Node>) -> Node {
    Node::folder(id, name, children)
}

/// Small tree with a nested file:
///
/// ```text
/// root/
/// ├── a          "a content"
/// └── dir/
///     ├── b      "b content"
///     └── sub/
///         └── deep   "deep content"
/// ```
pub fn sample_tree() -> ProjectTree {
    ProjectTree::new(folder(
        "root",
        "root",
        vec![
            file("a", "a", "a content"),
            folder(
                "dir",
                "dir",
                vec![
                    file("b", "b", "b content"),
                    folder("sub", "sub", vec![file("deep", "deep", "deep content")]),
                ],
            ),
        ],
    ))
    .expect("sample tree is valid")
}

/// Preview surface that records every rendered document.
#[derive(Debug, Default)]
pub struct RecordingPreview {
    pub rendered: Vec<String>,
}

impl PreviewSurface for RecordingPreview {
    fn render(&mut self, html: &str) {
        self.rendered.push(html.to_string());
    }
}
