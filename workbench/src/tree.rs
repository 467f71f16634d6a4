//! Persistent project tree.
//!
//! Every mutation returns a new [`ProjectTree`]. Only the nodes on the path from
//! the root to the changed node are rebuilt; untouched subtrees are shared by
//! `Arc` with the previous tree, so readers holding an older tree keep a valid,
//! unchanged view.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::core::error::WorkspaceError;
use crate::core::invariants::{collect_ids, first_duplicate_id};

const INDEX_HTML: &str = include_str!("../seed/index.html");
const STYLE_CSS: &str = include_str!("../seed/style.css");
const SCRIPT_JS: &str = include_str!("../seed/script.js");

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub body: NodeBody,
}

/// Payload of a node. A file carries content, a folder carries ordered children.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    File {
        #[serde(default)]
        content: String,
    },
    Folder {
        #[serde(default)]
        children: Vec<Arc<Node>>,
    },
}

impl Node {
    pub fn file(id: &str, name: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            body: NodeBody::File {
                content: content.to_string(),
            },
        }
    }

    pub fn folder(id: &str, name: &str, children: Vec<Node>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            body: NodeBody::Folder {
                children: children.into_iter().map(Arc::new).collect(),
            },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    /// File content, or `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    /// Children in display order. Always empty for files.
    pub fn children(&self) -> &[Arc<Node>] {
        match &self.body {
            NodeBody::File { .. } => &[],
            NodeBody::Folder { children } => children,
        }
    }
}

/// Serializes as its root node. Deserializing goes through [`ProjectTree::new`],
/// so a file root or duplicate ids are rejected.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Node")]
pub struct ProjectTree {
    root: Arc<Node>,
}

impl Serialize for ProjectTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl TryFrom<Node> for ProjectTree {
    type Error = WorkspaceError;

    fn try_from(root: Node) -> Result<Self, Self::Error> {
        Self::new(root)
    }
}

impl ProjectTree {
    /// Build a tree from a root folder, rejecting duplicate ids.
    pub fn new(root: Node) -> Result<Self, WorkspaceError> {
        if !root.is_folder() {
            return Err(WorkspaceError::InvalidParent(root.id));
        }
        if let Some(id) = first_duplicate_id(&root) {
            return Err(WorkspaceError::DuplicateId(id));
        }
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Pre-order depth-first search for `id`.
    pub fn lookup(&self, id: &str) -> Result<&Node, WorkspaceError> {
        find_node(&self.root, id).ok_or_else(|| WorkspaceError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        find_node(&self.root, id).is_some()
    }

    /// First node named `name` in pre-order.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes().into_iter().find(|node| node.name == name)
    }

    /// All nodes in pre-order, root first.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_nodes(&self.root, &mut out);
        out
    }

    /// Replace the content of file `id`.
    ///
    /// Returns the unchanged tree if `id` is missing or names a folder; use
    /// [`ProjectTree::lookup`] first to tell those cases apart.
    pub fn update(&self, id: &str, content: &str) -> ProjectTree {
        let Some(path) = index_path(&self.root, id) else {
            debug!(id = %id, "update skipped: node not found");
            return self.clone();
        };
        let root = rebuild_along(&self.root, &path, |node| match &node.body {
            NodeBody::File { .. } => Node {
                id: node.id.clone(),
                name: node.name.clone(),
                body: NodeBody::File {
                    content: content.to_string(),
                },
            },
            NodeBody::Folder { .. } => node.clone(),
        });
        if Arc::ptr_eq(&root, &self.root) {
            debug!(id = %id, "update left tree unchanged");
        } else {
            debug!(id = %id, bytes = content.len(), "node content updated");
        }
        ProjectTree { root }
    }

    /// Append `node` as the last child of folder `parent_id`.
    pub fn insert(&self, parent_id: &str, node: Node) -> Result<ProjectTree, WorkspaceError> {
        let parent = self.lookup(parent_id)?;
        if !parent.is_folder() {
            return Err(WorkspaceError::InvalidParent(parent_id.to_string()));
        }
        let mut existing: HashSet<String> = HashSet::new();
        collect_ids(&self.root, &mut existing);
        let mut incoming = Vec::new();
        collect_ids(&node, &mut incoming);
        let mut seen = HashSet::new();
        for id in incoming {
            if existing.contains(&id) || !seen.insert(id.clone()) {
                return Err(WorkspaceError::DuplicateId(id));
            }
        }

        let path = index_path(&self.root, parent_id)
            .ok_or_else(|| WorkspaceError::NotFound(parent_id.to_string()))?;
        let inserted_id = node.id.clone();
        let child = Arc::new(node);
        let root = rebuild_along(&self.root, &path, move |parent| {
            let mut children = parent.children().to_vec();
            children.push(child);
            Node {
                id: parent.id.clone(),
                name: parent.name.clone(),
                body: NodeBody::Folder { children },
            }
        });
        debug!(parent = %parent_id, id = %inserted_id, "node inserted");
        Ok(ProjectTree { root })
    }

    /// Derive an unused id from a display name (`index.html` -> `index-html`).
    ///
    /// Nodes are never removed, so an id unused now has never been used.
    pub fn fresh_id(&self, name: &str) -> String {
        self.fresh_id_avoiding(name, |_| false)
    }

    /// Like [`ProjectTree::fresh_id`], also skipping ids `reserved` claims
    /// (for example ids of open scratch buffers).
    pub fn fresh_id_avoiding(&self, name: &str, reserved: impl Fn(&str) -> bool) -> String {
        let taken = |id: &str| self.contains(id) || reserved(id);
        let base = slugify(name);
        if !taken(&base) {
            return base;
        }
        let mut suffix = 2u32;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn find_node<'a>(node: &'a Node, target_id: &str) -> Option<&'a Node> {
    if node.id == target_id {
        return Some(node);
    }

    for child in node.children() {
        if let Some(found) = find_node(child, target_id) {
            return Some(found);
        }
    }

    None
}

fn collect_nodes<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    out.push(node);
    for child in node.children() {
        collect_nodes(child, out);
    }
}

/// Child indexes leading from `root` to `target_id`.
fn index_path(root: &Node, target_id: &str) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    if index_path_inner(root, target_id, &mut path) {
        return Some(path);
    }
    None
}

fn index_path_inner(node: &Node, target_id: &str, path: &mut Vec<usize>) -> bool {
    if node.id == target_id {
        return true;
    }
    for (index, child) in node.children().iter().enumerate() {
        path.push(index);
        if index_path_inner(child, target_id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Rebuild the spine from `node` down `path`, applying `edit` at the end.
///
/// Siblings along the way are shared, not copied. If `edit` returns a node
/// equal to the original, the original `Arc` is kept.
fn rebuild_along<F>(node: &Arc<Node>, path: &[usize], edit: F) -> Arc<Node>
where
    F: FnOnce(&Node) -> Node,
{
    let Some((&index, rest)) = path.split_first() else {
        let edited = edit(node);
        if edited == **node {
            return Arc::clone(node);
        }
        return Arc::new(edited);
    };

    let NodeBody::Folder { children } = &node.body else {
        return Arc::clone(node);
    };
    let Some(child) = children.get(index) else {
        return Arc::clone(node);
    };
    let rebuilt = rebuild_along(child, rest, edit);
    if Arc::ptr_eq(&rebuilt, child) {
        return Arc::clone(node);
    }
    let mut children = children.clone();
    children[index] = rebuilt;
    Arc::new(Node {
        id: node.id.clone(),
        name: node.name.clone(),
        body: NodeBody::Folder { children },
    })
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        return "node".to_string();
    }
    slug
}

/// The project every workspace starts with unless a seed file is configured.
pub fn seed_project() -> Node {
    Node::folder(
        "root",
        "my-project",
        vec![
            Node::file("index-html", "index.html", INDEX_HTML),
            Node::file("style-css", "style.css", STYLE_CSS),
            Node::file("script-js", "script.js", SCRIPT_JS),
            Node::folder(
                "assets",
                "assets",
                vec![
                    Node::folder("images", "images", Vec::new()),
                    Node::folder("css", "css", Vec::new()),
                    Node::folder("js", "js", Vec::new()),
                ],
            ),
        ],
    )
}

/// Text of the root HTML document in the seed project.
pub fn welcome_document() -> &'static str {
    INDEX_HTML
}
