//! Open documents ("tabs") bound to project tree nodes.
//!
//! A buffer's content is an independent copy of its node's content. Edits stay
//! in the buffer until [`BufferStore::save`] writes them back into the tree, and
//! divergence between the two is the only dirty signal.

use tracing::debug;

use crate::core::error::WorkspaceError;
use crate::tree::{Node, ProjectTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Equal to the originating node's id.
    pub id: String,
    pub display_name: String,
    /// Live, editable text.
    pub current_content: String,
    /// Node the buffer was opened from; `None` for scratch documents.
    pub source_ref: Option<String>,
}

impl Buffer {
    /// Upper-cased extension of the display name, or `TEXT` without one.
    pub fn language(&self) -> String {
        match self.display_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_uppercase(),
            _ => "TEXT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferStore {
    buffers: Vec<Buffer>,
    active: Option<String>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `node` and make it active.
    ///
    /// An already-open buffer keeps its own content; re-opening surfaces unsaved
    /// edits rather than the tree's current text. A buffer with the same id that
    /// is not backed by `node` (a scratch buffer) is never aliased.
    pub fn open(&mut self, node: &Node) -> Result<(), WorkspaceError> {
        match self.get(&node.id) {
            Some(existing) if existing.source_ref.as_deref() != Some(node.id.as_str()) => {
                return Err(WorkspaceError::DuplicateId(node.id.clone()));
            }
            Some(_) => {}
            None => {
                debug!(id = %node.id, "opening buffer");
                self.buffers.push(Buffer {
                    id: node.id.clone(),
                    display_name: node.name.clone(),
                    current_content: node.content().unwrap_or_default().to_string(),
                    source_ref: Some(node.id.clone()),
                });
            }
        }
        self.active = Some(node.id.clone());
        Ok(())
    }

    /// Open a buffer with no backing node and make it active.
    pub fn open_scratch(&mut self, id: &str, display_name: &str, content: &str) {
        if self.get(id).is_none() {
            debug!(id = %id, "opening scratch buffer");
            self.buffers.push(Buffer {
                id: id.to_string(),
                display_name: display_name.to_string(),
                current_content: content.to_string(),
                source_ref: None,
            });
        }
        self.active = Some(id.to_string());
    }

    /// Remove buffer `id`.
    ///
    /// Closing the active buffer activates the last remaining one, or leaves no
    /// buffer active when none remain.
    pub fn close(&mut self, id: &str) -> Result<Buffer, WorkspaceError> {
        let index = self
            .position(id)
            .ok_or_else(|| WorkspaceError::NotOpen(id.to_string()))?;
        let closed = self.buffers.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = self.buffers.last().map(|buffer| buffer.id.clone());
        }
        debug!(id = %id, active = ?self.active, "buffer closed");
        Ok(closed)
    }

    pub fn activate(&mut self, id: &str) -> Result<(), WorkspaceError> {
        if self.get(id).is_none() {
            return Err(WorkspaceError::NotOpen(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Replace the live content of buffer `id`. The tree is not touched.
    pub fn edit(&mut self, id: &str, content: &str) -> Result<(), WorkspaceError> {
        let buffer = self
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::NotOpen(id.to_string()))?;
        buffer.current_content = content.to_string();
        Ok(())
    }

    /// Write buffer `id` back into `tree`.
    ///
    /// Scratch buffers and buffers bound to folders leave the tree unchanged.
    pub fn save(&self, id: &str, tree: &ProjectTree) -> Result<ProjectTree, WorkspaceError> {
        let buffer = self
            .get(id)
            .ok_or_else(|| WorkspaceError::NotOpen(id.to_string()))?;
        let Some(source) = buffer.source_ref.as_deref() else {
            debug!(id = %id, "save skipped: scratch buffer");
            return Ok(tree.clone());
        };
        debug!(id = %id, source = %source, "saving buffer");
        Ok(tree.update(source, &buffer.current_content))
    }

    /// True if a file-backed buffer's content differs from its node's content.
    pub fn is_dirty(&self, id: &str, tree: &ProjectTree) -> Result<bool, WorkspaceError> {
        let buffer = self
            .get(id)
            .ok_or_else(|| WorkspaceError::NotOpen(id.to_string()))?;
        let Some(source) = buffer.source_ref.as_deref() else {
            return Ok(false);
        };
        Ok(match tree.lookup(source).ok().and_then(Node::content) {
            Some(saved) => saved != buffer.current_content,
            None => false,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|buffer| buffer.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.buffers.iter().position(|buffer| buffer.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Buffer> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Buffers in open order.
    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{file, folder, sample_tree};
    use crate::tree::seed_project;

    fn open_ids(store: &BufferStore) -> Vec<&str> {
        store.buffers().iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn open_appends_and_activates() {
        let mut store = BufferStore::new();
        store.open(&file("a", "a.txt", "alpha")).expect("open");
        store.open(&file("b", "b.txt", "beta")).expect("open");

        assert_eq!(open_ids(&store), vec!["a", "b"]);
        assert_eq!(store.active_id(), Some("b"));
        assert_eq!(store.get("a").expect("a").current_content, "alpha");
        assert_eq!(store.get("a").expect("a").source_ref.as_deref(), Some("a"));
    }

    #[test]
    fn reopen_preserves_unsaved_edits() {
        let node = file("a", "a.txt", "original");
        let mut store = BufferStore::new();
        store.open(&node).expect("open");
        store.edit("a", "X").expect("edit");
        store.open(&file("b", "b.txt", "")).expect("open");
        store.open(&node).expect("open");

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").expect("a").current_content, "X");
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn folder_buffers_start_empty() {
        let mut store = BufferStore::new();
        store.open(&folder("dir", "dir", Vec::new())).expect("open");
        assert_eq!(store.get("dir").expect("dir").current_content, "");
    }

    #[test]
    fn closing_active_buffer_activates_last_remaining() {
        let mut store = BufferStore::new();
        for id in ["a", "b", "c"] {
            store.open(&file(id, id, "")).expect("open");
        }
        assert_eq!(store.active_id(), Some("c"));

        let closed = store.close("c").expect("close");
        assert_eq!(closed.id, "c");
        assert_eq!(store.active_id(), Some("b"));
    }

    #[test]
    fn closing_inactive_buffer_keeps_active() {
        let mut store = BufferStore::new();
        for id in ["a", "b", "c"] {
            store.open(&file(id, id, "")).expect("open");
        }
        store.activate("a").expect("activate");
        store.close("b").expect("close");
        assert_eq!(store.active_id(), Some("a"));
        assert_eq!(open_ids(&store), vec!["a", "c"]);
    }

    #[test]
    fn closing_only_buffer_leaves_none_active() {
        let mut store = BufferStore::new();
        store.open(&file("a", "a", "")).expect("open");
        store.close("a").expect("close");
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
        assert!(store.active().is_none());
    }

    #[test]
    fn operations_on_unknown_buffers_report_not_open() {
        let mut store = BufferStore::new();
        let tree = sample_tree();
        let not_open = WorkspaceError::NotOpen("ghost".to_string());
        assert_eq!(store.edit("ghost", "x"), Err(not_open.clone()));
        assert_eq!(store.close("ghost"), Err(not_open.clone()));
        assert_eq!(store.activate("ghost"), Err(not_open.clone()));
        assert_eq!(store.save("ghost", &tree), Err(not_open.clone()));
        assert_eq!(store.is_dirty("ghost", &tree), Err(not_open));
    }

    #[test]
    fn save_propagates_buffer_content_into_tree() {
        let tree = sample_tree();
        let mut store = BufferStore::new();
        store.open(tree.lookup("a").expect("a")).expect("open");
        store.edit("a", "new").expect("edit");
        assert!(store.is_dirty("a", &tree).expect("dirty"));

        let saved = store.save("a", &tree).expect("save");
        assert_eq!(saved.lookup("a").expect("a").content(), Some("new"));
        assert!(!store.is_dirty("a", &saved).expect("clean"));
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn saving_scratch_buffer_leaves_tree_unchanged() {
        let tree = sample_tree();
        let mut store = BufferStore::new();
        store.open_scratch("welcome", "Welcome", "hello");
        store.edit("welcome", "changed").expect("edit");

        assert_eq!(store.save("welcome", &tree).expect("save"), tree);
        assert!(!store.is_dirty("welcome", &tree).expect("dirty"));
    }

    #[test]
    fn open_refuses_to_alias_a_scratch_buffer() {
        let mut store = BufferStore::new();
        store.open_scratch("a", "Scratch", "scratch text");

        assert_eq!(
            store.open(&file("a", "a.txt", "node text")),
            Err(WorkspaceError::DuplicateId("a".to_string()))
        );
        let scratch = store.get("a").expect("scratch");
        assert_eq!(scratch.source_ref, None);
        assert_eq!(scratch.current_content, "scratch text");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn saving_index_html_updates_the_seed_tree() {
        let tree = ProjectTree::new(seed_project()).expect("seed");
        let mut store = BufferStore::new();
        store.open(tree.lookup("index-html").expect("index")).expect("open");
        store.edit("index-html", "<h1>hi</h1>").expect("edit");

        let tree = store.save("index-html", &tree).expect("save");
        assert_eq!(
            tree.lookup("index-html").expect("index").content(),
            Some("<h1>hi</h1>")
        );
    }

    #[test]
    fn language_is_upper_cased_extension() {
        let mut store = BufferStore::new();
        store.open(&file("s", "style.css", "")).expect("open");
        store.open(&file("r", "README", "")).expect("open");
        assert_eq!(store.get("s").expect("s").language(), "CSS");
        assert_eq!(store.get("r").expect("r").language(), "TEXT");
    }
}
