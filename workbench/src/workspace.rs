//! Single owned workspace state: tree, buffers, transcript, and explorer flags.
//!
//! All mutation goes through the methods here, one operation at a time, so the
//! tree, the open buffers, and the transcript stay consistent with each other.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::core::buffers::{Buffer, BufferStore};
use crate::core::commands::CommandTable;
use crate::core::error::WorkspaceError;
use crate::core::interpreter::Interpreter;
use crate::core::render::render_explorer;
use crate::core::transcript::Transcript;
use crate::core::types::{Execution, SideEffect};
use crate::io::config::WorkbenchConfig;
use crate::io::preview::{BlobPreview, PreviewSurface};
use crate::io::seed::load_project;
use crate::tree::{ProjectTree, seed_project, welcome_document};

/// Preferred id of the scratch document every workspace starts with. A tree
/// that already uses it gets a suffixed id instead (`welcome-2`, ...).
pub const WELCOME_BUFFER_ID: &str = "welcome";

pub struct Workspace<P: PreviewSurface> {
    tree: ProjectTree,
    buffers: BufferStore,
    interpreter: Interpreter,
    preview: P,
    preview_root_id: String,
    welcome_id: String,
    expanded: BTreeSet<String>,
    selected: Option<String>,
}

impl Workspace<BlobPreview> {
    /// Build a workspace from config, loading the seed project file if one is set.
    pub fn from_config(config: &WorkbenchConfig) -> Result<Self> {
        config.validate()?;
        let tree = match &config.seed_path {
            Some(path) => load_project(path).context("load seed project")?,
            None => ProjectTree::new(seed_project()).context("build built-in seed project")?,
        };
        let preview = BlobPreview::new(
            Duration::from_millis(config.preview.release_after_ms),
            config.preview.max_live_handles,
        );
        Ok(Self::new(tree, config, preview))
    }
}

impl<P: PreviewSurface> Workspace<P> {
    /// Start a session on `tree` with the welcome buffer open and active.
    ///
    /// The root folder and its direct child folders start expanded.
    pub fn new(tree: ProjectTree, config: &WorkbenchConfig, preview: P) -> Self {
        let welcome_id = tree.fresh_id(WELCOME_BUFFER_ID);
        let mut buffers = BufferStore::new();
        buffers.open_scratch(&welcome_id, "Welcome", welcome_document());

        let root = tree.root();
        let expanded = std::iter::once(root.id.clone())
            .chain(
                root.children()
                    .iter()
                    .filter(|child| child.is_folder())
                    .map(|child| child.id.clone()),
            )
            .collect();

        let interpreter = Interpreter::with_table(
            CommandTable::default(),
            config.command_settings(),
            Transcript::with_greeting(config.terminal.greeting.iter().cloned()),
        );

        Self {
            tree,
            buffers,
            interpreter,
            preview,
            preview_root_id: config.preview.root_id.clone(),
            welcome_id,
            expanded,
            selected: None,
        }
    }

    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn buffers(&self) -> &BufferStore {
        &self.buffers
    }

    pub fn transcript(&self) -> &Transcript {
        self.interpreter.transcript()
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut P {
        &mut self.preview
    }

    /// Id of the welcome scratch buffer.
    pub fn welcome_id(&self) -> &str {
        &self.welcome_id
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    /// Node most recently opened from the tree.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Open node `id` in a buffer (or re-activate its existing buffer).
    pub fn open(&mut self, id: &str) -> Result<(), WorkspaceError> {
        let node = self.tree.lookup(id)?;
        self.buffers.open(node)?;
        self.selected = Some(id.to_string());
        info!(id = %id, "opened");
        Ok(())
    }

    pub fn activate(&mut self, id: &str) -> Result<(), WorkspaceError> {
        self.buffers.activate(id)
    }

    pub fn edit(&mut self, id: &str, content: &str) -> Result<(), WorkspaceError> {
        self.buffers.edit(id, content)
    }

    /// Write buffer `id` into the tree.
    pub fn save(&mut self, id: &str) -> Result<(), WorkspaceError> {
        self.tree = self.buffers.save(id, &self.tree)?;
        info!(id = %id, "saved");
        Ok(())
    }

    /// Save whichever buffer is active. Returns its id, or `None` if nothing is open.
    pub fn save_active(&mut self) -> Result<Option<String>, WorkspaceError> {
        let Some(id) = self.buffers.active_id().map(str::to_string) else {
            debug!("save skipped: no active buffer");
            return Ok(None);
        };
        self.save(&id)?;
        Ok(Some(id))
    }

    pub fn close(&mut self, id: &str) -> Result<Buffer, WorkspaceError> {
        self.buffers.close(id)
    }

    pub fn is_dirty(&self, id: &str) -> Result<bool, WorkspaceError> {
        self.buffers.is_dirty(id, &self.tree)
    }

    /// Flip a folder between expanded and collapsed. Returns the new state.
    pub fn toggle_folder(&mut self, id: &str) -> Result<bool, WorkspaceError> {
        if !self.tree.lookup(id)?.is_folder() {
            return Err(WorkspaceError::InvalidParent(id.to_string()));
        }
        let expanded = if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        };
        debug!(id = %id, expanded, "folder toggled");
        Ok(expanded)
    }

    /// Explorer view: the tree with collapsed folders' children hidden.
    pub fn explorer(&self) -> String {
        render_explorer(self.tree.root(), &self.expanded)
    }

    /// Hand the saved content of the root document to the preview surface.
    ///
    /// Returns false if the root document is missing or is a folder.
    pub fn run_project(&mut self) -> bool {
        let Ok(node) = self.tree.lookup(&self.preview_root_id) else {
            warn!(id = %self.preview_root_id, "preview root not found");
            return false;
        };
        let Some(content) = node.content() else {
            warn!(id = %self.preview_root_id, "preview root is a folder");
            return false;
        };
        self.preview.render(content);
        true
    }

    /// Run one terminal line, adopt the resulting tree, and perform side effects.
    pub fn submit(&mut self, line: &str) -> Execution {
        let execution = self.interpreter.execute(line, &self.tree, &self.buffers);
        self.tree = execution.tree.clone();
        for effect in &execution.side_effects {
            match effect {
                SideEffect::RunPreview => {
                    self.run_project();
                }
            }
        }
        execution
    }
}
