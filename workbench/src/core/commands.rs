//! Registered terminal command table.
//!
//! Each entry pairs a matcher with an action. Exact matchers compare the whole
//! trimmed, case-folded line; prefix matchers take the rest of the line after the
//! verb and one space as a single argument. Tooling verbs (`npm`, `git`, `code`)
//! print canned transcripts and never touch the tree.

use tracing::warn;

use crate::core::buffers::BufferStore;
use crate::core::error::WorkspaceError;
use crate::core::types::SideEffect;
use crate::tree::{Node, ProjectTree};

/// How a verb is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Whole line equals the verb, ignoring case and surrounding whitespace.
    Exact(&'static str),
    /// Line starts with the verb followed by one space; the remainder is the argument.
    Prefix(&'static str),
}

impl Matcher {
    /// Return the argument text if `trimmed` (or its case-folded form) matches.
    fn matches<'l>(&self, trimmed: &'l str, folded: &str) -> Option<&'l str> {
        match *self {
            Matcher::Exact(verb) => (folded == verb).then_some(""),
            Matcher::Prefix(verb) => {
                // `get` returns None off a char boundary instead of panicking.
                let word = trimmed.get(..verb.len())?;
                let rest = trimmed.get(verb.len()..)?;
                rest.strip_prefix(' ').filter(|_| word.eq_ignore_ascii_case(verb))
            }
        }
    }
}

/// Inputs a handler may read.
pub struct CommandContext<'a> {
    /// Argument text, verbatim. Empty for exact verbs.
    pub args: &'a str,
    pub tree: &'a ProjectTree,
    pub buffers: &'a BufferStore,
    pub settings: &'a CommandSettings,
    pub table: &'a CommandTable,
}

/// Handler output. `tree` is set only when the command changed the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub tree: Option<ProjectTree>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tree: None,
        }
    }
}

pub type Handler = fn(&CommandContext<'_>) -> Reply;

#[derive(Clone, Copy)]
pub enum Action {
    Run(Handler),
    /// Reset the transcript; no input or output entry is recorded.
    ClearTranscript,
}

#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub matcher: Matcher,
    /// Usage shown by `help`.
    pub usage: &'static str,
    pub summary: &'static str,
    pub action: Action,
    pub side_effect: Option<SideEffect>,
}

/// Tunables for handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSettings {
    /// Characters of file content `cat` prints before truncating.
    pub cat_limit_chars: usize,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            cat_limit_chars: 500,
        }
    }
}

pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        Self { entries }
    }

    /// Resolve a line: exact matches first, then prefix matches, in table order.
    pub fn resolve<'l>(&self, trimmed: &'l str) -> Option<(&CommandEntry, &'l str)> {
        let folded = trimmed.to_lowercase();
        let exact = self
            .entries
            .iter()
            .filter(|entry| matches!(entry.matcher, Matcher::Exact(_)));
        let prefix = self
            .entries
            .iter()
            .filter(|entry| matches!(entry.matcher, Matcher::Prefix(_)));
        exact.chain(prefix).find_map(|entry| {
            entry
                .matcher
                .matches(trimmed, &folded)
                .map(|args| (entry, args))
        })
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new(default_entries())
    }
}

fn entry(
    matcher: Matcher,
    usage: &'static str,
    summary: &'static str,
    handler: Handler,
) -> CommandEntry {
    CommandEntry {
        matcher,
        usage,
        summary,
        action: Action::Run(handler),
        side_effect: None,
    }
}

/// The built-in verb set.
pub fn default_entries() -> Vec<CommandEntry> {
    use Matcher::{Exact, Prefix};

    vec![
        entry(Exact("help"), "help", "show this message", help),
        CommandEntry {
            matcher: Exact("clear"),
            usage: "clear",
            summary: "clear the terminal",
            action: Action::ClearTranscript,
            side_effect: None,
        },
        entry(Exact("ls"), "ls", "list files and folders", ls),
        entry(Exact("pwd"), "pwd", "print the working directory", pwd),
        entry(Exact("tree"), "tree", "print the project tree", tree),
        entry(Prefix("mkdir"), "mkdir [name]", "create a folder", mkdir),
        entry(Prefix("touch"), "touch [name]", "create a file", touch),
        entry(Prefix("cat"), "cat [file]", "show file content", cat),
        entry(Exact("npm install"), "npm install", "install packages", npm_install),
        CommandEntry {
            side_effect: Some(SideEffect::RunPreview),
            ..entry(Exact("npm start"), "npm start", "run the project", npm_start)
        },
        entry(Exact("npm run build"), "npm run build", "build the project", npm_run_build),
        entry(Exact("git status"), "git status", "show git status", git_status),
        entry(Exact("git add ."), "git add .", "stage all files", git_add),
        entry(Exact("git commit"), "git commit", "commit staged changes", git_commit),
        entry(Exact("code ."), "code .", "open the project in the editor", code_dot),
    ]
}

fn help(ctx: &CommandContext<'_>) -> Reply {
    let mut text = String::from("Available commands:");
    for entry in ctx.table.entries() {
        text.push_str(&format!("\n  {:<14}- {}", entry.usage, entry.summary));
    }
    Reply::text(text)
}

fn ls(ctx: &CommandContext<'_>) -> Reply {
    let names: Vec<String> = ctx
        .tree
        .root()
        .children()
        .iter()
        .map(|child| {
            if child.is_folder() {
                format!("{}/", child.name)
            } else {
                child.name.clone()
            }
        })
        .collect();
    Reply::text(names.join("  "))
}

fn pwd(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text("/home/user/my-project")
}

fn tree(ctx: &CommandContext<'_>) -> Reply {
    let rendered = crate::core::render::render_tree(ctx.tree.root());
    Reply::text(rendered.trim_end())
}

fn mkdir(ctx: &CommandContext<'_>) -> Reply {
    create_under_root(ctx, "folder", |id, name| Node::folder(id, name, Vec::new()))
}

fn touch(ctx: &CommandContext<'_>) -> Reply {
    create_under_root(ctx, "file", |id, name| Node::file(id, name, ""))
}

fn create_under_root(ctx: &CommandContext<'_>, label: &str, build: fn(&str, &str) -> Node) -> Reply {
    let name = ctx.args;
    let root = ctx.tree.root();
    if root.children().iter().any(|child| child.name == name) {
        return Reply::text(format!("Already exists: {name}"));
    }
    let id = ctx
        .tree
        .fresh_id_avoiding(name, |id| ctx.buffers.get(id).is_some());
    match ctx.tree.insert(&root.id, build(&id, name)) {
        Ok(tree) => Reply {
            text: format!("Created {label}: {name}"),
            tree: Some(tree),
        },
        Err(err) => {
            warn!(%err, name = %name, "create failed");
            Reply::text(format!("Cannot create {label} {name}: {err}"))
        }
    }
}

fn cat(ctx: &CommandContext<'_>) -> Reply {
    let target = ctx.args;
    let node = ctx
        .tree
        .lookup(target)
        .ok()
        .or_else(|| ctx.tree.find_by_name(target));
    let Some(node) = node else {
        return Reply::text(format!(
            "cat: {}",
            WorkspaceError::NotFound(target.to_string())
        ));
    };
    match node.content() {
        Some(content) => Reply::text(format!(
            "Contents of {target}:\n\n{}",
            truncate_chars(content, ctx.settings.cat_limit_chars)
        )),
        None => Reply::text(format!("cat: {target}: is a folder")),
    }
}

/// First `limit` characters of `text`, with `...` appended if anything was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn npm_install(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text(
        "Installing packages...\n\
         + react@18.2.0\n\
         + typescript@4.9.5\n\
         + vite@4.3.9\n\
         + tailwindcss@3.3.0\n\
         added 847 packages in 23.4s",
    )
}

fn npm_start(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text(
        "Starting development server...\n\
         \n  Local:   http://localhost:3000/\n  Network: http://192.168.1.100:3000/\n\
         \nready in 1.2s",
    )
}

fn npm_run_build(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text(
        "Building for production...\n\
         \n+ optimized files\n+ compressed images\n+ minified CSS and JS\nbuild size: 245 KB\n\
         \nbuild complete: dist/",
    )
}

fn git_status(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text(
        "On branch main\n\
         Your branch is up to date with 'origin/main'.\n\
         \nChanges not staged for commit:\n  modified:   index.html\n  modified:   style.css\n\
         \nUntracked files:\n  script.js\n  assets/images/logo.png",
    )
}

fn git_add(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text("Added all files to the staging area")
}

fn git_commit(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text(
        "[main 7a8b9c2] Update project\n 3 files changed, 45 insertions(+), 12 deletions(-)",
    )
}

fn code_dot(_ctx: &CommandContext<'_>) -> Reply {
    Reply::text("Opening project in the editor...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_usage<'t>(table: &'t CommandTable, line: &str) -> Option<&'t str> {
        table.resolve(line).map(|(entry, _)| entry.usage)
    }

    #[test]
    fn exact_verbs_ignore_case() {
        let table = CommandTable::default();
        assert_eq!(resolve_usage(&table, "HELP"), Some("help"));
        assert_eq!(resolve_usage(&table, "Git Status"), Some("git status"));
        assert_eq!(resolve_usage(&table, "npm   start"), None);
    }

    #[test]
    fn prefix_verbs_keep_argument_verbatim() {
        let table = CommandTable::default();
        let (entry, args) = table.resolve("MKDIR  Docs").expect("mkdir");
        assert_eq!(entry.usage, "mkdir [name]");
        assert_eq!(args, " Docs");

        let (_, args) = table.resolve("cat Index.HTML").expect("cat");
        assert_eq!(args, "Index.HTML");
    }

    #[test]
    fn prefix_verbs_require_a_separating_space() {
        let table = CommandTable::default();
        assert_eq!(resolve_usage(&table, "catalog"), None);
        assert_eq!(resolve_usage(&table, "cat"), None);
        assert_eq!(resolve_usage(&table, "touchy x"), None);
    }

    #[test]
    fn non_ascii_lines_do_not_panic() {
        let table = CommandTable::default();
        assert_eq!(resolve_usage(&table, "ç"), None);
        assert_eq!(resolve_usage(&table, "catç"), None);
        assert_eq!(resolve_usage(&table, "İİİİİİ"), None);
        assert_eq!(resolve_usage(&table, "toucİİİ"), None);
        let (_, args) = table.resolve("cat İndex").expect("cat");
        assert_eq!(args, "İndex");
    }

    #[test]
    fn only_npm_start_requests_preview() {
        let with_effect: Vec<&str> = default_entries()
            .iter()
            .filter(|entry| entry.side_effect.is_some())
            .map(|entry| entry.usage)
            .collect();
        assert_eq!(with_effect, vec!["npm start"]);
    }

    #[test]
    fn truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abcd", 3), "abc...");
        assert_eq!(truncate_chars("ééé", 2), "éé...");
        assert_eq!(truncate_chars("", 0), "");
    }
}
