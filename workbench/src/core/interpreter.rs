//! Line-oriented command interpreter.
//!
//! Every line produces one input entry and one output entry in the transcript,
//! except `clear`, which empties it. Nothing here fails: unknown verbs and
//! missing files become output text.

use tracing::debug;

use crate::core::buffers::BufferStore;
use crate::core::commands::{Action, CommandContext, CommandSettings, CommandTable, Reply};
use crate::core::error::WorkspaceError;
use crate::core::transcript::Transcript;
use crate::core::types::Execution;
use crate::tree::ProjectTree;

pub struct Interpreter {
    table: CommandTable,
    settings: CommandSettings,
    transcript: Transcript,
}

impl Interpreter {
    pub fn new(settings: CommandSettings) -> Self {
        Self::with_table(CommandTable::default(), settings, Transcript::new())
    }

    pub fn with_table(table: CommandTable, settings: CommandSettings, transcript: Transcript) -> Self {
        Self {
            table,
            settings,
            transcript,
        }
    }

    /// Run one command line against `tree` and `buffers`.
    pub fn execute(&mut self, line: &str, tree: &ProjectTree, buffers: &BufferStore) -> Execution {
        let trimmed = line.trim();
        let dispatch = match self.table.resolve(trimmed) {
            Some((entry, args)) => match entry.action {
                Action::Run(handler) => Some((entry, args, handler)),
                Action::ClearTranscript => {
                    debug!(cleared = self.transcript.len(), "transcript cleared");
                    self.transcript.clear();
                    return Execution {
                        output: None,
                        tree: tree.clone(),
                        side_effects: Vec::new(),
                    };
                }
            },
            None => None,
        };

        let (reply, side_effects) = match dispatch {
            Some((entry, args, handler)) => {
                debug!(verb = entry.usage, args = %args, "dispatching command");
                let reply = handler(&CommandContext {
                    args,
                    tree,
                    buffers,
                    settings: &self.settings,
                    table: &self.table,
                });
                (reply, entry.side_effect.into_iter().collect())
            }
            None => {
                debug!(line = %trimmed, "unrecognized command");
                (Reply::text(unrecognized(trimmed)), Vec::new())
            }
        };

        self.transcript.push_input(format!("$ {line}"));
        self.transcript.push_output(reply.text.clone());
        Execution {
            output: Some(reply.text),
            tree: reply.tree.unwrap_or_else(|| tree.clone()),
            side_effects,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

fn unrecognized(line: &str) -> String {
    format!(
        "{}\nType \"help\" to list available commands.",
        WorkspaceError::Unrecognized(line.to_string())
    )
}
