//! Append-only terminal transcript.

use serde::{Deserialize, Serialize};

use crate::core::types::EntryKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript that starts with the given output lines.
    pub fn with_greeting<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut transcript = Self::new();
        for line in lines {
            transcript.push_output(line);
        }
        transcript
    }

    pub fn push_input(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            kind: EntryKind::Input,
            text: text.into(),
        });
    }

    pub fn push_output(&mut self, text: impl Into<String>) {
        self.entries.push(Entry {
            kind: EntryKind::Output,
            text: text.into(),
        });
    }

    /// Replace the transcript with the empty sequence.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended after the first `from` entries.
    pub fn since(&self, from: usize) -> &[Entry] {
        self.entries.get(from..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_lines_are_output_entries() {
        let transcript = Transcript::with_greeting(["hello", "type help"]);
        assert_eq!(transcript.len(), 2);
        assert!(
            transcript
                .entries()
                .iter()
                .all(|entry| entry.kind == EntryKind::Output)
        );
    }

    #[test]
    fn since_tolerates_cleared_transcripts() {
        let mut transcript = Transcript::with_greeting(["a", "b", "c"]);
        transcript.clear();
        assert!(transcript.is_empty());
        assert!(transcript.since(2).is_empty());
        transcript.push_input("$ ls");
        assert_eq!(transcript.since(0).len(), 1);
    }
}
