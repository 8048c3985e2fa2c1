//! Reversible commands and the bounded undo/redo history.
//!
//! Each [`Command`] holds full before/after copies of the document. This is
//! O(document size) per edit, which stays cheap only because the history is
//! short; a diff based command would be needed for much deeper histories.

use crate::document::Document;

/// Maximum number of commands to keep.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One reversible document transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    description: String,
    previous: Document,
    next: Document,
}

impl Command {
    pub fn new(description: impl Into<String>, previous: Document, next: Document) -> Self {
        Self {
            description: description.into(),
            previous,
            next,
        }
    }

    /// Human-readable label, e.g. "Delete 2 elements".
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fresh copy of the document after this command.
    pub fn execute(&self) -> Document {
        self.next.clone()
    }

    /// Fresh copy of the document before this command.
    pub fn undo(&self) -> Document {
        self.previous.clone()
    }
}

/// Linear, bounded command history.
///
/// Commands at positions up to and including the cursor are applied; the
/// rest form the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    commands: Vec<Command>,
    /// Index of the last applied command, `None` when nothing is applied.
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history keeping at most `capacity` commands (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            commands: Vec::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Record `command` as applied and return the document it produces.
    ///
    /// Drops any redo branch. Once over capacity the oldest command is
    /// evicted and the cursor still points at `command`.
    pub fn execute_command(&mut self, command: Command) -> Document {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.commands.truncate(keep);

        let document = command.execute();
        log::debug!("Executing command: {}", command.description());
        self.commands.push(command);

        if self.commands.len() > self.capacity {
            let evicted = self.commands.remove(0);
            log::debug!("History full, evicting: {}", evicted.description());
        }
        self.cursor = Some(self.commands.len() - 1);
        document
    }

    /// Step back one command, returning the document before it.
    pub fn undo(&mut self) -> Option<Document> {
        let cursor = self.cursor?;
        let command = &self.commands[cursor];
        log::debug!("Undo: {}", command.description());
        let document = command.undo();
        self.cursor = cursor.checked_sub(1);
        Some(document)
    }

    /// Step forward one command, returning the document after it.
    pub fn redo(&mut self) -> Option<Document> {
        if !self.can_redo() {
            return None;
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        let command = &self.commands[next];
        log::debug!("Redo: {}", command.description());
        Some(command.execute())
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        let applied = self.cursor.map_or(0, |c| c + 1);
        applied < self.commands.len()
    }

    /// Index of the last applied command.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    /// Label of the command [`undo`](Self::undo) would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor.map(|c| self.commands[c].description())
    }

    /// Label of the command [`redo`](Self::redo) would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.commands.get(next).map(Command::description)
    }

    /// Drop every command.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
