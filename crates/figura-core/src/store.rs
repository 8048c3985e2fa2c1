//! The document store: current snapshot, selection and history.
//!
//! Every transition swaps in a whole new [`StoreState`]; subscribers only
//! ever observe complete snapshots. Mutations go through two separate
//! handles: [`DocumentStore::edit`] for undoable commands and
//! [`DocumentStore::live`] for continuous pointer-driven previews.

use crate::config::EditorConfig;
use crate::document::Document;
use crate::edit::{Editor, LiveEditor};
use crate::history::{Command, History};
use crate::id::ElementId;
use crate::normalize::Normalize;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Weak reference to the selected element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: ElementId,
}

impl Selection {
    pub fn new(id: ElementId) -> Self {
        Self { id }
    }
}

/// Immutable snapshot observed by subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub document: Document,
    pub selection: Option<Selection>,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreState)>;

/// How a committed command affects the selection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectionUpdate {
    Keep,
    Select(ElementId),
    Clear,
}

/// Owner of the current document.
pub struct DocumentStore {
    state: Arc<StoreState>,
    history: History,
    config: EditorConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl DocumentStore {
    /// Create a store with an empty document and default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a store with an empty document sized from `config`.
    pub fn with_config(config: EditorConfig) -> Self {
        let document = Document::new(config.canvas);
        Self {
            state: Arc::new(StoreState {
                document,
                ..StoreState::default()
            }),
            history: History::with_capacity(config.history_capacity),
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot. Cheap to clone and safe to keep.
    pub fn state(&self) -> Arc<StoreState> {
        Arc::clone(&self.state)
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.state.selection.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Register a callback invoked after every state transition.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Historied mutation API.
    pub fn edit(&mut self) -> Editor<'_> {
        Editor::new(self)
    }

    /// Live (non-historied) mutation API.
    pub fn live(&mut self) -> LiveEditor<'_> {
        LiveEditor::new(self)
    }

    /// Replace the selection only.
    pub fn set_selection(&mut self, id: Option<ElementId>) {
        let selection = id.map(Selection::new);
        if self.state.selection == selection {
            return;
        }
        self.replace_state(StoreState {
            selection,
            ..(*self.state).clone()
        });
    }

    /// Reset to `document`: clears selection and the whole history.
    ///
    /// Imports must come through here so old commands cannot resurrect
    /// content from a previous design.
    pub fn load_design(&mut self, document: Document) {
        log::debug!("Loading design with {} elements", document.len());
        self.history.clear();
        self.replace_state(StoreState {
            document,
            selection: None,
            can_undo: false,
            can_redo: false,
        });
    }

    /// Replace the document from an inbound sync, keeping selection and history.
    pub fn update_design_data(&mut self, mut document: Document) {
        document.normalize();
        log::trace!("Applying inbound design data ({} elements)", document.len());
        self.replace_document(document);
    }

    /// Revert the last command. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(document) => {
                self.restore(document);
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone command. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(document) => {
                self.restore(document);
                true
            }
            None => false,
        }
    }

    /// Install a document from history, dropping a selection it no longer contains.
    fn restore(&mut self, document: Document) {
        let selection = self
            .state
            .selection
            .clone()
            .filter(|s| document.contains(&s.id));
        self.replace_state(StoreState {
            document,
            selection,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Record `command` in history and apply its result.
    pub(crate) fn commit(&mut self, command: Command, selection: SelectionUpdate) {
        let document = self.history.execute_command(command);
        let selection = match selection {
            SelectionUpdate::Keep => self.state.selection.clone(),
            SelectionUpdate::Select(id) => Some(Selection::new(id)),
            SelectionUpdate::Clear => None,
        };
        self.replace_state(StoreState {
            document,
            selection,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Swap the document without touching history or selection.
    pub(crate) fn replace_document(&mut self, document: Document) {
        self.replace_state(StoreState {
            document,
            ..(*self.state).clone()
        });
    }

    fn replace_state(&mut self, state: StoreState) {
        self.state = Arc::new(state);
        let snapshot = Arc::clone(&self.state);
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}
