use crate::{CoreResult, EngineError, action::Action};

use std::{panic::Location, slice::Iter, sync::Arc};

use error_location::ErrorLocation;
use tracing::debug;

/// Ordered list of recorded actions.
///
/// Insertion order is playback order. Edits are structural only: append,
/// remove-last and clear. Playback never iterates this list directly; it
/// takes a [`snapshot`](Self::snapshot) at run start so later edits cannot
/// disturb an in-flight pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSequence {
    actions: Vec<Action>,
}

impl ActionSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action at the end of the sequence.
    pub fn append(&mut self, action: Action) {
        self.actions.push(action);
        debug!(%action, len = self.actions.len(), "Action appended");
    }

    /// Removes and returns the last action.
    ///
    /// # Errors
    ///
    /// Returns `EmptySequence` if there is nothing to remove. The sequence
    /// is left unchanged.
    #[track_caller]
    pub fn remove_last(&mut self) -> CoreResult<Action> {
        self.actions.pop().ok_or(EngineError::EmptySequence {
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Removes every action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Frozen copy of the current actions, safe to hand to another task.
    pub fn snapshot(&self) -> Arc<[Action]> {
        Arc::from(self.actions.as_slice())
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates the actions in playback order.
    pub fn iter(&self) -> Iter<'_, Action> {
        self.actions.iter()
    }

    /// Plain list form used by the config store.
    pub fn to_serializable(&self) -> Vec<Action> {
        self.actions.clone()
    }

    /// Rebuilds a sequence from its persisted list form.
    pub fn from_serializable(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl<'a> IntoIterator for &'a ActionSequence {
    type Item = &'a Action;
    type IntoIter = Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
