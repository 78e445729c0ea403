//! Presenter state observed by the rendering layer.

use crate::action::AddTodoKind;
use crate::groups::TodoGroups;
use crate::types::{Section, SectionId, TodoId, TodoList};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Activation counter used as a cancellation token.
///
/// Bumped on every activate and deactivate. Effects capture the value they
/// were issued under; a result whose epoch differs from the state's current
/// epoch is stale and is discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order in which section fetches were issued.
///
/// Every section fetch takes the next value. A result older than the last
/// one applied to its section is discarded, so a slow early fetch cannot
/// overwrite a newer snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchSeq(u64);

impl FetchSeq {
    /// The sequence number after this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FetchSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failures the presenter surfaces to the rendering layer
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenterError {
    /// Activation found no list to show
    #[error("no todo lists available")]
    NoLists,

    /// A status change named a todo that is not in any loaded group
    #[error("todo {0} is not loaded")]
    UnknownTodo(TodoId),
}

/// State of the todo list screen
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoListState {
    /// All lists from the last successful fetch
    pub lists: Vec<TodoList>,
    /// The list on screen
    pub current_list: Option<TodoList>,
    /// Sections of the current list, in list order
    pub current_sections: Vec<Section>,
    /// Todos per section, in arrival order
    pub todo_groups: TodoGroups,
    /// Current activation
    pub epoch: Epoch,
    /// Whether the screen is active
    pub active: bool,
    /// Whether the list fetch is in flight
    pub loading_lists: bool,
    /// Number of fetches in flight per section
    pub pending_sections: BTreeMap<SectionId, usize>,
    /// Last section fetch issued
    pub last_fetch: FetchSeq,
    /// Newest fetch applied to each section
    pub applied_fetches: BTreeMap<SectionId, FetchSeq>,
    /// When a section fetch was last applied
    pub last_refreshed_at: Option<DateTime<Utc>>,
    /// Kind picked on the add-todo sheet, waiting to be handled
    pub pending_add: Option<AddTodoKind>,
    /// Last presenter-level failure (if any)
    pub last_error: Option<PresenterError>,
}

impl TodoListState {
    /// Creates an inactive, empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any fetch is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading_lists || !self.pending_sections.is_empty()
    }

    /// Whether `epoch` belongs to the current activation
    #[must_use]
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.active && self.epoch == epoch
    }

    /// Section of the current list with the given id
    #[must_use]
    pub fn section(&self, section_id: &SectionId) -> Option<&Section> {
        self.current_sections.iter().find(|s| s.id == *section_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epochs_advance() {
        let epoch = Epoch::default();
        assert_eq!(epoch.get(), 0);
        assert_eq!(epoch.next().get(), 1);
        assert!(epoch.next() > epoch);
    }

    #[test]
    fn fetch_sequence_advances() {
        let seq = FetchSeq::default();
        assert!(seq.next() > seq);
        assert_eq!(seq.next().next().get(), 2);
    }

    #[test]
    fn inactive_state_rejects_every_epoch() {
        let state = TodoListState::new();
        assert!(!state.is_current(state.epoch));
    }

    #[test]
    fn loading_tracks_lists_and_sections() {
        let mut state = TodoListState::new();
        assert!(!state.is_loading());

        state.pending_sections.insert(SectionId::new(), 1);
        assert!(state.is_loading());

        state.pending_sections.clear();
        state.loading_lists = true;
        assert!(state.is_loading());
    }

    #[test]
    fn errors_render_readably() {
        assert_eq!(PresenterError::NoLists.to_string(), "no todo lists available");
    }
}
