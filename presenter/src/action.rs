//! Actions: user intents and the results of the work they start.

use crate::state::{Epoch, FetchSeq};
use crate::types::{SectionId, Todo, TodoId, TodoList};
use serde::{Deserialize, Serialize};

/// The kinds of todo offered by the "add todo" sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddTodoKind {
    /// A plain todo
    Normal,
    /// A todo linked to a spreadsheet
    Spreadsheet,
}

/// Every input to the presenter reducer.
///
/// Commands come from the rendering layer. Events are produced by effects
/// and carry the [`Epoch`] they were issued under so results from a previous
/// activation can be recognized and dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoListAction {
    // ========== Commands ==========
    /// The view appeared: fetch all lists and then every section of the first
    Activate,

    /// The view went away: results still in flight must not be applied
    Deactivate,

    /// Fetch the todos of one section
    RefreshSection {
        /// Section to fetch
        section_id: SectionId,
    },

    /// Toggle the completion status of a todo
    ChangeStatus {
        /// Todo to update
        todo_id: TodoId,
    },

    /// A kind was picked on the add-todo sheet
    AddTodoChosen {
        /// Picked kind
        kind: AddTodoKind,
    },

    /// The add-todo sheet was cancelled
    AddTodoCancelled,

    // ========== Events ==========
    /// All lists arrived
    ListsFetched {
        /// Activation the fetch was issued under
        epoch: Epoch,
        /// Lists in display order
        lists: Vec<TodoList>,
    },

    /// The todos of one section arrived
    SectionTodosFetched {
        /// Activation the fetch was issued under
        epoch: Epoch,
        /// Order the fetch was issued in
        seq: FetchSeq,
        /// Section that was fetched
        section_id: SectionId,
        /// Its todos
        todos: Vec<Todo>,
    },

    /// The store accepted a status change
    StatusChanged {
        /// Activation the update was issued under
        epoch: Epoch,
        /// Todo that was updated
        todo_id: TodoId,
    },
}

impl TodoListAction {
    /// Whether this action comes from the rendering layer
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::Activate
                | Self::Deactivate
                | Self::RefreshSection { .. }
                | Self::ChangeStatus { .. }
                | Self::AddTodoChosen { .. }
                | Self::AddTodoCancelled
        )
    }

    /// Whether this action is the result of an effect
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Epoch carried by an event, if any
    #[must_use]
    pub const fn epoch(&self) -> Option<Epoch> {
        match self {
            Self::ListsFetched { epoch, .. }
            | Self::SectionTodosFetched { epoch, .. }
            | Self::StatusChanged { epoch, .. } => Some(*epoch),
            _ => None,
        }
    }
}
