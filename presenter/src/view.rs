//! View models handed to the rendering layer.
//!
//! Plain data only. Rendering and styling live with whatever draws them.

use crate::action::{AddTodoKind, TodoListAction};
use crate::state::TodoListState;
use crate::types::{SectionId, Todo, TodoId};
use serde::{Deserialize, Serialize};

/// One row in the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRow {
    /// Todo shown in this row
    pub id: TodoId,
    /// Row label
    pub title: String,
    /// Checkbox state
    pub completed: bool,
}

impl TodoRow {
    /// Row for a todo
    #[must_use]
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            completed: todo.completed,
        }
    }

    /// Action to send when the row's checkbox is tapped
    #[must_use]
    pub const fn toggle_action(&self) -> TodoListAction {
        TodoListAction::ChangeStatus { todo_id: self.id }
    }
}

/// A section header followed by its rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionView {
    /// Section shown
    pub section_id: SectionId,
    /// Header text; `None` when the section is not part of the current list
    pub title: Option<String>,
    /// Rows in store order
    pub rows: Vec<TodoRow>,
}

impl TodoListState {
    /// Sections with their rows, in group order
    #[must_use]
    pub fn sections_view(&self) -> Vec<SectionView> {
        self.todo_groups
            .iter()
            .map(|(section_id, todos)| SectionView {
                section_id,
                title: self.section(&section_id).map(|s| s.title.clone()),
                rows: todos.iter().map(TodoRow::from_todo).collect(),
            })
            .collect()
    }

    /// Every row, flattened in group order
    #[must_use]
    pub fn rows(&self) -> Vec<TodoRow> {
        self.todo_groups
            .iter()
            .flat_map(|(_, todos)| todos.iter().map(TodoRow::from_todo))
            .collect()
    }
}

/// How a sheet button is presented
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonRole {
    /// Regular choice
    Default,
    /// Dismisses the sheet
    Cancel,
}

/// One button on the add-todo sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetButton {
    /// Button label
    pub label: String,
    /// Presentation role
    pub role: ButtonRole,
    /// Action sent when pressed
    pub action: TodoListAction,
}

/// The sheet asking which kind of todo to add
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTodoSheet {
    /// Sheet title
    pub title: String,
    /// Explanatory message
    pub message: String,
    /// Buttons, cancel last
    pub buttons: Vec<SheetButton>,
}

impl AddTodoSheet {
    /// The standard sheet: plain todo, spreadsheet-linked todo, cancel
    #[must_use]
    pub fn standard() -> Self {
        Self {
            title: "Add Todo".to_string(),
            message: "Choose the kind of todo to add".to_string(),
            buttons: vec![
                SheetButton {
                    label: "Normal".to_string(),
                    role: ButtonRole::Default,
                    action: TodoListAction::AddTodoChosen {
                        kind: AddTodoKind::Normal,
                    },
                },
                SheetButton {
                    label: "Link a spreadsheet".to_string(),
                    role: ButtonRole::Default,
                    action: TodoListAction::AddTodoChosen {
                        kind: AddTodoKind::Spreadsheet,
                    },
                },
                SheetButton {
                    label: "Cancel".to_string(),
                    role: ButtonRole::Cancel,
                    action: TodoListAction::AddTodoCancelled,
                },
            ],
        }
    }

    /// Button with the given label
    #[must_use]
    pub fn button(&self, label: &str) -> Option<&SheetButton> {
        self.buttons.iter().find(|b| b.label == label)
    }
}

impl Default for AddTodoSheet {
    fn default() -> Self {
        Self::standard()
    }
}
