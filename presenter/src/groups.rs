//! Per-section todo groups as held in presenter state.
//!
//! Groups are keyed by section so a refresh is a map lookup instead of a
//! scan, while a separate ordering vector keeps the display order. A section
//! seen for the first time goes to the end of that order, whatever its place
//! in the list; a section already present keeps its slot.

use crate::types::{SectionId, Todo, TodoId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of [`TodoGroups::upsert`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// The section already had a group; its todos were replaced in place
    Replaced,
    /// The section was new and its group was appended at the end
    Appended,
}

/// Ordered collection of todo groups, at most one per section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoGroups {
    order: Vec<SectionId>,
    groups: HashMap<SectionId, Vec<Todo>>,
    /// Which section currently holds each todo.
    todo_index: HashMap<TodoId, SectionId>,
}

impl TodoGroups {
    /// Creates an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `todos` as the group for `section_id`.
    ///
    /// Todos whose own `section_id` disagrees are still stored under the
    /// requested section; the fetch that produced them is authoritative.
    pub fn upsert(&mut self, section_id: SectionId, todos: Vec<Todo>) -> Upsert {
        let outcome = match self.groups.get(&section_id) {
            Some(previous) => {
                for todo in previous {
                    self.todo_index.remove(&todo.id);
                }
                Upsert::Replaced
            },
            None => {
                self.order.push(section_id);
                Upsert::Appended
            },
        };

        for todo in &todos {
            self.todo_index.insert(todo.id, section_id);
        }
        self.groups.insert(section_id, todos);

        outcome
    }

    /// Drops every group whose section fails `keep`, preserving the order of
    /// the survivors.
    pub fn retain_sections<F>(&mut self, mut keep: F)
    where
        F: FnMut(&SectionId) -> bool,
    {
        let groups = &mut self.groups;
        let todo_index = &mut self.todo_index;
        self.order.retain(|section_id| {
            if keep(section_id) {
                return true;
            }
            if let Some(todos) = groups.remove(section_id) {
                for todo in todos {
                    todo_index.remove(&todo.id);
                }
            }
            false
        });
    }

    /// Removes all groups
    pub fn clear(&mut self) {
        self.order.clear();
        self.groups.clear();
        self.todo_index.clear();
    }

    /// Todos for one section
    #[must_use]
    pub fn get(&self, section_id: &SectionId) -> Option<&[Todo]> {
        self.groups.get(section_id).map(Vec::as_slice)
    }

    /// Whether a group exists for the section
    #[must_use]
    pub fn contains(&self, section_id: &SectionId) -> bool {
        self.groups.contains_key(section_id)
    }

    /// Sections in display order
    #[must_use]
    pub fn section_ids(&self) -> &[SectionId] {
        &self.order
    }

    /// Groups in display order
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &[Todo])> {
        self.order
            .iter()
            .filter_map(|id| self.groups.get(id).map(|todos| (*id, todos.as_slice())))
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of todos across all groups
    #[must_use]
    pub fn todo_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Section currently holding the todo
    #[must_use]
    pub fn section_of(&self, todo_id: &TodoId) -> Option<SectionId> {
        self.todo_index.get(todo_id).copied()
    }

    /// Looks up a todo by id
    #[must_use]
    pub fn todo(&self, todo_id: &TodoId) -> Option<&Todo> {
        let section_id = self.todo_index.get(todo_id)?;
        self.groups.get(section_id)?.iter().find(|t| t.id == *todo_id)
    }

    /// Mutable lookup of a todo by id
    pub fn todo_mut(&mut self, todo_id: &TodoId) -> Option<&mut Todo> {
        let section_id = self.todo_index.get(todo_id)?;
        self.groups
            .get_mut(section_id)?
            .iter_mut()
            .find(|t| t.id == *todo_id)
    }
}
