//! In-memory repository for tests and the demo binary.
//!
//! Compiled only with the `test-utils` feature (on by default). Production
//! builds depend on this crate with `default-features = false`.

use crate::environment::{RepositoryFuture, TodoRepository};
use crate::types::{SectionId, Todo, TodoId, TodoList};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by [`InMemoryTodoRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    /// `fetch_all_lists`
    FetchAllLists,
    /// `fetch_todos`
    FetchTodos(SectionId),
    /// `update_todo_status`
    UpdateTodoStatus(TodoId),
}

#[derive(Debug, Default)]
struct Inner {
    lists: Vec<TodoList>,
    todos: Vec<Todo>,
    calls: Vec<RepositoryCall>,
    delays: HashMap<SectionId, Duration>,
}

/// Repository backed by vectors behind a mutex.
///
/// Status updates toggle the stored todo. Per-section delays let tests make
/// section fetches complete in a chosen order. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTodoRepository {
    /// Creates an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `lists` and no todos
    #[must_use]
    pub fn with_lists(lists: Vec<TodoList>) -> Self {
        let repository = Self::new();
        repository.lock().lists = lists;
        repository
    }

    /// Demo data: a personal list with three sections and a work list
    #[must_use]
    pub fn sample() -> Self {
        let mut personal = TodoList::new("Personal");
        let today = personal.add_section("Today");
        let week = personal.add_section("This week");
        let someday = personal.add_section("Someday");

        let mut work = TodoList::new("Work");
        let inbox = work.add_section("Inbox");

        let repository = Self::with_lists(vec![personal, work]);
        for (section, title) in [
            (today, "Buy milk"),
            (today, "Call the plumber"),
            (week, "Renew passport"),
            (someday, "Learn the cello"),
            (inbox, "Review quarterly report"),
        ] {
            repository.add_todo(Todo::new(section, title));
        }
        repository
    }

    /// Appends a list
    pub fn add_list(&self, list: TodoList) {
        self.lock().lists.push(list);
    }

    /// Stores a todo
    pub fn add_todo(&self, todo: Todo) {
        self.lock().todos.push(todo);
    }

    /// Delays every fetch of `section_id` by `delay`
    pub fn set_delay(&self, section_id: SectionId, delay: Duration) {
        self.lock().delays.insert(section_id, delay);
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.lock().calls.clone()
    }

    /// Stored todos of one section
    #[must_use]
    pub fn todos_in(&self, section_id: SectionId) -> Vec<Todo> {
        Self::section_todos(&self.lock(), section_id)
    }

    /// Stored lists
    #[must_use]
    pub fn lists(&self) -> Vec<TodoList> {
        self.lock().lists.clone()
    }

    fn section_todos(inner: &Inner, section_id: SectionId) -> Vec<Todo> {
        inner
            .todos
            .iter()
            .filter(|t| t.section_id == section_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Storage stays usable even if a test panicked while holding it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn fetch_all_lists(&self) -> RepositoryFuture<'_, Vec<TodoList>> {
        let lists = {
            let mut inner = self.lock();
            inner.calls.push(RepositoryCall::FetchAllLists);
            inner.lists.clone()
        };
        Box::pin(async move { lists })
    }

    fn fetch_todos(&self, section_id: SectionId) -> RepositoryFuture<'_, Vec<Todo>> {
        let delay = {
            let mut inner = self.lock();
            inner.calls.push(RepositoryCall::FetchTodos(section_id));
            inner.delays.get(&section_id).copied()
        };

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Self::section_todos(&self.lock(), section_id)
        })
    }

    fn update_todo_status(&self, todo_id: TodoId) -> RepositoryFuture<'_, ()> {
        let mut inner = self.lock();
        inner.calls.push(RepositoryCall::UpdateTodoStatus(todo_id));
        if let Some(todo) = inner.todos.iter_mut().find(|t| t.id == todo_id) {
            todo.toggle();
        } else {
            tracing::warn!(todo = %todo_id, "Status update for unknown todo");
        }
        Box::pin(async {})
    }
}
