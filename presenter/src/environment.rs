//! Injected dependencies for the presenter reducer.

use crate::config::PresenterConfig;
use crate::types::{SectionId, Todo, TodoId, TodoList};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use todoboard_core::environment::{Clock, SystemClock};

/// Boxed future returned by [`TodoRepository`] methods
pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Data access consumed by the presenter.
///
/// All three operations are infallible from the presenter's point of view;
/// failure handling belongs to the store behind this trait.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the reducer can hold an
/// `Arc<dyn TodoRepository>` and move clones of it into effects.
pub trait TodoRepository: Send + Sync {
    /// Every list, in display order
    fn fetch_all_lists(&self) -> RepositoryFuture<'_, Vec<TodoList>>;

    /// Every todo in one section
    fn fetch_todos(&self, section_id: SectionId) -> RepositoryFuture<'_, Vec<Todo>>;

    /// Ask the store to change the status of one todo
    fn update_todo_status(&self, todo_id: TodoId) -> RepositoryFuture<'_, ()>;
}

/// Environment dependencies for [`TodoListReducer`](crate::TodoListReducer)
#[derive(Clone)]
pub struct TodoListEnvironment {
    /// Data access
    pub repository: Arc<dyn TodoRepository>,
    /// Clock for refresh timestamps
    pub clock: Arc<dyn Clock>,
    /// Presenter policies
    pub config: PresenterConfig,
}

impl TodoListEnvironment {
    /// Creates an environment with the system clock and default config
    #[must_use]
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            config: PresenterConfig::default(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: PresenterConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for TodoListEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoListEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
