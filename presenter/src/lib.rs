//! Presenter for a sectioned todo list.
//!
//! The screen shows the first of the user's lists, one group of todos per
//! section. This crate keeps that state consistent while section fetches
//! arrive in any order:
//!
//! - Activation fetches every list, selects the first, and fans out one
//!   fetch per section
//! - Each section's todos land in [`TodoGroups`]; a section already shown
//!   is replaced in place, a new one is appended
//! - Status changes go to the repository; what happens to local state
//!   afterwards is chosen by [`StatusSync`]
//! - Deactivation bumps an [`Epoch`] so late results are discarded
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todoboard_presenter::mocks::InMemoryTodoRepository;
//! use todoboard_presenter::{TodoListAction, TodoListEnvironment, TodoListReducer, TodoListState};
//! use todoboard_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoListEnvironment::new(Arc::new(InMemoryTodoRepository::sample()));
//! let store = Store::new(TodoListState::new(), TodoListReducer::new(), env);
//!
//! let mut handle = store.send(TodoListAction::Activate).await?;
//! handle.wait().await;
//!
//! for section in store.state(TodoListState::sections_view).await {
//!     println!("{:?}: {} todos", section.title, section.rows.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod environment;
pub mod groups;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod reducer;
pub mod state;
pub mod types;
pub mod view;

pub use action::{AddTodoKind, TodoListAction};
pub use config::{ConfigError, PresenterConfig, StatusSync};
pub use environment::{TodoListEnvironment, TodoRepository};
pub use groups::{TodoGroups, Upsert};
pub use reducer::TodoListReducer;
pub use state::{Epoch, FetchSeq, PresenterError, TodoListState};
pub use types::{ListId, Section, SectionId, Todo, TodoId, TodoList};
pub use view::{AddTodoSheet, SectionView, TodoRow};

/// Store type driving the todo list screen
pub type TodoListStore =
    todoboard_runtime::Store<TodoListState, TodoListAction, TodoListEnvironment, TodoListReducer>;
