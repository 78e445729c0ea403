//! Demo of the todo list presenter against in-memory sample data.
//!
//! `TODOBOARD_STATUS_SYNC` selects what happens after a status change
//! (`none`, `refetch`, `optimistic`). `RUST_LOG` controls log output.

use std::sync::Arc;
use todoboard_presenter::mocks::InMemoryTodoRepository;
use todoboard_presenter::{
    AddTodoSheet, PresenterConfig, TodoListAction, TodoListEnvironment, TodoListReducer,
    TodoListState, TodoListStore,
};
use todoboard_runtime::{Store, StoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_sections(state: &TodoListState) {
    for section in state.sections_view() {
        println!("  {}", section.title.as_deref().unwrap_or("(unknown section)"));
        for row in section.rows {
            let status = if row.completed { "✓" } else { " " };
            println!("    [{status}] {}", row.title);
        }
    }
}

async fn send_and_settle(
    store: &TodoListStore,
    action: TodoListAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut handle = store.send(action).await?;
    handle.wait().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todoboard=info,todoboard_presenter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PresenterConfig::from_env()?;
    println!("=== Todo List Presenter (status sync: {}) ===\n", config.status_sync);

    let repository = InMemoryTodoRepository::sample();
    let env = TodoListEnvironment::new(Arc::new(repository)).with_config(config);
    let store = Store::with_config(
        TodoListState::new(),
        TodoListReducer::new(),
        env,
        StoreConfig::default().with_broadcast_capacity(64),
    );

    let mut revisions = store.subscribe_state();
    let watcher = tokio::spawn(async move {
        while revisions.changed().await.is_ok() {
            tracing::debug!(revision = *revisions.borrow_and_update(), "State changed");
        }
    });

    send_and_settle(&store, TodoListAction::Activate).await?;

    let state = store.state(Clone::clone).await;
    if let Some(error) = &state.last_error {
        println!("Activation failed: {error}");
        return Ok(());
    }
    if let Some(list) = &state.current_list {
        println!("Current list: {}", list.title);
    }
    print_sections(&state);

    if let Some(row) = state.rows().into_iter().next() {
        println!("\nToggling '{}'...", row.title);
        send_and_settle(&store, row.toggle_action()).await?;
        print_sections(&store.state(Clone::clone).await);
    }

    let sheet = AddTodoSheet::standard();
    println!("\n{}: {}", sheet.title, sheet.message);
    for button in &sheet.buttons {
        println!("  - {}", button.label);
    }
    if let Some(button) = sheet.button("Normal") {
        send_and_settle(&store, button.action.clone()).await?;
    }

    let snapshot = store.state(TodoListState::sections_view).await;
    println!("\nSnapshot:\n{}", serde_json::to_string_pretty(&snapshot)?);

    send_and_settle(&store, TodoListAction::Deactivate).await?;
    store.shutdown_default().await?;
    watcher.abort();

    println!("\n=== Demo Complete ===");
    Ok(())
}
