//! Reducer for the todo list screen.
//!
//! Fetch orchestration, per-section group bookkeeping, and status updates.
//! All I/O goes through [`TodoRepository`](crate::TodoRepository) inside
//! effects; results come back as events tagged with the epoch they were
//! issued under.

use crate::action::TodoListAction;
use crate::config::StatusSync;
use crate::environment::TodoListEnvironment;
use crate::groups::Upsert;
use crate::state::{Epoch, FetchSeq, PresenterError, TodoListState};
use crate::types::{SectionId, TodoId, TodoList};
use std::sync::Arc;
use todoboard_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

type Effects = SmallVec<[Effect<TodoListAction>; 4]>;

/// Reducer for the todo list screen
#[derive(Clone, Debug, Default)]
pub struct TodoListReducer;

impl TodoListReducer {
    /// Creates a new `TodoListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn fetch_lists(env: &TodoListEnvironment, epoch: Epoch) -> Effect<TodoListAction> {
        let repository = Arc::clone(&env.repository);
        async_effect! {
            let lists = repository.fetch_all_lists().await;
            Some(TodoListAction::ListsFetched { epoch, lists })
        }
    }

    fn fetch_section(
        env: &TodoListEnvironment,
        epoch: Epoch,
        seq: FetchSeq,
        section_id: SectionId,
    ) -> Effect<TodoListAction> {
        let repository = Arc::clone(&env.repository);
        async_effect! {
            let todos = repository.fetch_todos(section_id).await;
            Some(TodoListAction::SectionTodosFetched { epoch, seq, section_id, todos })
        }
    }

    fn update_status(env: &TodoListEnvironment, epoch: Epoch, todo_id: TodoId) -> Effect<TodoListAction> {
        let repository = Arc::clone(&env.repository);
        async_effect! {
            repository.update_todo_status(todo_id).await;
            Some(TodoListAction::StatusChanged { epoch, todo_id })
        }
    }

    /// Counts the section's fetch as in flight and returns it
    fn refresh(
        state: &mut TodoListState,
        env: &TodoListEnvironment,
        section_id: SectionId,
    ) -> Effect<TodoListAction> {
        state.last_fetch = state.last_fetch.next();
        *state.pending_sections.entry(section_id).or_insert(0) += 1;
        Self::fetch_section(env, state.epoch, state.last_fetch, section_id)
    }

    /// One fetch of `section_id` came back, whether or not it is applied
    fn fetch_returned(state: &mut TodoListState, section_id: SectionId) {
        if let Some(in_flight) = state.pending_sections.get_mut(&section_id) {
            *in_flight = in_flight.saturating_sub(1);
            if *in_flight == 0 {
                state.pending_sections.remove(&section_id);
            }
        }
    }

    fn stale(state: &TodoListState, epoch: Epoch, what: &str) -> bool {
        if state.is_current(epoch) {
            return false;
        }
        tracing::debug!(
            result = what,
            issued = %epoch,
            current = %state.epoch,
            active = state.active,
            "Dropping stale result"
        );
        true
    }

    fn apply_lists(state: &mut TodoListState, env: &TodoListEnvironment, lists: Vec<TodoList>) -> Effects {
        state.loading_lists = false;

        let Some(first) = lists.first().cloned() else {
            tracing::warn!("Activation found no lists");
            state.lists = lists;
            state.current_list = None;
            state.current_sections.clear();
            state.todo_groups.clear();
            state.last_error = Some(PresenterError::NoLists);
            return smallvec![Effect::None];
        };

        state.lists = lists;
        state.current_sections = first.sections.clone();
        state.last_error = None;

        // Groups from a previous activation stay in place when their section
        // is still shown; anything else belongs to a list that is gone.
        let shown = first.section_ids();
        state.todo_groups.retain_sections(|id| shown.contains(id));
        state.applied_fetches.retain(|id, _| shown.contains(id));

        tracing::debug!(
            list = %first.id,
            sections = shown.len(),
            "Selected first list, fetching sections"
        );
        state.current_list = Some(first);

        let fetches = shown
            .into_iter()
            .map(|section_id| Self::refresh(state, env, section_id))
            .collect();

        smallvec![Effect::merge(fetches)]
    }

    fn apply_status_changed(
        state: &mut TodoListState,
        env: &TodoListEnvironment,
        todo_id: TodoId,
    ) -> Effects {
        tracing::debug!(
            todo = %todo_id,
            groups = state.todo_groups.len(),
            policy = %env.config.status_sync,
            "Todo status updated"
        );

        if env.config.status_sync != StatusSync::Refetch {
            return smallvec![Effect::None];
        }

        if let Some(section_id) = state.todo_groups.section_of(&todo_id) {
            smallvec![Self::refresh(state, env, section_id)]
        } else {
            tracing::warn!(todo = %todo_id, "Cannot refetch section of unknown todo");
            state.last_error = Some(PresenterError::UnknownTodo(todo_id));
            smallvec![Effect::None]
        }
    }
}

impl Reducer for TodoListReducer {
    type State = TodoListState;
    type Action = TodoListAction;
    type Environment = TodoListEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        match action {
            // ========== Commands ==========
            TodoListAction::Activate => {
                state.epoch = state.epoch.next();
                state.active = true;
                state.loading_lists = true;
                state.pending_sections.clear();
                state.last_error = None;
                tracing::debug!(epoch = %state.epoch, "Activating");

                smallvec![Self::fetch_lists(env, state.epoch)]
            },

            TodoListAction::Deactivate => {
                state.epoch = state.epoch.next();
                state.active = false;
                state.loading_lists = false;
                state.pending_sections.clear();
                tracing::debug!(epoch = %state.epoch, "Deactivated");

                smallvec![Effect::None]
            },

            TodoListAction::RefreshSection { section_id } => {
                if !state.active {
                    tracing::debug!(section = %section_id, "Ignoring refresh while inactive");
                    return smallvec![Effect::None];
                }
                smallvec![Self::refresh(state, env, section_id)]
            },

            TodoListAction::ChangeStatus { todo_id } => {
                if !state.active {
                    tracing::debug!(todo = %todo_id, "Ignoring status change while inactive");
                    return smallvec![Effect::None];
                }

                if env.config.status_sync == StatusSync::Optimistic {
                    if let Some(todo) = state.todo_groups.todo_mut(&todo_id) {
                        todo.toggle();
                    } else {
                        tracing::warn!(todo = %todo_id, "Cannot flip unknown todo");
                        state.last_error = Some(PresenterError::UnknownTodo(todo_id));
                    }
                }

                smallvec![Self::update_status(env, state.epoch, todo_id)]
            },

            TodoListAction::AddTodoChosen { kind } => {
                tracing::info!(?kind, "Add todo requested");
                state.pending_add = Some(kind);
                smallvec![Effect::None]
            },

            TodoListAction::AddTodoCancelled => {
                state.pending_add = None;
                smallvec![Effect::None]
            },

            // ========== Events ==========
            TodoListAction::ListsFetched { epoch, lists } => {
                if Self::stale(state, epoch, "lists") {
                    return smallvec![Effect::None];
                }
                Self::apply_lists(state, env, lists)
            },

            TodoListAction::SectionTodosFetched {
                epoch,
                seq,
                section_id,
                todos,
            } => {
                if Self::stale(state, epoch, "section") {
                    return smallvec![Effect::None];
                }

                Self::fetch_returned(state, section_id);
                if let Some(&applied) = state.applied_fetches.get(&section_id) {
                    if seq <= applied {
                        tracing::debug!(
                            section = %section_id,
                            fetch = %seq,
                            applied = %applied,
                            "Dropping outdated section result"
                        );
                        return smallvec![Effect::None];
                    }
                }
                state.applied_fetches.insert(section_id, seq);

                let count = todos.len();
                let outcome = state.todo_groups.upsert(section_id, todos);
                state.last_refreshed_at = Some(env.clock.now());

                match outcome {
                    Upsert::Replaced => {
                        tracing::debug!(section = %section_id, todos = count, "Replaced group");
                    },
                    Upsert::Appended => {
                        tracing::debug!(section = %section_id, todos = count, "Appended group");
                    },
                }

                smallvec![Effect::None]
            },

            TodoListAction::StatusChanged { epoch, todo_id } => {
                if Self::stale(state, epoch, "status") {
                    return smallvec![Effect::None];
                }
                Self::apply_status_changed(state, env, todo_id)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::action::AddTodoKind;
    use crate::config::PresenterConfig;
    use crate::mocks::InMemoryTodoRepository;
    use crate::types::{Todo, TodoList};
    use todoboard_core::environment::Clock;
    use todoboard_testing::{assertions, test_clock, ReducerTest};

    fn env_with(repository: &InMemoryTodoRepository, status_sync: StatusSync) -> TodoListEnvironment {
        TodoListEnvironment::new(Arc::new(repository.clone()))
            .with_clock(Arc::new(test_clock()))
            .with_config(PresenterConfig::new().with_status_sync(status_sync))
    }

    fn env() -> TodoListEnvironment {
        env_with(&InMemoryTodoRepository::new(), StatusSync::Refetch)
    }

    fn two_section_list() -> (TodoList, SectionId, SectionId) {
        let mut list = TodoList::new("Personal");
        let s1 = list.add_section("Today");
        let s2 = list.add_section("Later");
        (list, s1, s2)
    }

    /// Active state at epoch 1 with the list selected and both groups loaded
    fn loaded_state() -> (TodoListState, Todo, SectionId, SectionId) {
        let (list, s1, s2) = two_section_list();
        let todo = Todo::new(s1, "Buy milk");

        let mut state = TodoListState::new();
        state.epoch = Epoch::default().next();
        state.active = true;
        state.current_sections = list.sections.clone();
        state.current_list = Some(list.clone());
        state.lists = vec![list];
        state.todo_groups.upsert(s1, vec![todo.clone()]);
        state.todo_groups.upsert(s2, Vec::new());
        (state, todo, s1, s2)
    }

    fn first_epoch() -> Epoch {
        Epoch::default().next()
    }

    #[test]
    fn activate_starts_new_epoch_and_fetches_lists() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_action(TodoListAction::Activate)
            .then_state(|state| {
                assert!(state.active);
                assert!(state.loading_lists);
                assert_eq!(state.epoch, first_epoch());
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn lists_fetched_selects_first_list_and_fans_out() {
        let (list, s1, s2) = two_section_list();
        let other = TodoList::new("Work");
        let expected = list.clone();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_action(TodoListAction::Activate)
            .when_action(TodoListAction::ListsFetched {
                epoch: first_epoch(),
                lists: vec![list, other],
            })
            .then_state(move |state| {
                assert_eq!(state.lists.len(), 2);
                assert_eq!(state.current_list.as_ref(), Some(&expected));
                assert_eq!(state.current_sections, expected.sections);
                assert!(!state.loading_lists);
                assert_eq!(state.pending_sections.len(), 2);
                assert!(state.pending_sections.contains_key(&s1));
                assert!(state.pending_sections.contains_key(&s2));
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 2))
            .run();
    }

    #[test]
    fn empty_lists_fail_explicitly() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_action(TodoListAction::Activate)
            .when_action(TodoListAction::ListsFetched {
                epoch: first_epoch(),
                lists: Vec::new(),
            })
            .then_state(|state| {
                assert_eq!(state.last_error, Some(PresenterError::NoLists));
                assert!(state.current_list.is_none());
                assert!(state.current_sections.is_empty());
                assert!(!state.is_loading());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn refetch_of_known_section_keeps_order() {
        let (state, _, s1, s2) = loaded_state();
        let replacement = vec![Todo::new(s1, "Walk dog")];

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::SectionTodosFetched {
                epoch: first_epoch(),
                seq: FetchSeq::default().next(),
                section_id: s1,
                todos: replacement,
            })
            .then_state(move |state| {
                assert_eq!(state.todo_groups.section_ids(), &[s1, s2]);
                assert_eq!(state.todo_groups.get(&s1).unwrap()[0].title, "Walk dog");
                assert_eq!(state.last_refreshed_at, Some(test_clock().now()));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    /// Activation fetch of a one-section list followed by a manual refresh
    /// of the same section, leaving two fetches of it in flight.
    fn overlapping_fetches() -> (SectionId, Vec<TodoListAction>) {
        let mut list = TodoList::new("Personal");
        let s1 = list.add_section("Today");
        let actions = vec![
            TodoListAction::Activate,
            TodoListAction::ListsFetched {
                epoch: first_epoch(),
                lists: vec![list],
            },
            TodoListAction::RefreshSection { section_id: s1 },
        ];
        (s1, actions)
    }

    fn fetched(section_id: SectionId, seq: u64, title: &str) -> TodoListAction {
        let seq = (0..seq).fold(FetchSeq::default(), |seq, _| seq.next());
        TodoListAction::SectionTodosFetched {
            epoch: first_epoch(),
            seq,
            section_id,
            todos: vec![Todo::new(section_id, title)],
        }
    }

    #[test]
    fn refresh_during_activation_counts_both_fetches() {
        let (s1, setup) = overlapping_fetches();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions(setup)
            .then_state(move |state| {
                assert_eq!(state.pending_sections.get(&s1), Some(&2));
                assert_eq!(state.last_fetch.get(), 2);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn overlapping_fetches_keep_section_loading() {
        let (s1, setup) = overlapping_fetches();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions(setup)
            .when_action(fetched(s1, 2, "newer"))
            .then_state(move |state| {
                assert!(state.is_loading());
                assert_eq!(state.pending_sections.get(&s1), Some(&1));
                assert_eq!(state.todo_groups.get(&s1).unwrap()[0].title, "newer");
            })
            .run();
    }

    #[test]
    fn older_fetch_landing_last_is_discarded() {
        let (s1, setup) = overlapping_fetches();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions(setup)
            .when_action(fetched(s1, 2, "newer"))
            .when_action(fetched(s1, 1, "older"))
            .then_state(move |state| {
                assert!(!state.is_loading());
                assert_eq!(state.todo_groups.len(), 1);
                assert_eq!(state.todo_groups.get(&s1).unwrap()[0].title, "newer");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn fetches_landing_in_order_are_both_applied() {
        let (s1, setup) = overlapping_fetches();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions(setup)
            .when_action(fetched(s1, 1, "older"))
            .when_action(fetched(s1, 2, "newer"))
            .then_state(move |state| {
                assert!(!state.is_loading());
                assert_eq!(state.todo_groups.get(&s1).unwrap()[0].title, "newer");
            })
            .run();
    }

    #[test]
    fn unseen_section_is_appended() {
        let (state, _, s1, s2) = loaded_state();
        let s3 = SectionId::new();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::SectionTodosFetched {
                epoch: first_epoch(),
                seq: FetchSeq::default().next(),
                section_id: s3,
                todos: vec![Todo::new(s3, "Later still")],
            })
            .then_state(move |state| {
                assert_eq!(state.todo_groups.section_ids(), &[s1, s2, s3]);
            })
            .run();
    }

    #[test]
    fn results_after_deactivate_are_dropped() {
        let (state, _, s1, _) = loaded_state();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::Deactivate)
            .when_action(TodoListAction::SectionTodosFetched {
                epoch: first_epoch(),
                seq: FetchSeq::default().next(),
                section_id: s1,
                todos: Vec::new(),
            })
            .then_state(move |state| {
                assert!(!state.active);
                // Old group still holds the todo fetched before deactivation.
                assert_eq!(state.todo_groups.get(&s1).unwrap().len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn lists_from_previous_activation_are_dropped() {
        let (list, _, _) = two_section_list();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions([TodoListAction::Activate, TodoListAction::Activate])
            .when_action(TodoListAction::ListsFetched {
                epoch: first_epoch(),
                lists: vec![list],
            })
            .then_state(|state| {
                assert!(state.current_list.is_none());
                assert!(state.loading_lists);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn reactivation_keeps_groups_of_shown_sections_only() {
        let (mut state, _, s1, s2) = loaded_state();
        let foreign = SectionId::new();
        state.todo_groups.upsert(foreign, Vec::new());
        let list = state.current_list.clone().unwrap();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::Activate)
            .when_action(TodoListAction::ListsFetched {
                epoch: first_epoch().next(),
                lists: vec![list],
            })
            .then_state(move |state| {
                assert_eq!(state.todo_groups.section_ids(), &[s1, s2]);
            })
            .run();
    }

    #[test]
    fn refresh_while_inactive_is_ignored() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_action(TodoListAction::RefreshSection {
                section_id: SectionId::new(),
            })
            .then_state(|state| assert!(state.pending_sections.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn change_status_dispatches_update() {
        let (state, todo, _, _) = loaded_state();
        let todo_id = todo.id;

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::ChangeStatus { todo_id })
            .then_state(move |state| {
                // Refetch policy leaves the todo alone until the store answers.
                assert!(!state.todo_groups.todo(&todo_id).unwrap().completed);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn status_changed_refetches_owning_section() {
        let (state, todo, s1, _) = loaded_state();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::StatusChanged {
                epoch: first_epoch(),
                todo_id: todo.id,
            })
            .then_state(move |state| {
                assert!(state.pending_sections.contains_key(&s1));
                assert_eq!(state.pending_sections.len(), 1);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn status_changed_without_sync_leaves_state_stale() {
        let (state, todo, _, _) = loaded_state();
        let before = state.clone();
        let repository = InMemoryTodoRepository::new();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env_with(&repository, StatusSync::None))
            .given_state(state)
            .when_action(TodoListAction::StatusChanged {
                epoch: first_epoch(),
                todo_id: todo.id,
            })
            .then_state(move |state| assert_eq!(*state, before))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn optimistic_policy_flips_immediately() {
        let (state, todo, _, _) = loaded_state();
        let todo_id = todo.id;
        let repository = InMemoryTodoRepository::new();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env_with(&repository, StatusSync::Optimistic))
            .given_state(state)
            .when_action(TodoListAction::ChangeStatus { todo_id })
            .then_state(move |state| {
                assert!(state.todo_groups.todo(&todo_id).unwrap().completed);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[test]
    fn status_change_for_unknown_todo_is_reported() {
        let (state, _, _, _) = loaded_state();
        let missing = TodoId::new();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TodoListAction::StatusChanged {
                epoch: first_epoch(),
                todo_id: missing,
            })
            .then_state(move |state| {
                assert_eq!(state.last_error, Some(PresenterError::UnknownTodo(missing)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_todo_sheet_choices_are_recorded() {
        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_action(TodoListAction::AddTodoChosen {
                kind: AddTodoKind::Spreadsheet,
            })
            .then_state(|state| assert_eq!(state.pending_add, Some(AddTodoKind::Spreadsheet)))
            .run();

        ReducerTest::new(TodoListReducer::new())
            .with_env(env())
            .given_state(TodoListState::new())
            .when_actions([
                TodoListAction::AddTodoChosen {
                    kind: AddTodoKind::Normal,
                },
                TodoListAction::AddTodoCancelled,
            ])
            .then_state(|state| assert_eq!(state.pending_add, None))
            .run();
    }
}
