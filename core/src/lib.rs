//! # Todoboard Core
//!
//! Core traits and types shared by the todoboard presenter crates.
//!
//! The presenter is written as a reducer over an explicit state container:
//!
//! - **State**: the data the rendering layer observes
//! - **Action**: every input to the reducer (user intents and fetch results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of asynchronous work whose result is fed back
//!   as another action
//! - **Environment**: injected dependencies (data access, clock)
//!
//! ## Example
//!
//! ```
//! use todoboard_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CountState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CountAction {
//!     Bump,
//! }
//!
//! struct CountReducer;
//!
//! impl Reducer for CountReducer {
//!     type State = CountState;
//!     type Action = CountAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CountState,
//!         action: CountAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CountAction>; 4]> {
//!         match action {
//!             CountAction::Bump => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CountState::default();
//! let effects = CountReducer.reduce(&mut state, CountAction::Bump, &());
//! assert_eq!(state.count, 1);
//! assert_eq!(effects.len(), 1);
//! ```

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

mod effect_macros;

/// Reducer trait - the single place where state changes
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Pure state transition plus effect descriptions.
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer owns
    /// - `Action`: The inputs it processes
    /// - `Environment`: The injected dependencies it needs to build effects
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// Must not perform I/O itself; anything asynchronous is returned as
        /// an [`Effect`] and executed by the runtime.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect descriptions returned from reducers
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future that optionally produces a follow-up action
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// A side effect to be executed by the runtime.
    ///
    /// Effects are values. Returning one from a reducer does nothing until the
    /// store executes it.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// If the future resolves to `Some(action)`, the action is fed back
        /// into the reducer.
        Future(EffectFuture<Action>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Whether executing this effect would do nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) => effects.iter().all(Effect::is_none),
                Effect::Future(_) => false,
            }
        }

        /// Number of futures this effect will spawn, counting nested parallels
        #[must_use]
        pub fn future_count(&self) -> usize {
            match self {
                Effect::None => 0,
                Effect::Parallel(effects) => effects.iter().map(Effect::future_count).sum(),
                Effect::Future(_) => 1,
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Abstracts time so reducers stay deterministic under test.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;

    #[test]
    fn nested_parallel_of_none_is_none() {
        let effect: Effect<()> = Effect::merge(vec![Effect::None, Effect::merge(vec![])]);
        assert!(effect.is_none());
        assert_eq!(effect.future_count(), 0);
    }

    #[test]
    fn future_count_walks_parallels() {
        let effect: Effect<u8> = Effect::merge(vec![
            Effect::Future(Box::pin(async { Some(1) })),
            Effect::merge(vec![Effect::Future(Box::pin(async { None }))]),
            Effect::None,
        ]);
        assert!(!effect.is_none());
        assert_eq!(effect.future_count(), 2);
    }

    #[test]
    fn debug_hides_future_body() {
        let effect: Effect<u8> = Effect::Future(Box::pin(async { Some(1) }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }
}
