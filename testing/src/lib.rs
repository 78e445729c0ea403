//! # Todoboard Testing
//!
//! Testing utilities for reducers built on `todoboard-core`.
//!
//! - [`ReducerTest`]: Given-When-Then builder that runs a reducer without a store
//! - [`assertions`]: helpers for inspecting returned effects
//! - [`FixedClock`]: deterministic time
//! - [`init_test_tracing`]: route `tracing` output through the test harness
//!
//! ## Example
//!
//! ```ignore
//! use todoboard_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoListReducer::new())
//!     .with_env(environment())
//!     .given_state(TodoListState::new())
//!     .when_action(TodoListAction::Activate)
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```


pub use reducer_test::{assertions, ReducerTest};

use chrono::{DateTime, Utc};
use todoboard_core::environment::Clock;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Clock that always reports the same instant
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock pinned to 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

pub use mocks::{test_clock, FixedClock};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// Honors `RUST_LOG`, defaulting to `debug` for the todoboard crates.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todoboard_presenter=debug,todoboard_runtime=debug".into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
