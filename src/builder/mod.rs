//! Builder API for workflow definitions.
//!
//! Builders are plain mutable values with by-value fluent setters. Calling
//! `build()` validates and produces an immutable value from [`crate::core`];
//! a builder can be built any number of times.
//!
//! The free functions below are the usual entry points:
//!
//! ```rust
//! use statelang::builder::*;
//!
//! let machine = state_machine()
//!     .start_at("Fetch")
//!     .state(
//!         "Fetch",
//!         task_state()
//!             .resource("arn:aws:lambda:us-east-1:123456789012:function:fetch")
//!             .retrier(retrier().retry_on_all_errors().max_attempts(2))
//!             .catcher(catcher().catch_all().transition(next("Failed")))
//!             .transition(next("Route")),
//!     )
//!     .state(
//!         "Route",
//!         choice_state()
//!             .choice(choice().condition(gte("$.total", 100)).transition(next("Large")))
//!             .default_state_name("Done"),
//!     )
//!     .state("Large", wait_state().wait_for(seconds(30)).transition(next("Done")))
//!     .state("Done", succeed_state())
//!     .state("Failed", fail_state().error("FetchFailed"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(machine.states().len(), 5);
//! ```

pub mod condition;
pub mod error;
pub mod machine;
mod macros;
pub mod policy;
pub mod state;
pub mod transition;

pub use condition::{and, eq, gt, gte, lt, lte, not, or, ConditionBuilder};
pub use error::{ValidationError, ValidationErrorKind};
pub use machine::{BranchBuilder, StateMachineBuilder};
pub use policy::{CatcherBuilder, RetrierBuilder};
pub use state::{
    ChoiceBuilder, ChoiceStateBuilder, FailStateBuilder, ParallelStateBuilder, PassStateBuilder,
    StateBuilder, SucceedStateBuilder, TaskStateBuilder, WaitForBuilder, WaitStateBuilder,
};
pub use transition::TransitionBuilder;

use crate::core::Timestamp;

pub fn state_machine() -> StateMachineBuilder {
    StateMachineBuilder::new()
}

/// A branch of a Parallel state.
pub fn branch() -> BranchBuilder {
    BranchBuilder::new()
}

pub fn task_state() -> TaskStateBuilder {
    TaskStateBuilder::new()
}

pub fn pass_state() -> PassStateBuilder {
    PassStateBuilder::new()
}

pub fn wait_state() -> WaitStateBuilder {
    WaitStateBuilder::new()
}

pub fn choice_state() -> ChoiceStateBuilder {
    ChoiceStateBuilder::new()
}

pub fn succeed_state() -> SucceedStateBuilder {
    SucceedStateBuilder::new()
}

pub fn fail_state() -> FailStateBuilder {
    FailStateBuilder::new()
}

pub fn parallel_state() -> ParallelStateBuilder {
    ParallelStateBuilder::new()
}

/// One rule of a Choice state.
pub fn choice() -> ChoiceBuilder {
    ChoiceBuilder::new()
}

pub fn retrier() -> RetrierBuilder {
    RetrierBuilder::new()
}

pub fn catcher() -> CatcherBuilder {
    CatcherBuilder::new()
}

/// Continue at the named state.
pub fn next(state_name: impl Into<String>) -> TransitionBuilder {
    TransitionBuilder::next(state_name)
}

/// End the enclosing machine or branch.
pub fn end() -> TransitionBuilder {
    TransitionBuilder::end()
}

/// Wait a fixed number of seconds.
pub fn seconds(seconds: u64) -> WaitForBuilder {
    WaitForBuilder::Seconds(seconds)
}

/// Wait the number of seconds found at a reference path of the input.
pub fn seconds_path(path: impl Into<String>) -> WaitForBuilder {
    WaitForBuilder::SecondsPath(path.into())
}

/// Wait until an instant.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use statelang::builder::timestamp;
///
/// let until = timestamp(Utc.with_ymd_and_hms(2016, 3, 14, 1, 59, 0).unwrap());
/// assert!(until.build().is_ok());
/// ```
pub fn timestamp(instant: impl Into<Timestamp>) -> WaitForBuilder {
    WaitForBuilder::Timestamp(instant.into())
}

/// Wait until the instant found at a reference path of the input.
pub fn timestamp_path(path: impl Into<String>) -> WaitForBuilder {
    WaitForBuilder::TimestampPath(path.into())
}
