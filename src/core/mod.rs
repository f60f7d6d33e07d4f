//! Immutable object model of a workflow definition.
//!
//! This module contains the values produced by the builders:
//! - States and the machines and branches that own them
//! - Transitions between states
//! - Condition trees evaluated by Choice states
//! - Retry and catch policies
//!
//! Nothing here can be constructed outside the crate except through
//! [`crate::builder`] or [`crate::codec`], so every value has passed
//! validation.

mod condition;
mod machine;
pub mod policy;
mod state;
mod transition;
mod value;

pub use condition::{Comparison, ComparisonKind, ComparisonOperator, Condition};
pub use machine::{Branch, StateMachine, States};
pub use policy::{Catcher, ErrorEquals, Retrier, CATCH_ALL};
pub use state::{
    Choice, ChoiceState, FailState, ParallelState, PassState, State, StateType, SucceedState,
    TaskState, WaitFor, WaitState,
};
pub use transition::Transition;
pub use value::{
    ExpectedValue, NumericValue, Timestamp, TimestampError, TimestampPrecision, ValueType,
};
