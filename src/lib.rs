//! Statelang: build, validate and serialize states language workflows
//!
//! A workflow is a state machine made of named states (Task, Pass, Wait,
//! Choice, Succeed, Fail, Parallel) linked by transitions. Definitions are
//! assembled with fluent builders, checked when built, and written to or
//! read from their canonical JSON form. Nothing here executes a workflow.
//!
//! # Core Concepts
//!
//! - **Builders**: mutable, fluent values in [`builder`] that produce
//!   immutable definitions from [`core`]
//! - **Validation**: path syntax, required fields, condition types, name
//!   resolution and reachability of a terminal state
//! - **Codec**: canonical JSON text in [`codec`], parsed back into builders
//!
//! # Example
//!
//! ```rust
//! use statelang::builder::{
//!     catcher, choice, choice_state, eq, fail_state, next, state_machine, succeed_state,
//!     task_state,
//! };
//! use statelang::StateMachineBuilder;
//!
//! let machine = state_machine()
//!     .comment("Approve orders")
//!     .start_at("Check")
//!     .state(
//!         "Check",
//!         task_state()
//!             .resource("arn:aws:lambda:us-east-1:123456789012:function:check")
//!             .result_path("$.check")
//!             .catcher(catcher().catch_all().transition(next("Rejected")))
//!             .transition(next("Decide")),
//!     )
//!     .state(
//!         "Decide",
//!         choice_state()
//!             .choice(choice().condition(eq("$.check.approved", true)).transition(next("Approved")))
//!             .default_state_name("Rejected"),
//!     )
//!     .state("Approved", succeed_state())
//!     .state("Rejected", fail_state().error("OrderRejected"))
//!     .build()
//!     .unwrap();
//!
//! let text = machine.to_text_pretty();
//! let again = StateMachineBuilder::from_text(&text).unwrap().build().unwrap();
//! assert_eq!(again, machine);
//! ```

pub mod builder;
pub mod codec;
pub mod core;
pub mod path;
pub mod validation;

// Re-export commonly used types
pub use builder::{StateMachineBuilder, ValidationError, ValidationErrorKind};
pub use core::{State, StateMachine};
pub use path::PathSelector;
