//! Scope-level validation of built states.
//!
//! A scope is a state machine or one branch of a Parallel state. Names are
//! resolved within their own scope only. Two families of checks run:
//!
//! - every `StartAt`, `Next`, choice `Next`, `Default` and catcher `Next`
//!   names a state of the scope
//! - every state reachable from `StartAt` can still reach a terminal state
//!
//! Reachability is only checked once every reference resolves.
//!
//! `build()` stops at the first violation, while
//! [`StateMachineBuilder::diagnose`](crate::builder::StateMachineBuilder::diagnose)
//! collects all of them with a `Validation`:
//!
//! ```rust
//! use statelang::builder::{next, pass_state, state_machine};
//! use stillwater::validation::Validation;
//!
//! let builder = state_machine()
//!     .start_at("Loop")
//!     .state("Loop", pass_state().transition(next("Loop")));
//!
//! match builder.diagnose() {
//!     Validation::Failure(errors) => assert_eq!(errors.len(), 1),
//!     Validation::Success(_) => panic!("a loop without exit is invalid"),
//! }
//! ```

mod graph;

use crate::builder::ValidationError;
use crate::core::States;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Every graph violation of a scope, in a stable order.
pub fn scope_violations(start_at: &str, states: &States) -> Vec<ValidationError> {
    let unresolved = graph::unresolved_references(start_at, states);
    if !unresolved.is_empty() {
        return unresolved;
    }
    graph::stranded_states(start_at, states)
}

/// First graph violation of a scope, if any.
pub fn check_scope(start_at: &str, states: &States) -> Result<(), ValidationError> {
    match scope_violations(start_at, states).into_iter().next() {
        Some(err) => {
            tracing::debug!(error = %err, "scope validation failed");
            Err(err)
        }
        None => Ok(()),
    }
}

/// Fold violations into a `Validation` holding all of them.
pub fn accumulate(violations: Vec<ValidationError>) -> Validation<(), NonEmptyVec<ValidationError>> {
    if violations.is_empty() {
        return Validation::success(());
    }

    let mut checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> = Vec::new();
    for violation in violations {
        checks.push(Validation::fail(violation));
    }

    // Accumulate ALL failures using all_vec
    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        branch, catcher, choice, choice_state, end, eq, next, parallel_state, pass_state,
        succeed_state, task_state, StateMachineBuilder, ValidationErrorKind,
    };
    use crate::core::{State, StateMachine};

    fn states_of(machine: &StateMachine) -> &States {
        machine.states()
    }

    /// Build the states of a machine without its scope checks.
    fn raw(builder: &StateMachineBuilder) -> States {
        let states = builder
            .state_names()
            .map(|name| {
                let state: State = builder.get_state(name).unwrap().build().unwrap();
                (name.to_string(), state)
            })
            .collect();
        States(states)
    }

    #[test]
    fn valid_scope_has_no_violations() {
        let machine = StateMachineBuilder::new()
            .start_at("A")
            .state("A", pass_state().transition(next("B")))
            .state("B", succeed_state())
            .build()
            .unwrap();

        assert!(scope_violations("A", states_of(&machine)).is_empty());
    }

    #[test]
    fn every_unresolved_reference_is_reported() {
        let builder = StateMachineBuilder::new()
            .state(
                "Work",
                task_state()
                    .resource("arn:fn")
                    .catcher(catcher().catch_all().transition(next("Ghost")))
                    .transition(next("Missing")),
            )
            .state(
                "Check",
                choice_state()
                    .choice(choice().condition(eq("$.a", 1)).transition(next("Nope")))
                    .default_state_name("Work"),
            );

        let violations = scope_violations("Start", &raw(&builder));
        let fields: Vec<_> = violations.iter().filter_map(|v| v.field()).collect();

        assert_eq!(
            fields,
            vec![
                "StartAt",
                "States.Work.Next",
                "States.Work.Catch[0].Next",
                "States.Check.Choices[0].Next",
            ]
        );
    }

    #[test]
    fn cycles_without_exit_are_stranded() {
        let builder = StateMachineBuilder::new()
            .state("A", pass_state().transition(next("B")))
            .state("B", pass_state().transition(next("A")))
            .state("Done", succeed_state());

        let violations = scope_violations("A", &raw(&builder));

        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.kind() == ValidationErrorKind::NoTerminalPath));
        assert_eq!(violations[0].field(), Some("States.A"));
    }

    #[test]
    fn cycles_with_an_exit_are_accepted() {
        let builder = StateMachineBuilder::new()
            .state(
                "Poll",
                choice_state()
                    .choice(choice().condition(eq("$.done", true)).transition(next("Done")))
                    .default_state_name("Wait"),
            )
            .state("Wait", pass_state().transition(next("Poll")))
            .state("Done", succeed_state());

        assert!(scope_violations("Poll", &raw(&builder)).is_empty());
    }

    #[test]
    fn catcher_can_provide_the_exit() {
        let builder = StateMachineBuilder::new().state(
            "Spin",
            task_state()
                .resource("arn:fn")
                .catcher(catcher().catch_all().transition(end()))
                .transition(next("Spin")),
        );

        assert!(scope_violations("Spin", &raw(&builder)).is_empty());
    }

    #[test]
    fn unreachable_states_are_not_checked() {
        let builder = StateMachineBuilder::new()
            .state("A", succeed_state())
            .state("Orphan", pass_state().transition(next("Orphan")));

        assert!(scope_violations("A", &raw(&builder)).is_empty());
    }

    #[test]
    fn branches_are_separate_scopes() {
        let result = StateMachineBuilder::new()
            .start_at("Fan")
            .state(
                "Fan",
                parallel_state()
                    .branch(
                        branch()
                            .start_at("Loop")
                            .state("Loop", pass_state().transition(next("Loop"))),
                    )
                    .transition(end()),
            )
            .build();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::NoTerminalPath);
        assert_eq!(err.field(), Some("States.Fan.Branches[0].States.Loop"));
    }

    #[test]
    fn accumulate_keeps_every_violation() {
        let violations = vec![
            ValidationError::missing("StartAt"),
            ValidationError::missing("Resource"),
        ];

        match accumulate(violations) {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
        assert!(accumulate(Vec::new()).is_success());
    }
}
