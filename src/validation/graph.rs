//! Checks over the transition graph of one scope.

use crate::builder::ValidationError;
use crate::core::{State, States};
use std::collections::{HashSet, VecDeque};

/// Every name used as a transition target that the scope does not define.
pub(super) fn unresolved_references(start_at: &str, states: &States) -> Vec<ValidationError> {
    let mut unresolved = Vec::new();
    let mut require = |field: String, target: &str| {
        if !states.contains(target) {
            unresolved.push(ValidationError::UnresolvedReference {
                field,
                target: target.to_string(),
            });
        }
    };

    require("StartAt".to_string(), start_at);

    for (name, state) in states.iter() {
        if let Some(target) = state.transition().and_then(|t| t.next_state_name()) {
            require(format!("States.{name}.Next"), target);
        }

        if let State::Choice(choice_state) = state {
            for (index, choice) in choice_state.choices().iter().enumerate() {
                if let Some(target) = choice.next_state_name() {
                    require(format!("States.{name}.Choices[{index}].Next"), target);
                }
            }
            if let Some(target) = choice_state.default_state_name() {
                require(format!("States.{name}.Default"), target);
            }
        }

        for (index, catcher) in state.catchers().iter().enumerate() {
            if let Some(target) = catcher.transition().next_state_name() {
                require(format!("States.{name}.Catch[{index}].Next"), target);
            }
        }
    }

    unresolved
}

/// States reachable from `start_at` that have no path to a terminal state.
///
/// Assumes every reference resolves.
pub(super) fn stranded_states(start_at: &str, states: &States) -> Vec<ValidationError> {
    let terminating = terminating_states(states);
    let reachable = reachable_states(start_at, states);

    states
        .names()
        .filter(|name| reachable.contains(name) && !terminating.contains(name))
        .map(|name| ValidationError::NoTerminalPath {
            field: format!("States.{name}"),
        })
        .collect()
}

/// A state ends on its own, recovers into an end through a catcher, or
/// transfers to a state that terminates.
fn terminating_states(states: &States) -> HashSet<&str> {
    let mut terminating: HashSet<&str> = states
        .iter()
        .filter(|(_, state)| {
            state.is_terminal_state()
                || state
                    .catchers()
                    .iter()
                    .any(|catcher| catcher.transition().is_terminal())
        })
        .map(|(name, _)| name)
        .collect();

    loop {
        let before = terminating.len();
        for (name, state) in states.iter() {
            if !terminating.contains(name)
                && state
                    .successors()
                    .iter()
                    .any(|target| terminating.contains(target))
            {
                terminating.insert(name);
            }
        }
        if terminating.len() == before {
            return terminating;
        }
    }
}

fn reachable_states<'a>(start_at: &'a str, states: &'a States) -> HashSet<&'a str> {
    let mut reachable = HashSet::new();
    let mut queue = VecDeque::from([start_at]);

    while let Some(name) = queue.pop_front() {
        if !reachable.insert(name) {
            continue;
        }
        if let Some(state) = states.get(name) {
            queue.extend(state.successors());
        }
    }
    reachable
}
