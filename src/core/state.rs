//! The seven state kinds of the states language.
//!
//! Every state is an immutable value produced by its builder. Fields are
//! crate-private and exposed through accessors so that a built state always
//! satisfies the checks its builder ran.

use super::condition::Condition;
use super::machine::Branch;
use super::policy::{Catcher, Retrier};
use super::transition::Transition;
use super::value::Timestamp;
use crate::path::PathSelector;
use serde_json::{Map, Value};
use std::fmt;

/// Discriminator of a [`State`], as written in the `Type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateType {
    Task,
    Pass,
    Wait,
    Choice,
    Succeed,
    Fail,
    Parallel,
}

impl StateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Pass => "Pass",
            Self::Wait => "Wait",
            Self::Choice => "Choice",
            Self::Succeed => "Succeed",
            Self::Fail => "Fail",
            Self::Parallel => "Parallel",
        }
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executes the work identified by `resource`.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
    pub(crate) resource: String,
    pub(crate) parameters: Option<Map<String, Value>>,
    pub(crate) result_path: Option<PathSelector>,
    pub(crate) timeout_seconds: Option<u32>,
    pub(crate) heartbeat_seconds: Option<u32>,
    pub(crate) retriers: Vec<Retrier>,
    pub(crate) catchers: Vec<Catcher>,
    pub(crate) transition: Transition,
}

impl TaskState {
    /// Opaque resource identifier; never interpreted.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.parameters.as_ref()
    }

    pub fn result_path(&self) -> Option<&PathSelector> {
        self.result_path.as_ref()
    }

    pub fn timeout_seconds(&self) -> Option<u32> {
        self.timeout_seconds
    }

    pub fn heartbeat_seconds(&self) -> Option<u32> {
        self.heartbeat_seconds
    }

    pub fn retriers(&self) -> &[Retrier] {
        &self.retriers
    }

    pub fn catchers(&self) -> &[Catcher] {
        &self.catchers
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// Passes its input to its output, optionally injecting a fixed result.
#[derive(Clone, Debug, PartialEq)]
pub struct PassState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
    pub(crate) result: Option<Value>,
    pub(crate) parameters: Option<Map<String, Value>>,
    pub(crate) result_path: Option<PathSelector>,
    pub(crate) transition: Transition,
}

impl PassState {
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.parameters.as_ref()
    }

    pub fn result_path(&self) -> Option<&PathSelector> {
        self.result_path.as_ref()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// How long a Wait state delays.
#[derive(Clone, Debug, PartialEq)]
pub enum WaitFor {
    Seconds(u64),
    /// Reference path to a number of seconds in the input.
    SecondsPath(String),
    Timestamp(Timestamp),
    /// Reference path to a timestamp in the input.
    TimestampPath(String),
}

/// Delays for a duration or until an instant.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
    pub(crate) wait_for: WaitFor,
    pub(crate) transition: Transition,
}

impl WaitState {
    pub fn wait_for(&self) -> &WaitFor {
        &self.wait_for
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// One rule of a Choice state.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub(crate) condition: Condition,
    pub(crate) transition: Transition,
}

impl Choice {
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn next_state_name(&self) -> Option<&str> {
        self.transition.next_state_name()
    }
}

/// Branches on the first rule whose condition holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
    pub(crate) choices: Vec<Choice>,
    pub(crate) default_state_name: Option<String>,
}

impl ChoiceState {
    /// Rules in declared order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn default_state_name(&self) -> Option<&str> {
        self.default_state_name.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SucceedState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FailState {
    pub(crate) comment: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) cause: Option<String>,
}

impl FailState {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

/// Runs its branches concurrently and joins their outputs.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallelState {
    pub(crate) comment: Option<String>,
    pub(crate) input_path: Option<PathSelector>,
    pub(crate) output_path: Option<PathSelector>,
    pub(crate) branches: Vec<Branch>,
    pub(crate) result_path: Option<PathSelector>,
    pub(crate) retriers: Vec<Retrier>,
    pub(crate) catchers: Vec<Catcher>,
    pub(crate) transition: Transition,
}

impl ParallelState {
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn result_path(&self) -> Option<&PathSelector> {
        self.result_path.as_ref()
    }

    pub fn retriers(&self) -> &[Retrier] {
        &self.retriers
    }

    pub fn catchers(&self) -> &[Catcher] {
        &self.catchers
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }
}

/// A built state of any kind.
#[derive(Clone, Debug, PartialEq)]
pub enum State {
    Task(TaskState),
    Pass(PassState),
    Wait(WaitState),
    Choice(ChoiceState),
    Succeed(SucceedState),
    Fail(FailState),
    Parallel(ParallelState),
}

impl State {
    pub fn state_type(&self) -> StateType {
        match self {
            Self::Task(_) => StateType::Task,
            Self::Pass(_) => StateType::Pass,
            Self::Wait(_) => StateType::Wait,
            Self::Choice(_) => StateType::Choice,
            Self::Succeed(_) => StateType::Succeed,
            Self::Fail(_) => StateType::Fail,
            Self::Parallel(_) => StateType::Parallel,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Task(state) => state.comment.as_deref(),
            Self::Pass(state) => state.comment.as_deref(),
            Self::Wait(state) => state.comment.as_deref(),
            Self::Choice(state) => state.comment.as_deref(),
            Self::Succeed(state) => state.comment.as_deref(),
            Self::Fail(state) => state.comment.as_deref(),
            Self::Parallel(state) => state.comment.as_deref(),
        }
    }

    /// `None` when absent, and always for Fail states.
    pub fn input_path(&self) -> Option<&PathSelector> {
        match self {
            Self::Task(state) => state.input_path.as_ref(),
            Self::Pass(state) => state.input_path.as_ref(),
            Self::Wait(state) => state.input_path.as_ref(),
            Self::Choice(state) => state.input_path.as_ref(),
            Self::Succeed(state) => state.input_path.as_ref(),
            Self::Fail(_) => None,
            Self::Parallel(state) => state.input_path.as_ref(),
        }
    }

    /// `None` when absent, and always for Fail states.
    pub fn output_path(&self) -> Option<&PathSelector> {
        match self {
            Self::Task(state) => state.output_path.as_ref(),
            Self::Pass(state) => state.output_path.as_ref(),
            Self::Wait(state) => state.output_path.as_ref(),
            Self::Choice(state) => state.output_path.as_ref(),
            Self::Succeed(state) => state.output_path.as_ref(),
            Self::Fail(_) => None,
            Self::Parallel(state) => state.output_path.as_ref(),
        }
    }

    /// The single transition of Task, Pass, Wait and Parallel states.
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Self::Task(state) => Some(&state.transition),
            Self::Pass(state) => Some(&state.transition),
            Self::Wait(state) => Some(&state.transition),
            Self::Parallel(state) => Some(&state.transition),
            Self::Choice(_) | Self::Succeed(_) | Self::Fail(_) => None,
        }
    }

    /// Succeed and Fail states, and any state whose transition is `End`.
    pub fn is_terminal_state(&self) -> bool {
        match self {
            Self::Succeed(_) | Self::Fail(_) => true,
            _ => self.transition().is_some_and(Transition::is_terminal),
        }
    }

    /// Catchers of Task and Parallel states.
    pub fn catchers(&self) -> &[Catcher] {
        match self {
            Self::Task(state) => &state.catchers,
            Self::Parallel(state) => &state.catchers,
            _ => &[],
        }
    }

    /// Names of the states this state may transfer control to, in the
    /// order they are declared. Duplicates are kept.
    pub fn successors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        if let Some(name) = self.transition().and_then(Transition::next_state_name) {
            names.push(name);
        }
        if let Self::Choice(state) = self {
            names.extend(state.choices.iter().filter_map(Choice::next_state_name));
            names.extend(state.default_state_name.as_deref());
        }
        names.extend(
            self.catchers()
                .iter()
                .filter_map(|catcher| catcher.transition.next_state_name()),
        );
        names
    }
}

impl From<TaskState> for State {
    fn from(state: TaskState) -> Self {
        Self::Task(state)
    }
}

impl From<PassState> for State {
    fn from(state: PassState) -> Self {
        Self::Pass(state)
    }
}

impl From<WaitState> for State {
    fn from(state: WaitState) -> Self {
        Self::Wait(state)
    }
}

impl From<ChoiceState> for State {
    fn from(state: ChoiceState) -> Self {
        Self::Choice(state)
    }
}

impl From<SucceedState> for State {
    fn from(state: SucceedState) -> Self {
        Self::Succeed(state)
    }
}

impl From<FailState> for State {
    fn from(state: FailState) -> Self {
        Self::Fail(state)
    }
}

impl From<ParallelState> for State {
    fn from(state: ParallelState) -> Self {
        Self::Parallel(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::ErrorEquals;

    fn pass(transition: Transition) -> State {
        State::Pass(PassState {
            comment: Some("passthrough".to_string()),
            input_path: Some(PathSelector::from("$.in")),
            output_path: Some(PathSelector::Discard),
            result: None,
            parameters: None,
            result_path: None,
            transition,
        })
    }

    #[test]
    fn succeed_and_fail_are_terminal() {
        let succeed = State::Succeed(SucceedState {
            comment: None,
            input_path: None,
            output_path: None,
        });
        let fail = State::Fail(FailState {
            comment: None,
            error: Some("Oops".to_string()),
            cause: None,
        });

        assert!(succeed.is_terminal_state());
        assert!(fail.is_terminal_state());
        assert!(succeed.transition().is_none());
        assert_eq!(fail.state_type(), StateType::Fail);
    }

    #[test]
    fn transition_decides_terminality() {
        assert!(pass(Transition::End).is_terminal_state());
        assert!(!pass(Transition::Next("B".to_string())).is_terminal_state());
    }

    #[test]
    fn common_fields_are_exposed() {
        let state = pass(Transition::End);
        assert_eq!(state.comment(), Some("passthrough"));
        assert_eq!(state.input_path(), Some(&PathSelector::from("$.in")));
        assert_eq!(state.output_path(), Some(&PathSelector::Discard));
        assert_eq!(state.state_type().to_string(), "Pass");
    }

    #[test]
    fn successors_include_catchers() {
        let task = State::Task(TaskState {
            comment: None,
            input_path: None,
            output_path: None,
            resource: "arn:task".to_string(),
            parameters: None,
            result_path: None,
            timeout_seconds: None,
            heartbeat_seconds: None,
            retriers: Vec::new(),
            catchers: vec![Catcher {
                error_equals: ErrorEquals(vec!["States.ALL".to_string()]),
                result_path: None,
                transition: Transition::Next("Recover".to_string()),
            }],
            transition: Transition::Next("Done".to_string()),
        });

        assert_eq!(task.successors(), vec!["Done", "Recover"]);
        assert_eq!(task.catchers().len(), 1);
    }
}
