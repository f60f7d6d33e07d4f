//! Built values to wire documents.

use super::condition::encode_choice;
use super::document::{
    BranchDocument, CatcherDocument, ChoiceDocument, FailDocument, MachineDocument,
    ParallelDocument, PassDocument, RetrierDocument, StateDocument, StatesDocument,
    SucceedDocument, TaskDocument, WaitDocument,
};
use crate::core::{
    Branch, Catcher, Retrier, State, StateMachine, States, Transition, WaitFor,
};
use serde_json::{Map, Value};

pub(crate) fn machine(machine: &StateMachine) -> MachineDocument {
    MachineDocument {
        comment: machine.comment.clone(),
        start_at: machine.start_at.clone(),
        timeout_seconds: machine.timeout_seconds,
        version: machine.version.clone(),
        states: states(&machine.states),
    }
}

fn branch(branch: &Branch) -> BranchDocument {
    BranchDocument {
        comment: branch.comment.clone(),
        start_at: branch.start_at.clone(),
        states: states(&branch.states),
    }
}

fn states(states: &States) -> StatesDocument {
    StatesDocument(
        states
            .iter()
            .map(|(name, state)| (name.to_string(), self::state(state)))
            .collect(),
    )
}

/// `(Next, End)` pair of a transition.
fn transition(transition: &Transition) -> (Option<String>, Option<bool>) {
    match transition {
        Transition::Next(name) => (Some(name.clone()), None),
        Transition::End => (None, Some(true)),
    }
}

fn retrier(retrier: &Retrier) -> RetrierDocument {
    RetrierDocument {
        error_equals: retrier.error_equals.0.clone(),
        interval_seconds: retrier.interval_seconds,
        max_attempts: retrier.max_attempts,
        backoff_rate: retrier.backoff_rate,
    }
}

fn catcher(catcher: &Catcher) -> CatcherDocument {
    let (next, end) = transition(&catcher.transition);
    CatcherDocument {
        error_equals: catcher.error_equals.0.clone(),
        result_path: catcher.result_path.clone(),
        next,
        end,
    }
}

fn object(map: &Option<Map<String, Value>>) -> Option<Value> {
    map.clone().map(Value::Object)
}

fn state(state: &State) -> StateDocument {
    match state {
        State::Task(task) => {
            let (next, end) = transition(&task.transition);
            StateDocument::Task(TaskDocument {
                comment: task.comment.clone(),
                input_path: task.input_path.clone(),
                output_path: task.output_path.clone(),
                resource: task.resource.clone(),
                parameters: object(&task.parameters),
                result_path: task.result_path.clone(),
                timeout_seconds: task.timeout_seconds,
                heartbeat_seconds: task.heartbeat_seconds,
                retry: task.retriers.iter().map(retrier).collect(),
                catch: task.catchers.iter().map(catcher).collect(),
                next,
                end,
            })
        }
        State::Pass(pass) => {
            let (next, end) = transition(&pass.transition);
            StateDocument::Pass(PassDocument {
                comment: pass.comment.clone(),
                input_path: pass.input_path.clone(),
                output_path: pass.output_path.clone(),
                result: pass.result.clone(),
                parameters: object(&pass.parameters),
                result_path: pass.result_path.clone(),
                next,
                end,
            })
        }
        State::Wait(wait) => {
            let (next, end) = transition(&wait.transition);
            let mut doc = WaitDocument {
                comment: wait.comment.clone(),
                input_path: wait.input_path.clone(),
                output_path: wait.output_path.clone(),
                next,
                end,
                ..WaitDocument::default()
            };
            match &wait.wait_for {
                WaitFor::Seconds(seconds) => doc.seconds = Some(*seconds),
                WaitFor::SecondsPath(path) => doc.seconds_path = Some(path.clone()),
                WaitFor::Timestamp(timestamp) => doc.timestamp = Some(timestamp.to_iso8601()),
                WaitFor::TimestampPath(path) => doc.timestamp_path = Some(path.clone()),
            }
            StateDocument::Wait(doc)
        }
        State::Choice(choice) => StateDocument::Choice(ChoiceDocument {
            comment: choice.comment.clone(),
            input_path: choice.input_path.clone(),
            output_path: choice.output_path.clone(),
            choices: choice.choices.iter().map(encode_choice).collect(),
            default: choice.default_state_name.clone(),
        }),
        State::Succeed(succeed) => StateDocument::Succeed(SucceedDocument {
            comment: succeed.comment.clone(),
            input_path: succeed.input_path.clone(),
            output_path: succeed.output_path.clone(),
        }),
        State::Fail(fail) => StateDocument::Fail(FailDocument {
            comment: fail.comment.clone(),
            error: fail.error.clone(),
            cause: fail.cause.clone(),
        }),
        State::Parallel(parallel) => {
            let (next, end) = transition(&parallel.transition);
            StateDocument::Parallel(ParallelDocument {
                comment: parallel.comment.clone(),
                input_path: parallel.input_path.clone(),
                output_path: parallel.output_path.clone(),
                branches: parallel.branches.iter().map(branch).collect(),
                result_path: parallel.result_path.clone(),
                retry: parallel.retriers.iter().map(retrier).collect(),
                catch: parallel.catchers.iter().map(catcher).collect(),
                next,
                end,
            })
        }
    }
}
