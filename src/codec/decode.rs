//! Wire documents to builders.
//!
//! Every failure here is a [`ValidationError::MalformedDocument`] whose
//! reason names the offending state.

use super::condition::decode_choice;
use super::document::{
    BranchDocument, CatcherDocument, MachineDocument, RetrierDocument, StateDocument,
    StatesDocument,
};
use crate::builder::{
    BranchBuilder, CatcherBuilder, ChoiceStateBuilder, FailStateBuilder, ParallelStateBuilder,
    PassStateBuilder, RetrierBuilder, StateBuilder, StateMachineBuilder, SucceedStateBuilder,
    TaskStateBuilder, TransitionBuilder, ValidationError, WaitForBuilder, WaitStateBuilder,
};
use crate::core::Timestamp;

/// Apply `set` when `value` is present.
fn with<B, T>(builder: B, value: Option<T>, set: impl FnOnce(B, T) -> B) -> B {
    match value {
        Some(value) => set(builder, value),
        None => builder,
    }
}

pub(crate) fn machine(doc: MachineDocument) -> Result<StateMachineBuilder, ValidationError> {
    let mut builder = StateMachineBuilder::new().start_at(doc.start_at);
    builder = with(builder, doc.comment, |b, comment| b.comment(comment));
    builder = with(builder, doc.timeout_seconds, |b, seconds| b.timeout_seconds(seconds));
    builder = with(builder, doc.version, |b, version| b.version(version));

    for (name, state) in states(doc.states)? {
        builder = builder.state(name, state);
    }
    Ok(builder)
}

fn branch(doc: BranchDocument) -> Result<BranchBuilder, String> {
    let mut builder = BranchBuilder::new().start_at(doc.start_at);
    builder = with(builder, doc.comment, |b, comment| b.comment(comment));

    for (name, state) in states(doc.states).map_err(reason)? {
        builder = builder.state(name, state);
    }
    Ok(builder)
}

fn reason(err: ValidationError) -> String {
    match err {
        ValidationError::MalformedDocument { reason } => reason,
        other => other.to_string(),
    }
}

fn states(doc: StatesDocument) -> Result<Vec<(String, StateBuilder)>, ValidationError> {
    doc.0
        .into_iter()
        .map(|(name, doc)| {
            let builder = state(doc)
                .map_err(|reason| ValidationError::malformed(format!("state '{name}': {reason}")))?;
            builder.check_fields().map_err(|err| {
                let err = err.within(&format!("States.{name}"));
                match err {
                    ValidationError::MalformedDocument { .. } => err,
                    other => ValidationError::malformed(other),
                }
            })?;
            Ok((name, builder))
        })
        .collect()
}

/// Exactly one of `Next` and `End: true`, or neither.
fn transition(next: Option<String>, end: Option<bool>) -> Result<Option<TransitionBuilder>, String> {
    match (next, end) {
        (Some(_), Some(_)) => Err("'Next' and 'End' are mutually exclusive".to_string()),
        (_, Some(false)) => Err("'End' must be true when present".to_string()),
        (Some(next), None) => Ok(Some(TransitionBuilder::next(next))),
        (None, Some(true)) => Ok(Some(TransitionBuilder::end())),
        (None, None) => Ok(None),
    }
}

fn retrier(doc: RetrierDocument) -> RetrierBuilder {
    let mut builder = RetrierBuilder::new().error_equals(doc.error_equals);
    builder = with(builder, doc.interval_seconds, |b, seconds| b.interval_seconds(seconds));
    builder = with(builder, doc.max_attempts, |b, attempts| b.max_attempts(attempts));
    with(builder, doc.backoff_rate, |b, rate| b.backoff_rate(rate))
}

fn catcher(index: usize, doc: CatcherDocument) -> Result<CatcherBuilder, String> {
    let mut builder = CatcherBuilder::new().error_equals(doc.error_equals);
    builder = with(builder, doc.result_path, |b, path| b.result_path(path));
    let transition = transition(doc.next, doc.end).map_err(|err| format!("Catch[{index}]: {err}"))?;
    Ok(with(builder, transition, |b, t| b.transition(t)))
}

fn catchers(docs: Vec<CatcherDocument>) -> Result<Vec<CatcherBuilder>, String> {
    docs.into_iter()
        .enumerate()
        .map(|(index, doc)| catcher(index, doc))
        .collect()
}

fn wait_for(
    seconds: Option<u64>,
    seconds_path: Option<String>,
    timestamp: Option<String>,
    timestamp_path: Option<String>,
) -> Result<Option<WaitForBuilder>, String> {
    let mut found = Vec::new();
    if let Some(seconds) = seconds {
        found.push(WaitForBuilder::Seconds(seconds));
    }
    if let Some(path) = seconds_path {
        found.push(WaitForBuilder::SecondsPath(path));
    }
    if let Some(text) = timestamp {
        let instant = Timestamp::parse(&text)
            .map_err(|err| format!("'Timestamp' value '{text}' is not a valid timestamp: {err}"))?;
        found.push(WaitForBuilder::Timestamp(instant));
    }
    if let Some(path) = timestamp_path {
        found.push(WaitForBuilder::TimestampPath(path));
    }

    if found.len() > 1 {
        return Err(
            "only one of 'Seconds', 'SecondsPath', 'Timestamp' and 'TimestampPath' may be set"
                .to_string(),
        );
    }
    Ok(found.pop())
}

fn state(doc: StateDocument) -> Result<StateBuilder, String> {
    let builder = match doc {
        StateDocument::Task(doc) => {
            let mut builder = TaskStateBuilder::new().resource(doc.resource);
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            builder = with(builder, doc.output_path, |b, path| b.output_path(path));
            builder = with(builder, doc.parameters, |b, value| b.parameters(value));
            builder = with(builder, doc.result_path, |b, path| b.result_path(path));
            builder = with(builder, doc.timeout_seconds, |b, seconds| b.timeout_seconds(seconds));
            builder = with(builder, doc.heartbeat_seconds, |b, seconds| {
                b.heartbeat_seconds(seconds)
            });
            builder = builder
                .retriers(doc.retry.into_iter().map(retrier))
                .catchers(catchers(doc.catch)?);
            let transition = transition(doc.next, doc.end)?;
            StateBuilder::from(with(builder, transition, |b, t| b.transition(t)))
        }
        StateDocument::Pass(doc) => {
            let mut builder = PassStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            builder = with(builder, doc.output_path, |b, path| b.output_path(path));
            builder = with(builder, doc.result, |b, value| b.result(value));
            builder = with(builder, doc.parameters, |b, value| b.parameters(value));
            builder = with(builder, doc.result_path, |b, path| b.result_path(path));
            let transition = transition(doc.next, doc.end)?;
            StateBuilder::from(with(builder, transition, |b, t| b.transition(t)))
        }
        StateDocument::Wait(doc) => {
            let mut builder = WaitStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            builder = with(builder, doc.output_path, |b, path| b.output_path(path));
            let wait_for = wait_for(
                doc.seconds,
                doc.seconds_path,
                doc.timestamp,
                doc.timestamp_path,
            )?;
            builder = with(builder, wait_for, |b, wait_for| b.wait_for(wait_for));
            let transition = transition(doc.next, doc.end)?;
            StateBuilder::from(with(builder, transition, |b, t| b.transition(t)))
        }
        StateDocument::Choice(doc) => {
            let mut builder = ChoiceStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            builder = with(builder, doc.output_path, |b, path| b.output_path(path));
            for (index, rule) in doc.choices.iter().enumerate() {
                let choice = decode_choice(rule).map_err(|err| format!("Choices[{index}]: {err}"))?;
                builder = builder.choice(choice);
            }
            StateBuilder::from(with(builder, doc.default, |b, name| {
                b.default_state_name(name)
            }))
        }
        StateDocument::Succeed(doc) => {
            let mut builder = SucceedStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            StateBuilder::from(with(builder, doc.output_path, |b, path| b.output_path(path)))
        }
        StateDocument::Fail(doc) => {
            let mut builder = FailStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.error, |b, error| b.error(error));
            StateBuilder::from(with(builder, doc.cause, |b, cause| b.cause(cause)))
        }
        StateDocument::Parallel(doc) => {
            let mut builder = ParallelStateBuilder::new();
            builder = with(builder, doc.comment, |b, comment| b.comment(comment));
            builder = with(builder, doc.input_path, |b, path| b.input_path(path));
            builder = with(builder, doc.output_path, |b, path| b.output_path(path));
            for (index, branch_doc) in doc.branches.into_iter().enumerate() {
                let branch = branch(branch_doc).map_err(|err| format!("Branches[{index}]: {err}"))?;
                builder = builder.branch(branch);
            }
            builder = with(builder, doc.result_path, |b, path| b.result_path(path));
            builder = builder
                .retriers(doc.retry.into_iter().map(retrier))
                .catchers(catchers(doc.catch)?);
            let transition = transition(doc.next, doc.end)?;
            StateBuilder::from(with(builder, transition, |b, t| b.transition(t)))
        }
    };
    Ok(builder)
}
