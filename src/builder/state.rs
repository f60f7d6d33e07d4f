//! Builders for the seven state kinds.
//!
//! Every builder checks its own fields when built: path syntax, required
//! fields and value ranges. Whether the names it refers to exist is checked
//! by the enclosing machine or branch.

use crate::builder::condition::ConditionBuilder;
use crate::builder::error::ValidationError;
use crate::builder::machine::BranchBuilder;
use crate::builder::macros::{common_setters, flow_setters, policy_setters};
use crate::builder::policy::{CatcherBuilder, RetrierBuilder};
use crate::builder::transition::TransitionBuilder;
use crate::core::{
    Catcher, Choice, ChoiceState, FailState, ParallelState, PassState, Retrier, State,
    SucceedState, TaskState, Timestamp, Transition, WaitFor, WaitState,
};
use crate::path::{self, PathGrammar, PathSelector};
use serde::Serialize;
use serde_json::{Map, Value};

fn check_io(
    input_path: Option<&PathSelector>,
    output_path: Option<&PathSelector>,
) -> Result<(), ValidationError> {
    path::check_selector("InputPath", input_path, PathGrammar::Path)?;
    path::check_selector("OutputPath", output_path, PathGrammar::Path)
}

fn check_result_path(result_path: Option<&PathSelector>) -> Result<(), ValidationError> {
    path::check_selector("ResultPath", result_path, PathGrammar::ReferencePath)
}

fn require_transition(
    transition: Option<&TransitionBuilder>,
) -> Result<Transition, ValidationError> {
    transition
        .ok_or_else(|| ValidationError::missing("Next/End"))?
        .build()
}

fn build_parameters(
    parameters: Option<&Value>,
) -> Result<Option<Map<String, Value>>, ValidationError> {
    match parameters {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(ValidationError::invalid(
            "Parameters",
            format!("expected a JSON object, found {other}"),
        )),
    }
}

/// Build every element, prefixing errors with `key[index]`.
fn build_each<B, T>(
    key: &str,
    builders: &[B],
    build: impl Fn(&B) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    builders
        .iter()
        .enumerate()
        .map(|(index, builder)| build(builder).map_err(|err| err.within(&format!("{key}[{index}]"))))
        .collect()
}

fn build_policies(
    retriers: &[RetrierBuilder],
    catchers: &[CatcherBuilder],
) -> Result<(Vec<Retrier>, Vec<Catcher>), ValidationError> {
    let retriers = build_each("Retry", retriers, RetrierBuilder::build)?;
    let catchers = build_each("Catch", catchers, CatcherBuilder::build)?;
    Ok((retriers, catchers))
}

/// Builder for [`TaskState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
    resource: Option<String>,
    parameters: Option<Value>,
    result_path: Option<PathSelector>,
    timeout_seconds: Option<u32>,
    heartbeat_seconds: Option<u32>,
    retriers: Vec<RetrierBuilder>,
    catchers: Vec<CatcherBuilder>,
    transition: Option<TransitionBuilder>,
}

impl TaskStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();
    flow_setters!();
    policy_setters!();

    /// Identifier of the work to run (required).
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Static input template; must be a JSON object.
    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn timeout_seconds(mut self, seconds: u32) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn heartbeat_seconds(mut self, seconds: u32) -> Self {
        self.heartbeat_seconds = Some(seconds);
        self
    }

    pub fn build(&self) -> Result<TaskState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;
        check_result_path(self.result_path.as_ref())?;

        let resource = match self.resource.as_deref() {
            Some(resource) if !resource.is_empty() => resource.to_string(),
            _ => return Err(ValidationError::missing("Resource")),
        };
        let parameters = build_parameters(self.parameters.as_ref())?;

        if self.timeout_seconds == Some(0) {
            return Err(ValidationError::invalid(
                "TimeoutSeconds",
                "must be a positive integer",
            ));
        }
        match (self.heartbeat_seconds, self.timeout_seconds) {
            (Some(0), _) => {
                return Err(ValidationError::invalid(
                    "HeartbeatSeconds",
                    "must be a positive integer",
                ));
            }
            (Some(heartbeat), Some(timeout)) if heartbeat >= timeout => {
                return Err(ValidationError::invalid(
                    "HeartbeatSeconds",
                    format!("must be smaller than TimeoutSeconds ({timeout})"),
                ));
            }
            _ => {}
        }

        let (retriers, catchers) = build_policies(&self.retriers, &self.catchers)?;
        let transition = require_transition(self.transition.as_ref())?;

        Ok(TaskState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            resource,
            parameters,
            result_path: self.result_path.clone(),
            timeout_seconds: self.timeout_seconds,
            heartbeat_seconds: self.heartbeat_seconds,
            retriers,
            catchers,
            transition,
        })
    }
}

/// Fixed result of a Pass state, in the form it was supplied.
#[derive(Clone, Debug, PartialEq)]
enum ResultPayload {
    Json(Value),
    Text(String),
    Unserializable(String),
}

impl ResultPayload {
    fn build(&self) -> Result<Value, ValidationError> {
        match self {
            Self::Json(value) => Ok(value.clone()),
            Self::Text(text) => serde_json::from_str(text).map_err(|err| {
                ValidationError::invalid("Result", format!("not valid JSON: {err}"))
            }),
            Self::Unserializable(reason) => Err(ValidationError::invalid(
                "Result",
                format!("cannot be represented as JSON: {reason}"),
            )),
        }
    }
}

/// Builder for [`PassState`].
///
/// ```rust
/// use statelang::builder::{end, pass_state};
/// use serde_json::json;
///
/// let from_text = pass_state()
///     .result_text(r#"{"answer": 42}"#)
///     .transition(end())
///     .build()
///     .unwrap();
/// let from_value = pass_state()
///     .result(json!({"answer": 42}))
///     .transition(end())
///     .build()
///     .unwrap();
///
/// assert_eq!(from_text, from_value);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
    result: Option<ResultPayload>,
    parameters: Option<Value>,
    result_path: Option<PathSelector>,
    transition: Option<TransitionBuilder>,
}

impl PassStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();
    flow_setters!();

    pub fn result(mut self, result: Value) -> Self {
        self.result = Some(ResultPayload::Json(result));
        self
    }

    /// Result given as JSON text; parsed when the state is built.
    pub fn result_text(mut self, json: impl Into<String>) -> Self {
        self.result = Some(ResultPayload::Text(json.into()));
        self
    }

    /// Result given as any serializable value.
    pub fn result_of<T: Serialize + ?Sized>(mut self, result: &T) -> Self {
        let payload = match serde_json::to_value(result) {
            Ok(value) => ResultPayload::Json(value),
            Err(err) => ResultPayload::Unserializable(err.to_string()),
        };
        self.result = Some(payload);
        self
    }

    /// Static input template; must be a JSON object.
    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn build(&self) -> Result<PassState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;
        check_result_path(self.result_path.as_ref())?;

        let result = self.result.as_ref().map(ResultPayload::build).transpose()?;
        let parameters = build_parameters(self.parameters.as_ref())?;
        let transition = require_transition(self.transition.as_ref())?;

        Ok(PassState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            result,
            parameters,
            result_path: self.result_path.clone(),
            transition,
        })
    }
}

/// Unvalidated [`WaitFor`]; created with [`seconds`](crate::builder::seconds),
/// [`seconds_path`](crate::builder::seconds_path),
/// [`timestamp`](crate::builder::timestamp) or
/// [`timestamp_path`](crate::builder::timestamp_path).
#[derive(Clone, Debug, PartialEq)]
pub enum WaitForBuilder {
    Seconds(u64),
    SecondsPath(String),
    Timestamp(Timestamp),
    TimestampPath(String),
}

impl WaitForBuilder {
    pub fn build(&self) -> Result<WaitFor, ValidationError> {
        match self {
            Self::Seconds(seconds) => Ok(WaitFor::Seconds(*seconds)),
            Self::SecondsPath(path) => {
                path::check("SecondsPath", path, PathGrammar::ReferencePath)?;
                Ok(WaitFor::SecondsPath(path.clone()))
            }
            Self::Timestamp(timestamp) => {
                timestamp
                    .check_range()
                    .map_err(|err| ValidationError::invalid("Timestamp", err.to_string()))?;
                Ok(WaitFor::Timestamp(*timestamp))
            }
            Self::TimestampPath(path) => {
                path::check("TimestampPath", path, PathGrammar::ReferencePath)?;
                Ok(WaitFor::TimestampPath(path.clone()))
            }
        }
    }
}

/// Builder for [`WaitState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaitStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
    wait_for: Option<WaitForBuilder>,
    transition: Option<TransitionBuilder>,
}

impl WaitStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();

    /// Duration or instant to wait for (required).
    pub fn wait_for(mut self, wait_for: WaitForBuilder) -> Self {
        self.wait_for = Some(wait_for);
        self
    }

    /// `next(name)` or `end()`.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn build(&self) -> Result<WaitState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;

        let wait_for = self
            .wait_for
            .as_ref()
            .ok_or_else(|| ValidationError::missing("Seconds/SecondsPath/Timestamp/TimestampPath"))?
            .build()?;
        let transition = require_transition(self.transition.as_ref())?;

        Ok(WaitState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            wait_for,
            transition,
        })
    }
}

/// Builder for one [`Choice`] rule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoiceBuilder {
    condition: Option<ConditionBuilder>,
    transition: Option<TransitionBuilder>,
}

impl ChoiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, condition: ConditionBuilder) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Must be `next(name)`; rules cannot end the scope.
    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn build(&self) -> Result<Choice, ValidationError> {
        let condition = self
            .condition
            .as_ref()
            .ok_or_else(|| ValidationError::missing("Condition"))?
            .build()?;

        let transition = match &self.transition {
            None => return Err(ValidationError::missing("Next")),
            Some(TransitionBuilder::End) => {
                return Err(ValidationError::invalid(
                    "Next",
                    "a choice rule must transition to a named state",
                ));
            }
            Some(transition) => transition.build()?,
        };

        Ok(Choice {
            condition,
            transition,
        })
    }
}

/// Builder for [`ChoiceState`].
///
/// Rules keep the order they are added in. A missing default is accepted;
/// an executor then fails when no rule matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoiceStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
    choices: Vec<ChoiceBuilder>,
    default_state_name: Option<String>,
}

impl ChoiceStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();

    pub fn choice(mut self, choice: ChoiceBuilder) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choices(mut self, choices: impl IntoIterator<Item = ChoiceBuilder>) -> Self {
        self.choices.extend(choices);
        self
    }

    /// State to continue at when no rule matches.
    pub fn default_state_name(mut self, name: impl Into<String>) -> Self {
        self.default_state_name = Some(name.into());
        self
    }

    pub fn build(&self) -> Result<ChoiceState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;

        if self.choices.is_empty() {
            return Err(ValidationError::missing("Choices"));
        }
        let choices = build_each("Choices", &self.choices, ChoiceBuilder::build)?;

        if self.default_state_name.as_deref() == Some("") {
            return Err(ValidationError::invalid("Default", "state name is empty"));
        }

        Ok(ChoiceState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            choices,
            default_state_name: self.default_state_name.clone(),
        })
    }
}

/// Builder for [`SucceedState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SucceedStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
}

impl SucceedStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();

    pub fn build(&self) -> Result<SucceedState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;

        Ok(SucceedState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
        })
    }
}

/// Builder for [`FailState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FailStateBuilder {
    comment: Option<String>,
    error: Option<String>,
    cause: Option<String>,
}

impl FailStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Error name reported by the failure.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Human-readable cause of the failure.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn build(&self) -> Result<FailState, ValidationError> {
        Ok(FailState {
            comment: self.comment.clone(),
            error: self.error.clone(),
            cause: self.cause.clone(),
        })
    }
}

/// Builder for [`ParallelState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParallelStateBuilder {
    comment: Option<String>,
    input_path: Option<PathSelector>,
    output_path: Option<PathSelector>,
    branches: Vec<BranchBuilder>,
    result_path: Option<PathSelector>,
    retriers: Vec<RetrierBuilder>,
    catchers: Vec<CatcherBuilder>,
    transition: Option<TransitionBuilder>,
}

impl ParallelStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    common_setters!();
    flow_setters!();
    policy_setters!();

    pub fn branch(mut self, branch: BranchBuilder) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn branches(mut self, branches: impl IntoIterator<Item = BranchBuilder>) -> Self {
        self.branches.extend(branches);
        self
    }

    /// Check the fields of the state and of every branch state, without
    /// resolving names inside the branches.
    pub(crate) fn check_fields(&self) -> Result<(), ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;
        check_result_path(self.result_path.as_ref())?;

        if self.branches.is_empty() {
            return Err(ValidationError::missing("Branches"));
        }
        build_each("Branches", &self.branches, BranchBuilder::check_fields)?;
        build_policies(&self.retriers, &self.catchers)?;
        require_transition(self.transition.as_ref())?;
        Ok(())
    }

    /// Build the state, including every branch and its scope checks.
    pub fn build(&self) -> Result<ParallelState, ValidationError> {
        check_io(self.input_path.as_ref(), self.output_path.as_ref())?;
        check_result_path(self.result_path.as_ref())?;

        if self.branches.is_empty() {
            return Err(ValidationError::missing("Branches"));
        }
        let branches = build_each("Branches", &self.branches, BranchBuilder::build)?;
        let (retriers, catchers) = build_policies(&self.retriers, &self.catchers)?;
        let transition = require_transition(self.transition.as_ref())?;

        Ok(ParallelState {
            comment: self.comment.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            branches,
            result_path: self.result_path.clone(),
            retriers,
            catchers,
            transition,
        })
    }
}

/// Any state builder, as registered in a machine or branch.
#[derive(Clone, Debug, PartialEq)]
pub enum StateBuilder {
    Task(TaskStateBuilder),
    Pass(PassStateBuilder),
    Wait(WaitStateBuilder),
    Choice(ChoiceStateBuilder),
    Succeed(SucceedStateBuilder),
    Fail(FailStateBuilder),
    Parallel(ParallelStateBuilder),
}

impl StateBuilder {
    pub fn build(&self) -> Result<State, ValidationError> {
        match self {
            Self::Task(builder) => builder.build().map(State::Task),
            Self::Pass(builder) => builder.build().map(State::Pass),
            Self::Wait(builder) => builder.build().map(State::Wait),
            Self::Choice(builder) => builder.build().map(State::Choice),
            Self::Succeed(builder) => builder.build().map(State::Succeed),
            Self::Fail(builder) => builder.build().map(State::Fail),
            Self::Parallel(builder) => builder.build().map(State::Parallel),
        }
    }

    /// Run the field-level checks of [`build`](Self::build) only. Names are
    /// not resolved, so a Parallel state passes even if a branch refers to
    /// a state it does not define.
    pub(crate) fn check_fields(&self) -> Result<(), ValidationError> {
        match self {
            Self::Parallel(builder) => builder.check_fields(),
            other => other.build().map(|_| ()),
        }
    }
}

impl From<TaskStateBuilder> for StateBuilder {
    fn from(builder: TaskStateBuilder) -> Self {
        Self::Task(builder)
    }
}

impl From<PassStateBuilder> for StateBuilder {
    fn from(builder: PassStateBuilder) -> Self {
        Self::Pass(builder)
    }
}

impl From<WaitStateBuilder> for StateBuilder {
    fn from(builder: WaitStateBuilder) -> Self {
        Self::Wait(builder)
    }
}

impl From<ChoiceStateBuilder> for StateBuilder {
    fn from(builder: ChoiceStateBuilder) -> Self {
        Self::Choice(builder)
    }
}

impl From<SucceedStateBuilder> for StateBuilder {
    fn from(builder: SucceedStateBuilder) -> Self {
        Self::Succeed(builder)
    }
}

impl From<FailStateBuilder> for StateBuilder {
    fn from(builder: FailStateBuilder) -> Self {
        Self::Fail(builder)
    }
}

impl From<ParallelStateBuilder> for StateBuilder {
    fn from(builder: ParallelStateBuilder) -> Self {
        Self::Parallel(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::condition::eq;
    use crate::builder::ValidationErrorKind;
    use crate::core::StateType;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn end() -> TransitionBuilder {
        TransitionBuilder::End
    }

    fn next(name: &str) -> TransitionBuilder {
        TransitionBuilder::next(name)
    }

    #[test]
    fn task_requires_resource_and_transition() {
        let err = TaskStateBuilder::new().transition(end()).build().unwrap_err();
        assert_eq!(err, ValidationError::missing("Resource"));

        let err = TaskStateBuilder::new().resource("arn:fn").build().unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingRequiredField);
        assert_eq!(err.field(), Some("Next/End"));
    }

    #[test]
    fn task_paths_follow_their_grammar() {
        let base = TaskStateBuilder::new().resource("arn:fn").transition(end());

        let err = base.clone().input_path("$.").build().unwrap_err();
        assert_eq!(err.field(), Some("InputPath"));
        assert!(base.clone().input_path("$.foo").build().is_ok());

        let err = base.clone().output_path("[").build().unwrap_err();
        assert_eq!(err.field(), Some("OutputPath"));

        let err = base.clone().result_path("$.foo[*]").build().unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidPath);
        assert!(base.clone().result_path("$.foo.bar").build().is_ok());
        assert!(base.clone().result_path(PathSelector::Discard).build().is_ok());
    }

    #[test]
    fn task_checks_timeouts() {
        let base = TaskStateBuilder::new().resource("arn:fn").transition(end());

        let err = base.clone().timeout_seconds(0).build().unwrap_err();
        assert_eq!(err.field(), Some("TimeoutSeconds"));

        let err = base
            .clone()
            .timeout_seconds(10)
            .heartbeat_seconds(10)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("HeartbeatSeconds"));

        let task = base.timeout_seconds(10).heartbeat_seconds(5).build().unwrap();
        assert_eq!(task.heartbeat_seconds(), Some(5));
    }

    #[test]
    fn task_parameters_must_be_an_object() {
        let base = TaskStateBuilder::new().resource("arn:fn").transition(end());

        let err = base.clone().parameters(json!([1, 2])).build().unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidValue);
        assert_eq!(err.field(), Some("Parameters"));

        let task = base.parameters(json!({"id.$": "$.id"})).build().unwrap();
        assert_eq!(task.parameters().unwrap()["id.$"], json!("$.id"));
    }

    #[test]
    fn policy_errors_name_their_index() {
        let err = TaskStateBuilder::new()
            .resource("arn:fn")
            .retrier(RetrierBuilder::new().retry_on_all_errors())
            .catcher(
                CatcherBuilder::new()
                    .catch_all()
                    .transition(next("Recover")),
            )
            .catcher(
                CatcherBuilder::new()
                    .catch_all()
                    .result_path("$.foo[*]")
                    .transition(next("Recover")),
            )
            .transition(end())
            .build()
            .unwrap_err();

        assert_eq!(err.field(), Some("Catch[1].ResultPath"));
    }

    #[test]
    fn pass_result_accepts_text_values_and_serializable_types() {
        let mut answer = BTreeMap::new();
        answer.insert("answer", 42);

        let from_text = PassStateBuilder::new()
            .result_text(r#"{"answer": 42}"#)
            .transition(end())
            .build()
            .unwrap();
        let from_serialize = PassStateBuilder::new()
            .result_of(&answer)
            .transition(end())
            .build()
            .unwrap();

        assert_eq!(from_text.result(), Some(&json!({"answer": 42})));
        assert_eq!(from_text, from_serialize);
    }

    #[test]
    fn pass_result_text_must_be_json() {
        let err = PassStateBuilder::new()
            .result_text("{")
            .transition(end())
            .build()
            .unwrap_err();

        assert_eq!(err.kind(), ValidationErrorKind::InvalidValue);
        assert_eq!(err.field(), Some("Result"));
    }

    #[test]
    fn wait_requires_a_duration() {
        let err = WaitStateBuilder::new().transition(end()).build().unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingRequiredField);

        let err = WaitStateBuilder::new()
            .wait_for(WaitForBuilder::SecondsPath("$.delay[*]".to_string()))
            .transition(end())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("SecondsPath"));

        let wait = WaitStateBuilder::new()
            .wait_for(WaitForBuilder::Seconds(10))
            .transition(end())
            .build()
            .unwrap();
        assert_eq!(wait.wait_for(), &WaitFor::Seconds(10));
    }

    #[test]
    fn choice_rules_keep_order_and_require_next() {
        let state = ChoiceStateBuilder::new()
            .choice(ChoiceBuilder::new().condition(eq("$.v", 1)).transition(next("A")))
            .choice(ChoiceBuilder::new().condition(eq("$.v", 1)).transition(next("B")))
            .build()
            .unwrap();

        let targets: Vec<_> = state
            .choices()
            .iter()
            .filter_map(Choice::next_state_name)
            .collect();
        assert_eq!(targets, vec!["A", "B"]);
        assert_eq!(state.default_state_name(), None);

        let err = ChoiceStateBuilder::new()
            .choice(ChoiceBuilder::new().condition(eq("$.v", 1)).transition(end()))
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("Choices[0].Next"));

        let err = ChoiceStateBuilder::new().build().unwrap_err();
        assert_eq!(err, ValidationError::missing("Choices"));
    }

    #[test]
    fn choice_condition_errors_are_located() {
        let err = ChoiceStateBuilder::new()
            .choice(ChoiceBuilder::new().condition(eq("$.v", 1)).transition(next("A")))
            .choice(ChoiceBuilder::new().condition(eq("$.", 1)).transition(next("B")))
            .build()
            .unwrap_err();

        assert_eq!(err.field(), Some("Choices[1].Variable"));
    }

    #[test]
    fn fail_state_keeps_error_and_cause() {
        let state: StateBuilder = FailStateBuilder::new()
            .error("States.Custom")
            .cause("bad input")
            .into();
        let built = state.build().unwrap();

        assert_eq!(built.state_type(), StateType::Fail);
        assert!(built.is_terminal_state());
        match built {
            State::Fail(fail) => {
                assert_eq!(fail.error(), Some("States.Custom"));
                assert_eq!(fail.cause(), Some("bad input"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn parallel_requires_branches() {
        let err = ParallelStateBuilder::new()
            .transition(end())
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::missing("Branches"));
    }

    #[test]
    fn end_transition_makes_state_terminal() {
        let state: StateBuilder = PassStateBuilder::new().transition(end()).into();
        assert!(state.build().unwrap().is_terminal_state());

        let state: StateBuilder = PassStateBuilder::new().transition(next("B")).into();
        assert!(!state.build().unwrap().is_terminal_state());
    }
}
