//! Builders for state machines and Parallel branches.

use crate::builder::error::ValidationError;
use crate::builder::state::StateBuilder;
use crate::core::{Branch, State, StateMachine, States};
use crate::validation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Named state builders of one scope, in registration order.
#[derive(Clone, Debug, Default, PartialEq)]
struct ScopeStates(Vec<(String, StateBuilder)>);

impl ScopeStates {
    /// Re-registering a name replaces its builder in place.
    fn register(&mut self, name: String, builder: StateBuilder) {
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = builder,
            None => self.0.push((name, builder)),
        }
    }

    fn get(&self, name: &str) -> Option<&StateBuilder> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, builder)| builder)
    }

    fn remove(&mut self, name: &str) -> Option<StateBuilder> {
        let index = self.0.iter().position(|(existing, _)| existing == name)?;
        Some(self.0.remove(index).1)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    fn build_state(name: &str, builder: &StateBuilder) -> Result<State, ValidationError> {
        builder
            .build()
            .map_err(|err| err.within(&format!("States.{name}")))
    }

    /// Build every state, stopping at the first error.
    fn build(&self) -> Result<States, ValidationError> {
        self.0
            .iter()
            .map(|(name, builder)| Ok((name.clone(), Self::build_state(name, builder)?)))
            .collect::<Result<Vec<_>, ValidationError>>()
            .map(States)
    }

    fn check_fields(&self) -> Result<(), ValidationError> {
        for (name, builder) in &self.0 {
            builder
                .check_fields()
                .map_err(|err| err.within(&format!("States.{name}")))?;
        }
        Ok(())
    }

    /// Build every state, collecting every error.
    fn build_all(&self) -> Result<States, Vec<ValidationError>> {
        let mut states = Vec::new();
        let mut errors = Vec::new();
        for (name, builder) in &self.0 {
            match Self::build_state(name, builder) {
                Ok(state) => states.push((name.clone(), state)),
                Err(err) => errors.push(err),
            }
        }
        if errors.is_empty() {
            Ok(States(states))
        } else {
            Err(errors)
        }
    }
}

fn require_start_at(start_at: Option<&str>) -> Result<&str, ValidationError> {
    match start_at {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ValidationError::missing("StartAt")),
    }
}

/// Build a scope, reporting the first problem.
fn build_scope(
    start_at: Option<&str>,
    states: &ScopeStates,
) -> Result<(String, States), ValidationError> {
    let start_at = require_start_at(start_at)?;
    let states = states.build()?;
    validation::check_scope(start_at, &states)?;
    Ok((start_at.to_string(), states))
}

/// Every problem of a scope, field-level and graph-level.
fn scope_violations(start_at: Option<&str>, states: &ScopeStates) -> Vec<ValidationError> {
    let mut violations = Vec::new();
    let start_at = match require_start_at(start_at) {
        Ok(name) => Some(name),
        Err(err) => {
            violations.push(err);
            None
        }
    };

    match states.build_all() {
        Ok(states) => {
            if let Some(start_at) = start_at {
                violations.extend(validation::scope_violations(start_at, &states));
            }
        }
        Err(errors) => violations.extend(errors),
    }
    violations
}

/// Builder for [`StateMachine`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use statelang::builder::{end, next, pass_state, state_machine, succeed_state};
///
/// let machine = state_machine()
///     .comment("Two steps")
///     .start_at("Prepare")
///     .state("Prepare", pass_state().transition(next("Done")))
///     .state("Done", succeed_state())
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.states().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateMachineBuilder {
    comment: Option<String>,
    start_at: Option<String>,
    timeout_seconds: Option<u32>,
    version: Option<String>,
    states: ScopeStates,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse canonical JSON text into a builder.
    ///
    /// Field-level problems are reported as
    /// [`ValidationError::MalformedDocument`]. Graph checks run when the
    /// returned builder is built.
    pub fn from_text(text: &str) -> Result<Self, ValidationError> {
        crate::codec::from_text(text)
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Name of the first state to run (required).
    pub fn start_at(mut self, name: impl Into<String>) -> Self {
        self.start_at = Some(name.into());
        self
    }

    /// Maximum run time of an execution, in seconds.
    pub fn timeout_seconds(mut self, seconds: u32) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Register a state. A name registered twice keeps its first position
    /// and the last builder.
    pub fn state(mut self, name: impl Into<String>, builder: impl Into<StateBuilder>) -> Self {
        self.states.register(name.into(), builder.into());
        self
    }

    pub fn remove_state(mut self, name: &str) -> Self {
        self.states.remove(name);
        self
    }

    pub fn get_state(&self, name: &str) -> Option<&StateBuilder> {
        self.states.get(name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.names()
    }

    /// Build the state machine.
    /// Returns the first problem found if the definition is invalid.
    pub fn build(&self) -> Result<StateMachine, ValidationError> {
        self.check_timeout()?;
        let (start_at, states) = build_scope(self.start_at.as_deref(), &self.states)?;

        tracing::debug!(
            start_at = %start_at,
            states = states.len(),
            "built state machine"
        );

        Ok(StateMachine {
            comment: self.comment.clone(),
            start_at,
            timeout_seconds: self.timeout_seconds,
            version: self.version.clone(),
            states,
        })
    }

    /// Run every check without stopping at the first failure.
    ///
    /// Returns `Validation::Success(())` when [`build`](Self::build) would
    /// succeed, or every problem found otherwise. Graph checks only run once
    /// every state builds.
    pub fn diagnose(&self) -> Validation<(), NonEmptyVec<ValidationError>> {
        let mut violations: Vec<ValidationError> = self.check_timeout().err().into_iter().collect();
        violations.extend(scope_violations(self.start_at.as_deref(), &self.states));

        tracing::trace!(violations = violations.len(), "diagnosed state machine");
        validation::accumulate(violations)
    }

    fn check_timeout(&self) -> Result<(), ValidationError> {
        if self.timeout_seconds == Some(0) {
            return Err(ValidationError::invalid(
                "TimeoutSeconds",
                "must be a positive integer",
            ));
        }
        Ok(())
    }
}

/// Builder for a [`Branch`] of a Parallel state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchBuilder {
    comment: Option<String>,
    start_at: Option<String>,
    states: ScopeStates,
}

impl BranchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Name of the first state of the branch (required).
    pub fn start_at(mut self, name: impl Into<String>) -> Self {
        self.start_at = Some(name.into());
        self
    }

    /// Register a state. A name registered twice keeps its first position
    /// and the last builder.
    pub fn state(mut self, name: impl Into<String>, builder: impl Into<StateBuilder>) -> Self {
        self.states.register(name.into(), builder.into());
        self
    }

    pub fn get_state(&self, name: &str) -> Option<&StateBuilder> {
        self.states.get(name)
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.names()
    }

    /// Field-level checks of the branch and its states, without name
    /// resolution.
    pub(crate) fn check_fields(&self) -> Result<(), ValidationError> {
        require_start_at(self.start_at.as_deref())?;
        self.states.check_fields()
    }

    /// Build the branch. Names resolve within the branch only.
    pub fn build(&self) -> Result<Branch, ValidationError> {
        let (start_at, states) = build_scope(self.start_at.as_deref(), &self.states)?;

        Ok(Branch {
            comment: self.comment.clone(),
            start_at,
            states,
        })
    }
}
