//! State machines and the branch fragments nested inside Parallel states.

use super::state::State;

/// Ordered mapping from state name to state.
///
/// Iteration follows registration order, which is also the serialization
/// order. Names are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct States(pub(crate) Vec<(String, State)>);

impl States {
    pub fn get(&self, name: &str) -> Option<&State> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, state)| state)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &State)> {
        self.0.iter().map(|(name, state)| (name.as_str(), state))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A nested scope run by a Parallel state.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub(crate) comment: Option<String>,
    pub(crate) start_at: String,
    pub(crate) states: States,
}

impl Branch {
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn start_at(&self) -> &str {
        &self.start_at
    }

    pub fn states(&self) -> &States {
        &self.states
    }
}

/// A complete, validated workflow definition.
///
/// Built with [`StateMachine::builder`] or the free functions in
/// [`crate::builder`], and serialized with [`StateMachine::to_text`].
///
/// ```rust
/// use statelang::builder::{state_machine, succeed_state};
///
/// let machine = state_machine()
///     .start_at("Done")
///     .state("Done", succeed_state())
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.start_at(), "Done");
/// assert!(machine.state("Done").unwrap().is_terminal_state());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StateMachine {
    pub(crate) comment: Option<String>,
    pub(crate) start_at: String,
    pub(crate) timeout_seconds: Option<u32>,
    pub(crate) version: Option<String>,
    pub(crate) states: States,
}

impl StateMachine {
    pub fn builder() -> crate::builder::StateMachineBuilder {
        crate::builder::StateMachineBuilder::new()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn start_at(&self) -> &str {
        &self.start_at
    }

    pub fn timeout_seconds(&self) -> Option<u32> {
        self.timeout_seconds
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn states(&self) -> &States {
        &self.states
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }
}
