//! Builder for state transitions.

use crate::builder::error::ValidationError;
use crate::core::Transition;

/// Unvalidated [`Transition`]; created with [`next`](crate::builder::next)
/// or [`end`](crate::builder::end).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionBuilder {
    Next(String),
    End,
}

impl TransitionBuilder {
    pub fn next(state_name: impl Into<String>) -> Self {
        Self::Next(state_name.into())
    }

    pub fn end() -> Self {
        Self::End
    }

    /// Build the transition.
    /// Returns an error if the target state name is empty.
    pub fn build(&self) -> Result<Transition, ValidationError> {
        match self {
            Self::Next(name) if name.is_empty() => Err(ValidationError::missing("Next")),
            Self::Next(name) => Ok(Transition::Next(name.clone())),
            Self::End => Ok(Transition::End),
        }
    }
}
