//! Where control goes after a state completes.

/// Either a named successor state or the end of the enclosing scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    Next(String),
    End,
}

impl Transition {
    /// True only for [`Transition::End`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn next_state_name(&self) -> Option<&str> {
        match self {
            Self::Next(name) => Some(name),
            Self::End => None,
        }
    }
}
