//! Validation errors raised while building or decoding definitions.

use crate::core::{ComparisonOperator, ValueType};
use crate::path::PathGrammar;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    InvalidPath,
    MissingRequiredField,
    TypeMismatch,
    UnresolvedReference,
    InvalidValue,
    NoTerminalPath,
    MalformedDocument,
}

/// Errors that can occur when building a definition or decoding its JSON.
///
/// `field` is the dotted location of the offending field, relative to the
/// value being built (e.g. `States.Fetch.Catch[0].ResultPath` when reported
/// by a state machine build).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid {grammar}: {reason}")]
    InvalidPath {
        field: String,
        value: String,
        grammar: PathGrammar,
        reason: String,
    },

    #[error("{field} is required")]
    MissingRequiredField { field: String },

    #[error("{field}: {value_type} value for '{variable}' cannot be used with {operator}")]
    TypeMismatch {
        field: String,
        variable: String,
        operator: ComparisonOperator,
        value_type: ValueType,
    },

    #[error("{field}: state '{target}' does not exist")]
    UnresolvedReference { field: String, target: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{field}: no path from this state reaches a terminal state")]
    NoTerminalPath { field: String },

    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidPath { .. } => ValidationErrorKind::InvalidPath,
            Self::MissingRequiredField { .. } => ValidationErrorKind::MissingRequiredField,
            Self::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            Self::UnresolvedReference { .. } => ValidationErrorKind::UnresolvedReference,
            Self::InvalidValue { .. } => ValidationErrorKind::InvalidValue,
            Self::NoTerminalPath { .. } => ValidationErrorKind::NoTerminalPath,
            Self::MalformedDocument { .. } => ValidationErrorKind::MalformedDocument,
        }
    }

    /// Location of the offending field, when the error has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { field, .. }
            | Self::MissingRequiredField { field }
            | Self::TypeMismatch { field, .. }
            | Self::UnresolvedReference { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::NoTerminalPath { field } => Some(field),
            Self::MalformedDocument { .. } => None,
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl fmt::Display) -> Self {
        Self::MalformedDocument {
            reason: reason.to_string(),
        }
    }

    /// Prefix the field location with the scope the error was raised in.
    pub(crate) fn within(mut self, scope: &str) -> Self {
        match &mut self {
            Self::InvalidPath { field, .. }
            | Self::MissingRequiredField { field }
            | Self::TypeMismatch { field, .. }
            | Self::UnresolvedReference { field, .. }
            | Self::InvalidValue { field, .. }
            | Self::NoTerminalPath { field } => *field = format!("{scope}.{field}"),
            Self::MalformedDocument { .. } => {}
        }
        self
    }
}
