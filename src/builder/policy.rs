//! Builders for retry and catch policies.

use crate::builder::error::ValidationError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Catcher, ErrorEquals, Retrier, CATCH_ALL};
use crate::path::{self, PathGrammar, PathSelector};

fn build_error_equals(names: &[String]) -> Result<ErrorEquals, ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::missing("ErrorEquals"));
    }
    if let Some(index) = names.iter().position(String::is_empty) {
        return Err(ValidationError::invalid(
            format!("ErrorEquals[{index}]"),
            "error name is empty",
        ));
    }
    Ok(ErrorEquals(names.to_vec()))
}

/// Builder for [`Retrier`].
///
/// ```rust
/// use statelang::builder::retrier;
///
/// let retrier = retrier()
///     .error_equals(["States.Timeout"])
///     .max_attempts(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(retrier.max_attempts(), 5);
/// assert_eq!(retrier.interval_seconds(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetrierBuilder {
    error_equals: Vec<String>,
    interval_seconds: Option<u32>,
    max_attempts: Option<u32>,
    backoff_rate: Option<f64>,
}

impl RetrierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append error names this retrier applies to.
    pub fn error_equals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_equals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Apply to every error.
    pub fn retry_on_all_errors(self) -> Self {
        self.error_equals([CATCH_ALL])
    }

    pub fn interval_seconds(mut self, seconds: u32) -> Self {
        self.interval_seconds = Some(seconds);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn backoff_rate(mut self, rate: f64) -> Self {
        self.backoff_rate = Some(rate);
        self
    }

    pub fn build(&self) -> Result<Retrier, ValidationError> {
        let error_equals = build_error_equals(&self.error_equals)?;

        if self.interval_seconds == Some(0) {
            return Err(ValidationError::invalid(
                "IntervalSeconds",
                "must be a positive integer",
            ));
        }
        if let Some(rate) = self.backoff_rate {
            if !rate.is_finite() || rate < 1.0 {
                return Err(ValidationError::invalid(
                    "BackoffRate",
                    format!("{rate} is not a number greater than or equal to 1.0"),
                ));
            }
        }

        Ok(Retrier {
            error_equals,
            interval_seconds: self.interval_seconds,
            max_attempts: self.max_attempts,
            backoff_rate: self.backoff_rate,
        })
    }
}

/// Builder for [`Catcher`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatcherBuilder {
    error_equals: Vec<String>,
    result_path: Option<PathSelector>,
    transition: Option<TransitionBuilder>,
}

impl CatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append error names this catcher applies to.
    pub fn error_equals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_equals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Apply to every error.
    pub fn catch_all(self) -> Self {
        self.error_equals([CATCH_ALL])
    }

    /// Where the error output is placed in the state input. Must be a
    /// reference path, or [`PathSelector::Discard`].
    pub fn result_path(mut self, path: impl Into<PathSelector>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    pub fn transition(mut self, transition: TransitionBuilder) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn build(&self) -> Result<Catcher, ValidationError> {
        let error_equals = build_error_equals(&self.error_equals)?;
        path::check_selector(
            "ResultPath",
            self.result_path.as_ref(),
            PathGrammar::ReferencePath,
        )?;
        let transition = self
            .transition
            .as_ref()
            .ok_or_else(|| ValidationError::missing("Next/End"))?
            .build()?;

        Ok(Catcher {
            error_equals,
            result_path: self.result_path.clone(),
            transition,
        })
    }
}
