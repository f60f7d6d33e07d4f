//! Retry and catch policies attached to Task and Parallel states.
//!
//! Policies are matched by error name. The reserved name [`CATCH_ALL`]
//! matches any error. Lookup helpers return the first policy in declared
//! order, which is how an executor applies them.

use super::transition::Transition;
use crate::path::PathSelector;

/// Error name matching every error.
pub const CATCH_ALL: &str = "States.ALL";

pub const DEFAULT_INTERVAL_SECONDS: u32 = 1;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_RATE: f64 = 2.0;

/// Non-empty list of error names a policy applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorEquals(pub(crate) Vec<String>);

impl ErrorEquals {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_catch_all(&self) -> bool {
        self.0.iter().any(|name| name == CATCH_ALL)
    }

    pub fn matches(&self, error: &str) -> bool {
        self.0.iter().any(|name| name == CATCH_ALL || name == error)
    }
}

/// Retry policy.
///
/// Optional fields that were never set stay unset on the wire; the getters
/// report the engine defaults in that case.
#[derive(Clone, Debug, PartialEq)]
pub struct Retrier {
    pub(crate) error_equals: ErrorEquals,
    pub(crate) interval_seconds: Option<u32>,
    pub(crate) max_attempts: Option<u32>,
    pub(crate) backoff_rate: Option<f64>,
}

impl Retrier {
    pub fn error_equals(&self) -> &ErrorEquals {
        &self.error_equals
    }

    pub fn interval_seconds(&self) -> u32 {
        self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn backoff_rate(&self) -> f64 {
        self.backoff_rate.unwrap_or(DEFAULT_BACKOFF_RATE)
    }

    pub fn matches(&self, error: &str) -> bool {
        self.error_equals.matches(error)
    }
}

/// Recovery policy: on a matching error, continue at `transition`.
#[derive(Clone, Debug, PartialEq)]
pub struct Catcher {
    pub(crate) error_equals: ErrorEquals,
    pub(crate) result_path: Option<PathSelector>,
    pub(crate) transition: Transition,
}

impl Catcher {
    pub fn error_equals(&self) -> &ErrorEquals {
        &self.error_equals
    }

    pub fn result_path(&self) -> Option<&PathSelector> {
        self.result_path.as_ref()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn matches(&self, error: &str) -> bool {
        self.error_equals.matches(error)
    }
}

/// First retrier that applies to `error`.
pub fn find_retrier<'a>(retriers: &'a [Retrier], error: &str) -> Option<&'a Retrier> {
    retriers.iter().find(|retrier| retrier.matches(error))
}

/// First catcher that applies to `error`.
pub fn find_catcher<'a>(catchers: &'a [Catcher], error: &str) -> Option<&'a Catcher> {
    catchers.iter().find(|catcher| catcher.matches(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> ErrorEquals {
        ErrorEquals(list.iter().map(|name| name.to_string()).collect())
    }

    fn catcher(list: &[&str], next: &str) -> Catcher {
        Catcher {
            error_equals: names(list),
            result_path: None,
            transition: Transition::Next(next.to_string()),
        }
    }

    #[test]
    fn catch_all_matches_every_error() {
        let all = names(&[CATCH_ALL]);
        assert!(all.is_catch_all());
        assert!(all.matches("States.Timeout"));
        assert!(all.matches("Custom"));

        let some = names(&["States.Timeout"]);
        assert!(!some.is_catch_all());
        assert!(some.matches("States.Timeout"));
        assert!(!some.matches("Custom"));
    }

    #[test]
    fn unset_retrier_fields_report_defaults() {
        let retrier = Retrier {
            error_equals: names(&["Custom"]),
            interval_seconds: None,
            max_attempts: None,
            backoff_rate: None,
        };

        assert_eq!(retrier.interval_seconds(), 1);
        assert_eq!(retrier.max_attempts(), 3);
        assert_eq!(retrier.backoff_rate(), 2.0);
    }

    #[test]
    fn lookups_return_the_first_match_in_order() {
        let catchers = vec![
            catcher(&["States.Timeout"], "OnTimeout"),
            catcher(&[CATCH_ALL], "OnAnything"),
            catcher(&["Custom"], "Unreachable"),
        ];

        let found = find_catcher(&catchers, "States.Timeout").unwrap();
        assert_eq!(found.transition().next_state_name(), Some("OnTimeout"));

        let found = find_catcher(&catchers, "Custom").unwrap();
        assert_eq!(found.transition().next_state_name(), Some("OnAnything"));

        assert!(find_catcher(&catchers[..1], "Custom").is_none());
        assert!(find_retrier(&[], "Custom").is_none());
    }
}
