//! Canonical JSON form of state machines.
//!
//! Serialization writes keys in a fixed order (`Comment`, `StartAt`,
//! `TimeoutSeconds`, `Version`, `States`, and per state `Type` first) and
//! omits absent optional fields. States keep their registration order.
//!
//! Parsing yields a [`StateMachineBuilder`], so a parsed definition goes
//! through the same checks as one assembled in code:
//!
//! ```rust
//! use statelang::builder::{end, state_machine, task_state};
//! use statelang::StateMachineBuilder;
//!
//! let machine = state_machine()
//!     .start_at("Work")
//!     .state("Work", task_state().resource("arn:work").transition(end()))
//!     .build()
//!     .unwrap();
//!
//! let text = machine.to_text();
//! let parsed = StateMachineBuilder::from_text(&text).unwrap().build().unwrap();
//! assert_eq!(parsed, machine);
//! ```

mod condition;
mod decode;
mod document;
mod encode;

use crate::builder::{StateMachineBuilder, ValidationError};
use crate::core::StateMachine;
use document::MachineDocument;
use serde_json::Value;
use std::fmt;

/// Compact JSON text; the alternate form (`{:#}`) is pretty-printed.
impl fmt::Display for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = encode::machine(self);
        let text = if f.alternate() {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        }
        .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl StateMachine {
    /// Compact canonical JSON text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Canonical JSON text, indented by two spaces.
    pub fn to_text_pretty(&self) -> String {
        format!("{self:#}")
    }
}

/// Parse JSON text into a builder.
///
/// Syntax errors, wrong field types, unknown keys and field-level problems
/// of individual states are reported as
/// [`ValidationError::MalformedDocument`]. Name resolution and reachability
/// are checked when the builder is built.
pub fn from_text(text: &str) -> Result<StateMachineBuilder, ValidationError> {
    let doc: MachineDocument = serde_json::from_str(text).map_err(ValidationError::malformed)?;
    decoded(doc)
}

/// Same as [`from_text`], starting from an already parsed JSON value.
pub fn from_value(value: Value) -> Result<StateMachineBuilder, ValidationError> {
    let doc: MachineDocument = serde_json::from_value(value).map_err(ValidationError::malformed)?;
    decoded(doc)
}

/// Canonical JSON value of a built machine.
pub fn to_value(machine: &StateMachine) -> serde_json::Result<Value> {
    serde_json::to_value(encode::machine(machine))
}

fn decoded(doc: MachineDocument) -> Result<StateMachineBuilder, ValidationError> {
    let states = doc.states.0.len();
    let builder = decode::machine(doc).map_err(|err| {
        tracing::debug!(error = %err, "rejected state machine document");
        err
    })?;
    tracing::trace!(states = states, "decoded state machine document");
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        catcher, choice, end, eq, fail_state, next, pass_state, retrier, seconds, state_machine,
        succeed_state, task_state, wait_state, ValidationErrorKind,
    };
    use serde_json::json;

    fn sample() -> StateMachine {
        state_machine()
            .comment("Sample")
            .start_at("Fetch")
            .timeout_seconds(60)
            .state(
                "Fetch",
                task_state()
                    .resource("arn:fetch")
                    .retrier(retrier().retry_on_all_errors().max_attempts(2))
                    .catcher(catcher().catch_all().transition(next("Failed")))
                    .transition(next("Route")),
            )
            .state(
                "Route",
                crate::builder::choice_state()
                    .choice(choice().condition(eq("$.ok", true)).transition(next("Pause")))
                    .default_state_name("Failed"),
            )
            .state("Pause", wait_state().wait_for(seconds(5)).transition(next("Done")))
            .state("Done", succeed_state())
            .state("Failed", fail_state().error("Boom").cause("it broke"))
            .build()
            .unwrap()
    }

    #[test]
    fn text_round_trips() {
        let machine = sample();
        let parsed = from_text(&machine.to_text()).unwrap().build().unwrap();
        assert_eq!(parsed, machine);

        let parsed = from_text(&machine.to_text_pretty()).unwrap().build().unwrap();
        assert_eq!(parsed, machine);
    }

    #[test]
    fn display_matches_to_text() {
        let machine = sample();
        assert_eq!(format!("{machine}"), machine.to_text());
        assert_eq!(format!("{machine:#}"), machine.to_text_pretty());
        assert!(machine.to_text_pretty().contains("\n  \"StartAt\""));
    }

    #[test]
    fn top_level_keys_are_ordered() {
        let text = sample().to_text();
        let comment = text.find("\"Comment\"").unwrap();
        let start_at = text.find("\"StartAt\"").unwrap();
        let timeout = text.find("\"TimeoutSeconds\"").unwrap();
        let states = text.find("\"States\"").unwrap();
        assert!(comment < start_at && start_at < timeout && timeout < states);
    }

    #[test]
    fn values_round_trip() {
        let machine = sample();
        let value = to_value(&machine).unwrap();
        assert_eq!(value["States"]["Fetch"]["Type"], json!("Task"));
        assert_eq!(from_value(value).unwrap().build().unwrap(), machine);
    }

    #[test]
    fn syntax_errors_are_malformed() {
        for text in ["{", "", "[]", r#"{"StartAt": 1, "States": {}}"#] {
            let err = from_text(text).unwrap_err();
            assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument, "{text}");
        }
    }

    #[test]
    fn unknown_keys_are_malformed() {
        let err = from_value(json!({
            "StartAt": "A",
            "States": {"A": {"Type": "Succeed", "Colour": "red"}}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument);

        let err = from_value(json!({
            "StartAt": "A",
            "States": {"A": {"Type": "Sleep"}}
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument);
    }

    #[test]
    fn field_problems_are_malformed_and_name_the_state() {
        let err = from_value(json!({
            "StartAt": "A",
            "States": {"A": {"Type": "Pass", "InputPath": "nope", "End": true}}
        }))
        .unwrap_err();

        assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument);
        assert!(err.to_string().contains("States.A.InputPath"), "{err}");
    }

    #[test]
    fn graph_problems_surface_on_build() {
        let builder = from_value(json!({
            "StartAt": "A",
            "States": {"A": {"Type": "Pass", "Next": "Missing"}}
        }))
        .unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::UnresolvedReference);
        assert_eq!(err.field(), Some("States.A.Next"));
    }

    #[test]
    fn next_and_end_are_exclusive() {
        for state in [
            json!({"Type": "Pass", "Next": "A", "End": true}),
            json!({"Type": "Pass", "End": false}),
        ] {
            let err = from_value(json!({"StartAt": "A", "States": {"A": state}})).unwrap_err();
            assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument);
        }
    }

    #[test]
    fn discarded_paths_survive() {
        let machine = state_machine()
            .start_at("A")
            .state(
                "A",
                pass_state()
                    .output_path(crate::path::PathSelector::Discard)
                    .transition(end()),
            )
            .build()
            .unwrap();

        let value = to_value(&machine).unwrap();
        assert_eq!(value["States"]["A"]["OutputPath"], Value::Null);
        assert_eq!(from_value(value).unwrap().build().unwrap(), machine);
    }
}
