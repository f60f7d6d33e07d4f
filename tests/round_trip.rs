//! Canonical JSON of built machines, checked against fixture documents.

use chrono::{FixedOffset, TimeZone};
use serde::Serialize;
use serde_json::{json, Value};
use statelang::builder::*;
use statelang::core::Timestamp;
use statelang::{PathSelector, StateMachine, StateMachineBuilder, ValidationErrorKind};

/// Object keys of `value`, depth first, in document order.
fn key_order(value: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(value, &mut keys);
    keys
}

fn collect_keys(value: &Value, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                keys.push(key.clone());
                collect_keys(child, keys);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
        _ => {}
    }
}

fn assert_fixture(machine: &StateMachine, fixture: &str) {
    let expected: Value = serde_json::from_str(fixture).unwrap();

    let actual: Value = serde_json::from_str(&machine.to_text()).unwrap();
    assert_eq!(actual, expected);
    assert_eq!(key_order(&actual), key_order(&expected));

    let parsed = StateMachineBuilder::from_text(fixture).unwrap().build().unwrap();
    assert_eq!(&parsed, machine);
}

#[test]
fn single_succeed_state() {
    let machine = state_machine()
        .comment("My Simple State Machine")
        .timeout_seconds(30)
        .start_at("InitialState")
        .state(
            "InitialState",
            succeed_state()
                .comment("Initial State")
                .input_path("$.input")
                .output_path("$.output"),
        )
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/single_succeed_state.json"));
}

#[test]
fn task_state_with_retriers_and_catchers() {
    let machine = state_machine()
        .start_at("InitialState")
        .state(
            "InitialState",
            task_state()
                .comment("Initial State")
                .timeout_seconds(10)
                .heartbeat_seconds(1)
                .transition(next("NextState"))
                .resource("resource-arn")
                .input_path("$.input")
                .result_path("$.result")
                .output_path("$.output")
                .retrier(
                    retrier()
                        .error_equals(["Foo", "Bar"])
                        .interval_seconds(20)
                        .max_attempts(3)
                        .backoff_rate(2.0),
                )
                .retrier(
                    retrier()
                        .retry_on_all_errors()
                        .interval_seconds(30)
                        .max_attempts(10)
                        .backoff_rate(2.0),
                )
                .catcher(
                    catcher()
                        .error_equals(["Foo", "Bar"])
                        .transition(next("RecoveryState"))
                        .result_path("$.result-path"),
                )
                .catcher(catcher().catch_all().transition(next("OtherRecoveryState"))),
        )
        .state("NextState", succeed_state())
        .state("RecoveryState", succeed_state())
        .state("OtherRecoveryState", succeed_state())
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/task_state.json"));
}

#[derive(Serialize)]
struct SimplePojo {
    foo: &'static str,
    bar: u32,
}

#[test]
fn pass_states() {
    let machine = state_machine()
        .start_at("InitialState")
        .state(
            "InitialState",
            pass_state()
                .comment("Pass through state")
                .input_path("$.input")
                .output_path("$.output")
                .result_path("$.result")
                .transition(next("ObjectResult"))
                .result_text(r#"{"Foo": "Bar"}"#),
        )
        .state(
            "ObjectResult",
            pass_state()
                .result_of(&SimplePojo {
                    foo: "value",
                    bar: 42,
                })
                .transition(next("Discard")),
        )
        .state(
            "Discard",
            pass_state()
                .parameters(json!({"static": true}))
                .result_path(PathSelector::Discard)
                .transition(end()),
        )
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/pass_state.json"));
}

#[test]
fn wait_states() {
    let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
    let machine = state_machine()
        .start_at("WaitSeconds")
        .state(
            "WaitSeconds",
            wait_state().wait_for(seconds(10)).transition(next("WaitSecondsPath")),
        )
        .state(
            "WaitSecondsPath",
            wait_state()
                .wait_for(seconds_path("$.seconds"))
                .transition(next("WaitTimestamp")),
        )
        .state(
            "WaitTimestamp",
            wait_state()
                .wait_for(timestamp(Timestamp::parse("2016-03-14T01:59:00Z").unwrap()))
                .transition(next("WaitTimestampMillis")),
        )
        .state(
            "WaitTimestampMillis",
            wait_state()
                .wait_for(timestamp(
                    pacific
                        .with_ymd_and_hms(2016, 3, 13, 17, 59, 0)
                        .unwrap()
                        + chrono::Duration::milliseconds(123),
                ))
                .transition(next("WaitTimestampOffset")),
        )
        .state(
            "WaitTimestampOffset",
            wait_state()
                .wait_for(timestamp(
                    pacific.with_ymd_and_hms(2016, 3, 13, 17, 59, 0).unwrap(),
                ))
                .transition(next("WaitTimestampPath")),
        )
        .state(
            "WaitTimestampPath",
            wait_state()
                .wait_for(timestamp_path("$.timestamp"))
                .transition(end()),
        )
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/wait_states.json"));
}

#[test]
fn wait_timestamps_are_normalized_to_utc() {
    let cases = [
        ("2016-03-14T01:59:00.123-08:00", "2016-03-14T09:59:00.123Z"),
        ("2016-03-14T01:59:00-08:00", "2016-03-14T09:59:00.000Z"),
        ("2016-03-14T01:59:00.000Z", "2016-03-14T01:59:00.000Z"),
        ("2016-03-14T01:59:00Z", "2016-03-14T01:59:00Z"),
        ("2016-03-14T01:59:00", "2016-03-14T01:59:00Z"),
    ];

    for (written, canonical) in cases {
        let text = json!({
            "StartAt": "Wait",
            "States": {"Wait": {"Type": "Wait", "Timestamp": written, "End": true}}
        })
        .to_string();

        let machine = StateMachineBuilder::from_text(&text).unwrap().build().unwrap();
        let value = statelang::codec::to_value(&machine).unwrap();
        assert_eq!(value["States"]["Wait"]["Timestamp"], json!(canonical), "{written}");

        let again = StateMachineBuilder::from_text(&machine.to_text()).unwrap().build().unwrap();
        assert_eq!(again.to_text(), machine.to_text());
    }
}

#[test]
fn out_of_range_timestamps_are_malformed() {
    let text = r#"{
        "StartAt": "Wait",
        "States": {
            "Wait": {"Type": "Wait", "Timestamp": "0000-01-01T00:00:00+01:00", "End": true}
        }
    }"#;

    let err = StateMachineBuilder::from_text(text).unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::MalformedDocument);
}

#[test]
fn fail_state_with_error_and_cause() {
    let machine = state_machine()
        .start_at("InitialState")
        .state(
            "InitialState",
            fail_state()
                .comment("My fail state")
                .cause("InternalError")
                .error("Workflow.InternalError"),
        )
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/fail_state.json"));
}

#[test]
fn choice_state_with_nested_conditions() {
    let machine = state_machine()
        .start_at("ChoiceState")
        .state(
            "ChoiceState",
            choice_state()
                .choice(
                    choice()
                        .condition(eq("$.var", "value"))
                        .transition(next("NextState")),
                )
                .choice(
                    choice()
                        .condition(and([gte("$.count", 10), not(lt("$.ratio", 0.5))]))
                        .transition(next("NextState")),
                )
                .choice(
                    choice()
                        .condition(or([
                            eq("$.flag", true),
                            lte(
                                "$.when",
                                Timestamp::parse("2016-03-14T01:59:00Z").unwrap(),
                            ),
                        ]))
                        .transition(next("DefaultState")),
                )
                .default_state_name("DefaultState"),
        )
        .state("NextState", succeed_state())
        .state("DefaultState", succeed_state())
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/choice_state.json"));
}

#[test]
fn parallel_state_with_branches() {
    let machine = state_machine()
        .start_at("ParallelState")
        .state(
            "ParallelState",
            parallel_state()
                .comment("My parallel state")
                .branch(
                    branch()
                        .start_at("BranchOneStart")
                        .state("BranchOneStart", succeed_state()),
                )
                .branch(
                    branch()
                        .comment("Second branch")
                        .start_at("BranchTwoStart")
                        .state("BranchTwoStart", pass_state().transition(next("BranchTwoEnd")))
                        .state("BranchTwoEnd", succeed_state()),
                )
                .result_path("$.branches")
                .retrier(retrier().retry_on_all_errors().max_attempts(2))
                .catcher(catcher().catch_all().transition(next("Recovery")))
                .transition(next("Done")),
        )
        .state("Recovery", pass_state().transition(end()))
        .state("Done", succeed_state())
        .build()
        .unwrap();

    assert_fixture(&machine, include_str!("fixtures/parallel_state.json"));
}

#[test]
fn fixtures_keep_their_validation() {
    let text = include_str!("fixtures/task_state.json").replace("\"NextState\": {", "\"Renamed\": {");

    let err = StateMachineBuilder::from_text(&text)
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ValidationErrorKind::UnresolvedReference);
    assert_eq!(err.field(), Some("States.InitialState.Next"));
}
