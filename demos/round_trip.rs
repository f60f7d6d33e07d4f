//! JSON Round Trip
//!
//! This example parses a workflow document, inspects it, and writes it back
//! in canonical form.
//!
//! Key concepts:
//! - Parsing yields a builder that can still be edited
//! - Name resolution runs when the parsed builder is built
//! - Canonical output normalizes timestamps and key order
//!
//! Run with: cargo run --example round_trip

use statelang::builder::{next, succeed_state};
use statelang::{State, StateMachineBuilder};

const DOCUMENT: &str = r#"{
  "States": {
    "Wait": {
      "Type": "Wait",
      "Timestamp": "2016-03-14T01:59:00.123-08:00",
      "Next": "Route"
    },
    "Route": {
      "Type": "Choice",
      "Choices": [
        {"Variable": "$.count", "NumericGreaterThan": 3, "Next": "Done"}
      ],
      "Default": "Retry"
    },
    "Done": {"Type": "Succeed"}
  },
  "StartAt": "Wait"
}"#;

fn main() {
    println!("=== Parsing ===\n");

    let builder = match StateMachineBuilder::from_text(DOCUMENT) {
        Ok(builder) => builder,
        Err(err) => {
            eprintln!("Could not parse: {err}");
            return;
        }
    };
    println!("States: {:?}", builder.state_names().collect::<Vec<_>>());

    // "Retry" is referenced but never defined
    if let Err(err) = builder.build() {
        println!("Build failed as expected: {err}");
    }

    println!("\n=== Fixing and re-serializing ===\n");

    let fixed = builder
        .state("Retry", statelang::builder::pass_state().transition(next("Wait")))
        .state("Done", succeed_state().comment("All done"));

    match fixed.build() {
        Ok(machine) => {
            for (name, state) in machine.states().iter() {
                let exit = match state {
                    State::Choice(choice) => format!("{} rule(s)", choice.choices().len()),
                    other => format!("terminal: {}", other.is_terminal_state()),
                };
                println!("  {name:<6} {:<8} {exit}", state.state_type());
            }
            println!("\n{machine:#}");
        }
        Err(err) => eprintln!("Still invalid: {err}"),
    }
}
