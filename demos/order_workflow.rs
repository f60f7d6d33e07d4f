//! Order Fulfilment Workflow
//!
//! This example assembles an order workflow with the builder API and prints
//! its canonical JSON.
//!
//! Key concepts:
//! - Task states with retriers and catchers
//! - Choice rules built from typed comparisons
//! - Parallel branches with their own scope
//! - Collecting every problem of a broken definition with `diagnose`
//!
//! Run with: cargo run --example order_workflow

use statelang::builder::*;
use statelang::{StateMachine, ValidationError};
use stillwater::validation::Validation;

const LAMBDA: &str = "arn:aws:lambda:us-east-1:123456789012:function";

fn lambda(name: &str) -> String {
    format!("{LAMBDA}:{name}")
}

// Notify the customer and update the warehouse at the same time
fn fan_out() -> ParallelStateBuilder {
    parallel_state()
        .comment("Notify and restock")
        .branch(
            branch()
                .start_at("Notify")
                .state("Notify", task_state().resource(lambda("notify")).transition(end())),
        )
        .branch(
            branch()
                .start_at("Restock")
                .state(
                    "Restock",
                    task_state()
                        .resource(lambda("restock"))
                        .retrier(retrier().error_equals(["Warehouse.Busy"]).max_attempts(5))
                        .transition(end()),
                ),
        )
        .result_path(statelang::PathSelector::Discard)
        .transition(next("Shipped"))
}

fn order_workflow() -> Result<StateMachine, ValidationError> {
    state_machine()
        .comment("Order fulfilment")
        .start_at("ChargeCard")
        .timeout_seconds(3600)
        .version("1.0")
        .state(
            "ChargeCard",
            task_state()
                .resource(lambda("charge"))
                .input_path("$.payment")
                .result_path("$.charge")
                .timeout_seconds(30)
                .heartbeat_seconds(10)
                .retrier(
                    retrier()
                        .error_equals(["Payment.Timeout"])
                        .interval_seconds(2)
                        .max_attempts(3)
                        .backoff_rate(1.5),
                )
                .catcher(catcher().catch_all().result_path("$.error").transition(next("PaymentFailed")))
                .transition(next("CheckTotal")),
        )
        .state(
            "CheckTotal",
            choice_state()
                .choice(
                    choice()
                        .condition(and([gte("$.charge.amount", 1000), eq("$.customer.verified", false)]))
                        .transition(next("ManualReview")),
                )
                .default_state_name("FanOut"),
        )
        .state(
            "ManualReview",
            wait_state().wait_for(seconds(900)).transition(next("FanOut")),
        )
        .state("FanOut", fan_out())
        .state("Shipped", succeed_state())
        .state(
            "PaymentFailed",
            fail_state().error("PaymentFailed").cause("The card could not be charged"),
        )
        .build()
}

fn main() {
    println!("=== Order Fulfilment Workflow ===\n");

    match order_workflow() {
        Ok(machine) => {
            println!("Built {} states starting at {}", machine.states().len(), machine.start_at());
            println!("{machine:#}");
        }
        Err(err) => {
            eprintln!("Invalid workflow: {err}");
            return;
        }
    }

    println!("\n=== Diagnosing a broken definition ===\n");

    let broken = state_machine()
        .start_at("Charge")
        .state("Charge", task_state().input_path("$.").transition(next("Missing")))
        .state("Spin", pass_state().transition(next("Spin")));

    match broken.diagnose() {
        Validation::Success(_) => println!("No problems found"),
        Validation::Failure(errors) => {
            println!("Found {} problem(s):", errors.len());
            for error in errors.iter() {
                println!("  [{:?}] {error}", error.kind());
            }
        }
    }
}
