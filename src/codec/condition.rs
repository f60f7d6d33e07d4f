//! Wire form of choice rules and their conditions.
//!
//! A comparison is an object holding `Variable` and exactly one comparator
//! key; a combinator holds exactly one of `And`, `Or` or `Not`. A rule adds
//! `Next` at its top level.

use crate::builder::{ChoiceBuilder, ConditionBuilder, TransitionBuilder};
use crate::core::{Choice, ComparisonKind, Condition, ExpectedValue, NumericValue, Timestamp, ValueType};
use serde_json::{Map, Number, Value};

const VARIABLE: &str = "Variable";
const AND: &str = "And";
const OR: &str = "Or";
const NOT: &str = "Not";
const NEXT: &str = "Next";

pub(crate) fn encode_choice(choice: &Choice) -> Map<String, Value> {
    let mut rule = encode(choice.condition());
    if let Some(next) = choice.next_state_name() {
        rule.insert(NEXT.to_string(), Value::String(next.to_string()));
    }
    rule
}

pub(crate) fn encode(condition: &Condition) -> Map<String, Value> {
    let mut map = Map::new();
    match condition {
        Condition::Comparison(comparison) => {
            map.insert(
                VARIABLE.to_string(),
                Value::String(comparison.variable().to_string()),
            );
            map.insert(
                comparison.kind().key().to_string(),
                encode_value(comparison.expected_value()),
            );
        }
        Condition::And(children) => {
            map.insert(AND.to_string(), encode_children(children));
        }
        Condition::Or(children) => {
            map.insert(OR.to_string(), encode_children(children));
        }
        Condition::Not(child) => {
            map.insert(NOT.to_string(), Value::Object(encode(child)));
        }
    }
    map
}

fn encode_children(children: &[Condition]) -> Value {
    Value::Array(
        children
            .iter()
            .map(|child| Value::Object(encode(child)))
            .collect(),
    )
}

fn encode_value(value: &ExpectedValue) -> Value {
    match value {
        ExpectedValue::String(text) => Value::String(text.clone()),
        ExpectedValue::Numeric(NumericValue::Integer(number)) => Value::from(*number),
        // Built conditions only hold finite floats.
        ExpectedValue::Numeric(NumericValue::Float(number)) => {
            Number::from_f64(*number).map_or(Value::Null, Value::Number)
        }
        ExpectedValue::Timestamp(timestamp) => Value::String(timestamp.to_iso8601()),
        ExpectedValue::Boolean(flag) => Value::Bool(*flag),
    }
}

/// Decode one rule of a `Choices` array.
pub(crate) fn decode_choice(rule: &Map<String, Value>) -> Result<ChoiceBuilder, String> {
    let mut condition = rule.clone();
    let next = match condition.remove(NEXT) {
        Some(Value::String(next)) => next,
        Some(other) => return Err(format!("'{NEXT}' must be a string, found {other}")),
        None => return Err(format!("'{NEXT}' is required")),
    };

    Ok(ChoiceBuilder::new()
        .condition(decode(&condition)?)
        .transition(TransitionBuilder::next(next)))
}

/// Decode a condition object.
pub(crate) fn decode(map: &Map<String, Value>) -> Result<ConditionBuilder, String> {
    let discriminators: Vec<&str> = map
        .keys()
        .map(String::as_str)
        .filter(|key| *key != VARIABLE)
        .collect();

    let key = match discriminators.as_slice() {
        [key] => *key,
        [] => return Err("expected a comparator, 'And', 'Or' or 'Not'".to_string()),
        keys => {
            return Err(format!(
                "expected exactly one comparator or combinator, found {}",
                keys.join(", ")
            ))
        }
    };
    let value = &map[key];

    match key {
        AND | OR | NOT if map.contains_key(VARIABLE) => {
            Err(format!("'{VARIABLE}' cannot be used with '{key}'"))
        }
        AND => decode_children(key, value).map(ConditionBuilder::And),
        OR => decode_children(key, value).map(ConditionBuilder::Or),
        NOT => match value {
            Value::Object(child) => {
                let child = decode(child).map_err(|err| format!("{NOT}: {err}"))?;
                Ok(ConditionBuilder::Not(Box::new(child)))
            }
            other => Err(format!("'{NOT}' must be an object, found {other}")),
        },
        _ => decode_comparison(map, key, value),
    }
}

fn decode_children(key: &str, value: &Value) -> Result<Vec<ConditionBuilder>, String> {
    let Value::Array(children) = value else {
        return Err(format!("'{key}' must be an array, found {value}"));
    };

    children
        .iter()
        .enumerate()
        .map(|(index, child)| match child {
            Value::Object(child) => decode(child).map_err(|err| format!("{key}[{index}]: {err}")),
            other => Err(format!("{key}[{index}] must be an object, found {other}")),
        })
        .collect()
}

fn decode_comparison(
    map: &Map<String, Value>,
    key: &str,
    value: &Value,
) -> Result<ConditionBuilder, String> {
    let kind = ComparisonKind::from_key(key).ok_or_else(|| format!("unknown key '{key}'"))?;

    let variable = match map.get(VARIABLE) {
        Some(Value::String(variable)) => variable.clone(),
        Some(other) => return Err(format!("'{VARIABLE}' must be a string, found {other}")),
        None => return Err(format!("'{VARIABLE}' is required with '{key}'")),
    };

    let expected = decode_value(kind.value_type(), value)
        .ok_or_else(|| format!("'{key}' expects a {} value, found {value}", kind.value_type()))?;

    Ok(ConditionBuilder::comparison(kind.operator(), variable, expected))
}

fn decode_value(value_type: ValueType, value: &Value) -> Option<ExpectedValue> {
    match (value_type, value) {
        (ValueType::String, Value::String(text)) => Some(ExpectedValue::String(text.clone())),
        (ValueType::Numeric, Value::Number(number)) => {
            let numeric = match number.as_i64() {
                Some(integer) => NumericValue::Integer(integer),
                None => NumericValue::Float(number.as_f64()?),
            };
            Some(ExpectedValue::Numeric(numeric))
        }
        (ValueType::Timestamp, Value::String(text)) => {
            Timestamp::parse(text).ok().map(ExpectedValue::Timestamp)
        }
        (ValueType::Boolean, Value::Bool(flag)) => Some(ExpectedValue::Boolean(*flag)),
        _ => None,
    }
}
