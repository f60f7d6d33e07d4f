//! Builders for Choice conditions.
//!
//! Comparisons are written by operator; the comparator (`StringEquals`,
//! `NumericLessThan`, ...) is chosen from the type of the expected value
//! when the condition is built.
//!
//! ```rust
//! use statelang::builder::{and, eq, gt, not};
//! use statelang::core::ComparisonKind;
//!
//! let condition = and([
//!     eq("$.status", "ready"),
//!     not(gt("$.attempts", 3)),
//! ])
//! .build()
//! .unwrap();
//!
//! let first = condition.children()[0].as_comparison().unwrap();
//! assert_eq!(first.kind(), ComparisonKind::StringEquals);
//! ```

use crate::builder::error::ValidationError;
use crate::core::{
    Comparison, ComparisonKind, ComparisonOperator, Condition, ExpectedValue, NumericValue,
};
use crate::path::{self, PathGrammar};

#[derive(Clone, Debug, PartialEq)]
pub enum ConditionBuilder {
    Comparison {
        operator: ComparisonOperator,
        variable: String,
        value: ExpectedValue,
    },
    And(Vec<ConditionBuilder>),
    Or(Vec<ConditionBuilder>),
    Not(Box<ConditionBuilder>),
}

impl ConditionBuilder {
    pub fn comparison(
        operator: ComparisonOperator,
        variable: impl Into<String>,
        value: impl Into<ExpectedValue>,
    ) -> Self {
        Self::Comparison {
            operator,
            variable: variable.into(),
            value: value.into(),
        }
    }

    /// Build the condition tree.
    ///
    /// Field locations of nested errors name the combinator path, e.g.
    /// `And[1].Not.Variable`.
    pub fn build(&self) -> Result<Condition, ValidationError> {
        match self {
            Self::Comparison {
                operator,
                variable,
                value,
            } => build_comparison(*operator, variable, value),
            Self::And(children) => build_children("And", children).map(Condition::And),
            Self::Or(children) => build_children("Or", children).map(Condition::Or),
            Self::Not(child) => child
                .build()
                .map(|condition| Condition::Not(Box::new(condition)))
                .map_err(|err| err.within("Not")),
        }
    }
}

fn build_comparison(
    operator: ComparisonOperator,
    variable: &str,
    value: &ExpectedValue,
) -> Result<Condition, ValidationError> {
    path::check("Variable", variable, PathGrammar::ReferencePath)?;

    let kind = ComparisonKind::resolve(value.value_type(), operator).ok_or_else(|| {
        ValidationError::TypeMismatch {
            field: "Condition".to_string(),
            variable: variable.to_string(),
            operator,
            value_type: value.value_type(),
        }
    })?;

    match value {
        ExpectedValue::Numeric(number @ NumericValue::Float(_)) if !number.is_finite() => {
            return Err(ValidationError::invalid(
                kind.key(),
                format!("{number} is not a finite number"),
            ));
        }
        ExpectedValue::Timestamp(timestamp) => timestamp
            .check_range()
            .map_err(|err| ValidationError::invalid(kind.key(), err.to_string()))?,
        _ => {}
    }

    Ok(Condition::Comparison(Comparison {
        kind,
        variable: variable.to_string(),
        expected: value.clone(),
    }))
}

fn build_children(
    combinator: &str,
    children: &[ConditionBuilder],
) -> Result<Vec<Condition>, ValidationError> {
    if children.is_empty() {
        return Err(ValidationError::missing(combinator));
    }
    children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            child
                .build()
                .map_err(|err| err.within(&format!("{combinator}[{index}]")))
        })
        .collect()
}

/// `variable` equals `value`.
pub fn eq(variable: impl Into<String>, value: impl Into<ExpectedValue>) -> ConditionBuilder {
    ConditionBuilder::comparison(ComparisonOperator::Equals, variable, value)
}

/// `variable` is greater than `value`.
pub fn gt(variable: impl Into<String>, value: impl Into<ExpectedValue>) -> ConditionBuilder {
    ConditionBuilder::comparison(ComparisonOperator::GreaterThan, variable, value)
}

/// `variable` is greater than or equal to `value`.
pub fn gte(variable: impl Into<String>, value: impl Into<ExpectedValue>) -> ConditionBuilder {
    ConditionBuilder::comparison(ComparisonOperator::GreaterThanEquals, variable, value)
}

/// `variable` is less than `value`.
pub fn lt(variable: impl Into<String>, value: impl Into<ExpectedValue>) -> ConditionBuilder {
    ConditionBuilder::comparison(ComparisonOperator::LessThan, variable, value)
}

/// `variable` is less than or equal to `value`.
pub fn lte(variable: impl Into<String>, value: impl Into<ExpectedValue>) -> ConditionBuilder {
    ConditionBuilder::comparison(ComparisonOperator::LessThanEquals, variable, value)
}

/// All children hold.
pub fn and(children: impl IntoIterator<Item = ConditionBuilder>) -> ConditionBuilder {
    ConditionBuilder::And(children.into_iter().collect())
}

/// At least one child holds.
pub fn or(children: impl IntoIterator<Item = ConditionBuilder>) -> ConditionBuilder {
    ConditionBuilder::Or(children.into_iter().collect())
}

/// The child does not hold.
pub fn not(child: ConditionBuilder) -> ConditionBuilder {
    ConditionBuilder::Not(Box::new(child))
}
