//! Boolean condition trees evaluated by Choice states.
//!
//! A condition is either a typed comparison between the value found at a
//! reference path and an expected value, or a combinator (`And`, `Or`,
//! `Not`) owning its children. Trees are built bottom-up and own their
//! children exclusively.

use super::value::{ExpectedValue, ValueType};
use std::fmt;

/// Relational operator of a comparison, independent of the value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equals => "Equals",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanEquals => "GreaterThanEquals",
            Self::LessThan => "LessThan",
            Self::LessThanEquals => "LessThanEquals",
        };
        f.write_str(name)
    }
}

/// The sixteen comparators of the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonKind {
    StringEquals,
    StringGreaterThan,
    StringGreaterThanEquals,
    StringLessThan,
    StringLessThanEquals,
    NumericEquals,
    NumericGreaterThan,
    NumericGreaterThanEquals,
    NumericLessThan,
    NumericLessThanEquals,
    TimestampEquals,
    TimestampGreaterThan,
    TimestampGreaterThanEquals,
    TimestampLessThan,
    TimestampLessThanEquals,
    BooleanEquals,
}

impl ComparisonKind {
    /// Every comparator, in wire-key registry order.
    pub const ALL: [ComparisonKind; 16] = [
        Self::StringEquals,
        Self::StringGreaterThan,
        Self::StringGreaterThanEquals,
        Self::StringLessThan,
        Self::StringLessThanEquals,
        Self::NumericEquals,
        Self::NumericGreaterThan,
        Self::NumericGreaterThanEquals,
        Self::NumericLessThan,
        Self::NumericLessThanEquals,
        Self::TimestampEquals,
        Self::TimestampGreaterThan,
        Self::TimestampGreaterThanEquals,
        Self::TimestampLessThan,
        Self::TimestampLessThanEquals,
        Self::BooleanEquals,
    ];

    /// The comparator for a value type and operator, if the grammar has one.
    /// Booleans only support equality.
    pub fn resolve(value_type: ValueType, operator: ComparisonOperator) -> Option<Self> {
        use ComparisonOperator::*;

        let kind = match (value_type, operator) {
            (ValueType::String, Equals) => Self::StringEquals,
            (ValueType::String, GreaterThan) => Self::StringGreaterThan,
            (ValueType::String, GreaterThanEquals) => Self::StringGreaterThanEquals,
            (ValueType::String, LessThan) => Self::StringLessThan,
            (ValueType::String, LessThanEquals) => Self::StringLessThanEquals,
            (ValueType::Numeric, Equals) => Self::NumericEquals,
            (ValueType::Numeric, GreaterThan) => Self::NumericGreaterThan,
            (ValueType::Numeric, GreaterThanEquals) => Self::NumericGreaterThanEquals,
            (ValueType::Numeric, LessThan) => Self::NumericLessThan,
            (ValueType::Numeric, LessThanEquals) => Self::NumericLessThanEquals,
            (ValueType::Timestamp, Equals) => Self::TimestampEquals,
            (ValueType::Timestamp, GreaterThan) => Self::TimestampGreaterThan,
            (ValueType::Timestamp, GreaterThanEquals) => Self::TimestampGreaterThanEquals,
            (ValueType::Timestamp, LessThan) => Self::TimestampLessThan,
            (ValueType::Timestamp, LessThanEquals) => Self::TimestampLessThanEquals,
            (ValueType::Boolean, Equals) => Self::BooleanEquals,
            (ValueType::Boolean, _) => return None,
        };
        Some(kind)
    }

    pub fn value_type(self) -> ValueType {
        match self {
            Self::StringEquals
            | Self::StringGreaterThan
            | Self::StringGreaterThanEquals
            | Self::StringLessThan
            | Self::StringLessThanEquals => ValueType::String,
            Self::NumericEquals
            | Self::NumericGreaterThan
            | Self::NumericGreaterThanEquals
            | Self::NumericLessThan
            | Self::NumericLessThanEquals => ValueType::Numeric,
            Self::TimestampEquals
            | Self::TimestampGreaterThan
            | Self::TimestampGreaterThanEquals
            | Self::TimestampLessThan
            | Self::TimestampLessThanEquals => ValueType::Timestamp,
            Self::BooleanEquals => ValueType::Boolean,
        }
    }

    pub fn operator(self) -> ComparisonOperator {
        match self {
            Self::StringEquals
            | Self::NumericEquals
            | Self::TimestampEquals
            | Self::BooleanEquals => ComparisonOperator::Equals,
            Self::StringGreaterThan | Self::NumericGreaterThan | Self::TimestampGreaterThan => {
                ComparisonOperator::GreaterThan
            }
            Self::StringGreaterThanEquals
            | Self::NumericGreaterThanEquals
            | Self::TimestampGreaterThanEquals => ComparisonOperator::GreaterThanEquals,
            Self::StringLessThan | Self::NumericLessThan | Self::TimestampLessThan => {
                ComparisonOperator::LessThan
            }
            Self::StringLessThanEquals
            | Self::NumericLessThanEquals
            | Self::TimestampLessThanEquals => ComparisonOperator::LessThanEquals,
        }
    }

    /// Wire key, e.g. `NumericGreaterThanEquals`.
    pub fn key(self) -> &'static str {
        match self {
            Self::StringEquals => "StringEquals",
            Self::StringGreaterThan => "StringGreaterThan",
            Self::StringGreaterThanEquals => "StringGreaterThanEquals",
            Self::StringLessThan => "StringLessThan",
            Self::StringLessThanEquals => "StringLessThanEquals",
            Self::NumericEquals => "NumericEquals",
            Self::NumericGreaterThan => "NumericGreaterThan",
            Self::NumericGreaterThanEquals => "NumericGreaterThanEquals",
            Self::NumericLessThan => "NumericLessThan",
            Self::NumericLessThanEquals => "NumericLessThanEquals",
            Self::TimestampEquals => "TimestampEquals",
            Self::TimestampGreaterThan => "TimestampGreaterThan",
            Self::TimestampGreaterThanEquals => "TimestampGreaterThanEquals",
            Self::TimestampLessThan => "TimestampLessThan",
            Self::TimestampLessThanEquals => "TimestampLessThanEquals",
            Self::BooleanEquals => "BooleanEquals",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Leaf condition: `variable <kind> expected`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub(crate) kind: ComparisonKind,
    pub(crate) variable: String,
    pub(crate) expected: ExpectedValue,
}

impl Comparison {
    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    /// Reference path selecting the compared value from the state input.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn expected_value(&self) -> &ExpectedValue {
        &self.expected
    }

    /// Canonical text of the expected value (`"42"`, `"9000.1"`,
    /// `"2016-03-14T09:59:00.123Z"`, `"true"`).
    pub fn expected_value_text(&self) -> String {
        self.expected.to_text()
    }
}

/// A node of a condition tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Comparison(Comparison),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Self::Comparison(comparison) => Some(comparison),
            _ => None,
        }
    }

    /// Direct children of a combinator; empty for a comparison.
    pub fn children(&self) -> &[Condition] {
        match self {
            Self::Comparison(_) => &[],
            Self::And(children) | Self::Or(children) => children,
            Self::Not(child) => std::slice::from_ref(child.as_ref()),
        }
    }

    /// Every variable referenced by the tree, depth-first, left to right.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables = Vec::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Comparison(comparison) => out.push(&comparison.variable),
            _ => {
                for child in self.children() {
                    child.collect_variables(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Timestamp;

    fn comparison(kind: ComparisonKind, variable: &str, expected: ExpectedValue) -> Condition {
        Condition::Comparison(Comparison {
            kind,
            variable: variable.to_string(),
            expected,
        })
    }

    #[test]
    fn registry_round_trips_every_key() {
        for kind in ComparisonKind::ALL {
            assert_eq!(ComparisonKind::from_key(kind.key()), Some(kind));
            assert_eq!(
                ComparisonKind::resolve(kind.value_type(), kind.operator()),
                Some(kind)
            );
        }
        assert_eq!(ComparisonKind::from_key("Variable"), None);
        assert_eq!(ComparisonKind::from_key("numericequals"), None);
    }

    #[test]
    fn booleans_only_support_equality() {
        assert_eq!(
            ComparisonKind::resolve(ValueType::Boolean, ComparisonOperator::Equals),
            Some(ComparisonKind::BooleanEquals)
        );
        assert_eq!(
            ComparisonKind::resolve(ValueType::Boolean, ComparisonOperator::GreaterThan),
            None
        );
        assert_eq!(
            ComparisonKind::resolve(ValueType::Boolean, ComparisonOperator::LessThanEquals),
            None
        );
    }

    #[test]
    fn variables_are_collected_depth_first() {
        let timestamp = Timestamp::parse("2016-03-14T01:59:00Z").unwrap();
        let tree = Condition::And(vec![
            comparison(ComparisonKind::StringEquals, "$.a", "x".into()),
            Condition::Or(vec![
                comparison(ComparisonKind::NumericLessThan, "$.b", 1.into()),
                Condition::Not(Box::new(comparison(
                    ComparisonKind::TimestampEquals,
                    "$.c",
                    timestamp.into(),
                ))),
            ]),
        ]);

        assert_eq!(tree.variables(), vec!["$.a", "$.b", "$.c"]);
        assert_eq!(tree.children().len(), 2);
        assert!(tree.as_comparison().is_none());
    }

    #[test]
    fn comparison_exposes_canonical_text() {
        let leaf = comparison(ComparisonKind::NumericEquals, "$.v", 9000.1.into());
        let comparison = leaf.as_comparison().unwrap();

        assert_eq!(comparison.kind().key(), "NumericEquals");
        assert_eq!(comparison.variable(), "$.v");
        assert_eq!(comparison.expected_value_text(), "9000.1");
        assert!(leaf.children().is_empty());
    }
}
