//! Syntactic validation of JSONPath-like strings.
//!
//! Two grammars are accepted:
//!
//! - [`PathGrammar::Path`]: the general query language used to select the
//!   input and output of a state. Wildcards, recursive descent, unions,
//!   slices and filter expressions are all allowed.
//! - [`PathGrammar::ReferencePath`]: the restricted subset made only of
//!   member and index steps. It always identifies a single node, so it is
//!   the grammar for `ResultPath`, condition variables and wait paths.
//!
//! Validation never evaluates a path against a document.
//!
//! # Example
//!
//! ```rust
//! use statelang::path::{validate, PathGrammar};
//!
//! assert!(validate("$.store.book[?(@.price < 10)]", PathGrammar::Path).is_ok());
//! assert!(validate("$.foo[*]", PathGrammar::ReferencePath).is_err());
//! assert!(validate("$.foo.bar[0]", PathGrammar::ReferencePath).is_ok());
//! ```

mod scanner;

use crate::builder::ValidationError;
use std::fmt;
use thiserror::Error;

/// Grammar a path string is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathGrammar {
    /// Any path query rooted at `$` or `$$`.
    Path,
    /// Member and index steps only.
    ReferencePath,
}

impl fmt::Display for PathGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => f.write_str("path"),
            Self::ReferencePath => f.write_str("reference path"),
        }
    }
}

/// A path string that does not conform to its grammar.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason} (at offset {offset})")]
pub struct PathSyntaxError {
    pub reason: String,
    pub offset: usize,
}

/// Check `path` against `grammar`.
pub fn validate(path: &str, grammar: PathGrammar) -> Result<(), PathSyntaxError> {
    scanner::Scanner::new(path, grammar).run()
}

/// Convenience predicate over [`validate`].
pub fn is_valid(path: &str, grammar: PathGrammar) -> bool {
    validate(path, grammar).is_ok()
}

/// Value of an optional path field.
///
/// The wire format distinguishes an absent field (the engine applies `$`)
/// from an explicit `null`, which discards the selected data. Absence is
/// modelled with `Option<PathSelector>`, `null` with [`PathSelector::Discard`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSelector {
    Path(String),
    Discard,
}

impl PathSelector {
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Discard => None,
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Self::Discard)
    }
}

impl From<&str> for PathSelector {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for PathSelector {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl fmt::Display for PathSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Discard => f.write_str("null"),
        }
    }
}

pub(crate) fn check(field: &str, path: &str, grammar: PathGrammar) -> Result<(), ValidationError> {
    validate(path, grammar).map_err(|err| ValidationError::InvalidPath {
        field: field.to_string(),
        value: path.to_string(),
        grammar,
        reason: err.to_string(),
    })
}

pub(crate) fn check_selector(
    field: &str,
    selector: Option<&PathSelector>,
    grammar: PathGrammar,
) -> Result<(), ValidationError> {
    match selector {
        Some(PathSelector::Path(path)) => check(field, path, grammar),
        Some(PathSelector::Discard) | None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ValidationErrorKind;

    #[test]
    fn general_paths_accept_query_operators() {
        let valid = [
            "$",
            "$$",
            "$$.Execution.Id",
            "$.foo",
            "$.foo.bar",
            "$.result-path",
            "$['foo']",
            "$[\"foo bar\"]",
            "$.foo[0]",
            "$.foo[-1]",
            "$.foo[*]",
            "$.*",
            "$..author",
            "$..*",
            "$..[0]",
            "$.foo[0,1,2]",
            "$.foo['a','b']",
            "$.foo[1:3]",
            "$.foo[::2]",
            "$.foo[-2:]",
            "$.store.book[?(@.price < 10)]",
            "$.store.book[?(@.author == 'J. R. R. Tolkien')]",
            "$.foo[(@.length-1)]",
        ];
        for path in valid {
            assert!(
                validate(path, PathGrammar::Path).is_ok(),
                "expected '{path}' to be a valid path"
            );
        }
    }

    #[test]
    fn general_paths_reject_malformed_input() {
        let invalid = [
            "", "foo", "[", "$.", "$..", "$.foo[*}", "$.foo[", "$.foo[]", "$.foo[?(@.a]",
            "$.foo[?()]", "$['foo", "$ .foo", "$.foo]", "$.foo[1:2:3:4]", "$.foo[-]",
        ];
        for path in invalid {
            assert!(
                validate(path, PathGrammar::Path).is_err(),
                "expected '{path}' to be rejected"
            );
        }
    }

    #[test]
    fn reference_paths_only_allow_member_and_index_steps() {
        for path in ["$", "$.foo", "$.foo.bar", "$['foo'][0]", "$.a[12].b", "$$.Map.Item"] {
            assert!(validate(path, PathGrammar::ReferencePath).is_ok(), "{path}");
        }

        for path in [
            "$.foo[*]",
            "$.*",
            "$..foo",
            "$.foo[0,1]",
            "$.foo['a','b']",
            "$.foo[1:2]",
            "$.foo[-1]",
            "$.foo[?(@.a)]",
            "$.foo[(@.length-1)]",
        ] {
            assert!(validate(path, PathGrammar::ReferencePath).is_err(), "{path}");
            assert!(validate(path, PathGrammar::Path).is_ok(), "{path}");
        }
    }

    #[test]
    fn spaces_inside_brackets_are_ignored() {
        for path in [
            "$.foo[ 0]",
            "$.foo[0 ]",
            "$.foo[0, 1]",
            "$[ 'a' ]",
            "$[ 'a' , 'b' ]",
            "$.foo[ * ]",
        ] {
            assert!(validate(path, PathGrammar::Path).is_ok(), "{path}");
        }
        assert!(validate("$.foo[ 3 ]", PathGrammar::ReferencePath).is_ok());
        assert!(validate("$[ 'a' ]", PathGrammar::ReferencePath).is_ok());

        let err = validate("$.foo[ ]", PathGrammar::Path).unwrap_err();
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn syntax_errors_report_offsets() {
        let err = validate("$.foo[*}", PathGrammar::Path).unwrap_err();
        assert_eq!(err.offset, 7);

        let err = validate("foo", PathGrammar::Path).unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn check_wraps_syntax_errors_with_the_field() {
        let err = check("ResultPath", "$.foo[*]", PathGrammar::ReferencePath).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidPath);
        match err {
            ValidationError::InvalidPath {
                field,
                value,
                grammar,
                ..
            } => {
                assert_eq!(field, "ResultPath");
                assert_eq!(value, "$.foo[*]");
                assert_eq!(grammar, PathGrammar::ReferencePath);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn discard_selector_is_always_valid() {
        assert!(check_selector(
            "OutputPath",
            Some(&PathSelector::Discard),
            PathGrammar::ReferencePath
        )
        .is_ok());
        assert!(check_selector("OutputPath", None, PathGrammar::Path).is_ok());
        assert_eq!(PathSelector::Discard.to_string(), "null");
        assert_eq!(PathSelector::from("$.a").as_path(), Some("$.a"));
    }
}
