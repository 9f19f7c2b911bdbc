// ABOUTME: Error types for evaluation and reading failures in the Scheme interpreter

use crate::value::Value;
use thiserror::Error;

pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Type mismatch: calling a function with an argument of the wrong shape.
    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },

    /// Arity mismatch, for both intrinsics and closures.
    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{0}")]
    UndefinedSymbol(String),

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("improper list where a proper list was required")]
    ImproperList,

    #[error("{0}")]
    Io(String),
}

impl EvalError {
    pub fn type_error(function: &str, expected: &str, actual: &Value, _position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityMismatch {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// The taxonomy label used in `<kind>: <message>` error reporting (see
    /// the driver's error presentation).
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::TypeMismatch { .. } | EvalError::ArityMismatch { .. } => "Type",
            EvalError::UndefinedSymbol(_) => "Unbound variable",
            EvalError::NotCallable(_) => "Type",
            EvalError::ImproperList => "Improper-list",
            EvalError::Io(_) => "Host I/O",
        }
    }
}

/// Syntax errors raised by the reader, kept distinct from `EvalError`
/// since they occur before an environment or continuation stack exists.
#[derive(Error, Debug, Clone)]
pub enum ReaderError {
    #[error("{0}")]
    Syntax(String),
    #[error("unexpected end of input")]
    Eof,
}

impl ReaderError {
    pub fn kind(&self) -> &'static str {
        "Syntax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_message_pluralizes() {
        let e = EvalError::arity_error("car", ARITY_ONE, 2);
        assert_eq!(e.to_string(), "car: expected 1 argument, got 2");
    }

    #[test]
    fn arity_message_plural_for_two() {
        let e = EvalError::arity_error("cons", ARITY_TWO, 1);
        assert_eq!(e.to_string(), "cons: expected 2 arguments, got 1");
    }

    #[test]
    fn kinds_match_taxonomy() {
        assert_eq!(
            EvalError::UndefinedSymbol("x".into()).kind(),
            "Unbound variable"
        );
        assert_eq!(EvalError::ImproperList.kind(), "Improper-list");
        assert_eq!(ReaderError::Eof.kind(), "Syntax");
    }
}
