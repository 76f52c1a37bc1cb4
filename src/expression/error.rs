//! Error types for expression evaluation and selector resolution.

use crate::expression::SymbolId;
use thiserror::Error;

/// Reasons a list of selector specs is rejected before any column work happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorViolation {
    #[error("repeated wildcard, there can be only one '*'")]
    RepeatedWildcard,

    #[error("column exclude '-{0}' used without a wildcard")]
    ExcludeWithoutWildcard(String),

    #[error("column include '{0}' used together with a wildcard")]
    IncludeWithWildcard(String),

    #[error("column '{0}' is both included and excluded")]
    IncludeExcludeOverlap(String),

    #[error("cannot parse selector '{0}', expected a column, -column or *")]
    UnresolvableName(String),

    #[error("column '{0}' included more than once")]
    DuplicateInclude(String),

    #[error("column '{0}' excluded more than once")]
    DuplicateExclude(String),
}

/// Errors that can occur while building, evaluating or applying expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Context has no binding for a referenced symbol
    #[error("unbound symbol {0}")]
    UnboundSymbol(SymbolId),

    /// Attribute lookup failed during Access evaluation
    #[error("'{type_name}' has no attribute '{attribute}'")]
    MissingAttribute {
        type_name: &'static str,
        attribute: String,
    },

    /// Invocation callee evaluated to something that cannot be called
    #[error("'{type_name}' object is not callable")]
    NotCallable { type_name: &'static str },

    #[error("invalid selector: {0}")]
    SelectorValidation(#[from] SelectorViolation),

    /// A selector value could not be mapped to any column of the table
    #[error("selector {0} does not resolve to a column")]
    UnresolvableSelector(String),

    #[error("invalid operand types for {operator}: {operands}")]
    InvalidOperands { operator: String, operands: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("{function}: {message}")]
    InvalidArgument { function: String, message: String },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}

impl ExpressionError {
    pub(crate) fn unary_operands(operator: impl Into<String>, operand: &'static str) -> Self {
        ExpressionError::InvalidOperands {
            operator: operator.into(),
            operands: operand.to_string(),
        }
    }

    pub(crate) fn binary_operands(
        operator: impl Into<String>,
        left: &'static str,
        right: &'static str,
    ) -> Self {
        ExpressionError::InvalidOperands {
            operator: operator.into(),
            operands: format!("{}, {}", left, right),
        }
    }

    pub(crate) fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        ExpressionError::InvalidArgument {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpressionError::UnboundSymbol(SymbolId::Index(0));
        assert_eq!(err.to_string(), "unbound symbol 0");

        let err = ExpressionError::UnboundSymbol(SymbolId::Name("smbl".to_string()));
        assert_eq!(err.to_string(), "unbound symbol 'smbl'");

        let err = ExpressionError::MissingAttribute {
            type_name: "int",
            attribute: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "'int' has no attribute 'foo'");

        let err = ExpressionError::binary_operands("__add__", "int", "str");
        assert_eq!(err.to_string(), "invalid operand types for __add__: int, str");

        let err = ExpressionError::unary_operands("__neg__", "str");
        assert_eq!(err.to_string(), "invalid operand types for __neg__: str");

        let err: ExpressionError = SelectorViolation::ExcludeWithoutWildcard("x".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid selector: column exclude '-x' used without a wildcard"
        );
    }
}
