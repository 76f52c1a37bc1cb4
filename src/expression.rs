//! Deferred expressions over tables.
//!
//! This module provides:
//! - The expression tree, built by operators and builder methods without evaluating anything
//! - Evaluation of a tree against a context of symbol bindings
//! - Attribute and operator semantics for runtime values
//! - Native builtin functions

pub mod builtins;
pub mod error;
pub mod eval;
pub mod expr;
pub mod methods;
pub mod operator;

pub use error::{ExpressionError, ExpressionResult, SelectorViolation};
pub use eval::{evaluate, to_callable, Callable, Context, EvalOptions, Evaluator};
pub use expr::{Expr, Operand, SequenceKind, Symbol, SymbolId, X};
pub use operator::Operator;
