//! Expression evaluation implementation.

use crate::access::{Frame, Function, Kwargs, Value};
use crate::expression::methods::{get_attribute, invoke};
use crate::expression::{Expr, ExpressionError, ExpressionResult, Operand, SequenceKind, SymbolId};
use log::debug;
use std::collections::HashMap;

/// Evaluation settings, fixed when a stage is defined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Log every node before and after it is evaluated
    pub log: bool,
}

/// Symbol bindings for one evaluation
#[derive(Debug, Clone, Default)]
pub struct Context {
    bindings: HashMap<SymbolId, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with `frame` bound to symbol `0`. Column values are shared,
    /// not copied.
    pub fn for_table(frame: &Frame) -> Self {
        Self::new().bind(0usize, Value::Frame(frame.clone()))
    }

    pub fn bind(mut self, id: impl Into<SymbolId>, value: Value) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<SymbolId>, value: Value) {
        self.bindings.insert(id.into(), value);
    }

    pub fn get(&self, id: &SymbolId) -> Option<&Value> {
        self.bindings.get(id)
    }
}

/// Evaluator for expression trees
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new(options: EvalOptions) -> Self {
        Self { options }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expr, context: &Context) -> ExpressionResult<Value> {
        if self.options.log {
            debug!("evaluating {}", expr);
        }
        let result = match expr {
            Expr::Reference(symbol) => context
                .get(&symbol.id)
                .cloned()
                .ok_or_else(|| ExpressionError::UnboundSymbol(symbol.id.clone())),

            Expr::Access { object, name } => {
                let object = self.evaluate_operand(object, context)?;
                get_attribute(&object, name)
            }

            Expr::Invocation {
                callee,
                args,
                kwargs,
            } => {
                let callee = self.evaluate_operand(callee, context)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate_operand(arg, context))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                let kwargs = kwargs
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.evaluate_operand(value, context)?)))
                    .collect::<ExpressionResult<Kwargs>>()?;
                invoke(&callee, &args, &kwargs)
            }
        };
        if self.options.log {
            if let Ok(value) = &result {
                debug!("{} -> {}", expr, value.repr());
            }
        }
        result
    }

    /// Evaluate an operand, keeping list and tuple structure
    pub fn evaluate_operand(&self, operand: &Operand, context: &Context) -> ExpressionResult<Value> {
        match operand {
            Operand::Scalar(value) => Ok(value.clone()),
            Operand::Expr(expr) => self.evaluate(expr, context),
            Operand::Sequence { kind, items } => {
                let items = items
                    .iter()
                    .map(|item| self.evaluate_operand(item, context))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                Ok(sequence_value(*kind, items))
            }
        }
    }
}

fn sequence_value(kind: SequenceKind, items: Vec<Value>) -> Value {
    match kind {
        SequenceKind::List => Value::List(items),
        SequenceKind::Tuple => Value::Tuple(items),
    }
}

/// Evaluate an expression with default options
pub fn evaluate(expr: &Expr, context: &Context) -> ExpressionResult<Value> {
    Evaluator::default().evaluate(expr, context)
}

/// A deferred argument turned into something a stage body can call
#[derive(Debug, Clone)]
pub enum Callable {
    /// Expression (or sequence holding one) evaluated against the call's arguments
    Deferred(Operand),
    /// Function value called directly
    Invocable(Function),
    /// Anything else, returned unchanged
    Constant(Value),
}

/// Wrap `operand` so it can be called with positional and keyword arguments.
///
/// For deferred operands positional argument `i` is bound to symbol `i` and
/// keyword `k` to symbol `k`.
pub fn to_callable(operand: impl Into<Operand>) -> Callable {
    let operand = operand.into();
    if operand.is_symbolic() {
        return Callable::Deferred(operand);
    }
    match constant_value(operand) {
        Value::Function(function) => Callable::Invocable(function),
        value => Callable::Constant(value),
    }
}

fn constant_value(operand: Operand) -> Value {
    match operand {
        Operand::Scalar(value) => value,
        Operand::Sequence { kind, items } => {
            sequence_value(kind, items.into_iter().map(constant_value).collect())
        }
        // callers only pass non-symbolic operands
        Operand::Expr(_) => Value::Null,
    }
}

impl Callable {
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> ExpressionResult<Value> {
        self.call_with(&Evaluator::default(), args, kwargs)
    }

    pub fn call_with(
        &self,
        evaluator: &Evaluator,
        args: &[Value],
        kwargs: &Kwargs,
    ) -> ExpressionResult<Value> {
        match self {
            Callable::Deferred(operand) => {
                let mut context = Context::new();
                for (i, arg) in args.iter().enumerate() {
                    context.insert(i, arg.clone());
                }
                for (key, value) in kwargs {
                    context.insert(key.as_str(), value.clone());
                }
                evaluator.evaluate_operand(operand, &context)
            }
            Callable::Invocable(function) => invoke(&Value::Function(function.clone()), args, kwargs),
            Callable::Constant(value) => Ok(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Column;
    use crate::expression::{builtins, X};

    fn frame() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2, 3]),
            Column::from_values("y", [10, 20, 30]),
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_lookup() -> ExpressionResult<()> {
        let context = Context::new().bind(0usize, Value::Int(3)).bind("k", Value::from("v"));
        assert_eq!(evaluate(&Expr::symbol(0usize), &context)?, Value::Int(3));
        assert_eq!(evaluate(&Expr::symbol("k"), &context)?, Value::from("v"));
        assert_eq!(
            evaluate(&Expr::symbol(1usize), &context),
            Err(ExpressionError::UnboundSymbol(SymbolId::Index(1)))
        );
        Ok(())
    }

    #[test]
    fn test_inverted_reference_evaluates_like_plain() -> ExpressionResult<()> {
        let context = Context::new().bind(0usize, Value::Int(7));
        assert_eq!(evaluate(&!X, &context)?, Value::Int(7));
        Ok(())
    }

    #[test]
    fn test_pythagoras() -> ExpressionResult<()> {
        let expr = Expr::invoke(
            builtins::sqrt(),
            vec![(Expr::symbol(0usize).pow(2) + Expr::symbol(1usize).pow(2)).into()],
        );
        let context = Context::new()
            .bind(0usize, Value::Int(3))
            .bind(1usize, Value::Int(4));
        assert_eq!(evaluate(&expr, &context)?, Value::Float(5.0));
        Ok(())
    }

    #[test]
    fn test_floor_div_of_min_by_minus_one() -> ExpressionResult<()> {
        let context = Context::new().bind(0usize, Value::Int(i64::MIN));
        let expr = Expr::symbol(0usize).floor_div(-1);
        assert_eq!(evaluate(&expr, &context)?, Value::Int(i64::MIN));
        Ok(())
    }

    #[test]
    fn test_column_arithmetic_against_table() -> ExpressionResult<()> {
        let expr = X.attr("x") + X.attr("y");
        let Value::Column(sum) = evaluate(&expr, &Context::for_table(&frame()))? else {
            panic!("expected column");
        };
        assert_eq!(sum.values(), &[Value::Int(11), Value::Int(22), Value::Int(33)]);
        Ok(())
    }

    #[test]
    fn test_table_context_shares_columns() -> ExpressionResult<()> {
        let table = frame();
        let context = Context::for_table(&table);
        let Some(Value::Frame(bound)) = context.get(&SymbolId::Index(0)) else {
            panic!("expected frame");
        };
        let (Some(original), Some(shared)) = (table.column("x"), bound.column("x")) else {
            panic!("missing column x");
        };
        assert_eq!(original.values().as_ptr(), shared.values().as_ptr());
        Ok(())
    }

    #[test]
    fn test_missing_attribute() {
        let result = evaluate(&X.attr("nope"), &Context::for_table(&frame()));
        assert!(matches!(
            result,
            Err(ExpressionError::MissingAttribute { type_name: "Frame", .. })
        ));
    }

    #[test]
    fn test_sequence_kind_preserved() -> ExpressionResult<()> {
        let operand = Operand::tuple(vec![X.into(), Operand::list(vec![1.into()])]);
        let context = Context::new().bind(0usize, Value::Int(0));
        assert_eq!(
            Evaluator::default().evaluate_operand(&operand, &context)?,
            Value::Tuple(vec![Value::Int(0), Value::List(vec![Value::Int(1)])])
        );
        Ok(())
    }

    #[test]
    fn test_logging_does_not_change_result() -> ExpressionResult<()> {
        let evaluator = Evaluator::new(EvalOptions { log: true });
        let context = Context::new().bind(0usize, Value::Int(2));
        assert_eq!(evaluator.evaluate(&(X * 3), &context)?, Value::Int(6));
        Ok(())
    }

    #[test]
    fn test_to_callable_constant() -> ExpressionResult<()> {
        let callable = to_callable(12);
        let kwargs = vec![("k".to_string(), Value::Int(4))];
        assert_eq!(callable.call(&[Value::Int(3)], &kwargs)?, Value::Int(12));
        Ok(())
    }

    #[test]
    fn test_to_callable_binds_arguments() -> ExpressionResult<()> {
        let callable = to_callable(Expr::symbol(0usize) - Expr::symbol("offset"));
        let kwargs = vec![("offset".to_string(), Value::Int(4))];
        assert_eq!(callable.call(&[Value::Int(10)], &kwargs)?, Value::Int(6));

        let callable = to_callable(vec![Operand::from(X), Operand::from(1)]);
        assert!(matches!(callable, Callable::Deferred(_)));
        assert_eq!(
            callable.call(&[Value::Int(0)], &Kwargs::new())?,
            Value::List(vec![Value::Int(0), Value::Int(1)])
        );
        Ok(())
    }

    #[test]
    fn test_to_callable_function() -> ExpressionResult<()> {
        let callable = to_callable(builtins::sqrt());
        assert!(matches!(callable, Callable::Invocable(_)));
        assert_eq!(callable.call(&[Value::Int(9)], &Kwargs::new())?, Value::Float(3.0));
        Ok(())
    }

    #[test]
    fn test_building_never_needs_context() {
        // An unbound symbol only fails once evaluated
        let expr = Expr::symbol("x").attr("anything").call(vec![1.into()]);
        assert!(matches!(
            evaluate(&expr, &Context::new()),
            Err(ExpressionError::UnboundSymbol(_))
        ));
    }
}
