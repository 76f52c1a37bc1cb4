//! Native functions usable as callees in expressions.

use crate::access::{Column, Function, Value};
use crate::expression::methods::{aggregate, apply_operator, map_numeric};
use crate::expression::{ExpressionError, ExpressionResult, Operator};

fn single_argument<'a>(name: &str, args: &'a [Value]) -> ExpressionResult<&'a Value> {
    match args {
        [arg] => Ok(arg),
        _ => Err(ExpressionError::invalid_argument(
            name,
            format!("expected 1 argument, got {}", args.len()),
        )),
    }
}

pub fn sqrt() -> Function {
    Function::native("sqrt", |args, _| {
        map_numeric("sqrt", single_argument("sqrt", args)?, f64::sqrt)
    })
}

pub fn abs() -> Function {
    Function::native("abs", |args, _| {
        apply_operator(Operator::Abs, single_argument("abs", args)?, &[])
    })
}

pub fn len() -> Function {
    Function::native("len", |args, _| {
        apply_operator(Operator::Len, single_argument("len", args)?, &[])
    })
}

fn reduction(name: &'static str) -> Function {
    Function::native(name, move |args, _| match single_argument(name, args)? {
        Value::Column(column) => aggregate(column, name),
        Value::List(items) | Value::Tuple(items) => {
            aggregate(&Column::new(name, items.clone()), name)
        }
        other => Err(ExpressionError::unary_operands(name, other.type_name())),
    })
}

pub fn sum() -> Function {
    reduction("sum")
}

pub fn mean() -> Function {
    reduction("mean")
}

pub fn min() -> Function {
    reduction("min")
}

pub fn max() -> Function {
    reduction("max")
}
