//! Stages that compute from the incoming table: `mutate`, `filter` and
//! `summarize`.
//!
//! Each argument goes through `to_callable` and is called with the table as
//! its only argument, so an argument may be an expression over `X`, a
//! function value, or a plain value.

use crate::access::{Column, Frame, Kwargs, Value};
use crate::expression::methods::column_from_value;
use crate::expression::{to_callable, ExpressionError, ExpressionResult, Operand};
use crate::stage::{ArgEvalMode, BoundStage, Evaluated, Stage};
use log::debug;

fn call_with_table(argument: impl Into<Operand>, table: &Frame) -> ExpressionResult<Value> {
    to_callable(argument).call(&[Value::Frame(table.clone())], &Kwargs::new())
}

/// Add or replace columns, in keyword order
pub fn mutate_stage() -> Stage {
    Stage::new("mutate", ArgEvalMode::pass_through(), |table, args| {
        let mut mutated = table.clone();
        for (name, value) in args.keywords {
            let value = call_with_table(value, table)?;
            let column = column_from_value(&name, &value, table.num_rows())?;
            debug!("mutate: assigning column '{}'", name);
            mutated = mutated.with_column(column)?;
        }
        Ok(mutated)
    })
}

/// Keep the rows where every condition holds. NULL counts as false.
pub fn filter_stage() -> Stage {
    Stage::new("filter", ArgEvalMode::pass_through(), |table, args| {
        let mut keep = vec![true; table.num_rows()];
        for (index, condition) in args.positional.into_iter().enumerate() {
            let result = match condition {
                Evaluated::Raw(operand) => call_with_table(operand, table)?,
                Evaluated::Value(value) => call_with_table(value, table)?,
                Evaluated::Selector(_) => {
                    return Err(ExpressionError::invalid_argument(
                        "filter",
                        format!("condition {} cannot be a selector", index),
                    ))
                }
            };
            let mask = match &result {
                Value::Column(column) => column.to_mask()?,
                Value::List(items) => Column::new("mask", items.clone()).to_mask()?,
                Value::Boolean(b) => vec![*b; table.num_rows()],
                other => {
                    return Err(ExpressionError::invalid_argument(
                        "filter",
                        format!("condition {} evaluated to {}", index, other.type_name()),
                    ))
                }
            };
            if mask.len() != keep.len() {
                return Err(ExpressionError::LengthMismatch {
                    expected: keep.len(),
                    actual: mask.len(),
                });
            }
            keep.iter_mut().zip(mask).for_each(|(k, m)| *k &= m);
        }
        table.filter_rows(&keep)
    })
}

/// One row of scalar results, one column per keyword
pub fn summarize_stage() -> Stage {
    Stage::new("summarize", ArgEvalMode::pass_through(), |table, args| {
        let columns = args
            .keywords
            .into_iter()
            .map(|(name, value)| match call_with_table(value, table)? {
                Value::Column(_) | Value::Frame(_) => Err(ExpressionError::invalid_argument(
                    "summarize",
                    format!("'{}' did not reduce to a single value", name),
                )),
                scalar => Ok(Column::new(name, vec![scalar])),
            })
            .collect::<ExpressionResult<Vec<_>>>()?;
        Frame::new(columns)
    })
}

pub fn mutate(columns: Vec<(&str, Operand)>) -> BoundStage {
    mutate_stage().bind(
        Vec::new(),
        columns
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}

pub fn filter(conditions: Vec<Operand>) -> BoundStage {
    filter_stage().bind(conditions, Vec::new())
}

pub fn summarize(aggregates: Vec<(&str, Operand)>) -> BoundStage {
    summarize_stage().bind(
        Vec::new(),
        aggregates
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}
