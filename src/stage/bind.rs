//! Concatenation stages.

use crate::access::{Column, Frame, Value};
use crate::expression::{ExpressionError, ExpressionResult, Operand};
use crate::stage::{ArgEvalMode, BoundStage, Stage, StageArgs};

/// How columns (or rows) present on only one side are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Keep everything, filling gaps with NULL
    #[default]
    Outer,
    /// Keep only what both sides share
    Inner,
}

impl JoinKind {
    fn from_args(stage: &str, args: &StageArgs) -> ExpressionResult<Self> {
        match args.argument(1, "join") {
            None => Ok(JoinKind::Outer),
            Some(Value::String(kind)) if kind == "outer" => Ok(JoinKind::Outer),
            Some(Value::String(kind)) if kind == "inner" => Ok(JoinKind::Inner),
            Some(other) => Err(ExpressionError::invalid_argument(
                stage,
                format!("join must be 'outer' or 'inner', got {}", other.repr()),
            )),
        }
    }
}

/// The table argument of a binary stage, positional or `other=`
pub(crate) fn other_frame<'a>(stage: &str, args: &'a StageArgs) -> ExpressionResult<&'a Frame> {
    match args.argument(0, "other") {
        Some(Value::Frame(frame)) => Ok(frame),
        Some(other) => Err(ExpressionError::invalid_argument(
            stage,
            format!("expected a Frame, got {}", other.type_name()),
        )),
        None => Err(ExpressionError::invalid_argument(stage, "missing table argument")),
    }
}

fn padded(column: Option<&Column>, rows: usize) -> Vec<Value> {
    match column {
        Some(column) => column.values().to_vec(),
        None => vec![Value::Null; rows],
    }
}

/// Stack `bottom` under `top`
pub fn concat_rows(top: &Frame, bottom: &Frame, join: JoinKind) -> ExpressionResult<Frame> {
    let names: Vec<&str> = match join {
        JoinKind::Outer => {
            let mut names: Vec<&str> = top.columns().iter().map(Column::name).collect();
            for column in bottom.columns() {
                if !names.contains(&column.name()) {
                    names.push(column.name());
                }
            }
            names
        }
        JoinKind::Inner => top
            .columns()
            .iter()
            .map(Column::name)
            .filter(|name| bottom.column(name).is_some())
            .collect(),
    };
    let columns = names
        .into_iter()
        .map(|name| {
            let mut values = padded(top.column(name), top.num_rows());
            values.extend(padded(bottom.column(name), bottom.num_rows()));
            Column::new(name, values)
        })
        .collect();
    Frame::new(columns)
}

/// Place `right` beside `left`
pub fn concat_columns(left: &Frame, right: &Frame, join: JoinKind) -> ExpressionResult<Frame> {
    let rows = match join {
        JoinKind::Outer => left.num_rows().max(right.num_rows()),
        JoinKind::Inner => left.num_rows().min(right.num_rows()),
    };
    let columns = left
        .columns()
        .iter()
        .chain(right.columns())
        .map(|column| {
            let mut values: Vec<Value> = column.values().iter().take(rows).cloned().collect();
            values.resize(rows, Value::Null);
            Column::new(column.name(), values)
        })
        .collect();
    Frame::new(columns)
}

pub fn bind_rows_stage() -> Stage {
    Stage::new("bind_rows", ArgEvalMode::symbolic(true), |table, args| {
        let join = JoinKind::from_args("bind_rows", &args)?;
        concat_rows(table, other_frame("bind_rows", &args)?, join)
    })
}

pub fn bind_cols_stage() -> Stage {
    Stage::new("bind_cols", ArgEvalMode::symbolic(true), |table, args| {
        let join = JoinKind::from_args("bind_cols", &args)?;
        concat_columns(table, other_frame("bind_cols", &args)?, join)
    })
}

fn join_keyword(join: JoinKind) -> Vec<(String, Operand)> {
    let kind = match join {
        JoinKind::Outer => "outer",
        JoinKind::Inner => "inner",
    };
    vec![("join".to_string(), Operand::from(kind))]
}

pub fn bind_rows(other: impl Into<Operand>, join: JoinKind) -> BoundStage {
    bind_rows_stage().bind(vec![other.into()], join_keyword(join))
}

pub fn bind_cols(other: impl Into<Operand>, join: JoinKind) -> BoundStage {
    bind_cols_stage().bind(vec![other.into()], join_keyword(join))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Table;

    fn top() -> Frame {
        Frame::new(vec![
            Column::from_values("a", [1, 2]),
            Column::from_values("b", ["p", "q"]),
        ])
        .unwrap()
    }

    fn bottom() -> Frame {
        Frame::new(vec![
            Column::from_values("b", ["r"]),
            Column::from_values("c", [true]),
        ])
        .unwrap()
    }

    #[test]
    fn test_bind_rows_outer() -> ExpressionResult<()> {
        let bound = bind_rows(bottom(), JoinKind::Outer).apply(&top())?;
        assert_eq!(bound.column_names(), vec!["a", "b", "c"]);
        assert_eq!(bound.num_rows(), 3);
        assert_eq!(
            bound.row(2),
            vec![Value::Null, Value::from("r"), Value::Boolean(true)]
        );
        assert_eq!(bound.row(0)[2], Value::Null);
        Ok(())
    }

    #[test]
    fn test_bind_rows_inner() -> ExpressionResult<()> {
        let bound = bind_rows(bottom(), JoinKind::Inner).apply(&top())?;
        assert_eq!(bound.column_names(), vec!["b"]);
        assert_eq!(bound.num_rows(), 3);
        Ok(())
    }

    #[test]
    fn test_bind_cols() -> ExpressionResult<()> {
        let right = Frame::new(vec![Column::from_values("c", [7])])?;
        let outer = bind_cols(right.clone(), JoinKind::Outer).apply(&top())?;
        assert_eq!(outer.column_names(), vec!["a", "b", "c"]);
        assert_eq!(outer.row(1)[2], Value::Null);

        let inner = bind_cols(right, JoinKind::Inner).apply(&top())?;
        assert_eq!(inner.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn test_bind_cols_rejects_duplicate_names() {
        let result = bind_cols(top(), JoinKind::Outer).apply(&top());
        assert!(matches!(result, Err(ExpressionError::DuplicateColumn(_))));
    }

    #[test]
    fn test_rejects_unknown_join() {
        let stage = bind_rows_stage().bind(
            vec![Operand::from(bottom())],
            vec![("join".to_string(), Operand::from("left"))],
        );
        assert!(matches!(
            stage.apply(&top()),
            Err(ExpressionError::InvalidArgument { .. })
        ));
    }
}
