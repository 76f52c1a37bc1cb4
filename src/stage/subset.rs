//! Row subset stages.

use crate::access::{Frame, Value};
use crate::expression::{ExpressionError, ExpressionResult, Operand};
use crate::stage::{ArgEvalMode, BoundStage, Stage, StageArgs};

const DEFAULT_ROWS: usize = 5;

fn row_count(stage: &str, args: &StageArgs) -> ExpressionResult<usize> {
    match args.argument(0, "n") {
        None => Ok(DEFAULT_ROWS),
        Some(Value::Int(n)) if *n >= 0 => Ok(*n as usize),
        Some(other) => Err(ExpressionError::invalid_argument(
            stage,
            format!("n must be a non-negative int, got {}", other.repr()),
        )),
    }
}

/// First `n` rows (default 5)
pub fn head_stage() -> Stage {
    Stage::new("head", ArgEvalMode::symbolic(true), |table: &Frame, args| {
        Ok(table.head(row_count("head", &args)?))
    })
}

/// Last `n` rows (default 5)
pub fn tail_stage() -> Stage {
    Stage::new("tail", ArgEvalMode::symbolic(true), |table: &Frame, args| {
        Ok(table.tail(row_count("tail", &args)?))
    })
}

pub fn head(n: impl Into<Operand>) -> BoundStage {
    head_stage().bind(vec![n.into()], Vec::new())
}

pub fn tail(n: impl Into<Operand>) -> BoundStage {
    tail_stage().bind(vec![n.into()], Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Column;
    use crate::expression::X;

    fn frame() -> Frame {
        Frame::new(vec![Column::from_values("x", 1..=8i64)]).unwrap()
    }

    #[test]
    fn test_head_and_tail() -> ExpressionResult<()> {
        let first = head(3).apply(&frame())?;
        assert_eq!(first.column("x").unwrap().values()[0], Value::Int(1));
        assert_eq!(first.num_rows(), 3);

        let last = tail(2).apply(&frame())?;
        assert_eq!(last.row(0), vec![Value::Int(7)]);
        assert_eq!(last.num_rows(), 2);

        assert_eq!(head(100).apply(&frame())?.num_rows(), 8);
        Ok(())
    }

    #[test]
    fn test_default_row_count() -> ExpressionResult<()> {
        let first = head_stage().bind(Vec::new(), Vec::new()).apply(&frame())?;
        assert_eq!(first.num_rows(), 5);
        let last = tail_stage()
            .bind(Vec::new(), vec![("n".to_string(), Operand::from(1))])
            .apply(&frame())?;
        assert_eq!(last.row(0), vec![Value::Int(8)]);
        Ok(())
    }

    #[test]
    fn test_symbolic_row_count() -> ExpressionResult<()> {
        let half = head(X.length().floor_div(2)).apply(&frame())?;
        assert_eq!(half.num_rows(), 4);
        Ok(())
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            head(-1).apply(&frame()),
            Err(ExpressionError::InvalidArgument { .. })
        ));
    }
}
