//! Column selection stages.

use crate::access::Table;
use crate::expression::Operand;
use crate::selector::{resolve, SelectionMode};
use crate::stage::{ArgEvalMode, BoundStage, Stage};

/// Keep the selected columns, in the order they were asked for
pub fn select_stage() -> Stage {
    Stage::new("select", ArgEvalMode::selector(true), |table, args| {
        let specs = args.selectors()?;
        let resolution = resolve(table, &specs, SelectionMode::Select)?;
        Ok(table.project(&resolution.output_positions()))
    })
}

/// Remove the selected columns, keeping table order
pub fn drop_stage() -> Stage {
    Stage::new("drop", ArgEvalMode::selector(true), |table, args| {
        let specs = args.selectors()?;
        let resolution = resolve(table, &specs, SelectionMode::Drop)?;
        Ok(table.select_columns(&resolution.selected()))
    })
}

pub fn select(specs: Vec<Operand>) -> BoundStage {
    select_stage().bind(specs, Vec::new())
}

pub fn drop(specs: Vec<Operand>) -> BoundStage {
    drop_stage().bind(specs, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Column, Frame};
    use crate::expression::{ExpressionError, ExpressionResult, X};

    fn frame() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2, 3, 4, 5, 6]),
            Column::from_values("y", [6, 5, 4, 3, 2, 1]),
            Column::from_values("z", [7, 6, 5, 4, 3, 2]),
        ])
        .unwrap()
    }

    fn names(frame: &Frame) -> Vec<String> {
        frame.column_names()
    }

    #[test]
    fn test_select_forms() -> ExpressionResult<()> {
        let table = frame();
        let cases: Vec<(Vec<Operand>, Vec<&str>)> = vec![
            (vec!["x".into(), "y".into()], vec!["x", "y"]),
            (vec!["*".into(), "-y".into()], vec!["x", "z"]),
            (vec![X.attr("x").into(), X.attr("y").into()], vec!["x", "y"]),
            (vec![0.into(), 1.into()], vec!["x", "y"]),
            (vec![0.into(), "y".into()], vec!["x", "y"]),
            (
                vec![X.attr("x").into(), X.get("y").into(), X.attr("z").into()],
                vec!["x", "y", "z"],
            ),
            (vec![X.get(vec!["x", "y", "z"]).into()], vec!["x", "y", "z"]),
            (
                vec![X.get(vec!["x", "y"]).into(), X.attr("z").into()],
                vec!["x", "y", "z"],
            ),
            (vec![!X.attr("x"), !X.attr("y")].into_iter().map(Operand::from).collect(), vec!["z"]),
            (vec!["z".into(), "x".into()], vec!["z", "x"]),
            (vec![2.into(), 0.into()], vec!["x", "z"]),
            (vec![X.attr("z").into(), X.attr("x").into()], vec!["x", "z"]),
        ];
        for (specs, expected) in cases {
            let rendered: Vec<String> = specs.iter().map(Operand::to_string).collect();
            let selected = select(specs).apply(&table)?;
            assert_eq!(names(&selected), expected, "select({:?})", rendered);
            assert_eq!(selected.num_rows(), 6);
        }
        Ok(())
    }

    #[test]
    fn test_select_through_indexers() -> ExpressionResult<()> {
        let table = frame();
        let iloc = X
            .attr("iloc")
            .get(Operand::tuple(vec![crate::access::Slice::full().into(), vec![0, 1, 2].into()]));
        assert_eq!(names(&select(vec![iloc.into()]).apply(&table)?), vec!["x", "y", "z"]);

        let loc = X
            .attr("loc")
            .get(Operand::tuple(vec![crate::access::Slice::full().into(), vec!["x", "y", "z"].into()]));
        let nested = Operand::list(vec![loc.into()]);
        assert_eq!(names(&select(vec![nested]).apply(&table)?), vec!["x", "y", "z"]);
        Ok(())
    }

    #[test]
    fn test_select_rejects_bad_strings() {
        let table = frame();
        assert!(matches!(
            select(vec!["*".into(), "x".into()]).apply(&table),
            Err(ExpressionError::SelectorValidation(_))
        ));
        assert!(matches!(
            select(vec!["-x".into()]).apply(&table),
            Err(ExpressionError::SelectorValidation(_))
        ));
    }

    #[test]
    fn test_drop() -> ExpressionResult<()> {
        let table = frame();
        assert_eq!(names(&drop(vec!["y".into()]).apply(&table)?), vec!["x", "z"]);
        assert_eq!(names(&drop(vec![X.attr("z").into(), 0.into()]).apply(&table)?), vec!["y"]);
        assert_eq!(names(&drop(vec![(!X.attr("x")).into()]).apply(&table)?), vec!["x"]);
        assert_eq!(names(&drop(Vec::new()).apply(&table)?), vec!["x", "y", "z"]);
        Ok(())
    }
}
