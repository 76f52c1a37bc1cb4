//! Selector specs and their normalization from stage arguments.

use crate::access::{Frame, Table, Value};
use crate::expression::{
    Context, Evaluator, Expr, ExpressionError, ExpressionResult, Operand, SelectorViolation,
};

/// A column addressed by a `ColumnSet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    Name(String),
    /// Negative positions count from the end
    Position(i64),
}

/// One normalized selector argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorSpec {
    /// `"*"`
    All,
    /// A column name given as a string
    Name(String),
    /// `"-name"`
    Exclude(String),
    /// A column position given as an integer
    Index(i64),
    /// Columns an expression evaluated to
    ColumnSet {
        columns: Vec<ColumnTarget>,
        inverted: bool,
    },
}

impl SelectorSpec {
    fn from_string(text: &str, table: &impl Table) -> SelectorSpec {
        if text == "*" {
            return SelectorSpec::All;
        }
        // An exact column name wins over the exclude prefix
        if table.column_position(text).is_some() {
            return SelectorSpec::Name(text.to_string());
        }
        match text.strip_prefix('-') {
            Some(rest) => SelectorSpec::Exclude(rest.to_string()),
            None => SelectorSpec::Name(text.to_string()),
        }
    }
}

/// Turn one stage argument into selector specs. Sequences flatten.
/// Expressions are evaluated in `context`, which binds `table` to `X`.
pub fn normalize_selector(
    operand: &Operand,
    table: &Frame,
    evaluator: &Evaluator,
    context: &Context,
) -> ExpressionResult<Vec<SelectorSpec>> {
    match operand {
        Operand::Sequence { items, .. } => {
            let mut specs = Vec::new();
            for item in items {
                specs.extend(normalize_selector(item, table, evaluator, context)?);
            }
            Ok(specs)
        }
        Operand::Scalar(value) => scalar_specs(value, table),
        Operand::Expr(expr) => {
            let (target, inverted) = expr.selector_target();
            let value = evaluator.evaluate(target, context)?;
            Ok(vec![column_set(&value, inverted, expr)?])
        }
    }
}

fn scalar_specs(value: &Value, table: &Frame) -> ExpressionResult<Vec<SelectorSpec>> {
    match value {
        Value::String(text) => Ok(vec![SelectorSpec::from_string(text, table)]),
        Value::Int(position) => Ok(vec![SelectorSpec::Index(*position)]),
        Value::List(items) | Value::Tuple(items) => {
            let mut specs = Vec::new();
            for item in items {
                specs.extend(scalar_specs(item, table)?);
            }
            Ok(specs)
        }
        Value::Column(column) => Ok(vec![SelectorSpec::ColumnSet {
            columns: vec![ColumnTarget::Name(column.name().to_string())],
            inverted: false,
        }]),
        Value::Frame(frame) => Ok(vec![SelectorSpec::ColumnSet {
            columns: frame
                .column_names()
                .into_iter()
                .map(ColumnTarget::Name)
                .collect(),
            inverted: false,
        }]),
        other => Err(ExpressionError::UnresolvableSelector(other.repr())),
    }
}

fn column_target(value: &Value, source: &Expr) -> ExpressionResult<Vec<ColumnTarget>> {
    match value {
        Value::Column(column) => Ok(vec![ColumnTarget::Name(column.name().to_string())]),
        Value::Frame(frame) => Ok(frame
            .column_names()
            .into_iter()
            .map(ColumnTarget::Name)
            .collect()),
        Value::String(name) => Ok(vec![ColumnTarget::Name(name.clone())]),
        Value::Int(position) => Ok(vec![ColumnTarget::Position(*position)]),
        _ => Err(ExpressionError::UnresolvableSelector(source.to_string())),
    }
}

fn column_set(value: &Value, inverted: bool, source: &Expr) -> ExpressionResult<SelectorSpec> {
    let columns = match value {
        Value::List(items) | Value::Tuple(items) => {
            let mut columns = Vec::new();
            for item in items {
                columns.extend(column_target(item, source)?);
            }
            columns
        }
        other => column_target(other, source)?,
    };
    Ok(SelectorSpec::ColumnSet { columns, inverted })
}

/// Reject malformed string selectors before any column work happens
pub fn validate<T: Table + ?Sized>(
    specs: &[SelectorSpec],
    table: &T,
) -> Result<(), SelectorViolation> {
    let mut has_wildcard = false;
    let mut includes: Vec<&str> = Vec::new();
    let mut excludes: Vec<&str> = Vec::new();
    for spec in specs {
        match spec {
            SelectorSpec::All => {
                if has_wildcard {
                    return Err(SelectorViolation::RepeatedWildcard);
                }
                has_wildcard = true;
            }
            SelectorSpec::Name(name) => {
                if table.column_position(name).is_none() {
                    return Err(SelectorViolation::UnresolvableName(name.clone()));
                }
                if includes.contains(&name.as_str()) {
                    return Err(SelectorViolation::DuplicateInclude(name.clone()));
                }
                includes.push(name);
            }
            SelectorSpec::Exclude(name) => {
                if table.column_position(name).is_none() {
                    return Err(SelectorViolation::UnresolvableName(format!("-{}", name)));
                }
                if excludes.contains(&name.as_str()) {
                    return Err(SelectorViolation::DuplicateExclude(name.clone()));
                }
                excludes.push(name);
            }
            SelectorSpec::Index(_) | SelectorSpec::ColumnSet { .. } => {}
        }
    }

    if let Some(name) = includes.iter().find(|name| excludes.contains(name)) {
        return Err(SelectorViolation::IncludeExcludeOverlap(name.to_string()));
    }
    if let (false, Some(name)) = (has_wildcard, excludes.first()) {
        return Err(SelectorViolation::ExcludeWithoutWildcard(name.to_string()));
    }
    if let (true, Some(name)) = (has_wildcard, includes.first()) {
        return Err(SelectorViolation::IncludeWithWildcard(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Column;
    use crate::expression::X;

    fn frame() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2]),
            Column::from_values("y", [3, 4]),
            Column::from_values("-z", [5, 6]),
        ])
        .unwrap()
    }

    fn normalize(operand: impl Into<Operand>) -> ExpressionResult<Vec<SelectorSpec>> {
        let table = frame();
        normalize_selector(
            &operand.into(),
            &table,
            &Evaluator::default(),
            &Context::for_table(&table),
        )
    }

    fn strings(specs: &[&str]) -> Vec<SelectorSpec> {
        specs
            .iter()
            .map(|s| SelectorSpec::from_string(s, &frame()))
            .collect()
    }

    #[test]
    fn test_string_specs() -> ExpressionResult<()> {
        assert_eq!(normalize("*")?, vec![SelectorSpec::All]);
        assert_eq!(normalize("x")?, vec![SelectorSpec::Name("x".to_string())]);
        assert_eq!(normalize("-x")?, vec![SelectorSpec::Exclude("x".to_string())]);
        assert_eq!(normalize("-z")?, vec![SelectorSpec::Name("-z".to_string())]);
        assert_eq!(normalize(-1)?, vec![SelectorSpec::Index(-1)]);
        Ok(())
    }

    #[test]
    fn test_sequences_flatten() -> ExpressionResult<()> {
        let operand = Operand::list(vec![
            "x".into(),
            Operand::tuple(vec![1.into(), X.attr("y").into()]),
        ]);
        assert_eq!(
            normalize(operand)?,
            vec![
                SelectorSpec::Name("x".to_string()),
                SelectorSpec::Index(1),
                SelectorSpec::ColumnSet {
                    columns: vec![ColumnTarget::Name("y".to_string())],
                    inverted: false,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_expression_specs() -> ExpressionResult<()> {
        assert_eq!(
            normalize(!X.attr("x"))?,
            vec![SelectorSpec::ColumnSet {
                columns: vec![ColumnTarget::Name("x".to_string())],
                inverted: true,
            }]
        );
        let projected = X.get(vec!["y", "x"]);
        assert_eq!(
            normalize(projected)?,
            vec![SelectorSpec::ColumnSet {
                columns: vec![
                    ColumnTarget::Name("y".to_string()),
                    ColumnTarget::Name("x".to_string()),
                ],
                inverted: false,
            }]
        );
        assert!(matches!(
            normalize(X.attr("empty")),
            Err(ExpressionError::UnresolvableSelector(_))
        ));
        Ok(())
    }

    #[test]
    fn test_validation() {
        let table = frame();
        assert_eq!(validate(&strings(&["*", "-y"]), &table), Ok(()));
        assert_eq!(
            validate(&strings(&["*", "*"]), &table),
            Err(SelectorViolation::RepeatedWildcard)
        );
        assert_eq!(
            validate(&strings(&["-x"]), &table),
            Err(SelectorViolation::ExcludeWithoutWildcard("x".to_string()))
        );
        assert_eq!(
            validate(&strings(&["*", "x"]), &table),
            Err(SelectorViolation::IncludeWithWildcard("x".to_string()))
        );
        assert_eq!(
            validate(&strings(&["w"]), &table),
            Err(SelectorViolation::UnresolvableName("w".to_string()))
        );
        assert_eq!(
            validate(&strings(&["*", "-w"]), &table),
            Err(SelectorViolation::UnresolvableName("-w".to_string()))
        );
        assert_eq!(
            validate(&strings(&["x", "x"]), &table),
            Err(SelectorViolation::DuplicateInclude("x".to_string()))
        );
        assert_eq!(
            validate(&strings(&["*", "-x", "-x"]), &table),
            Err(SelectorViolation::DuplicateExclude("x".to_string()))
        );
    }

    #[test]
    fn test_overlap() {
        let table = frame();
        assert_eq!(
            validate(&strings(&["x", "-x"]), &table),
            Err(SelectorViolation::IncludeExcludeOverlap("x".to_string()))
        );
        assert_eq!(
            validate(&strings(&["*", "y", "-y"]), &table),
            Err(SelectorViolation::IncludeExcludeOverlap("y".to_string()))
        );
        // Disjoint names still hit the wildcard rules
        assert_eq!(
            validate(&strings(&["x", "-y"]), &table),
            Err(SelectorViolation::ExcludeWithoutWildcard("y".to_string()))
        );
    }
}
