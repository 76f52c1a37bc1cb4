//! Inner join stage.
//!
//! Rows are matched with a nested loop over both tables. A row pair is
//! emitted when every key pair compares equal; NULL keys never match.

use crate::access::{Column, Frame, Value};
use crate::expression::methods::compare;
use crate::expression::{ExpressionError, ExpressionResult, Operand, Operator};
use crate::stage::bind::other_frame;
use crate::stage::{ArgEvalMode, BoundStage, Stage, StageArgs};
use log::debug;

/// Key column pairs and the suffixes for clashing column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinParameters {
    pub keys: Vec<(String, String)>,
    pub suffixes: (String, String),
}

fn key_name(value: &Value) -> ExpressionResult<String> {
    match value {
        Value::String(name) => Ok(name.clone()),
        other => Err(ExpressionError::invalid_argument(
            "inner_join",
            format!("expected a column name, got {}", other.repr()),
        )),
    }
}

fn key_pair(value: &Value) -> ExpressionResult<(String, String)> {
    match value {
        Value::Tuple(pair) if pair.len() == 2 => Ok((key_name(&pair[0])?, key_name(&pair[1])?)),
        other => {
            let name = key_name(other)?;
            Ok((name.clone(), name))
        }
    }
}

impl JoinParameters {
    /// `by` is a name, a `(left, right)` tuple, or a list of either. Without
    /// it the tables are joined on every column name they share.
    fn from_args(args: &StageArgs, left: &Frame, right: &Frame) -> ExpressionResult<Self> {
        let keys = match args.keyword("by") {
            None | Some(Value::Null) => left
                .columns()
                .iter()
                .map(Column::name)
                .filter(|name| right.column(name).is_some())
                .map(|name| (name.to_string(), name.to_string()))
                .collect(),
            Some(Value::List(items)) => items.iter().map(key_pair).collect::<ExpressionResult<_>>()?,
            Some(other) => vec![key_pair(other)?],
        };
        let suffixes = match args.keyword("suffixes") {
            None => ("_x".to_string(), "_y".to_string()),
            Some(Value::Tuple(pair)) | Some(Value::List(pair)) if pair.len() == 2 => {
                (key_name(&pair[0])?, key_name(&pair[1])?)
            }
            Some(other) => {
                return Err(ExpressionError::invalid_argument(
                    "inner_join",
                    format!("suffixes must be a pair of strings, got {}", other.repr()),
                ))
            }
        };
        Ok(Self { keys, suffixes })
    }
}

fn position(frame: &Frame, name: &str) -> ExpressionResult<usize> {
    frame
        .position(name)
        .ok_or_else(|| ExpressionError::KeyNotFound(name.to_string()))
}

/// Join `left` and `right` on the given key pairs
pub fn join_frames(left: &Frame, right: &Frame, parameters: &JoinParameters) -> ExpressionResult<Frame> {
    if parameters.keys.is_empty() {
        return Err(ExpressionError::invalid_argument(
            "inner_join",
            "no join keys given and no shared columns",
        ));
    }
    let key_positions = parameters
        .keys
        .iter()
        .map(|(l, r)| Ok((position(left, l)?, position(right, r)?)))
        .collect::<ExpressionResult<Vec<_>>>()?;

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for i in 0..left.num_rows() {
        for j in 0..right.num_rows() {
            let mut matched = true;
            for &(l, r) in &key_positions {
                let equal = compare(
                    Operator::Eq,
                    &left.columns()[l].values()[i],
                    &right.columns()[r].values()[j],
                )?;
                if equal != Value::Boolean(true) {
                    matched = false;
                    break;
                }
            }
            if matched {
                left_rows.push(i);
                right_rows.push(j);
            }
        }
    }
    debug!("inner_join matched {} row pairs", left_rows.len());

    // Right keys with the same name as their left key appear once
    let merged_keys: Vec<&str> = parameters
        .keys
        .iter()
        .filter(|(l, r)| l == r)
        .map(|(_, r)| r.as_str())
        .collect();
    let right_columns: Vec<&Column> = right
        .columns()
        .iter()
        .filter(|column| !merged_keys.contains(&column.name()))
        .collect();
    let (left_suffix, right_suffix) = &parameters.suffixes;

    let mut columns = Vec::new();
    for column in left.columns() {
        let clashes = !merged_keys.contains(&column.name())
            && right_columns.iter().any(|c| c.name() == column.name());
        let taken = column.take(&left_rows);
        columns.push(if clashes {
            taken.renamed(format!("{}{}", column.name(), left_suffix))
        } else {
            taken
        });
    }
    for column in right_columns {
        let taken = column.take(&right_rows);
        columns.push(if left.column(column.name()).is_some() {
            taken.renamed(format!("{}{}", column.name(), right_suffix))
        } else {
            taken
        });
    }
    Frame::new(columns)
}

pub fn inner_join_stage() -> Stage {
    Stage::new("inner_join", ArgEvalMode::symbolic(true), |table, args| {
        let other = other_frame("inner_join", &args)?;
        let parameters = JoinParameters::from_args(&args, table, other)?;
        join_frames(table, other, &parameters)
    })
}

/// `by` and `suffixes` are passed as keyword arguments
pub fn inner_join(other: impl Into<Operand>, keywords: Vec<(&str, Operand)>) -> BoundStage {
    inner_join_stage().bind(
        vec![other.into()],
        keywords
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    )
}
