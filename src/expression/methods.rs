//! Attribute lookup and operator application on runtime values.
//!
//! This is where an evaluated `Access` finds its attribute and where an
//! evaluated `Invocation` of a bound method runs. Columns combine
//! elementwise with columns of equal length or with broadcast scalars;
//! scalars follow Python numeric rules (int/float promotion, floor division
//! and modulo by the sign of the divisor, `/` always producing a float).
//! Values are immutable, so `__setitem__` and `__delitem__` evaluate to the
//! updated copy.

use crate::access::{kwarg, Column, Frame, Function, Indexer, IndexerKind, Kwargs, Slice, Value};
use crate::expression::{ExpressionError, ExpressionResult, Operator};
use std::cmp::Ordering;

const FRAME_METHODS: &[&str] = &["head", "tail"];
const COLUMN_METHODS: &[&str] = &[
    "sum", "mean", "min", "max", "count", "isnull", "notnull", "abs",
];
const STRING_METHODS: &[&str] = &["upper", "lower"];

/// Look up `name` on `value`: data attributes first, then methods
pub fn get_attribute(value: &Value, name: &str) -> ExpressionResult<Value> {
    if let Some(found) = data_attribute(value, name) {
        return Ok(found);
    }
    if has_method(value, name) {
        return Ok(Value::Function(Function::method(value.clone(), name)));
    }
    Err(ExpressionError::MissingAttribute {
        type_name: value.type_name(),
        attribute: name.to_string(),
    })
}

fn data_attribute(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::Frame(frame) => match name {
            "shape" => Some(Value::Tuple(vec![
                Value::Int(frame.num_rows() as i64),
                Value::Int(frame.num_columns() as i64),
            ])),
            "columns" => Some(Value::List(
                frame
                    .columns()
                    .iter()
                    .map(|c| Value::String(c.name().to_string()))
                    .collect(),
            )),
            "loc" => Some(Value::Indexer(Indexer {
                frame: frame.clone(),
                kind: IndexerKind::Label,
            })),
            "iloc" => Some(Value::Indexer(Indexer {
                frame: frame.clone(),
                kind: IndexerKind::Position,
            })),
            "empty" => Some(Value::Boolean(
                frame.num_rows() == 0 || frame.num_columns() == 0,
            )),
            _ => frame.column(name).cloned().map(Value::Column),
        },
        Value::Column(column) => match name {
            "name" => Some(Value::String(column.name().to_string())),
            "shape" => Some(Value::Tuple(vec![Value::Int(column.len() as i64)])),
            "size" => Some(Value::Int(column.len() as i64)),
            "values" => Some(Value::List(column.values().to_vec())),
            _ => None,
        },
        Value::Slice(slice) => {
            let bound = |b: Option<i64>| b.map(Value::Int).unwrap_or(Value::Null);
            match name {
                "start" => Some(bound(slice.start)),
                "stop" => Some(bound(slice.stop)),
                _ => None,
            }
        }
        _ => None,
    }
}

fn has_method(value: &Value, name: &str) -> bool {
    if Operator::from_method_name(name).is_some() {
        return true;
    }
    match value {
        Value::Frame(_) => FRAME_METHODS.contains(&name),
        Value::Column(_) => COLUMN_METHODS.contains(&name),
        Value::String(_) => STRING_METHODS.contains(&name),
        _ => false,
    }
}

/// Call an evaluated callee
pub fn invoke(callee: &Value, args: &[Value], kwargs: &Kwargs) -> ExpressionResult<Value> {
    match callee {
        Value::Function(Function::Native(native)) => native.call(args, kwargs),
        Value::Function(Function::Method(method)) => {
            call_method(&method.receiver, &method.name, args, kwargs)
        }
        other => Err(ExpressionError::NotCallable {
            type_name: other.type_name(),
        }),
    }
}

/// Run the method `name` of `receiver`
pub fn call_method(
    receiver: &Value,
    name: &str,
    args: &[Value],
    kwargs: &Kwargs,
) -> ExpressionResult<Value> {
    if let Some(op) = Operator::from_method_name(name) {
        if args.len() != op.arity() {
            return Err(ExpressionError::invalid_argument(
                name,
                format!("expected {} argument(s), got {}", op.arity(), args.len()),
            ));
        }
        return apply_operator(op, receiver, args);
    }
    match receiver {
        Value::Frame(frame) if FRAME_METHODS.contains(&name) => frame_method(frame, name, args, kwargs),
        Value::Column(column) if COLUMN_METHODS.contains(&name) => column_method(column, name),
        Value::String(s) if STRING_METHODS.contains(&name) => Ok(Value::String(match name {
            "upper" => s.to_uppercase(),
            _ => s.to_lowercase(),
        })),
        _ => Err(ExpressionError::MissingAttribute {
            type_name: receiver.type_name(),
            attribute: name.to_string(),
        }),
    }
}

/// Apply an operator with `receiver` as its left-hand side
pub fn apply_operator(op: Operator, receiver: &Value, args: &[Value]) -> ExpressionResult<Value> {
    if let Some(forward) = op.unreflected() {
        return binary(forward, &args[0], receiver);
    }
    if op.is_elementwise_binary() {
        return binary(op, receiver, &args[0]);
    }
    match op {
        Operator::Invert | Operator::Neg | Operator::Pos | Operator::Abs => unary(op, receiver),
        Operator::GetItem => get_item(receiver, &args[0]),
        Operator::SetItem => set_item(receiver, &args[0], &args[1]),
        Operator::DelItem => del_item(receiver, &args[0]),
        Operator::Contains => contains(receiver, &args[0]).map(Value::Boolean),
        Operator::Len => length(receiver).map(|n| Value::Int(n as i64)),
        Operator::Iter => iterate(receiver),
        Operator::Bool => truthiness(receiver).map(Value::Boolean),
        _ => Err(ExpressionError::unary_operands(
            op.method_name(),
            receiver.type_name(),
        )),
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Boolean(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
    )
}

fn binary(op: Operator, left: &Value, right: &Value) -> ExpressionResult<Value> {
    match (left, right) {
        (Value::Column(a), Value::Column(b)) => {
            Ok(Value::Column(a.zip_with(b, |x, y| scalar_binary(op, x, y))?))
        }
        (Value::Column(a), scalar) if is_scalar(scalar) => {
            Ok(Value::Column(a.map(|x| scalar_binary(op, x, scalar))?))
        }
        (scalar, Value::Column(b)) if is_scalar(scalar) => {
            Ok(Value::Column(b.map(|y| scalar_binary(op, scalar, y))?))
        }
        (Value::List(a), Value::List(b)) if op == Operator::Add => {
            Ok(Value::List(a.iter().chain(b).cloned().collect()))
        }
        (Value::Tuple(a), Value::Tuple(b)) if op == Operator::Add => {
            Ok(Value::Tuple(a.iter().chain(b).cloned().collect()))
        }
        _ => scalar_binary(op, left, right),
    }
}

fn scalar_binary(op: Operator, a: &Value, b: &Value) -> ExpressionResult<Value> {
    if op.is_comparison() {
        return compare(op, a, b);
    }
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => {
            // NULL AND false = false, NULL OR true = true, otherwise NULL
            match (op, a, b) {
                (Operator::And, Value::Boolean(false), _)
                | (Operator::And, _, Value::Boolean(false)) => Ok(Value::Boolean(false)),
                (Operator::Or, Value::Boolean(true), _) | (Operator::Or, _, Value::Boolean(true)) => {
                    Ok(Value::Boolean(true))
                }
                _ => Ok(Value::Null),
            }
        }
        (Value::Boolean(x), Value::Boolean(y))
            if matches!(op, Operator::And | Operator::Or | Operator::Xor) =>
        {
            Ok(Value::Boolean(match op {
                Operator::And => x & y,
                Operator::Or => x | y,
                _ => x ^ y,
            }))
        }
        (Value::String(x), Value::String(y)) if op == Operator::Add => {
            Ok(Value::String(format!("{}{}", x, y)))
        }
        (Value::String(s), Value::Int(n)) | (Value::Int(n), Value::String(s))
            if op == Operator::Mul =>
        {
            Ok(Value::String(s.repeat((*n).max(0) as usize)))
        }
        (Value::Float(_), _) | (_, Value::Float(_)) => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => float_binary(op, x, y),
            _ => Err(ExpressionError::binary_operands(
                op.method_name(),
                a.type_name(),
                b.type_name(),
            )),
        },
        _ => match (a.as_int(), b.as_int()) {
            (Some(x), Some(y)) => int_binary(op, x, y),
            _ => Err(ExpressionError::binary_operands(
                op.method_name(),
                a.type_name(),
                b.type_name(),
            )),
        },
    }
}

fn int_binary(op: Operator, x: i64, y: i64) -> ExpressionResult<Value> {
    let value = match op {
        Operator::Add => Value::Int(x.wrapping_add(y)),
        Operator::Sub => Value::Int(x.wrapping_sub(y)),
        Operator::Mul => Value::Int(x.wrapping_mul(y)),
        Operator::TrueDiv => {
            if y == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            Value::Float(x as f64 / y as f64)
        }
        Operator::FloorDiv => {
            if y == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            let q = x.wrapping_div(y);
            if x.wrapping_rem(y) != 0 && ((x < 0) != (y < 0)) {
                Value::Int(q - 1)
            } else {
                Value::Int(q)
            }
        }
        Operator::Mod => {
            if y == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            let r = x.wrapping_rem(y);
            if r != 0 && ((r < 0) != (y < 0)) {
                Value::Int(r + y)
            } else {
                Value::Int(r)
            }
        }
        Operator::Pow => match u32::try_from(y).ok().and_then(|e| x.checked_pow(e)) {
            Some(n) => Value::Int(n),
            None => Value::Float((x as f64).powf(y as f64)),
        },
        Operator::And => Value::Int(x & y),
        Operator::Or => Value::Int(x | y),
        Operator::Xor => Value::Int(x ^ y),
        Operator::LShift | Operator::RShift => {
            if !(0..64).contains(&y) {
                return Err(ExpressionError::invalid_argument(
                    op.method_name(),
                    format!("shift count {} out of range", y),
                ));
            }
            if op == Operator::LShift {
                Value::Int(x << y)
            } else {
                Value::Int(x >> y)
            }
        }
        _ => return Err(ExpressionError::binary_operands(op.method_name(), "int", "int")),
    };
    Ok(value)
}

fn float_binary(op: Operator, x: f64, y: f64) -> ExpressionResult<Value> {
    let value = match op {
        Operator::Add => x + y,
        Operator::Sub => x - y,
        Operator::Mul => x * y,
        Operator::TrueDiv | Operator::FloorDiv | Operator::Mod if y == 0.0 => {
            return Err(ExpressionError::DivisionByZero)
        }
        Operator::TrueDiv => x / y,
        Operator::FloorDiv => (x / y).floor(),
        Operator::Mod => {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        }
        Operator::Pow => x.powf(y),
        _ => {
            return Err(ExpressionError::binary_operands(
                op.method_name(),
                "float",
                "float",
            ))
        }
    };
    Ok(Value::Float(value))
}

fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

/// Comparison with NULL propagation; mismatched types are only equal-comparable
pub(crate) fn compare(op: Operator, a: &Value, b: &Value) -> ExpressionResult<Value> {
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }
    let result = match (ordering(a, b), op) {
        (Some(ord), Operator::Eq) => ord == Ordering::Equal,
        (Some(ord), Operator::Ne) => ord != Ordering::Equal,
        (Some(ord), Operator::Lt) => ord == Ordering::Less,
        (Some(ord), Operator::Le) => ord != Ordering::Greater,
        (Some(ord), Operator::Gt) => ord == Ordering::Greater,
        (Some(ord), Operator::Ge) => ord != Ordering::Less,
        (None, Operator::Eq) => a == b,
        (None, Operator::Ne) => a != b,
        _ => {
            return Err(ExpressionError::binary_operands(
                op.method_name(),
                a.type_name(),
                b.type_name(),
            ))
        }
    };
    Ok(Value::Boolean(result))
}

fn unary(op: Operator, value: &Value) -> ExpressionResult<Value> {
    let result = match (value, op) {
        (Value::Column(column), _) => Value::Column(column.map(|x| unary(op, x))?),
        (Value::Null, _) => Value::Null,
        // Booleans invert logically so comparison masks can be negated
        (Value::Boolean(b), Operator::Invert) => Value::Boolean(!b),
        (Value::Boolean(b), Operator::Neg) => Value::Int(-(*b as i64)),
        (Value::Boolean(b), _) => Value::Int(*b as i64),
        (Value::Int(n), Operator::Invert) => Value::Int(!n),
        (Value::Int(n), Operator::Neg) => Value::Int(n.wrapping_neg()),
        (Value::Int(n), Operator::Abs) => Value::Int(n.wrapping_abs()),
        (Value::Int(n), _) => Value::Int(*n),
        (Value::Float(x), Operator::Neg) => Value::Float(-x),
        (Value::Float(x), Operator::Abs) => Value::Float(x.abs()),
        (Value::Float(x), Operator::Pos) => Value::Float(*x),
        _ => {
            return Err(ExpressionError::unary_operands(
                op.method_name(),
                value.type_name(),
            ))
        }
    };
    Ok(result)
}

fn wrap_index(index: i64, len: usize) -> ExpressionResult<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ExpressionError::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

/// A boolean row mask, if `key` is one
fn as_mask(key: &Value) -> Option<ExpressionResult<Vec<bool>>> {
    match key {
        Value::Column(column)
            if column
                .values()
                .iter()
                .all(|v| matches!(v, Value::Boolean(_) | Value::Null)) =>
        {
            Some(column.to_mask())
        }
        Value::List(items)
            if !items.is_empty() && items.iter().all(|v| matches!(v, Value::Boolean(_))) =>
        {
            Some(Ok(items
                .iter()
                .map(|v| matches!(v, Value::Boolean(true)))
                .collect()))
        }
        _ => None,
    }
}

fn getitem_error(receiver: &Value, key: &Value) -> ExpressionError {
    ExpressionError::binary_operands(
        Operator::GetItem.method_name(),
        receiver.type_name(),
        key.type_name(),
    )
}

fn get_item(receiver: &Value, key: &Value) -> ExpressionResult<Value> {
    match (receiver, key) {
        (Value::List(items), Value::Int(i)) | (Value::Tuple(items), Value::Int(i)) => {
            Ok(items[wrap_index(*i, items.len())?].clone())
        }
        (Value::List(items), Value::Slice(slice)) => {
            Ok(Value::List(items[slice.indices(items.len())].to_vec()))
        }
        (Value::Tuple(items), Value::Slice(slice)) => {
            Ok(Value::Tuple(items[slice.indices(items.len())].to_vec()))
        }
        (Value::String(s), Value::Int(i)) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::String(chars[wrap_index(*i, chars.len())?].to_string()))
        }
        (Value::String(s), Value::Slice(slice)) => {
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::String(chars[slice.indices(chars.len())].iter().collect()))
        }
        (Value::Column(column), Value::Int(i)) => {
            Ok(column.values()[wrap_index(*i, column.len())?].clone())
        }
        (Value::Column(column), Value::Slice(slice)) => {
            Ok(Value::Column(column.slice(slice.indices(column.len()))))
        }
        (Value::Column(column), mask) => match as_mask(mask) {
            Some(mask) => {
                let mask = mask?;
                if mask.len() != column.len() {
                    return Err(ExpressionError::LengthMismatch {
                        expected: column.len(),
                        actual: mask.len(),
                    });
                }
                Ok(Value::Column(column.filter(&mask)))
            }
            None => Err(getitem_error(receiver, key)),
        },
        (Value::Frame(frame), key) => frame_item(frame, key),
        (Value::Indexer(indexer), key) => indexer_item(indexer, key),
        _ => Err(getitem_error(receiver, key)),
    }
}

fn project_names(frame: &Frame, names: &[Value]) -> ExpressionResult<Frame> {
    let positions = names
        .iter()
        .map(|name| match name {
            Value::String(s) => frame
                .position(s)
                .ok_or_else(|| ExpressionError::KeyNotFound(s.clone())),
            other => Err(ExpressionError::KeyNotFound(other.repr())),
        })
        .collect::<ExpressionResult<Vec<_>>>()?;
    Ok(frame.project(&positions))
}

fn frame_item(frame: &Frame, key: &Value) -> ExpressionResult<Value> {
    if let Some(mask) = as_mask(key) {
        return Ok(Value::Frame(frame.filter_rows(&mask?)?));
    }
    match key {
        Value::String(name) => frame
            .column(name)
            .cloned()
            .map(Value::Column)
            .ok_or_else(|| ExpressionError::KeyNotFound(name.clone())),
        Value::List(names) => Ok(Value::Frame(project_names(frame, names)?)),
        Value::Slice(slice) => Ok(Value::Frame(frame.slice_rows(slice.indices(frame.num_rows())))),
        _ => Err(getitem_error(&Value::Frame(frame.clone()), key)),
    }
}

fn select_rows(frame: &Frame, rows: &Value) -> ExpressionResult<Frame> {
    if let Some(mask) = as_mask(rows) {
        return frame.filter_rows(&mask?);
    }
    match rows {
        Value::Slice(slice) => Ok(frame.slice_rows(slice.indices(frame.num_rows()))),
        Value::Int(i) => Ok(frame.take_rows(&[wrap_index(*i, frame.num_rows())?])),
        other => Err(ExpressionError::invalid_argument(
            "indexer",
            format!("cannot select rows with {}", other.type_name()),
        )),
    }
}

fn indexer_item(indexer: &Indexer, key: &Value) -> ExpressionResult<Value> {
    let (rows, columns) = match key {
        Value::Tuple(parts) if parts.len() == 2 => (&parts[0], Some(&parts[1])),
        other => (other, None),
    };
    let frame = select_rows(&indexer.frame, rows)?;
    let Some(columns) = columns else {
        return Ok(Value::Frame(frame));
    };
    if let Some(mask) = as_mask(columns) {
        let mask = mask?;
        let positions: Vec<usize> = (0..frame.num_columns())
            .filter(|&p| mask.get(p).copied().unwrap_or(false))
            .collect();
        return Ok(Value::Frame(frame.project(&positions)));
    }
    match (indexer.kind, columns) {
        (_, Value::Slice(slice)) => {
            let positions: Vec<usize> = slice.indices(frame.num_columns()).collect();
            Ok(Value::Frame(frame.project(&positions)))
        }
        (IndexerKind::Label, Value::String(name)) => frame
            .column(name)
            .cloned()
            .map(Value::Column)
            .ok_or_else(|| ExpressionError::KeyNotFound(name.clone())),
        (IndexerKind::Label, Value::List(names)) => Ok(Value::Frame(project_names(&frame, names)?)),
        (IndexerKind::Position, Value::Int(i)) => {
            let position = wrap_index(*i, frame.num_columns())?;
            Ok(Value::Column(frame.columns()[position].clone()))
        }
        (IndexerKind::Position, Value::List(items)) => {
            let positions = items
                .iter()
                .map(|item| match item {
                    Value::Int(i) => wrap_index(*i, frame.num_columns()),
                    other => Err(ExpressionError::invalid_argument(
                        "iloc",
                        format!("expected integer positions, got {}", other.type_name()),
                    )),
                })
                .collect::<ExpressionResult<Vec<_>>>()?;
            Ok(Value::Frame(frame.project(&positions)))
        }
        (_, other) => Err(ExpressionError::invalid_argument(
            "indexer",
            format!("cannot select columns with {}", other.type_name()),
        )),
    }
}

fn set_item(receiver: &Value, key: &Value, value: &Value) -> ExpressionResult<Value> {
    match (receiver, key) {
        (Value::Frame(frame), Value::String(name)) => {
            let column = column_from_value(name, value, frame.num_rows())?;
            Ok(Value::Frame(frame.with_column(column)?))
        }
        (Value::List(items), Value::Int(i)) => {
            let mut items = items.clone();
            let position = wrap_index(*i, items.len())?;
            items[position] = value.clone();
            Ok(Value::List(items))
        }
        _ => Err(ExpressionError::binary_operands(
            Operator::SetItem.method_name(),
            receiver.type_name(),
            key.type_name(),
        )),
    }
}

fn del_item(receiver: &Value, key: &Value) -> ExpressionResult<Value> {
    match (receiver, key) {
        (Value::Frame(frame), Value::String(name)) => Ok(Value::Frame(frame.without_column(name)?)),
        (Value::List(items), Value::Int(i)) => {
            let mut items = items.clone();
            items.remove(wrap_index(*i, items.len())?);
            Ok(Value::List(items))
        }
        _ => Err(ExpressionError::binary_operands(
            Operator::DelItem.method_name(),
            receiver.type_name(),
            key.type_name(),
        )),
    }
}

fn contains(receiver: &Value, item: &Value) -> ExpressionResult<bool> {
    match (receiver, item) {
        (Value::List(items), item) | (Value::Tuple(items), item) => Ok(items.contains(item)),
        (Value::String(s), Value::String(needle)) => Ok(s.contains(needle.as_str())),
        (Value::Frame(frame), Value::String(name)) => Ok(frame.column(name).is_some()),
        (Value::Column(column), item) => Ok(column.values().contains(item)),
        _ => Err(ExpressionError::binary_operands(
            Operator::Contains.method_name(),
            receiver.type_name(),
            item.type_name(),
        )),
    }
}

fn length(value: &Value) -> ExpressionResult<usize> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Column(column) => Ok(column.len()),
        Value::Frame(frame) => Ok(frame.num_rows()),
        other => Err(ExpressionError::unary_operands(
            Operator::Len.method_name(),
            other.type_name(),
        )),
    }
}

fn iterate(value: &Value) -> ExpressionResult<Value> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(Value::List(items.clone())),
        Value::String(s) => Ok(Value::List(
            s.chars().map(|c| Value::String(c.to_string())).collect(),
        )),
        Value::Column(column) => Ok(Value::List(column.values().to_vec())),
        // Iterating a frame yields its column labels
        Value::Frame(frame) => Ok(Value::List(
            frame
                .columns()
                .iter()
                .map(|c| Value::String(c.name().to_string()))
                .collect(),
        )),
        other => Err(ExpressionError::unary_operands(
            Operator::Iter.method_name(),
            other.type_name(),
        )),
    }
}

/// Python truthiness; columns and frames have no single truth value
pub fn truthiness(value: &Value) -> ExpressionResult<bool> {
    match value {
        Value::Null => Ok(false),
        Value::Boolean(b) => Ok(*b),
        Value::Int(n) => Ok(*n != 0),
        Value::Float(x) => Ok(*x != 0.0),
        Value::String(s) => Ok(!s.is_empty()),
        Value::List(items) | Value::Tuple(items) => Ok(!items.is_empty()),
        Value::Function(_) => Ok(true),
        other => Err(ExpressionError::invalid_argument(
            Operator::Bool.method_name(),
            format!("the truth value of a {} is ambiguous", other.type_name()),
        )),
    }
}

/// Turn an evaluated value into a column of `rows` values named `name`
pub fn column_from_value(name: &str, value: &Value, rows: usize) -> ExpressionResult<Column> {
    match value {
        Value::Column(column) => {
            if column.len() != rows {
                return Err(ExpressionError::LengthMismatch {
                    expected: rows,
                    actual: column.len(),
                });
            }
            Ok(column.clone().renamed(name))
        }
        Value::List(items) => {
            if items.len() != rows {
                return Err(ExpressionError::LengthMismatch {
                    expected: rows,
                    actual: items.len(),
                });
            }
            Ok(Column::new(name, items.clone()))
        }
        scalar if is_scalar(scalar) => Ok(Column::broadcast(name, scalar.clone(), rows)),
        other => Err(ExpressionError::invalid_argument(
            name,
            format!("cannot assign a {} as a column", other.type_name()),
        )),
    }
}

fn frame_method(frame: &Frame, name: &str, args: &[Value], kwargs: &Kwargs) -> ExpressionResult<Value> {
    let n = match args.first().or_else(|| kwarg(kwargs, "n")) {
        None => 5,
        Some(Value::Int(n)) if *n >= 0 => *n as usize,
        Some(other) => {
            return Err(ExpressionError::invalid_argument(
                name,
                format!("n must be a non-negative int, got {}", other.repr()),
            ))
        }
    };
    Ok(Value::Frame(if name == "head" {
        frame.head(n)
    } else {
        frame.tail(n)
    }))
}

fn column_method(column: &Column, name: &str) -> ExpressionResult<Value> {
    match name {
        "isnull" | "notnull" => {
            let want_null = name == "isnull";
            column
                .map(|v| Ok(Value::Boolean(v.is_null() == want_null)))
                .map(Value::Column)
        }
        "abs" => unary(Operator::Abs, &Value::Column(column.clone())),
        _ => aggregate(column, name),
    }
}

/// Reduce a column to a scalar, skipping NULLs
pub fn aggregate(column: &Column, name: &str) -> ExpressionResult<Value> {
    let present: Vec<&Value> = column.values().iter().filter(|v| !v.is_null()).collect();
    let numeric_error = |v: &Value| {
        ExpressionError::invalid_argument(name, format!("expected numbers, got {}", v.type_name()))
    };
    match name {
        "count" => Ok(Value::Int(present.len() as i64)),
        "sum" => {
            if let Some(bad) = present.iter().find(|v| v.as_float().is_none()) {
                return Err(numeric_error(*bad));
            }
            if present.iter().any(|v| matches!(v, Value::Float(_))) {
                Ok(Value::Float(present.iter().filter_map(|v| v.as_float()).sum()))
            } else {
                Ok(Value::Int(
                    present
                        .iter()
                        .filter_map(|v| v.as_int())
                        .fold(0i64, i64::wrapping_add),
                ))
            }
        }
        "mean" => {
            if present.is_empty() {
                return Ok(Value::Null);
            }
            let values = present
                .iter()
                .map(|v| v.as_float().ok_or_else(|| numeric_error(*v)))
                .collect::<ExpressionResult<Vec<f64>>>()?;
            Ok(Value::Float(values.iter().sum::<f64>() / values.len() as f64))
        }
        "min" | "max" => {
            let wanted = if name == "min" {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            let mut best: Option<&Value> = None;
            for value in present {
                best = match best {
                    None => Some(value),
                    Some(current) => match ordering(value, current) {
                        Some(ord) if ord == wanted => Some(value),
                        Some(_) => Some(current),
                        None => {
                            return Err(ExpressionError::binary_operands(
                                name,
                                value.type_name(),
                                current.type_name(),
                            ))
                        }
                    },
                };
            }
            Ok(best.cloned().unwrap_or(Value::Null))
        }
        _ => Err(ExpressionError::MissingAttribute {
            type_name: "Column",
            attribute: name.to_string(),
        }),
    }
}

/// Apply `f` to a number, or to every number of a column
pub fn map_numeric(name: &str, value: &Value, f: fn(f64) -> f64) -> ExpressionResult<Value> {
    match value {
        Value::Column(column) => Ok(Value::Column(column.map(|v| map_numeric(name, v, f))?)),
        Value::Null => Ok(Value::Null),
        other => match other.as_float() {
            Some(x) => Ok(Value::Float(f(x))),
            None => Err(ExpressionError::unary_operands(name, other.type_name())),
        },
    }
}
