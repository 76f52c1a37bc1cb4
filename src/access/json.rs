//! JSON encoding of frames for the command line tool.
//!
//! Layout: `{"columns": [{"name": "x", "values": [1, 2, 3]}, ...]}`. Column
//! order in the file is the frame's column order.

use crate::access::{Column, Frame, Value};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct FrameFile {
    columns: Vec<ColumnFile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ColumnFile {
    name: String,
    values: Vec<serde_json::Value>,
}

fn from_json_value(value: serde_json::Value) -> Result<Value> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().context("number out of range")?),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(from_json_value)
                .collect::<Result<_>>()?,
        ),
        serde_json::Value::Object(_) => bail!("nested objects are not supported as cell values"),
    })
}

fn to_json_value(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(x) => serde_json::Value::from(*x),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(items) | Value::Tuple(items) => serde_json::Value::Array(
            items.iter().map(to_json_value).collect::<Result<_>>()?,
        ),
        other => bail!("cannot encode {} as JSON", other.type_name()),
    })
}

impl Frame {
    pub fn from_json_str(text: &str) -> Result<Frame> {
        let file: FrameFile = serde_json::from_str(text).context("invalid frame JSON")?;
        let columns = file
            .columns
            .into_iter()
            .map(|column| {
                let values = column
                    .values
                    .into_iter()
                    .map(from_json_value)
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("column '{}'", column.name))?;
                Ok(Column::new(column.name, values))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Frame::new(columns)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Frame> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Frame::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        let file = FrameFile {
            columns: self
                .columns()
                .iter()
                .map(|column| {
                    Ok(ColumnFile {
                        name: column.name().to_string(),
                        values: column.values().iter().map(to_json_value).collect::<Result<_>>()?,
                    })
                })
                .collect::<Result<_>>()?,
        };
        Ok(serde_json::to_string(&file)?)
    }
}
