//! In-memory columnar table.
//!
//! `Frame` is the concrete `Table` the pipeline stages operate on. Every
//! operation returns a new frame; a frame is never mutated in place.

use crate::access::{Column, Table, Value};
use crate::expression::{ExpressionError, ExpressionResult};
use std::collections::HashSet;
use std::fmt;

/// Ordered set of equally long, uniquely named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Create a frame, checking column lengths and name uniqueness
    pub fn new(columns: Vec<Column>) -> ExpressionResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ExpressionError::DuplicateColumn(column.name().to_string()));
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(ExpressionError::LengthMismatch {
                    expected: first.len(),
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Columns at the given positions, in the given order
    pub fn project(&self, positions: &[usize]) -> Frame {
        Frame {
            columns: positions.iter().map(|&p| self.columns[p].clone()).collect(),
        }
    }

    /// Replace a column of the same name, or append it
    pub fn with_column(&self, column: Column) -> ExpressionResult<Frame> {
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(ExpressionError::LengthMismatch {
                expected: self.num_rows(),
                actual: column.len(),
            });
        }
        let mut columns = self.columns.clone();
        match self.position(column.name()) {
            Some(position) => columns[position] = column,
            None => columns.push(column),
        }
        Ok(Frame { columns })
    }

    pub fn without_column(&self, name: &str) -> ExpressionResult<Frame> {
        let position = self
            .position(name)
            .ok_or_else(|| ExpressionError::KeyNotFound(name.to_string()))?;
        let mut columns = self.columns.clone();
        columns.remove(position);
        Ok(Frame { columns })
    }

    /// Keep rows where the mask is set
    pub fn filter_rows(&self, mask: &[bool]) -> ExpressionResult<Frame> {
        if mask.len() != self.num_rows() {
            return Err(ExpressionError::LengthMismatch {
                expected: self.num_rows(),
                actual: mask.len(),
            });
        }
        Ok(Frame {
            columns: self.columns.iter().map(|c| c.filter(mask)).collect(),
        })
    }

    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        Frame {
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
        }
    }

    pub fn slice_rows(&self, rows: std::ops::Range<usize>) -> Frame {
        Frame {
            columns: self.columns.iter().map(|c| c.slice(rows.clone())).collect(),
        }
    }

    pub fn head(&self, n: usize) -> Frame {
        self.slice_rows(0..n.min(self.num_rows()))
    }

    pub fn tail(&self, n: usize) -> Frame {
        let rows = self.num_rows();
        self.slice_rows(rows.saturating_sub(n)..rows)
    }

    /// Values of one row, in column order
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.values()[row].clone()).collect()
    }
}

impl Table for Frame {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn get_column(&self, name: &str) -> Option<Column> {
        self.column(name).cloned()
    }

    fn select_columns(&self, indices: &[usize]) -> Self {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        self.project(&sorted)
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.position(name)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = self.columns.iter().map(Column::name).collect();
        writeln!(f, "{}", header.join("\t"))?;
        for row in 0..self.num_rows() {
            let cells: Vec<String> = self.row(row).iter().map(Value::to_string).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2, 3]),
            Column::from_values("y", [6, 5, 4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_frame_validation() {
        let err = Frame::new(vec![
            Column::from_values("x", [1]),
            Column::from_values("x", [2]),
        ])
        .unwrap_err();
        assert_eq!(err, ExpressionError::DuplicateColumn("x".to_string()));

        let err = Frame::new(vec![
            Column::from_values("x", [1, 2]),
            Column::from_values("y", [2]),
        ])
        .unwrap_err();
        assert!(matches!(err, ExpressionError::LengthMismatch { .. }));
    }

    #[test]
    fn test_table_contract() {
        let frame = sample();
        assert_eq!(frame.column_names(), vec!["x", "y"]);
        assert_eq!(frame.column_count(), 2);
        assert_eq!(frame.column_position("y"), Some(1));
        assert!(frame.get_column("z").is_none());

        let selected = frame.select_columns(&[1, 0]);
        assert_eq!(selected.column_names(), vec!["x", "y"]);
        assert_eq!(frame.project(&[1, 0]).column_names(), vec!["y", "x"]);
    }

    #[test]
    fn test_with_and_without_column() -> ExpressionResult<()> {
        let frame = sample();
        let added = frame.with_column(Column::from_values("z", [0, 0, 0]))?;
        assert_eq!(added.column_names(), vec!["x", "y", "z"]);

        let replaced = frame.with_column(Column::from_values("x", [9, 9, 9]))?;
        assert_eq!(replaced.column_names(), vec!["x", "y"]);
        assert_eq!(replaced.column("x").unwrap().get(0), Some(&Value::Int(9)));

        assert!(frame.with_column(Column::from_values("z", [1])).is_err());
        assert_eq!(frame.without_column("x")?.column_names(), vec!["y"]);
        Ok(())
    }

    #[test]
    fn test_row_operations() -> ExpressionResult<()> {
        let frame = sample();
        assert_eq!(frame.head(2).num_rows(), 2);
        assert_eq!(frame.tail(1).row(0), vec![Value::Int(3), Value::Int(4)]);
        assert_eq!(frame.head(10).num_rows(), 3);
        let filtered = frame.filter_rows(&[false, true, true])?;
        assert_eq!(filtered.row(0), vec![Value::Int(2), Value::Int(5)]);
        assert!(frame.filter_rows(&[true]).is_err());
        Ok(())
    }

    #[test]
    fn test_display() {
        let frame = sample();
        assert_eq!(frame.to_string(), "x\ty\n1\t6\n2\t5\n3\t4\n");
    }
}
