use crate::access::Value;
use crate::expression::{ExpressionError, ExpressionResult};
use std::sync::Arc;

/// A named sequence of values, one per row. Clones share the values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Arc<[Value]>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    /// Build a column from anything convertible into values
    pub fn from_values<T: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    /// A column repeating `value` for `len` rows
    pub fn broadcast(name: impl Into<String>, value: Value, len: usize) -> Self {
        Self::new(name, vec![value; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values.to_vec()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Rows at the given positions, in the given order
    pub fn take(&self, rows: &[usize]) -> Self {
        Self::new(
            self.name.clone(),
            rows.iter().map(|&row| self.values[row].clone()).collect(),
        )
    }

    /// Rows where the mask is set
    pub fn filter(&self, mask: &[bool]) -> Self {
        Self::new(
            self.name.clone(),
            self.values
                .iter()
                .zip(mask)
                .filter(|(_, &keep)| keep)
                .map(|(value, _)| value.clone())
                .collect(),
        )
    }

    pub fn slice(&self, rows: std::ops::Range<usize>) -> Self {
        Self::new(self.name.clone(), self.values[rows].to_vec())
    }

    /// Apply `f` to every value, keeping the column name
    pub fn map<F>(&self, mut f: F) -> ExpressionResult<Self>
    where
        F: FnMut(&Value) -> ExpressionResult<Value>,
    {
        let values = self.values.iter().map(&mut f).collect::<ExpressionResult<_>>()?;
        Ok(Self::new(self.name.clone(), values))
    }

    /// Pairwise combination with a column of the same length
    pub fn zip_with<F>(&self, other: &Column, mut f: F) -> ExpressionResult<Self>
    where
        F: FnMut(&Value, &Value) -> ExpressionResult<Value>,
    {
        if self.len() != other.len() {
            return Err(ExpressionError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| f(a, b))
            .collect::<ExpressionResult<_>>()?;
        Ok(Self::new(self.name.clone(), values))
    }

    /// Interpret the column as a row mask. NULL counts as false.
    pub fn to_mask(&self) -> ExpressionResult<Vec<bool>> {
        self.values
            .iter()
            .map(|value| match value {
                Value::Boolean(b) => Ok(*b),
                Value::Null => Ok(false),
                other => Err(ExpressionError::invalid_argument(
                    "mask",
                    format!("expected booleans, got {}", other.type_name()),
                )),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_basics() {
        let col = Column::from_values("x", [1, 2, 3]);
        assert_eq!(col.name(), "x");
        assert_eq!(col.len(), 3);
        assert_eq!(col.get(1), Some(&Value::Int(2)));
        assert_eq!(col.take(&[2, 0]).values(), &[Value::Int(3), Value::Int(1)]);
        assert_eq!(col.filter(&[true, false, true]).len(), 2);
        assert_eq!(col.slice(1..3).values(), &[Value::Int(2), Value::Int(3)]);
        assert_eq!(col.clone().renamed("q").name(), "q");
    }

    #[test]
    fn test_zip_length_mismatch() {
        let a = Column::from_values("a", [1, 2]);
        let b = Column::from_values("b", [1]);
        let err = a.zip_with(&b, |x, _| Ok(x.clone())).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_to_mask() {
        let col = Column::new("m", vec![Value::Boolean(true), Value::Null, Value::Boolean(false)]);
        assert_eq!(col.to_mask().unwrap(), vec![true, false, false]);
        assert!(Column::from_values("x", [1]).to_mask().is_err());
    }

    #[test]
    fn test_clone_shares_values() {
        let col = Column::from_values("x", [1, 2, 3]);
        let renamed = col.clone().renamed("y");
        assert!(Arc::ptr_eq(&col.values, &renamed.values));
        assert!(!Arc::ptr_eq(&col.values, &col.take(&[0, 1, 2]).values));
    }
}
