use crate::access::Column;

/// Capabilities the expression core needs from a tabular engine.
///
/// The selector resolver only looks at column names and counts; stages use
/// `get_column` and `select_columns` to build their outputs.
pub trait Table {
    /// Column names in table order
    fn column_names(&self) -> Vec<String>;

    fn column_count(&self) -> usize {
        self.column_names().len()
    }

    fn get_column(&self, name: &str) -> Option<Column>;

    /// A new table with exactly the given columns, in original relative order
    fn select_columns(&self, indices: &[usize]) -> Self
    where
        Self: Sized;

    /// Position of a column by name
    fn column_position(&self, name: &str) -> Option<usize> {
        self.column_names().iter().position(|n| n == name)
    }
}
