//! Resolution of selector specs into column positions.
//!
//! Every spec marks columns in a `ColumnVector`. A wildcard at argument
//! index `i` ranks every column `i + 1`, names, positions and column sets
//! rank 1, excludes mark -1. Drop mode negates every mark except excludes.
//! The selected columns are the ones holding the maximum rank, provided it
//! is not negative.
//!
//! Only names and wildcards record a requested order. A selection that
//! includes any column picked solely by position or expression comes out in
//! table order.

use crate::access::Table;
use crate::expression::{ExpressionError, ExpressionResult};
use crate::selector::spec::{validate, ColumnTarget, SelectorSpec};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Select,
    Drop,
}

impl SelectionMode {
    fn sign(&self) -> i64 {
        match self {
            SelectionMode::Select => 1,
            SelectionMode::Drop => -1,
        }
    }
}

/// One rank per table column: 0 unselected, positive selected, negative excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVector {
    ranks: Vec<i64>,
}

impl ColumnVector {
    pub fn new(len: usize) -> Self {
        Self::filled(len, 0)
    }

    pub fn filled(len: usize, rank: i64) -> Self {
        Self {
            ranks: vec![rank; len],
        }
    }

    pub fn ranks(&self) -> &[i64] {
        &self.ranks
    }

    /// Set a column's rank. Once negative, a column keeps its mark.
    pub fn mark(&mut self, position: usize, rank: i64) {
        let entry = &mut self.ranks[position];
        if *entry >= 0 {
            *entry = rank;
        }
    }

    /// Positions holding the maximum non-negative rank, in table order
    pub fn selected(&self) -> Vec<usize> {
        if self.ranks.iter().all(|&rank| rank == 0) {
            return Vec::new();
        }
        let Some(&max) = self.ranks.iter().max() else {
            return Vec::new();
        };
        self.ranks
            .iter()
            .enumerate()
            .filter(|&(_, &rank)| rank == max && rank >= 0)
            .map(|(position, _)| position)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Positions in the order a name or wildcard first selected them
    pub ordering: Vec<usize>,
    pub vector: ColumnVector,
}

impl Resolution {
    /// Selected positions in table order
    pub fn selected(&self) -> Vec<usize> {
        self.vector.selected()
    }

    /// Selected positions in requested order.
    ///
    /// Falls back to table order when some selected column was never named
    /// or covered by a wildcard.
    pub fn output_positions(&self) -> Vec<usize> {
        let selected = self.selected();
        if selected.iter().all(|p| self.ordering.contains(p)) {
            self.ordering
                .iter()
                .copied()
                .filter(|p| selected.contains(p))
                .collect()
        } else {
            selected
        }
    }
}

fn wrap_position(position: i64, count: usize) -> Option<usize> {
    let resolved = if position < 0 {
        count as i64 + position
    } else {
        position
    };
    (0..count as i64).contains(&resolved).then_some(resolved as usize)
}

fn name_position<T: Table + ?Sized>(table: &T, name: &str) -> ExpressionResult<usize> {
    table
        .column_position(name)
        .ok_or_else(|| ExpressionError::UnresolvableSelector(name.to_string()))
}

fn index_position(position: i64, count: usize) -> ExpressionResult<usize> {
    wrap_position(position, count)
        .ok_or_else(|| ExpressionError::UnresolvableSelector(position.to_string()))
}

/// Resolve selector specs against a table
pub fn resolve<T: Table + ?Sized>(
    table: &T,
    specs: &[SelectorSpec],
    mode: SelectionMode,
) -> ExpressionResult<Resolution> {
    validate(specs, table)?;

    let count = table.column_count();
    if specs.is_empty() {
        return Ok(Resolution {
            ordering: (0..count).collect(),
            vector: ColumnVector::filled(count, 1),
        });
    }

    let sign = mode.sign();
    let mut vector = ColumnVector::new(count);
    let mut ordering: Vec<usize> = Vec::new();
    for (index, spec) in specs.iter().enumerate() {
        let marks: Vec<(usize, i64)> = match spec {
            SelectorSpec::All => (0..count).map(|p| (p, sign * (index as i64 + 1))).collect(),
            SelectorSpec::Name(name) => vec![(name_position(table, name)?, sign)],
            SelectorSpec::Exclude(name) => vec![(name_position(table, name)?, -1)],
            SelectorSpec::Index(position) => vec![(index_position(*position, count)?, sign)],
            SelectorSpec::ColumnSet { columns, inverted } => {
                let targets = columns
                    .iter()
                    .map(|target| match target {
                        ColumnTarget::Name(name) => name_position(table, name),
                        ColumnTarget::Position(position) => index_position(*position, count),
                    })
                    .collect::<ExpressionResult<Vec<_>>>()?;
                if *inverted {
                    (0..count)
                        .map(|p| if targets.contains(&p) { (p, -sign) } else { (p, sign) })
                        .collect()
                } else {
                    targets.into_iter().map(|p| (p, sign)).collect()
                }
            }
        };
        let ordered = matches!(spec, SelectorSpec::All | SelectorSpec::Name(_));
        for (position, rank) in marks {
            vector.mark(position, rank);
            if ordered && rank > 0 && !ordering.contains(&position) {
                ordering.push(position);
            }
        }
        trace!("after {:?}: {:?}", spec, vector.ranks());
    }
    Ok(Resolution { ordering, vector })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Column, Frame};
    use crate::expression::SelectorViolation;

    fn frame() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2, 3]),
            Column::from_values("y", [6, 5, 4]),
            Column::from_values("z", [7, 6, 5]),
        ])
        .unwrap()
    }

    fn name(n: &str) -> SelectorSpec {
        SelectorSpec::Name(n.to_string())
    }

    fn set(names: &[&str], inverted: bool) -> SelectorSpec {
        SelectorSpec::ColumnSet {
            columns: names
                .iter()
                .map(|n| ColumnTarget::Name(n.to_string()))
                .collect(),
            inverted,
        }
    }

    fn select(specs: &[SelectorSpec]) -> ExpressionResult<Vec<usize>> {
        Ok(resolve(&frame(), specs, SelectionMode::Select)?.output_positions())
    }

    fn drop(specs: &[SelectorSpec]) -> ExpressionResult<Vec<usize>> {
        Ok(resolve(&frame(), specs, SelectionMode::Drop)?.selected())
    }

    #[test]
    fn test_empty_selects_everything() -> ExpressionResult<()> {
        assert_eq!(select(&[])?, vec![0, 1, 2]);
        assert_eq!(drop(&[])?, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_wildcard_with_exclude() -> ExpressionResult<()> {
        let specs = [SelectorSpec::All, SelectorSpec::Exclude("y".to_string())];
        assert_eq!(select(&specs)?, vec![0, 2]);
        Ok(())
    }

    #[test]
    fn test_names_keep_requested_order() -> ExpressionResult<()> {
        assert_eq!(select(&[name("z"), name("x")])?, vec![2, 0]);
        assert_eq!(select(&[SelectorSpec::Index(0), name("y")])?, vec![0, 1]);
        assert_eq!(select(&[SelectorSpec::Index(-1)])?, vec![2]);
        Ok(())
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            select(&[SelectorSpec::All, name("x")]),
            Err(ExpressionError::SelectorValidation(
                SelectorViolation::IncludeWithWildcard("x".to_string())
            ))
        );
        assert_eq!(
            select(&[SelectorSpec::Exclude("x".to_string())]),
            Err(ExpressionError::SelectorValidation(
                SelectorViolation::ExcludeWithoutWildcard("x".to_string())
            ))
        );
    }

    #[test]
    fn test_unresolvable_positions() {
        assert_eq!(
            select(&[SelectorSpec::Index(3)]),
            Err(ExpressionError::UnresolvableSelector("3".to_string()))
        );
        assert_eq!(
            select(&[set(&["w"], false)]),
            Err(ExpressionError::UnresolvableSelector("w".to_string()))
        );
    }

    #[test]
    fn test_inverted_sets_are_sticky() -> ExpressionResult<()> {
        let specs = [set(&["x"], true), set(&["y"], true)];
        assert_eq!(select(&specs)?, vec![2]);
        Ok(())
    }

    #[test]
    fn test_positions_come_out_in_table_order() -> ExpressionResult<()> {
        assert_eq!(select(&[SelectorSpec::Index(2), SelectorSpec::Index(0)])?, vec![0, 2]);
        assert_eq!(select(&[set(&["z", "x"], false)])?, vec![0, 2]);
        assert_eq!(select(&[set(&["z"], false), name("x")])?, vec![0, 2]);
        Ok(())
    }

    #[test]
    fn test_wildcard_records_table_order() -> ExpressionResult<()> {
        let resolution = resolve(
            &frame(),
            &[set(&["z"], false), SelectorSpec::All],
            SelectionMode::Select,
        )?;
        assert_eq!(resolution.vector.ranks(), &[2, 2, 2]);
        assert_eq!(resolution.ordering, vec![0, 1, 2]);
        assert_eq!(resolution.output_positions(), vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_unordered_survivor_falls_back_to_table_order() {
        let resolution = Resolution {
            ordering: vec![2],
            vector: ColumnVector {
                ranks: vec![1, 0, 1],
            },
        };
        assert_eq!(resolution.output_positions(), vec![0, 2]);
    }

    #[test]
    fn test_drop_mode() -> ExpressionResult<()> {
        assert_eq!(drop(&[name("x")])?, vec![1, 2]);
        assert_eq!(drop(&[set(&["x", "z"], false)])?, vec![1]);
        // Dropping everything except x
        assert_eq!(drop(&[set(&["x"], true)])?, vec![0]);
        assert_eq!(drop(&[SelectorSpec::All])?, Vec::<usize>::new());
        Ok(())
    }

    #[test]
    fn test_all_zero_vector_selects_nothing() -> ExpressionResult<()> {
        assert_eq!(select(&[set(&[], false)])?, Vec::<usize>::new());
        assert_eq!(drop(&[set(&[], false)])?, Vec::<usize>::new());
        Ok(())
    }

    #[test]
    fn test_column_vector_marks() {
        let mut vector = ColumnVector::new(2);
        vector.mark(0, -1);
        vector.mark(0, 3);
        vector.mark(1, 1);
        vector.mark(1, 2);
        assert_eq!(vector.ranks(), &[-1, 2]);
        assert_eq!(vector.selected(), vec![1]);
    }
}
