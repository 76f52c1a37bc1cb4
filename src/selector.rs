//! Column selectors.
//!
//! Stage arguments such as `"*"`, `"-y"`, `2`, `X.x` or `!X.y` are first
//! normalized into `SelectorSpec`s against the table, then resolved into an
//! ordered list of column positions.

pub mod resolver;
pub mod spec;

pub use resolver::{resolve, ColumnVector, Resolution, SelectionMode};
pub use spec::{normalize_selector, validate, ColumnTarget, SelectorSpec};
