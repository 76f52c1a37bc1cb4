//! Runtime value model.
//!
//! This module provides the concrete data the expression core works on:
//!
//! - **Value**: everything an expression can evaluate to
//! - **Column**: a named vector of values
//! - **Frame**: an in-memory table of columns implementing `Table`
//! - **Table**: the capability contract the selector resolver and stages rely on
//! - **Function**: native functions and bound methods usable as callees

pub mod column;
pub mod frame;
pub mod function;
pub mod json;
pub mod table;
pub mod value;

pub use column::Column;
pub use frame::Frame;
pub use function::{BoundMethod, Function, NativeFn, NativeFunction};
pub use table::Table;
pub use value::{kwarg, Indexer, IndexerKind, Kwargs, Slice, Value};
