//! Pipeline stages.
//!
//! A stage is a table transformation whose arguments are dispatched through
//! an `ArgEvalMode` before the body runs:
//!
//! - **select / drop**: every positional argument is a column selector
//! - **mutate / filter / summarize**: arguments are called with the table
//! - **head / tail / bind_rows / bind_cols / inner_join**: positional
//!   arguments are evaluated with the table bound to `X`

pub mod bind;
pub mod dispatcher;
pub mod join;
pub mod mutate;
pub mod pipeline;
pub mod select;
pub mod subset;

pub use bind::{bind_cols, bind_cols_stage, bind_rows, bind_rows_stage, JoinKind};
pub use dispatcher::{
    ArgEvalMode, ArgIndices, BoundStage, Dispatcher, Evaluated, Stage, StageArgs, StageBody,
};
pub use join::{inner_join, inner_join_stage, JoinParameters};
pub use mutate::{filter, filter_stage, mutate, mutate_stage, summarize, summarize_stage};
pub use pipeline::Pipeline;
pub use select::{drop, drop_stage, select, select_stage};
pub use subset::{head, head_stage, tail, tail_stage};
