//! Sequential composition of bound stages.

use crate::access::Frame;
use crate::expression::ExpressionResult;
use crate::stage::BoundStage;
use log::debug;
use std::ops::Shr;

/// Stages run in order, each on the previous stage's output
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoundStage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: BoundStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage; the first failure aborts the run
    pub fn run(&self, table: &Frame) -> ExpressionResult<Frame> {
        let mut current = table.clone();
        for (step, stage) in self.stages.iter().enumerate() {
            current = stage.apply(&current)?;
            debug!(
                "step {} ({}) -> {}x{}",
                step,
                stage.name(),
                current.num_rows(),
                current.num_columns()
            );
        }
        Ok(current)
    }
}

impl Shr<BoundStage> for Pipeline {
    type Output = Pipeline;

    fn shr(self, stage: BoundStage) -> Pipeline {
        self.then(stage)
    }
}

impl FromIterator<BoundStage> for Pipeline {
    fn from_iter<I: IntoIterator<Item = BoundStage>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}
