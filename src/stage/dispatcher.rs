//! Argument-mode dispatch for stage bodies.
//!
//! A stage is defined once with an `ArgEvalMode`. Each time it runs, the
//! dispatcher turns the raw arguments into concrete ones: selector arguments
//! become `SelectorSpec`s, symbolic arguments are evaluated with the table
//! bound to symbol `0`, everything else is passed through untouched.

use crate::access::{Frame, Value};
use crate::expression::{
    Context, EvalOptions, Evaluator, ExpressionError, ExpressionResult, Operand,
};
use crate::selector::{normalize_selector, SelectorSpec};
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which positional arguments a mode applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArgIndices {
    #[default]
    None,
    All,
    Only(BTreeSet<usize>),
}

impl ArgIndices {
    pub fn contains(&self, index: usize) -> bool {
        match self {
            ArgIndices::None => false,
            ArgIndices::All => true,
            ArgIndices::Only(indices) => indices.contains(&index),
        }
    }
}

impl From<bool> for ArgIndices {
    fn from(all: bool) -> Self {
        if all {
            ArgIndices::All
        } else {
            ArgIndices::None
        }
    }
}

impl From<Vec<usize>> for ArgIndices {
    fn from(indices: Vec<usize>) -> Self {
        ArgIndices::Only(indices.into_iter().collect())
    }
}

impl FromStr for ArgIndices {
    type Err = ExpressionError;

    /// `"*"` for every argument, `""` for none, or a comma separated list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "*" => Ok(ArgIndices::All),
            "" => Ok(ArgIndices::None),
            list => list
                .split(',')
                .map(|part| {
                    part.trim().parse::<usize>().map_err(|_| {
                        ExpressionError::invalid_argument(
                            "ArgIndices",
                            format!("invalid argument index '{}'", part.trim()),
                        )
                    })
                })
                .collect::<ExpressionResult<BTreeSet<_>>>()
                .map(ArgIndices::Only),
        }
    }
}

/// How a stage's positional arguments are evaluated. Keyword arguments are
/// always evaluated symbolically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgEvalMode {
    pub symbolic: ArgIndices,
    pub selector: ArgIndices,
}

impl ArgEvalMode {
    /// Positional arguments passed to the body as given
    pub fn pass_through() -> Self {
        Self::default()
    }

    pub fn symbolic(indices: impl Into<ArgIndices>) -> Self {
        Self {
            symbolic: indices.into(),
            selector: ArgIndices::None,
        }
    }

    pub fn selector(indices: impl Into<ArgIndices>) -> Self {
        Self {
            symbolic: ArgIndices::None,
            selector: indices.into(),
        }
    }
}

/// A positional argument after dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    Value(Value),
    Selector(Vec<SelectorSpec>),
    Raw(Operand),
}

/// Concrete arguments handed to a stage body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageArgs {
    pub positional: Vec<Evaluated>,
    pub keywords: Vec<(String, Value)>,
}

impl StageArgs {
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// The evaluated positional argument at `index`
    pub fn value(&self, index: usize) -> Option<&Value> {
        match self.positional.get(index) {
            Some(Evaluated::Value(value)) => Some(value),
            Some(Evaluated::Raw(Operand::Scalar(value))) => Some(value),
            _ => None,
        }
    }

    /// Positional argument `index`, falling back to keyword `name`
    pub fn argument(&self, index: usize, name: &str) -> Option<&Value> {
        self.value(index).or_else(|| self.keyword(name))
    }

    /// All selector specs, flattened in argument order
    pub fn selectors(&self) -> ExpressionResult<Vec<SelectorSpec>> {
        let mut specs = Vec::new();
        for (index, arg) in self.positional.iter().enumerate() {
            match arg {
                Evaluated::Selector(found) => specs.extend(found.iter().cloned()),
                _ => {
                    return Err(ExpressionError::invalid_argument(
                        "selector",
                        format!("argument {} was not evaluated as a selector", index),
                    ))
                }
            }
        }
        Ok(specs)
    }
}

/// Prepares raw arguments according to an `ArgEvalMode`
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    mode: ArgEvalMode,
    evaluator: Evaluator,
}

impl Dispatcher {
    pub fn new(mode: ArgEvalMode, options: EvalOptions) -> Self {
        Self {
            mode,
            evaluator: Evaluator::new(options),
        }
    }

    pub fn mode(&self) -> &ArgEvalMode {
        &self.mode
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Evaluate `args` and `kwargs` against `table`. The selector path wins
    /// when an index is in both sets.
    pub fn prepare(
        &self,
        table: &Frame,
        args: &[Operand],
        kwargs: &[(String, Operand)],
    ) -> ExpressionResult<StageArgs> {
        let context = Context::for_table(table);
        let positional = args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                if self.mode.selector.contains(index) {
                    normalize_selector(arg, table, &self.evaluator, &context)
                        .map(Evaluated::Selector)
                } else if self.mode.symbolic.contains(index) {
                    self.evaluator
                        .evaluate_operand(arg, &context)
                        .map(Evaluated::Value)
                } else {
                    Ok(Evaluated::Raw(arg.clone()))
                }
            })
            .collect::<ExpressionResult<Vec<_>>>()?;
        let keywords = kwargs
            .iter()
            .map(|(key, arg)| Ok((key.clone(), self.evaluator.evaluate_operand(arg, &context)?)))
            .collect::<ExpressionResult<Vec<_>>>()?;
        Ok(StageArgs {
            positional,
            keywords,
        })
    }
}

/// Body of a stage, called with the incoming table and dispatched arguments
pub type StageBody = dyn Fn(&Frame, StageArgs) -> ExpressionResult<Frame> + Send + Sync;

/// A named table transformation with a fixed argument mode
#[derive(Clone)]
pub struct Stage {
    name: String,
    dispatcher: Dispatcher,
    body: Arc<StageBody>,
}

impl Stage {
    pub fn new<F>(name: impl Into<String>, mode: ArgEvalMode, body: F) -> Self
    where
        F: Fn(&Frame, StageArgs) -> ExpressionResult<Frame> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dispatcher: Dispatcher::new(mode, EvalOptions::default()),
            body: Arc::new(body),
        }
    }

    /// Replace the evaluation options, keeping the mode
    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.dispatcher = Dispatcher::new(self.dispatcher.mode.clone(), options);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Dispatch the arguments and run the body on `table`
    pub fn invoke(
        &self,
        table: &Frame,
        args: &[Operand],
        kwargs: &[(String, Operand)],
    ) -> ExpressionResult<Frame> {
        debug!(
            "running {} on {}x{} table",
            self.name,
            table.num_rows(),
            table.num_columns()
        );
        let prepared = self.dispatcher.prepare(table, args, kwargs)?;
        (self.body)(table, prepared)
    }

    /// Fix the arguments now, run later
    pub fn bind(self, args: Vec<Operand>, kwargs: Vec<(String, Operand)>) -> BoundStage {
        BoundStage {
            stage: self,
            args,
            kwargs,
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// A stage together with its raw arguments
#[derive(Debug, Clone)]
pub struct BoundStage {
    stage: Stage,
    args: Vec<Operand>,
    kwargs: Vec<(String, Operand)>,
}

impl BoundStage {
    pub fn name(&self) -> &str {
        self.stage.name()
    }

    pub fn apply(&self, table: &Frame) -> ExpressionResult<Frame> {
        self.stage.invoke(table, &self.args, &self.kwargs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Column;
    use crate::expression::X;
    use crate::selector::ColumnTarget;

    fn frame() -> Frame {
        Frame::new(vec![
            Column::from_values("x", [1, 2]),
            Column::from_values("y", [3, 4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_arg_indices_parse() -> ExpressionResult<()> {
        assert_eq!("*".parse::<ArgIndices>()?, ArgIndices::All);
        assert_eq!("".parse::<ArgIndices>()?, ArgIndices::None);
        assert_eq!("0, 2".parse::<ArgIndices>()?, ArgIndices::from(vec![0, 2]));
        assert!("0,a".parse::<ArgIndices>().is_err());
        assert_eq!(ArgIndices::from(true), ArgIndices::All);
        assert!(!ArgIndices::from(false).contains(0));
        Ok(())
    }

    #[test]
    fn test_selector_wins_over_symbolic() -> ExpressionResult<()> {
        let dispatcher = Dispatcher::new(
            ArgEvalMode {
                symbolic: ArgIndices::All,
                selector: ArgIndices::from(vec![0]),
            },
            EvalOptions::default(),
        );
        let args = vec![Operand::from(X.attr("x")), Operand::from(X.attr("y"))];
        let prepared = dispatcher.prepare(&frame(), &args, &[])?;
        assert_eq!(
            prepared.positional[0],
            Evaluated::Selector(vec![SelectorSpec::ColumnSet {
                columns: vec![ColumnTarget::Name("x".to_string())],
                inverted: false,
            }])
        );
        assert!(matches!(prepared.positional[1], Evaluated::Value(Value::Column(_))));
        Ok(())
    }

    #[test]
    fn test_pass_through_and_keywords() -> ExpressionResult<()> {
        let dispatcher = Dispatcher::default();
        let args = vec![Operand::from(X.attr("x"))];
        let kwargs = vec![("n".to_string(), Operand::from(X.attr("x").attr("size")))];
        let prepared = dispatcher.prepare(&frame(), &args, &kwargs)?;
        assert_eq!(prepared.positional[0], Evaluated::Raw(Operand::from(X.attr("x"))));
        assert_eq!(prepared.keyword("n"), Some(&Value::Int(2)));
        assert_eq!(prepared.argument(0, "n"), Some(&Value::Int(2)));
        Ok(())
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        let stage = Stage::new("noop", ArgEvalMode::symbolic(true), |table, _| Ok(table.clone()));
        let result = stage.invoke(&frame(), &[Operand::from(X.attr("w"))], &[]);
        assert!(matches!(result, Err(ExpressionError::MissingAttribute { .. })));
    }

    #[test]
    fn test_body_receives_prepared_arguments() -> ExpressionResult<()> {
        let stage = Stage::new("count", ArgEvalMode::symbolic(true), |table, args| {
            let n = args.value(0).and_then(Value::as_int).unwrap_or_default();
            Ok(table.head(n as usize))
        });
        let bound = stage.bind(vec![Operand::from(X.length() - 1)], Vec::new());
        assert_eq!(bound.name(), "count");
        assert_eq!(bound.apply(&frame())?.num_rows(), 1);
        Ok(())
    }
}
