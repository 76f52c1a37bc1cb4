use crate::access::{Column, Frame, Function};
use std::fmt;

/// Named arguments in call order
pub type Kwargs = Vec<(String, Value)>;

/// Look up a named argument by key
pub fn kwarg<'a>(kwargs: &'a Kwargs, name: &str) -> Option<&'a Value> {
    kwargs.iter().find(|(key, _)| key == name).map(|(_, value)| value)
}

/// Half-open slice bounds with Python clamping rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

impl Slice {
    /// The `:` slice covering everything
    pub fn full() -> Self {
        Self::default()
    }

    pub fn range(start: i64, stop: i64) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
        }
    }

    /// Concrete index range for a sequence of `len` items
    pub fn indices(&self, len: usize) -> std::ops::Range<usize> {
        let clamp = |bound: i64| -> usize {
            if bound < 0 {
                (len as i64 + bound).max(0) as usize
            } else {
                (bound as usize).min(len)
            }
        };
        let start = self.start.map(clamp).unwrap_or(0);
        let stop = self.stop.map(clamp).unwrap_or(len);
        start..stop.max(start)
    }
}

/// How an indexer interprets its column keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerKind {
    /// `loc`: columns addressed by name
    Label,
    /// `iloc`: columns addressed by position
    Position,
}

/// A `loc` / `iloc` view over a frame, resolved by `__getitem__`
#[derive(Debug, Clone, PartialEq)]
pub struct Indexer {
    pub frame: Frame,
    pub kind: IndexerKind,
}

/// Runtime values produced by evaluating expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Slice(Slice),
    Column(Column),
    Frame(Frame),
    Indexer(Indexer),
    Function(Function),
}

impl Value {
    /// Name of the runtime type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NoneType",
            Value::Boolean(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Slice(_) => "slice",
            Value::Column(_) => "Column",
            Value::Frame(_) => "Frame",
            Value::Indexer(_) => "Indexer",
            Value::Function(Function::Native(_)) => "function",
            Value::Function(Function::Method(_)) => "method",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Boolean(b) => Some(*b as i64 as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or tuple
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Source-like rendering, quoting strings
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("'{}'", s),
            Value::List(items) => format!(
                "[{}]",
                items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
            ),
            Value::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Value::Tuple(items) => format!(
                "({})",
                items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
            ),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::List(_) | Value::Tuple(_) => write!(f, "{}", self.repr()),
            Value::Slice(slice) => {
                let bound = |b: Option<i64>| b.map(|n| n.to_string()).unwrap_or_default();
                write!(f, "{}:{}", bound(slice.start), bound(slice.stop))
            }
            Value::Column(column) => write!(f, "Column({}, len={})", column.name(), column.len()),
            Value::Frame(frame) => write!(f, "{}", frame),
            Value::Indexer(indexer) => write!(f, "{:?}Indexer", indexer.kind),
            Value::Function(function) => write!(f, "{}", function),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Slice> for Value {
    fn from(slice: Slice) -> Self {
        Value::Slice(slice)
    }
}

impl From<Column> for Value {
    fn from(column: Column) -> Self {
        Value::Column(column)
    }
}

impl From<Frame> for Value {
    fn from(frame: Frame) -> Self {
        Value::Frame(frame)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_indices() {
        assert_eq!(Slice::full().indices(4), 0..4);
        assert_eq!(Slice::range(1, 3).indices(4), 1..3);
        assert_eq!(Slice::range(-2, 10).indices(4), 2..4);
        assert_eq!(Slice::range(3, 1).indices(4), 3..3);
        let tail = Slice {
            start: None,
            stop: Some(-1),
        };
        assert_eq!(tail.indices(4), 0..3);
    }

    #[test]
    fn test_value_repr() {
        assert_eq!(Value::from("x").repr(), "'x'");
        assert_eq!(Value::from(3).repr(), "3");
        assert_eq!(Value::Float(2.0).repr(), "2.0");
        assert_eq!(
            Value::List(vec![Value::from("a"), Value::Int(1)]).repr(),
            "['a', 1]"
        );
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).repr(), "(1,)");
        assert_eq!(Value::Null.to_string(), "None");
    }

    #[test]
    fn test_kwarg_lookup() {
        let kwargs: Kwargs = vec![("n".to_string(), Value::Int(2))];
        assert_eq!(kwarg(&kwargs, "n"), Some(&Value::Int(2)));
        assert_eq!(kwarg(&kwargs, "m"), None);
    }
}
