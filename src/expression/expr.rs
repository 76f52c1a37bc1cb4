//! Expression AST definitions.
//!
//! Nodes are built bottom-up and never evaluated on construction. Operators
//! and attribute access on an `Expr` only record what should happen later.

use crate::access::{Column, Frame, Function, Slice, Value};
use crate::expression::Operator;
use std::fmt;

/// Identifier a reference is looked up under in the evaluation context
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolId {
    Index(usize),
    Name(String),
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolId::Index(i) => write!(f, "{}", i),
            SymbolId::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<usize> for SymbolId {
    fn from(i: usize) -> Self {
        SymbolId::Index(i)
    }
}

impl From<&str> for SymbolId {
    fn from(name: &str) -> Self {
        SymbolId::Name(name.to_string())
    }
}

impl From<String> for SymbolId {
    fn from(name: String) -> Self {
        SymbolId::Name(name)
    }
}

/// Atomic symbol reference
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub id: SymbolId,
    /// Set by `!`; only the selector resolver reads it
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Tuple,
}

/// Anything that can sit in an operand position of a node
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Value),
    Expr(Expr),
    Sequence {
        kind: SequenceKind,
        items: Vec<Operand>,
    },
}

impl Operand {
    pub fn list(items: Vec<Operand>) -> Self {
        Operand::Sequence {
            kind: SequenceKind::List,
            items,
        }
    }

    pub fn tuple(items: Vec<Operand>) -> Self {
        Operand::Sequence {
            kind: SequenceKind::Tuple,
            items,
        }
    }

    /// Whether evaluating this operand needs a context
    pub fn is_symbolic(&self) -> bool {
        match self {
            Operand::Scalar(_) => false,
            Operand::Expr(_) => true,
            Operand::Sequence { items, .. } => items.iter().any(Operand::is_symbolic),
        }
    }
}

/// The deferred table reference, bound to symbol `0` when a stage runs
pub const X: Expr = Expr::Reference(Symbol {
    id: SymbolId::Index(0),
    inverted: false,
});

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Context lookup
    Reference(Symbol),

    /// Attribute lookup on the evaluated object
    Access { object: Box<Operand>, name: String },

    /// Call of the evaluated callee with evaluated operands
    Invocation {
        callee: Box<Operand>,
        args: Vec<Operand>,
        kwargs: Vec<(String, Operand)>,
    },
}

impl Expr {
    /// Create a reference to a context symbol
    pub fn symbol(id: impl Into<SymbolId>) -> Self {
        Expr::Reference(Symbol {
            id: id.into(),
            inverted: false,
        })
    }

    /// Create an attribute access on any operand
    pub fn access(object: impl Into<Operand>, name: impl Into<String>) -> Self {
        Expr::Access {
            object: Box::new(object.into()),
            name: name.into(),
        }
    }

    /// Create a call of any callee operand
    pub fn invoke(callee: impl Into<Operand>, args: Vec<Operand>) -> Self {
        Self::invoke_with(callee, args, Vec::new())
    }

    pub fn invoke_with(
        callee: impl Into<Operand>,
        args: Vec<Operand>,
        kwargs: Vec<(String, Operand)>,
    ) -> Self {
        Expr::Invocation {
            callee: Box::new(callee.into()),
            args,
            kwargs,
        }
    }

    pub fn attr(self, name: impl Into<String>) -> Self {
        Self::access(self, name)
    }

    pub fn call(self, args: Vec<Operand>) -> Self {
        Self::invoke(self, args)
    }

    pub fn call_with(self, args: Vec<Operand>, kwargs: Vec<(String, Operand)>) -> Self {
        Self::invoke_with(self, args, kwargs)
    }

    /// `self.name(*args)`
    pub fn method(self, name: impl Into<String>, args: Vec<Operand>) -> Self {
        self.attr(name).call(args)
    }

    fn apply(self, op: Operator, args: Vec<Operand>) -> Self {
        self.method(op.method_name(), args)
    }

    /// `self[key]`
    pub fn get(self, key: impl Into<Operand>) -> Self {
        self.apply(Operator::GetItem, vec![key.into()])
    }

    /// `self[key] = value`, evaluating to the updated container
    pub fn set(self, key: impl Into<Operand>, value: impl Into<Operand>) -> Self {
        self.apply(Operator::SetItem, vec![key.into(), value.into()])
    }

    /// `del self[key]`, evaluating to the updated container
    pub fn del(self, key: impl Into<Operand>) -> Self {
        self.apply(Operator::DelItem, vec![key.into()])
    }

    /// `item in self`
    pub fn contains(self, item: impl Into<Operand>) -> Self {
        self.apply(Operator::Contains, vec![item.into()])
    }

    /// `len(self)`
    pub fn length(self) -> Self {
        self.apply(Operator::Len, Vec::new())
    }

    /// `list(iter(self))`
    pub fn iterate(self) -> Self {
        self.apply(Operator::Iter, Vec::new())
    }

    /// `bool(self)`
    pub fn truthy(self) -> Self {
        self.apply(Operator::Bool, Vec::new())
    }

    pub fn eq(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Eq, vec![rhs.into()])
    }

    pub fn neq(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Ne, vec![rhs.into()])
    }

    pub fn lt(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Lt, vec![rhs.into()])
    }

    pub fn lt_eq(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Le, vec![rhs.into()])
    }

    pub fn gt(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Gt, vec![rhs.into()])
    }

    pub fn gt_eq(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Ge, vec![rhs.into()])
    }

    pub fn pow(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::Pow, vec![rhs.into()])
    }

    pub fn floor_div(self, rhs: impl Into<Operand>) -> Self {
        self.apply(Operator::FloorDiv, vec![rhs.into()])
    }

    pub fn abs(self) -> Self {
        self.apply(Operator::Abs, Vec::new())
    }

    pub fn pos(self) -> Self {
        self.apply(Operator::Pos, Vec::new())
    }

    /// Flip the `inverted` flag of a reference; any other node records `__invert__`
    pub fn invert(self) -> Self {
        match self {
            Expr::Reference(Symbol { id, inverted }) => Expr::Reference(Symbol {
                id,
                inverted: !inverted,
            }),
            other => other.apply(Operator::Invert, Vec::new()),
        }
    }

    /// The expression a selector should evaluate, and whether it was inverted.
    ///
    /// An inverted reference, or a top-level `__invert__` over another
    /// expression, selects every column except the ones it refers to.
    pub fn selector_target(&self) -> (&Expr, bool) {
        match self {
            Expr::Reference(symbol) => (self, symbol.inverted),
            Expr::Invocation {
                callee,
                args,
                kwargs,
            } if args.is_empty() && kwargs.is_empty() => match callee.as_ref() {
                Operand::Expr(Expr::Access { object, name })
                    if name == Operator::Invert.method_name() =>
                {
                    match object.as_ref() {
                        Operand::Expr(inner) => (inner, true),
                        _ => (self, false),
                    }
                }
                _ => (self, false),
            },
            _ => (self, false),
        }
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Operand>> std::ops::$trait<R> for Expr {
            type Output = Expr;

            fn $method(self, rhs: R) -> Expr {
                self.apply($op, vec![rhs.into()])
            }
        }
    };
}

binary_operator!(Add, add, Operator::Add);
binary_operator!(Sub, sub, Operator::Sub);
binary_operator!(Mul, mul, Operator::Mul);
binary_operator!(Div, div, Operator::TrueDiv);
binary_operator!(Rem, rem, Operator::Mod);
binary_operator!(BitAnd, bitand, Operator::And);
binary_operator!(BitOr, bitor, Operator::Or);
binary_operator!(BitXor, bitxor, Operator::Xor);
binary_operator!(Shl, shl, Operator::LShift);
binary_operator!(Shr, shr, Operator::RShift);

// Scalar on the left: record the reflected operator on the expression
macro_rules! reflected_operator {
    ($scalar:ty, $trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait<Expr> for $scalar {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                rhs.apply($op, vec![self.into()])
            }
        }
    };
}

macro_rules! reflected_arithmetic {
    ($($scalar:ty),*) => {
        $(
            reflected_operator!($scalar, Add, add, Operator::RAdd);
            reflected_operator!($scalar, Sub, sub, Operator::RSub);
            reflected_operator!($scalar, Mul, mul, Operator::RMul);
            reflected_operator!($scalar, Div, div, Operator::RTrueDiv);
            reflected_operator!($scalar, Rem, rem, Operator::RMod);
        )*
    };
}

reflected_arithmetic!(i32, i64, f64);

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.apply(Operator::Neg, Vec::new())
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.invert()
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

macro_rules! scalar_operand {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Operand {
                fn from(value: $source) -> Self {
                    Operand::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_operand!(bool, i32, i64, f64, &str, String, Slice, Column, Frame, Function);

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::list(items.into_iter().map(Into::into).collect())
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, kind: SequenceKind, items: &[Operand]) -> fmt::Result {
    let rendered: Vec<String> = items.iter().map(Operand::to_string).collect();
    match kind {
        SequenceKind::List => write!(f, "[{}]", rendered.join(", ")),
        SequenceKind::Tuple if rendered.len() == 1 => write!(f, "({},)", rendered[0]),
        SequenceKind::Tuple => write!(f, "({})", rendered.join(", ")),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(value) => write!(f, "{}", value.repr()),
            Operand::Expr(expr) => write!(f, "{}", expr),
            Operand::Sequence { kind, items } => write_items(f, *kind, items),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Reference(symbol) => {
                if symbol.inverted {
                    write!(f, "~")?;
                }
                write!(f, "Symbol({})", symbol.id)
            }
            Expr::Access { object, name } => write!(f, "getattr({}, '{}')", object, name),
            Expr::Invocation {
                callee,
                args,
                kwargs,
            } => {
                write!(f, "{}(*", callee)?;
                write_items(f, SequenceKind::Tuple, args)?;
                let kwargs: Vec<String> = kwargs
                    .iter()
                    .map(|(key, value)| format!("'{}': {}", key, value))
                    .collect();
                write!(f, ", **{{{}}})", kwargs.join(", "))
            }
        }
    }
}
