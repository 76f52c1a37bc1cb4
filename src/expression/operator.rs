//! Operator definitions for expressions.
//!
//! Every operator applied to an expression is recorded as an
//! `Invocation(Access(self, method_name), operands)` node. This enum is the
//! closed list of method names that may appear in such nodes.

/// Operators that can be intercepted on an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,

    // Reflected arithmetic (scalar on the left)
    RAdd,
    RSub,
    RMul,
    RTrueDiv,
    RFloorDiv,
    RMod,
    RPow,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Bitwise / logical
    And,
    Or,
    Xor,
    LShift,
    RShift,
    Invert,

    // Unary arithmetic
    Neg,
    Pos,
    Abs,

    // Container protocol
    GetItem,
    SetItem,
    DelItem,
    Contains,
    Len,
    Iter,

    // Boolean coercion
    Bool,
}

impl Operator {
    pub const ALL: [Operator; 36] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::TrueDiv,
        Operator::FloorDiv,
        Operator::Mod,
        Operator::Pow,
        Operator::RAdd,
        Operator::RSub,
        Operator::RMul,
        Operator::RTrueDiv,
        Operator::RFloorDiv,
        Operator::RMod,
        Operator::RPow,
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::LShift,
        Operator::RShift,
        Operator::Invert,
        Operator::Neg,
        Operator::Pos,
        Operator::Abs,
        Operator::GetItem,
        Operator::SetItem,
        Operator::DelItem,
        Operator::Contains,
        Operator::Len,
        Operator::Iter,
        Operator::Bool,
    ];

    /// Attribute name the operator is recorded under
    pub fn method_name(&self) -> &'static str {
        match self {
            Operator::Add => "__add__",
            Operator::Sub => "__sub__",
            Operator::Mul => "__mul__",
            Operator::TrueDiv => "__truediv__",
            Operator::FloorDiv => "__floordiv__",
            Operator::Mod => "__mod__",
            Operator::Pow => "__pow__",
            Operator::RAdd => "__radd__",
            Operator::RSub => "__rsub__",
            Operator::RMul => "__rmul__",
            Operator::RTrueDiv => "__rtruediv__",
            Operator::RFloorDiv => "__rfloordiv__",
            Operator::RMod => "__rmod__",
            Operator::RPow => "__rpow__",
            Operator::Eq => "__eq__",
            Operator::Ne => "__ne__",
            Operator::Lt => "__lt__",
            Operator::Le => "__le__",
            Operator::Gt => "__gt__",
            Operator::Ge => "__ge__",
            Operator::And => "__and__",
            Operator::Or => "__or__",
            Operator::Xor => "__xor__",
            Operator::LShift => "__lshift__",
            Operator::RShift => "__rshift__",
            Operator::Invert => "__invert__",
            Operator::Neg => "__neg__",
            Operator::Pos => "__pos__",
            Operator::Abs => "__abs__",
            Operator::GetItem => "__getitem__",
            Operator::SetItem => "__setitem__",
            Operator::DelItem => "__delitem__",
            Operator::Contains => "__contains__",
            Operator::Len => "__len__",
            Operator::Iter => "__iter__",
            Operator::Bool => "__bool__",
        }
    }

    pub fn from_method_name(name: &str) -> Option<Operator> {
        Operator::ALL.iter().copied().find(|op| op.method_name() == name)
    }

    /// Number of operands besides the receiver
    pub fn arity(&self) -> usize {
        match self {
            Operator::Invert
            | Operator::Neg
            | Operator::Pos
            | Operator::Abs
            | Operator::Len
            | Operator::Iter
            | Operator::Bool => 0,
            Operator::SetItem => 2,
            _ => 1,
        }
    }

    /// For a reflected operator, the forward operator with operands swapped
    pub fn unreflected(&self) -> Option<Operator> {
        match self {
            Operator::RAdd => Some(Operator::Add),
            Operator::RSub => Some(Operator::Sub),
            Operator::RMul => Some(Operator::Mul),
            Operator::RTrueDiv => Some(Operator::TrueDiv),
            Operator::RFloorDiv => Some(Operator::FloorDiv),
            Operator::RMod => Some(Operator::Mod),
            Operator::RPow => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }

    /// Operators applied elementwise between two operands
    pub fn is_elementwise_binary(&self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Sub
                | Operator::Mul
                | Operator::TrueDiv
                | Operator::FloorDiv
                | Operator::Mod
                | Operator::Pow
                | Operator::And
                | Operator::Or
                | Operator::Xor
                | Operator::LShift
                | Operator::RShift
        ) || self.is_comparison()
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add | Operator::RAdd => "+",
            Operator::Sub | Operator::RSub => "-",
            Operator::Mul | Operator::RMul => "*",
            Operator::TrueDiv | Operator::RTrueDiv => "/",
            Operator::FloorDiv | Operator::RFloorDiv => "//",
            Operator::Mod | Operator::RMod => "%",
            Operator::Pow | Operator::RPow => "**",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Xor => "^",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::Invert => "~",
            Operator::Neg => "-",
            Operator::Pos => "+",
            Operator::Abs => "abs",
            Operator::GetItem => "[]",
            Operator::SetItem => "[]=",
            Operator::DelItem => "del",
            Operator::Contains => "in",
            Operator::Len => "len",
            Operator::Iter => "iter",
            Operator::Bool => "bool",
        }
    }
}
