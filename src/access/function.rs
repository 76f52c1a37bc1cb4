use crate::access::{Kwargs, Value};
use crate::expression::ExpressionResult;
use std::fmt;
use std::sync::Arc;

/// Signature of a native function callable from expressions
pub type NativeFn = dyn Fn(&[Value], &Kwargs) -> ExpressionResult<Value> + Send + Sync;

/// A named native function
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> ExpressionResult<Value> {
        (self.func)(args, kwargs)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction").field("name", &self.name).finish()
    }
}

/// A method looked up on a value, waiting to be called
#[derive(Debug, Clone, PartialEq)]
pub struct BoundMethod {
    pub receiver: Box<Value>,
    pub name: String,
}

/// Invocable runtime values
#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFunction),
    Method(BoundMethod),
}

impl Function {
    /// Wrap a closure as a named native function
    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &Kwargs) -> ExpressionResult<Value> + Send + Sync + 'static,
    {
        Function::Native(NativeFunction {
            name: name.into(),
            func: Arc::new(func),
        })
    }

    pub fn method(receiver: Value, name: impl Into<String>) -> Self {
        Function::Method(BoundMethod {
            receiver: Box::new(receiver),
            name: name.into(),
        })
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native(a), Function::Native(b)) => {
                a.name == b.name && Arc::ptr_eq(&a.func, &b.func)
            }
            (Function::Method(a), Function::Method(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native(native) => write!(f, "<function {}>", native.name),
            Function::Method(method) => write!(
                f,
                "<bound method {} of {}>",
                method.name,
                method.receiver.type_name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_function() {
        let double = Function::native("double", |args, _| {
            Ok(Value::Int(args[0].as_int().unwrap_or_default() * 2))
        });
        let Function::Native(native) = &double else {
            panic!("expected native function");
        };
        assert_eq!(native.call(&[Value::Int(4)], &Kwargs::new()).unwrap(), Value::Int(8));
        assert_eq!(double.to_string(), "<function double>");
        assert_eq!(double.clone(), double);
    }

    #[test]
    fn test_bound_method_display() {
        let method = Function::method(Value::Int(1), "__add__");
        assert_eq!(method.to_string(), "<bound method __add__ of int>");
    }
}
