//! Runtime values exchanged between functions, hooks and object attributes.
use std::{fmt, sync::Arc};

use strum::EnumIs;

use crate::{
    args::Args,
    attrs::HasAttrs,
    class::ClassRef,
    function::Function,
    instance::InstanceRef,
    method::BoundMethod,
    utils::{
        conf::OpaqueObject,
        error::{XdError, XdResult},
    },
};

/// A dynamically typed value.
///
/// Primitive variants compare by value, object variants ([`Value::Function`],
/// [`Value::Class`], [`Value::Instance`], [`Value::Opaque`]) compare by identity.
#[derive(Debug, Clone, Default, EnumIs)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Function(Function),
    Method(BoundMethod),
    Class(ClassRef),
    Instance(InstanceRef),
    Opaque(Arc<dyn OpaqueObject>),
}

impl Value {
    /// Wrap arbitrary Rust data into a value.
    pub fn opaque<T: OpaqueObject>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Function(_) => "function",
            Value::Method(_) => "method",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::Opaque(_) => "opaque",
        }
    }

    fn mismatch(&self, expected: &'static str) -> XdError {
        XdError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_bool(&self) -> XdResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_int(&self) -> XdResult<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(other.mismatch("int")),
        }
    }

    /// Integers are accepted and widened.
    pub fn as_float(&self) -> XdResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            other => Err(other.mismatch("float")),
        }
    }

    pub fn as_str(&self) -> XdResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch("str")),
        }
    }

    pub fn as_function(&self) -> XdResult<&Function> {
        match self {
            Value::Function(f) => Ok(f),
            other => Err(other.mismatch("function")),
        }
    }

    pub fn as_method(&self) -> XdResult<&BoundMethod> {
        match self {
            Value::Method(m) => Ok(m),
            other => Err(other.mismatch("method")),
        }
    }

    pub fn as_class(&self) -> XdResult<&ClassRef> {
        match self {
            Value::Class(c) => Ok(c),
            other => Err(other.mismatch("class")),
        }
    }

    pub fn as_instance(&self) -> XdResult<&InstanceRef> {
        match self {
            Value::Instance(i) => Ok(i),
            other => Err(other.mismatch("instance")),
        }
    }

    /// Retrieve the opaque payload if it holds a `T`.
    pub fn downcast_opaque<T: OpaqueObject>(&self) -> Option<Arc<T>> {
        match self {
            Value::Opaque(obj) => obj.clone().downcast_arc::<T>().ok(),
            _ => None,
        }
    }

    /// The class of an instance; other values have no class in this object model.
    pub fn class_of(&self) -> Option<ClassRef> {
        match self {
            Value::Instance(instance) => Some(instance.class().clone()),
            _ => None,
        }
    }

    /// Invoke a callable value.
    ///
    /// Calling a class instantiates it.
    pub fn call(&self, args: Args) -> XdResult<Value> {
        match self {
            Value::Function(f) => f.call(args),
            Value::Method(m) => m.call(args),
            Value::Class(c) => c.instantiate(args).map(Value::Instance),
            other => Err(XdError::NotCallable { kind: other.kind() }),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Method(_) | Value::Class(_)
        )
    }

    /// Attribute access. Functions found on an instance's class are returned bound to it.
    pub fn getattr(&self, name: &str) -> XdResult<Value> {
        match self {
            Value::Function(f) => f.getattr(name),
            Value::Method(m) => m.function().getattr(name),
            Value::Class(c) => c.getattr(name),
            Value::Instance(i) => i.get(name),
            other => Err(XdError::AttributeError {
                owner: other.kind().to_string(),
                name: name.to_string(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Function::ptr_eq(a, b),
            (Value::Method(a), Value::Method(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Arc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Function(func) => write!(f, "<function {}>", func.qualname()),
            Value::Method(m) => match m.owner() {
                Some(owner) => write!(f, "<method {}.{}>", owner.name(), m.function().name()),
                None => write!(f, "<method {}>", m.function().qualname()),
            },
            Value::Class(c) => write!(f, "<class '{}'>", c.name()),
            Value::Instance(i) => write!(f, "<{} object>", i.class().name()),
            Value::Opaque(o) => write!(f, "<opaque {:?}>", o),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<BoundMethod> for Value {
    fn from(value: BoundMethod) -> Self {
        Value::Method(value)
    }
}

impl From<ClassRef> for Value {
    fn from(value: ClassRef) -> Self {
        Value::Class(value)
    }
}

impl From<InstanceRef> for Value {
    fn from(value: InstanceRef) -> Self {
        Value::Instance(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
