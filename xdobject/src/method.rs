use std::{fmt, sync::Arc};

use crate::{
    args::Args,
    attrs::{AttrMap, HasAttrs},
    class::ClassRef,
    function::Function,
    utils::error::XdResult,
    value::Value,
};

/// A function together with the receiver it was retrieved from.
///
/// Receiver-less methods (obtained with [`Function::bind_class`]) forward their arguments
/// untouched; bound methods pass the receiver as first positional argument.
#[derive(Clone)]
pub struct BoundMethod {
    function: Function,
    receiver: Option<Box<Value>>,
    owner: Option<ClassRef>,
}

impl BoundMethod {
    pub fn new(function: Function, receiver: Option<Value>, owner: Option<ClassRef>) -> Self {
        Self {
            function,
            receiver: receiver.map(Box::new),
            owner,
        }
    }

    /// The underlying function.
    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    /// Class the method was bound through.
    pub fn owner(&self) -> Option<&ClassRef> {
        self.owner.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn call(&self, mut args: Args) -> XdResult<Value> {
        if let Some(receiver) = &self.receiver {
            args.prepend(Value::clone(receiver));
        }
        self.function.call(args)
    }
}

impl HasAttrs for BoundMethod {
    fn attrs(&self) -> &AttrMap {
        self.function.attrs()
    }

    fn owner_name(&self) -> String {
        self.function.owner_name()
    }
}

impl PartialEq for BoundMethod {
    fn eq(&self, other: &Self) -> bool {
        let same_owner = match (&self.owner, &other.owner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        Function::ptr_eq(&self.function, &other.function)
            && self.receiver == other.receiver
            && same_owner
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("function", &self.function.qualname())
            .field("receiver", &self.receiver.as_ref().map(|r| r.to_string()))
            .field("owner", &self.owner.as_ref().map(|c| c.name()))
            .finish()
    }
}
