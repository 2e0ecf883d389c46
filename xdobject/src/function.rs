//! Named callables with identity metadata.
use std::{fmt, sync::Arc};

use crate::{
    args::Args,
    attrs::{AttrMap, HasAttrs},
    class::ClassRef,
    method::BoundMethod,
    utils::error::XdResult,
    value::Value,
};

/// Signature of every function body.
pub type FunctionBody = dyn Fn(Args) -> XdResult<Value> + Send + Sync;

/// Identity metadata of a function. Wrappers copy it from the function they wrap so they are
/// indistinguishable under introspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMeta {
    pub name: String,
    pub qualname: String,
    pub module: String,
    pub doc: Option<String>,
}

struct FunctionInner {
    meta: FunctionMeta,
    attrs: AttrMap,
    wrapped: Option<Function>,
    body: Box<FunctionBody>,
}

/// A reference counted callable.
///
/// Cloning a [`Function`] clones the handle, not the function: use [`Function::ptr_eq`] to
/// test identity.
#[derive(Clone)]
pub struct Function(Arc<FunctionInner>);

/// Builder for functions carrying more metadata than a name.
pub struct FunctionBuilder {
    meta: FunctionMeta,
}

impl FunctionBuilder {
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.meta.doc = Some(doc.into());
        self
    }

    pub fn qualname(mut self, qualname: impl Into<String>) -> Self {
        self.meta.qualname = qualname.into();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.meta.module = module.into();
        self
    }

    pub fn body<F>(self, body: F) -> Function
    where
        F: Fn(Args) -> XdResult<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(FunctionInner {
            meta: self.meta,
            attrs: AttrMap::new(),
            wrapped: None,
            body: Box::new(body),
        }))
    }
}

impl Function {
    pub fn build(name: impl Into<String>) -> FunctionBuilder {
        let name = name.into();
        FunctionBuilder {
            meta: FunctionMeta {
                qualname: name.clone(),
                name,
                module: String::new(),
                doc: None,
            },
        }
    }

    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(Args) -> XdResult<Value> + Send + Sync + 'static,
    {
        Self::build(name).body(body)
    }

    /// Create a function wrapping `wrapped`.
    ///
    /// The new function takes over the identity metadata and a copy of the attribute dictionary
    /// of `wrapped`, and keeps a reference to it reachable through [`Function::wrapped`].
    pub fn wraps<F>(wrapped: &Function, body: F) -> Self
    where
        F: Fn(Args) -> XdResult<Value> + Send + Sync + 'static,
    {
        Function(Arc::new(FunctionInner {
            meta: wrapped.0.meta.clone(),
            attrs: AttrMap::from_entries(wrapped.0.attrs.snapshot()),
            wrapped: Some(wrapped.clone()),
            body: Box::new(body),
        }))
    }

    pub fn meta(&self) -> &FunctionMeta {
        &self.0.meta
    }

    pub fn name(&self) -> &str {
        &self.0.meta.name
    }

    pub fn qualname(&self) -> &str {
        &self.0.meta.qualname
    }

    pub fn module(&self) -> &str {
        &self.0.meta.module
    }

    pub fn doc(&self) -> Option<&str> {
        self.0.meta.doc.as_deref()
    }

    pub fn call(&self, args: Args) -> XdResult<Value> {
        (self.0.body)(args)
    }

    /// The function this one directly wraps, if it is a wrapper.
    pub fn wrapped(&self) -> Option<&Function> {
        self.0.wrapped.as_ref()
    }

    /// Follow the wrap chain down to the original function.
    pub fn innermost(&self) -> &Function {
        let mut current = self;
        while let Some(inner) = current.wrapped() {
            current = inner;
        }
        current
    }

    /// Bind this function to `receiver`. Calls through the result pass the receiver as first
    /// positional argument.
    pub fn bind(&self, receiver: Value, owner: Option<ClassRef>) -> BoundMethod {
        BoundMethod::new(self.clone(), Some(receiver), owner)
    }

    /// Attach this function to `owner` without a receiver.
    pub fn bind_class(&self, owner: ClassRef) -> BoundMethod {
        BoundMethod::new(self.clone(), None, Some(owner))
    }

    pub fn ptr_eq(a: &Function, b: &Function) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl HasAttrs for Function {
    fn attrs(&self) -> &AttrMap {
        &self.0.attrs
    }

    fn owner_name(&self) -> String {
        format!("function '{}'", self.qualname())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("qualname", &self.qualname())
            .field("attrs", &self.0.attrs)
            .field("wrapped", &self.wrapped().map(|w| w.qualname()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn double() -> Function {
        Function::build("double")
            .doc("Double the argument.")
            .module("tests")
            .body(|args| Ok(Value::Int(args.require(0, "double")?.as_int()? * 2)))
    }

    #[test]
    fn calls_body() {
        assert_eq!(double().call(args![21]).unwrap(), Value::Int(42));
    }

    #[test]
    fn wraps_copies_identity_and_attributes() {
        let inner = double();
        inner.setattr("tag", "math");
        let outer = Function::wraps(&inner, {
            let inner = inner.clone();
            move |args| inner.call(args)
        });

        assert_eq!(outer.meta(), inner.meta());
        assert_eq!(outer.doc(), Some("Double the argument."));
        assert_eq!(outer.getattr("tag").unwrap(), Value::from("math"));
        assert!(Function::ptr_eq(outer.wrapped().unwrap(), &inner));
        assert_eq!(outer.call(args![2]).unwrap(), Value::Int(4));

        // Attribute dictionaries are copied, not shared.
        outer.setattr("tag", "changed");
        assert_eq!(inner.getattr("tag").unwrap(), Value::from("math"));
    }

    #[test]
    fn innermost_follows_chain() {
        let inner = double();
        let middle = Function::wraps(&inner, |_| Ok(Value::None));
        let outer = Function::wraps(&middle, |_| Ok(Value::None));
        assert!(Function::ptr_eq(outer.innermost(), &inner));
        assert!(Function::ptr_eq(inner.innermost(), &inner));
    }

    #[test]
    fn bound_call_prepends_receiver() {
        let bound = double().bind(Value::Int(5), None);
        assert_eq!(bound.call(args![]).unwrap(), Value::Int(10));
    }
}
