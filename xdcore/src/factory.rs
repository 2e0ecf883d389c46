//! Decorators built from plain closures.
//!
//! Instead of declaring a type and implementing one of the hook traits, a closure with the
//! signature of the hook's `decorate` method can be turned into a decorator directly:
//!
//! ```rust
//! use xdcore::factory::method_level_decorator;
//!
//! let logged = method_level_decorator(|method, args| {
//!     log::info!("calling {}", method.function().name());
//!     method.call(args)
//! });
//! # let _ = logged;
//! ```
//!
//! The resulting decorators behave exactly like ones wrapping a hand-written hook.
use xdobject::{
    args::Args,
    class::ClassRef,
    instance::InstanceRef,
    method::BoundMethod,
    utils::error::XdResult,
    value::Value,
};

use crate::decorators::{
    ClassLevelDecorator, ClassLevelHook, Decorator, InstanceLevelDecorator, InstanceLevelHook,
    MethodLevelDecorator, MethodLevelHook,
};

/// Adapter implementing a hook trait with a closure.
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F> {
    /// The hook is named after the closure's type until [`FnHook::named`] is used.
    pub fn new(f: F) -> Self {
        Self {
            name: std::any::type_name::<F>().to_string(),
            f,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> ClassLevelHook for FnHook<F>
where
    F: Fn(&BoundMethod, &ClassRef) -> XdResult<()> + Send + Sync + 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn decorate(&self, method: &BoundMethod, class: &ClassRef) -> XdResult<()> {
        (self.f)(method, class)
    }
}

impl<F> InstanceLevelHook for FnHook<F>
where
    F: Fn(&BoundMethod, &InstanceRef, &ClassRef) -> XdResult<()> + Send + Sync + 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn decorate(
        &self,
        method: &BoundMethod,
        instance: &InstanceRef,
        class: &ClassRef,
    ) -> XdResult<()> {
        (self.f)(method, instance, class)
    }
}

impl<F> MethodLevelHook for FnHook<F>
where
    F: Fn(&BoundMethod, Args) -> XdResult<Value> + Send + Sync + 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn decorate(&self, method: &BoundMethod, args: Args) -> XdResult<Value> {
        (self.f)(method, args)
    }
}

/// Decorator kinds that can be built from a closure `F`.
pub trait HookFactory<F>: Decorator + Sized {
    fn from_fn(f: F) -> Self;
}

impl<F> HookFactory<F> for ClassLevelDecorator
where
    FnHook<F>: ClassLevelHook,
{
    fn from_fn(f: F) -> Self {
        ClassLevelDecorator::new(FnHook::new(f))
    }
}

impl<F> HookFactory<F> for InstanceLevelDecorator
where
    FnHook<F>: InstanceLevelHook,
{
    fn from_fn(f: F) -> Self {
        InstanceLevelDecorator::new(FnHook::new(f))
    }
}

impl<F> HookFactory<F> for MethodLevelDecorator
where
    FnHook<F>: MethodLevelHook,
{
    fn from_fn(f: F) -> Self {
        MethodLevelDecorator::new(FnHook::new(f))
    }
}

/// Factory of decorators of kind `D`.
///
/// Closures passed to the returned factory need explicit parameter types; the dedicated
/// [`class_level_decorator`], [`instance_level_decorator`] and [`method_level_decorator`]
/// infer them.
pub fn make_factory<D, F>() -> fn(F) -> D
where
    D: HookFactory<F>,
{
    D::from_fn
}

/// Build a [`ClassLevelDecorator`] from a closure.
pub fn class_level_decorator<F>(f: F) -> ClassLevelDecorator
where
    F: Fn(&BoundMethod, &ClassRef) -> XdResult<()> + Send + Sync + 'static,
{
    ClassLevelDecorator::new(FnHook::new(f))
}

/// Build an [`InstanceLevelDecorator`] from a closure.
pub fn instance_level_decorator<F>(f: F) -> InstanceLevelDecorator
where
    F: Fn(&BoundMethod, &InstanceRef, &ClassRef) -> XdResult<()> + Send + Sync + 'static,
{
    InstanceLevelDecorator::new(FnHook::new(f))
}

/// Build a [`MethodLevelDecorator`] from a closure.
pub fn method_level_decorator<F>(f: F) -> MethodLevelDecorator
where
    F: Fn(&BoundMethod, Args) -> XdResult<Value> + Send + Sync + 'static,
{
    MethodLevelDecorator::new(FnHook::new(f))
}
