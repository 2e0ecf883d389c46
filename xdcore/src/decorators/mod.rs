//! The three decorator kinds and their shared base.
//!
//! | Kind                                 | Hook signature                       | Fires                         |
//! |--------------------------------------|--------------------------------------|-------------------------------|
//! | [`class_level::ClassLevelDecorator`] | `decorate(method, class)`            | once, when the class is sealed |
//! | [`instance_level::InstanceLevelDecorator`] | `decorate(method, instance, class)` | once per instance, before its constructor body |
//! | [`method_level::MethodLevelDecorator`] | `decorate(method, args) -> value`  | on every call                  |
//!
//! Class- and instance-level decorators must be applied while a class statement is being
//! evaluated (see [`crate::advice`]). Hooks that do not override `decorate` fail with
//! [`xdobject::utils::error::XdError::NotImplemented`] the first time they would fire.
use strum::{Display, IntoStaticStr};
use xdobject::{function::Function, utils::error::XdResult};

pub mod base;
pub mod class_level;
pub mod instance_level;
pub mod method_level;

pub use base::BaseDecorator;
pub use class_level::{ClassLevelDecorator, ClassLevelHook};
pub use instance_level::{InstanceLevelDecorator, InstanceLevelHook};
pub use method_level::{MethodLevelDecorator, MethodLevelHook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum DecoratorKind {
    #[strum(serialize = "ClassLevelDecorator")]
    ClassLevel,
    #[strum(serialize = "InstanceLevelDecorator")]
    InstanceLevel,
    #[strum(serialize = "MethodLevelDecorator")]
    MethodLevel,
}

/// Something that can be applied to a function.
pub trait Decorator {
    fn kind(&self) -> DecoratorKind;

    /// Decorate `function`, returning the function defined in its place.
    fn apply(&self, function: Function) -> XdResult<Function>;
}

/// Label of the advisor registered by a decorator, as `Hook(function)`.
pub(crate) fn advisor_label(hook: &str, function: &Function) -> String {
    format!("{}({})", hook, function.qualname())
}
