use std::sync::Arc;

use log::trace;
use xdobject::{
    args::Args,
    function::Function,
    method::BoundMethod,
    utils::error::{XdError, XdResult},
    value::Value,
};

use super::{BaseDecorator, Decorator, DecoratorKind};
use crate::config;

/// Hook of a [`MethodLevelDecorator`].
pub trait MethodLevelHook: Send + Sync + 'static {
    /// Name used in logs and errors.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Called on every call of the decorated function with the function bound to the
    /// receiver and the remaining arguments. Whatever it returns is the result of the call.
    fn decorate(&self, method: &BoundMethod, args: Args) -> XdResult<Value> {
        let _ = (method, args);
        Err(XdError::NotImplemented {
            kind: DecoratorKind::MethodLevel.into(),
            decorator: self.name(),
        })
    }
}

/// Replaces the decorated function with a dispatcher routing every call through the hook.
///
/// The first positional argument of each call is taken as the receiver: `self` when the
/// function is used as a method, the first argument when it is called on its own. Callers are
/// responsible for passing a meaningful receiver; a call without positional arguments fails
/// with [`XdError::MissingReceiver`].
#[derive(Clone)]
pub struct MethodLevelDecorator {
    hook: Arc<dyn MethodLevelHook>,
}

impl MethodLevelDecorator {
    pub fn new(hook: impl MethodLevelHook) -> Self {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn hook(&self) -> &Arc<dyn MethodLevelHook> {
        &self.hook
    }
}

impl Decorator for MethodLevelDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::MethodLevel
    }

    fn apply(&self, function: Function) -> XdResult<Function> {
        let hook = self.hook.clone();
        let target = function.clone();

        let dispatcher = BaseDecorator::with_body(function, move |args: Args| {
            let (receiver, rest) =
                args.split_receiver()
                    .ok_or_else(|| XdError::MissingReceiver {
                        function: target.qualname().to_string(),
                    })?;

            if config::current().trace_dispatch {
                trace!(
                    "Dispatching '{}' on {} through '{}' with {} argument(s)",
                    target.qualname(),
                    receiver,
                    hook.name(),
                    rest.len()
                );
            }

            let owner = receiver.class_of();
            let method = target.bind(receiver, owner);
            hook.decorate(&method, rest)
        });

        Ok(dispatcher.into_function())
    }
}

impl std::fmt::Debug for MethodLevelDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MethodLevelDecorator")
            .field(&self.hook.name())
            .finish()
    }
}
