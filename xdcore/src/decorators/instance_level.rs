use std::sync::Arc;

use xdobject::{
    class::{ClassRef, PreInitHook},
    function::Function,
    instance::InstanceRef,
    method::BoundMethod,
    utils::error::{XdError, XdResult},
    value::Value,
};

use super::{BaseDecorator, Decorator, DecoratorKind, advisor_label};
use crate::advice::{Advisor, add_class_advisor};

/// Hook of an [`InstanceLevelDecorator`].
pub trait InstanceLevelHook: Send + Sync + 'static {
    /// Name used in logs and errors.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Called once per new instance of `class`, before its constructor body. `method` is the
    /// decorated function bound to `instance`.
    fn decorate(
        &self,
        method: &BoundMethod,
        instance: &InstanceRef,
        class: &ClassRef,
    ) -> XdResult<()> {
        let _ = (method, instance, class);
        Err(XdError::NotImplemented {
            kind: DecoratorKind::InstanceLevel.into(),
            decorator: self.name(),
        })
    }
}

/// Adds a pre-construction hook to the enclosing class when its class statement completes.
///
/// Several instance-level decorators on one class compose: every hook fires once per
/// instance, the most recently applied first, and the constructor body still runs once after
/// all of them.
#[derive(Clone)]
pub struct InstanceLevelDecorator {
    hook: Arc<dyn InstanceLevelHook>,
}

impl InstanceLevelDecorator {
    pub fn new(hook: impl InstanceLevelHook) -> Self {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn hook(&self) -> &Arc<dyn InstanceLevelHook> {
        &self.hook
    }
}

impl Decorator for InstanceLevelDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::InstanceLevel
    }

    fn apply(&self, function: Function) -> XdResult<Function> {
        let hook = self.hook.clone();
        let target = function.clone();
        let label = advisor_label(&self.hook.name(), &function);

        add_class_advisor(Advisor::new(label.clone(), move |class: ClassRef| {
            // The hook lives inside the class: hold it weakly.
            let owner = Arc::downgrade(&class);
            let class_name = class.name().to_string();
            class.add_pre_init(PreInitHook::new(label, move |instance: &InstanceRef| {
                let class = owner.upgrade().ok_or_else(|| XdError::ClassDropped {
                    class: class_name.clone(),
                })?;
                let method = target.bind(Value::Instance(instance.clone()), Some(class.clone()));
                hook.decorate(&method, instance, &class)
            }));
            Ok(class)
        }))?;

        Ok(BaseDecorator::wrap(function).into_function())
    }
}

impl std::fmt::Debug for InstanceLevelDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("InstanceLevelDecorator")
            .field(&self.hook.name())
            .finish()
    }
}
