use std::sync::Arc;

use xdobject::{
    class::ClassRef,
    function::Function,
    method::BoundMethod,
    utils::error::{XdError, XdResult},
};

use super::{BaseDecorator, Decorator, DecoratorKind, advisor_label};
use crate::advice::{Advisor, add_class_advisor};

/// Hook of a [`ClassLevelDecorator`].
pub trait ClassLevelHook: Send + Sync + 'static {
    /// Name used in logs and errors.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Called once, right after the class holding the decorated method is created. `method`
    /// is the decorated function attached to `class` without a receiver.
    fn decorate(&self, method: &BoundMethod, class: &ClassRef) -> XdResult<()> {
        let _ = (method, class);
        Err(XdError::NotImplemented {
            kind: DecoratorKind::ClassLevel.into(),
            decorator: self.name(),
        })
    }
}

/// Runs its hook once per decorated method, when the enclosing class statement completes.
///
/// The class is passed through unchanged; hooks are free to mutate its attributes.
#[derive(Clone)]
pub struct ClassLevelDecorator {
    hook: Arc<dyn ClassLevelHook>,
}

impl ClassLevelDecorator {
    pub fn new(hook: impl ClassLevelHook) -> Self {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn hook(&self) -> &Arc<dyn ClassLevelHook> {
        &self.hook
    }
}

impl Decorator for ClassLevelDecorator {
    fn kind(&self) -> DecoratorKind {
        DecoratorKind::ClassLevel
    }

    fn apply(&self, function: Function) -> XdResult<Function> {
        let hook = self.hook.clone();
        let target = function.clone();
        add_class_advisor(Advisor::new(
            advisor_label(&self.hook.name(), &function),
            move |class: ClassRef| {
                let method = target.bind_class(class.clone());
                hook.decorate(&method, &class)?;
                Ok(class)
            },
        ))?;

        Ok(BaseDecorator::wrap(function).into_function())
    }
}

impl std::fmt::Debug for ClassLevelDecorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClassLevelDecorator")
            .field(&self.hook.name())
            .finish()
    }
}
