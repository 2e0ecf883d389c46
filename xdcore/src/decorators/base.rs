use xdobject::{args::Args, function::Function, utils::error::XdResult, value::Value};

/// A function standing in for the function it decorates.
///
/// The wrapper carries the identity metadata and attributes of the wrapped function, and
/// [`BaseDecorator::unwrap`] always returns the exact function that was wrapped. Unless built
/// with [`BaseDecorator::with_body`], calling the wrapper calls the wrapped function.
#[derive(Debug, Clone)]
pub struct BaseDecorator {
    wrapped: Function,
    function: Function,
}

impl BaseDecorator {
    /// Transparent wrapper around `func`.
    pub fn wrap(func: Function) -> Self {
        let target = func.clone();
        Self::with_body(func, move |args| target.call(args))
    }

    /// Wrapper around `func` whose calls run `body` instead.
    pub fn with_body<F>(func: Function, body: F) -> Self
    where
        F: Fn(Args) -> XdResult<Value> + Send + Sync + 'static,
    {
        Self {
            function: Function::wraps(&func, body),
            wrapped: func,
        }
    }

    pub fn unwrap(&self) -> &Function {
        &self.wrapped
    }

    /// The wrapper itself.
    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn into_function(self) -> Function {
        self.function
    }

    pub fn call(&self, args: Args) -> XdResult<Value> {
        self.function.call(args)
    }
}

impl From<BaseDecorator> for Function {
    fn from(value: BaseDecorator) -> Self {
        value.function
    }
}
