//! Helpers shared by the tests of this workspace.
use crate::{
    attrs::HasAttrs,
    function::Function,
    utils::error::XdResult,
    value::Value,
};

/// Increment the counter `attr` stored on `ob` and return its new value.
pub fn mark(ob: &impl HasAttrs, attr: &str) -> i64 {
    ob.incr(attr).expect("counter attribute should hold an integer")
}

/// Current value of the counter `attr` stored on `ob`, zero when absent.
pub fn seen(ob: &impl HasAttrs, attr: &str) -> i64 {
    ob.attrs()
        .get(attr)
        .map(|value| value.as_int().expect("counter attribute should hold an integer"))
        .unwrap_or(0)
}

/// A method doing nothing.
pub fn noop(name: &str) -> Function {
    Function::new(name, |_| Ok(Value::None))
}

/// `square(self, a) = a * a`
pub fn square_method(name: &str) -> Function {
    Function::new(name, |args| -> XdResult<Value> {
        let a = args.require(1, "square")?.as_int()?;
        Ok(Value::Int(a * a))
    })
}
