use std::{fmt, sync::Arc};

use crate::{
    args::Args,
    attrs::{AttrMap, HasAttrs},
    class::{ClassObject, ClassRef},
    utils::error::{XdError, XdResult},
    value::Value,
};

pub type InstanceRef = Arc<InstanceObject>;

/// An instance of a class. Created through [`ClassObject::instantiate`].
pub struct InstanceObject {
    class: ClassRef,
    attrs: AttrMap,
}

impl InstanceObject {
    pub(crate) fn new(class: ClassRef) -> InstanceRef {
        Arc::new(Self {
            class,
            attrs: AttrMap::new(),
        })
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn is_instance_of(&self, class: &ClassObject) -> bool {
        self.class.is_subclass_of(class)
    }

    /// Attribute access with method binding.
    ///
    /// The instance dictionary is searched first, then the class MRO. Functions found on the
    /// class are returned as [`Value::Method`] bound to this instance.
    pub fn get(self: &Arc<Self>, name: &str) -> XdResult<Value> {
        if let Some(value) = self.attrs.get(name) {
            return Ok(value);
        }
        match self.class.lookup(name) {
            Some(Value::Function(function)) => Ok(Value::Method(
                function.bind(Value::Instance(self.clone()), Some(self.class.clone())),
            )),
            Some(value) => Ok(value),
            None => Err(XdError::AttributeError {
                owner: self.owner_name(),
                name: name.to_string(),
            }),
        }
    }

    /// Look up `name` and call it.
    pub fn call_method(self: &Arc<Self>, name: &str, args: Args) -> XdResult<Value> {
        self.get(name)?.call(args)
    }
}

impl HasAttrs for InstanceObject {
    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn owner_name(&self) -> String {
        format!("'{}' instance", self.class.name())
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).or_else(|| self.class.lookup(name))
    }
}

impl fmt::Debug for InstanceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceObject")
            .field("class", &self.class.name())
            .field("attrs", &self.attrs)
            .finish()
    }
}
