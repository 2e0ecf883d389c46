//! Classes: attribute dictionaries, method resolution order and constructors.
//!
//! A class is created once from a [`ClassNamespace`] (the result of evaluating a class body)
//! and a list of bases. Its attribute dictionary and constructor stay mutable afterwards so
//! that advisors can decorate the finished class.
//!
//! # Constructors
//! The constructor of a class is an ordered list of pre-construction hooks followed by an
//! optional body. [`ClassObject::instantiate`] resolves it along the method resolution order:
//!
//! 1. hooks of the class itself run first, most recently added first;
//! 2. if the class has no body of its own, resolution continues with the next class of the
//!    MRO, whose hooks run next;
//! 3. the first body found runs last, exactly once, with the new instance as receiver.
//!
//! A class without any body in its MRO accepts no constructor arguments. A body replacing an
//! inherited one reaches the inherited constructor through [`ClassObject::init_instance`].
use std::{collections::BTreeMap, fmt, sync::Arc};

use log::{debug, trace};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    args::Args,
    attrs::{AttrMap, HasAttrs},
    function::Function,
    instance::{InstanceObject, InstanceRef},
    utils::error::{XdError, XdResult},
    value::Value,
};

pub type ClassRef = Arc<ClassObject>;

/// Signature of a pre-construction hook.
pub type PreInitFn = dyn Fn(&InstanceRef) -> XdResult<()> + Send + Sync;

/// A labelled pre-construction hook.
#[derive(Clone)]
pub struct PreInitHook {
    label: String,
    hook: Arc<PreInitFn>,
}

impl PreInitHook {
    pub fn new<F>(label: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&InstanceRef) -> XdResult<()> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            hook: Arc::new(hook),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn run(&self, instance: &InstanceRef) -> XdResult<()> {
        (self.hook)(instance)
    }
}

impl fmt::Debug for PreInitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreInitHook").field(&self.label).finish()
    }
}

/// Constructor of a single class, without inheritance applied.
#[derive(Debug, Clone, Default)]
pub struct Constructor {
    /// Hooks in the order they were added.
    pre_init: Vec<PreInitHook>,
    body: Option<Function>,
}

impl Constructor {
    pub fn pre_init(&self) -> &[PreInitHook] {
        &self.pre_init
    }

    pub fn body(&self) -> Option<&Function> {
        self.body.as_ref()
    }
}

/// Result of evaluating a class body.
#[derive(Debug, Default)]
pub struct ClassNamespace {
    pub doc: Option<String>,
    pub attrs: BTreeMap<String, Value>,
    /// Constructor body, receives the new instance as first positional argument.
    pub init: Option<Function>,
}

pub struct ClassObject {
    id: Uuid,
    name: String,
    doc: Option<String>,
    bases: Vec<ClassRef>,
    /// Method resolution order without the class itself.
    ancestors: Vec<ClassRef>,
    attrs: AttrMap,
    constructor: RwLock<Constructor>,
}

/// C3 linearization of `bases`.
fn linearize(name: &str, bases: &[ClassRef]) -> XdResult<Vec<ClassRef>> {
    let mut sequences: Vec<Vec<ClassRef>> = bases
        .iter()
        .map(|base| {
            std::iter::once(base.clone())
                .chain(base.ancestors.iter().cloned())
                .collect()
        })
        .collect();
    sequences.push(bases.to_vec());

    let mut result = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        // A good head is a head that appears in no tail.
        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|c| Arc::ptr_eq(c, head)))
            })
            .cloned()
            .ok_or_else(|| XdError::InconsistentMro {
                class: name.to_string(),
            })?;

        for seq in sequences.iter_mut() {
            if Arc::ptr_eq(&seq[0], &candidate) {
                seq.remove(0);
            }
        }
        result.push(candidate);
    }
}

impl ClassObject {
    /// Create a class from an evaluated class body.
    pub fn create(
        name: impl Into<String>,
        bases: Vec<ClassRef>,
        namespace: ClassNamespace,
    ) -> XdResult<ClassRef> {
        let name = name.into();
        let ancestors = linearize(&name, &bases)?;

        let class = Arc::new(ClassObject {
            id: Uuid::new_v4(),
            doc: namespace.doc,
            bases,
            ancestors,
            attrs: AttrMap::from_entries(namespace.attrs),
            constructor: RwLock::new(Constructor {
                pre_init: Vec::new(),
                body: namespace.init,
            }),
            name,
        });

        debug!(
            "Created class '{}' ({}) with MRO [{}]",
            class.name,
            class.id,
            class.mro_names().join(", ")
        );
        Ok(class)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn bases(&self) -> &[ClassRef] {
        &self.bases
    }

    /// Method resolution order, starting with the class itself.
    pub fn mro(&self) -> impl Iterator<Item = &ClassObject> {
        std::iter::once(self).chain(self.ancestors.iter().map(|c| &**c))
    }

    pub fn mro_names(&self) -> Vec<String> {
        self.mro().map(|c| c.name.clone()).collect()
    }

    pub fn is_subclass_of(&self, other: &ClassObject) -> bool {
        self.mro().any(|c| std::ptr::eq(c, other))
    }

    /// Snapshot of the class's own constructor.
    pub fn constructor(&self) -> Constructor {
        self.constructor.read().clone()
    }

    pub fn add_pre_init(&self, hook: PreInitHook) {
        debug!(
            "Added pre-construction hook '{}' to class '{}'",
            hook.label(),
            self.name
        );
        self.constructor.write().pre_init.push(hook);
    }

    /// Replace the constructor body, returning the previous one.
    pub fn set_init(&self, body: Option<Function>) -> Option<Function> {
        std::mem::replace(&mut self.constructor.write().body, body)
    }

    fn resolve_constructor(&self) -> (Vec<PreInitHook>, Option<Function>) {
        let mut hooks = Vec::new();
        for class in self.mro() {
            let ctor = class.constructor.read();
            hooks.extend(ctor.pre_init.iter().rev().cloned());
            if let Some(body) = &ctor.body {
                return (hooks, Some(body.clone()));
            }
        }
        (hooks, None)
    }

    /// Create a new instance: run the resolved pre-construction hooks, then the body.
    ///
    /// Any failure aborts the construction and is returned unchanged.
    pub fn instantiate(self: &Arc<Self>, args: Args) -> XdResult<InstanceRef> {
        let instance = InstanceObject::new(self.clone());
        self.init_instance(&instance, args)?;
        Ok(instance)
    }

    /// Run the constructor of this class on an existing `instance` of it or of a subclass.
    ///
    /// A constructor body overriding an inherited one chains to it with
    /// `base.init_instance(instance, args)`, so the hooks of the base run as well.
    pub fn init_instance(&self, instance: &InstanceRef, args: Args) -> XdResult<()> {
        if !instance.is_instance_of(self) {
            return Err(XdError::NotAnInstance {
                class: self.name.clone(),
                found: instance.class().name().to_string(),
            });
        }

        let (hooks, body) = self.resolve_constructor();
        for hook in &hooks {
            trace!(
                "Running pre-construction hook '{}' of '{}' on a '{}' instance",
                hook.label(),
                self.name,
                instance.class().name()
            );
            hook.run(instance)?;
        }

        match body {
            Some(body) => {
                let mut args = args;
                args.prepend(Value::Instance(instance.clone()));
                body.call(args)?;
            }
            None if !args.is_empty() => {
                return Err(XdError::UnexpectedArguments {
                    class: self.name.clone(),
                    count: args.len() + args.keywords().len(),
                });
            }
            None => {}
        }

        Ok(())
    }
}

impl HasAttrs for ClassObject {
    fn attrs(&self) -> &AttrMap {
        &self.attrs
    }

    fn owner_name(&self) -> String {
        format!("class '{}'", self.name)
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.mro().find_map(|class| class.attrs.get(name))
    }
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mro", &self.mro_names())
            .field("attrs", &self.attrs)
            .finish()
    }
}
