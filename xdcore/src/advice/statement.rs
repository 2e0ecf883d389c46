use log::debug;
use xdobject::{
    class::{ClassNamespace, ClassObject, ClassRef},
    function::Function,
    utils::error::XdResult,
    value::Value,
};

use super::{AdvisoryScope, flush};
use crate::decorators::Decorator;

/// A class statement: declare the class, evaluate its body, then seal it.
///
/// ```rust
/// use xdcore::advice::ClassStatement;
/// use xdobject::{function::Function, value::Value};
///
/// let class = ClassStatement::new("Greeter")
///     .doc("Says hello.")
///     .define(|body| {
///         body.attr("greeting", "hello");
///         body.def(Function::new("greet", |_| Ok(Value::from("hello"))));
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(class.doc(), Some("Says hello."));
/// ```
#[derive(Debug)]
pub struct ClassStatement {
    name: String,
    bases: Vec<ClassRef>,
    doc: Option<String>,
}

impl ClassStatement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            doc: None,
        }
    }

    pub fn base(mut self, base: &ClassRef) -> Self {
        self.bases.push(base.clone());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Evaluate `body` inside a fresh advisory scope, create the class, then apply every advisor
    /// registered by the body. Returns the class produced by the last advisor.
    ///
    /// If the body or class creation fails, the advisors registered so far are discarded. The
    /// scope stays sealed while the advisors run, so advisors cannot register further ones.
    pub fn define<F>(self, body: F) -> XdResult<ClassRef>
    where
        F: FnOnce(&mut ClassBody) -> XdResult<()>,
    {
        let mut scope = AdvisoryScope::open(&self.name);
        let mut class_body = ClassBody {
            class_name: self.name.clone(),
            namespace: ClassNamespace {
                doc: self.doc,
                ..Default::default()
            },
        };

        body(&mut class_body)?;

        let class = ClassObject::create(self.name, self.bases, class_body.namespace)?;
        let advisors = scope.seal();
        debug!(
            "Sealing class '{}' with {} advisor(s)",
            class.name(),
            advisors.len()
        );
        let class = flush(class, advisors)?;
        scope.close();
        Ok(class)
    }
}

/// Namespace being filled by a class body.
#[derive(Debug)]
pub struct ClassBody {
    class_name: String,
    namespace: ClassNamespace,
}

impl ClassBody {
    /// Name of the class being defined.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn doc(&mut self, doc: impl Into<String>) -> &mut Self {
        self.namespace.doc = Some(doc.into());
        self
    }

    pub fn attr(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.namespace.attrs.insert(name.into(), value.into());
        self
    }

    /// Define `function` under its own name.
    pub fn def(&mut self, function: Function) -> &mut Self {
        let name = function.name().to_string();
        self.attr(name, function)
    }

    /// Decorate `function` with `decorator` and define the result under the function's name.
    pub fn def_with<D>(&mut self, decorator: &D, function: Function) -> XdResult<&mut Self>
    where
        D: Decorator + ?Sized,
    {
        let decorated = decorator.apply(function)?;
        Ok(self.def(decorated))
    }

    /// Set the constructor body. It receives the new instance as first positional argument.
    pub fn init(&mut self, body: Function) -> &mut Self {
        self.namespace.init = Some(body);
        self
    }

    /// Value defined so far under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.namespace.attrs.get(name)
    }
}
