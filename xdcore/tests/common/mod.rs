#![allow(dead_code)]

use xdcore::{
    advice::ClassStatement,
    decorators::{
        ClassLevelDecorator, ClassLevelHook, InstanceLevelDecorator, InstanceLevelHook,
        MethodLevelDecorator, MethodLevelHook,
    },
};
use xdobject::{
    args::Args,
    class::ClassRef,
    function::Function,
    instance::InstanceRef,
    method::BoundMethod,
    tests_utils::{mark, noop, square_method},
    utils::error::XdResult,
    value::Value,
};

pub struct TestClassLevel;

impl ClassLevelHook for TestClassLevel {
    fn decorate(&self, method: &BoundMethod, class: &ClassRef) -> XdResult<()> {
        mark(&**class, "seen");
        mark(method.function(), "seen");
        Ok(())
    }
}

pub struct TestInstanceLevel;

impl InstanceLevelHook for TestInstanceLevel {
    fn decorate(
        &self,
        method: &BoundMethod,
        instance: &InstanceRef,
        class: &ClassRef,
    ) -> XdResult<()> {
        mark(&**instance, "inst_seen");
        mark(&**class, "inst_seen");
        mark(method.function(), "inst_seen");
        Ok(())
    }
}

pub struct TestMethodLevel;

impl MethodLevelHook for TestMethodLevel {
    fn decorate(&self, method: &BoundMethod, args: Args) -> XdResult<Value> {
        mark(method.function(), "meth_seen");
        method.call(args)
    }
}

/// Hooks that never override `decorate`.
pub struct Unfinished;

impl ClassLevelHook for Unfinished {}
impl InstanceLevelHook for Unfinished {}
impl MethodLevelHook for Unfinished {}

/// Constructor body counting its runs on the class attribute `inits`.
pub fn counting_init() -> Function {
    Function::new("__init__", |args: Args| {
        let instance = args.require(0, "__init__")?.as_instance()?;
        mark(&**instance.class(), "inits");
        Ok(Value::None)
    })
}

/// The class exercised by the original test-suite: one method of each decorator kind.
pub fn testable_class() -> ClassRef {
    ClassStatement::new("TestableClass")
        .define(|body| {
            body.def_with(
                &ClassLevelDecorator::new(TestClassLevel),
                noop("classlevel"),
            )?;
            body.def_with(
                &InstanceLevelDecorator::new(TestInstanceLevel),
                noop("instancelevel"),
            )?;
            body.def_with(
                &MethodLevelDecorator::new(TestMethodLevel),
                square_method("methodlevel"),
            )?;
            body.init(counting_init());
            Ok(())
        })
        .expect("class definition")
}

/// The function originally decorated under `name`, retrieved through an instance.
pub fn original(instance: &InstanceRef, name: &str) -> Function {
    let value = instance.get(name).expect("attribute");
    let method = value.as_method().expect("bound method");
    method
        .function()
        .wrapped()
        .expect("decorated function")
        .clone()
}
