mod common;

use std::sync::Arc;

use common::{
    TestClassLevel, TestInstanceLevel, TestMethodLevel, Unfinished, counting_init, original,
    testable_class,
};
use parking_lot::Mutex;
use xdcore::{
    advice::{ClassStatement, scope_depth},
    decorators::{
        ClassLevelDecorator, Decorator, DecoratorKind, InstanceLevelDecorator,
        MethodLevelDecorator,
    },
    factory::instance_level_decorator,
};
use xdobject::{
    args,
    args::Args,
    attrs::HasAttrs,
    function::Function,
    tests_utils::{noop, seen},
    utils::error::XdError,
    value::Value,
};

#[test]
fn class_level_fires_once_at_definition() {
    let class = testable_class();
    assert_eq!(seen(&*class, "seen"), 1);

    let first = class.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&original(&first, "classlevel"), "seen"), 1);
    let _second = class.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&*class, "seen"), 1);
    assert_eq!(seen(&original(&first, "classlevel"), "seen"), 1);
}

#[test]
fn instance_level_fires_once_per_instance() {
    let class = testable_class();
    assert_eq!(seen(&*class, "inst_seen"), 0);

    let a = class.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&*a, "inst_seen"), 1);
    assert_eq!(seen(&*class, "inst_seen"), 1);
    assert_eq!(seen(&original(&a, "instancelevel"), "inst_seen"), 1);

    let b = class.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&*b, "inst_seen"), 1);
    assert_eq!(seen(&*a, "inst_seen"), 1);
    assert_eq!(seen(&*class, "inst_seen"), 2);
    assert_eq!(seen(&original(&a, "instancelevel"), "inst_seen"), 2);

    // The constructor body still ran once per instance.
    assert_eq!(seen(&*class, "inits"), 2);
}

#[test]
fn method_level_dispatches_every_call() {
    let class = testable_class();
    let instance = class.instantiate(Args::new()).unwrap();

    assert_eq!(
        instance.call_method("methodlevel", args![2]).unwrap(),
        Value::Int(4)
    );
    assert_eq!(seen(&original(&instance, "methodlevel"), "meth_seen"), 1);

    assert_eq!(
        instance.call_method("methodlevel", args![3]).unwrap(),
        Value::Int(9)
    );
    assert_eq!(seen(&original(&instance, "methodlevel"), "meth_seen"), 2);
}

#[test]
fn method_level_on_a_free_function() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let decorator = xdcore::factory::method_level_decorator({
        let calls = calls.clone();
        move |method, args| {
            calls.lock().push(method.receiver().cloned());
            method.call(args)
        }
    });

    let squared = decorator
        .apply(Function::new("squared", |args| {
            let n = args.require(0, "squared")?.as_int()?;
            Ok(Value::Int(n * n))
        }))
        .unwrap();

    assert_eq!(squared.call(args![2]).unwrap(), Value::Int(4));
    assert_eq!(*calls.lock(), vec![Some(Value::Int(2))]);
}

#[test]
fn method_level_hook_controls_the_call() {
    let twice = xdcore::factory::method_level_decorator(|method, args| {
        let first = method.call(args.clone())?.as_int()?;
        let second = method.call(args)?.as_int()?;
        Ok(Value::Int(first + second))
    });
    let skip = xdcore::factory::method_level_decorator(|_, _| Ok(Value::from("skipped")));

    let counter = Arc::new(Mutex::new(0));
    let bump = {
        let counter = counter.clone();
        Function::new("bump", move |_| {
            let mut counter = counter.lock();
            *counter += 1;
            Ok(Value::Int(*counter))
        })
    };

    let class = ClassStatement::new("Counter")
        .define(|body| {
            body.def_with(&twice, bump.clone())?;
            body.attr("skipped", skip.apply(noop("skipped"))?);
            Ok(())
        })
        .unwrap();
    let instance = class.instantiate(Args::new()).unwrap();

    assert_eq!(instance.call_method("bump", args![]).unwrap(), Value::Int(3));
    assert_eq!(*counter.lock(), 2);
    assert_eq!(
        instance.call_method("skipped", args![]).unwrap(),
        Value::from("skipped")
    );
}

#[test]
fn method_level_without_receiver_fails() {
    let decorated = MethodLevelDecorator::new(TestMethodLevel)
        .apply(noop("lonely"))
        .unwrap();
    match decorated.call(Args::new().kwarg("x", 1)) {
        Err(XdError::MissingReceiver { function }) => assert_eq!(function, "lonely"),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn method_level_binds_to_the_instance_class() {
    let owners = Arc::new(Mutex::new(Vec::new()));
    let record = xdcore::factory::method_level_decorator({
        let owners = owners.clone();
        move |method, args| {
            owners
                .lock()
                .push(method.owner().map(|c| c.name().to_string()));
            method.call(args)
        }
    });

    let base = ClassStatement::new("Base")
        .define(|body| {
            body.def_with(&record, noop("run"))?;
            Ok(())
        })
        .unwrap();
    let derived = ClassStatement::new("Derived")
        .base(&base)
        .define(|_| Ok(()))
        .unwrap();

    derived
        .instantiate(Args::new())
        .unwrap()
        .call_method("run", args![])
        .unwrap();
    assert_eq!(*owners.lock(), vec![Some("Derived".to_string())]);
}

#[test]
fn instance_level_hooks_chain_last_applied_first() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let recorder = |label: &'static str| {
        let order = order.clone();
        instance_level_decorator(move |_, instance, _| {
            // The constructor body has not run yet.
            assert!(!instance.attrs().contains("ready"));
            order.lock().push(label);
            Ok(())
        })
    };

    let class = ClassStatement::new("Chained")
        .define(|body| {
            body.def_with(&recorder("a"), noop("a"))?;
            body.def_with(&recorder("b"), noop("b"))?;
            body.def_with(&recorder("c"), noop("c"))?;
            body.init(Function::new("__init__", |args: Args| {
                let instance = args.require(0, "__init__")?.as_instance()?;
                instance.setattr("ready", true);
                instance.class().incr("inits")?;
                Ok(Value::None)
            }));
            Ok(())
        })
        .unwrap();

    const K: usize = 4;
    for _ in 0..K {
        let instance = class.instantiate(Args::new()).unwrap();
        assert_eq!(instance.getattr("ready").unwrap(), Value::Bool(true));
    }

    let order = order.lock();
    assert_eq!(order.len(), 3 * K);
    for chunk in order.chunks(3) {
        assert_eq!(chunk, ["c", "b", "a"]);
    }
    assert_eq!(class.getattr("inits").unwrap(), Value::Int(K as i64));
}

#[test]
fn instance_level_hooks_are_inherited() {
    let base = ClassStatement::new("Base")
        .define(|body| {
            body.def_with(
                &InstanceLevelDecorator::new(TestInstanceLevel),
                noop("instancelevel"),
            )?;
            body.init(counting_init());
            Ok(())
        })
        .unwrap();
    let derived = ClassStatement::new("Derived")
        .base(&base)
        .define(|_| Ok(()))
        .unwrap();

    let instance = derived.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&*instance, "inst_seen"), 1);
    // The hook reports the class it was declared in.
    assert_eq!(seen(&*base, "inst_seen"), 1);
    assert_eq!(seen(&*derived, "inst_seen"), 0);
    // The inherited body counts on the instance's own class.
    assert_eq!(seen(&*derived, "inits"), 1);
    assert_eq!(seen(&*base, "inits"), 0);
}

#[test]
fn instance_level_hook_failure_aborts_construction() {
    let refuse = instance_level_decorator(|_, _, _| Err(XdError::raised("not today")));
    let class = ClassStatement::new("Refusing")
        .define(|body| {
            body.def_with(&refuse, noop("guard"))?;
            body.init(counting_init());
            Ok(())
        })
        .unwrap();

    assert!(matches!(
        class.instantiate(Args::new()),
        Err(XdError::Raised(message)) if message == "not today"
    ));
    assert_eq!(seen(&*class, "inits"), 0);
}

#[test]
fn unoverridden_class_level_hook_fails_the_definition() {
    let result = ClassStatement::new("Broken").define(|body| {
        body.def_with(&ClassLevelDecorator::new(Unfinished), noop("m"))?;
        Ok(())
    });
    match result {
        Err(XdError::NotImplemented { kind, decorator }) => {
            assert_eq!(kind, DecoratorKind::ClassLevel.to_string());
            assert!(decorator.ends_with("Unfinished"));
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(scope_depth(), 0);
}

#[test]
fn unoverridden_instance_level_hook_fails_at_instantiation() {
    let class = ClassStatement::new("Broken")
        .define(|body| {
            body.def_with(&InstanceLevelDecorator::new(Unfinished), noop("m"))?;
            Ok(())
        })
        .unwrap();
    assert!(matches!(
        class.instantiate(Args::new()),
        Err(XdError::NotImplemented { kind: "InstanceLevelDecorator", .. })
    ));
}

#[test]
fn unoverridden_method_level_hook_fails_at_call() {
    let decorated = MethodLevelDecorator::new(Unfinished)
        .apply(noop("m"))
        .unwrap();
    assert!(matches!(
        decorated.call(args![1]),
        Err(XdError::NotImplemented { kind: "MethodLevelDecorator", .. })
    ));
}

#[test]
fn decorated_functions_keep_their_identity() {
    let f = Function::build("compute")
        .doc("Compute things.")
        .module("tests")
        .body(|_| Ok(Value::None));

    let decorated = MethodLevelDecorator::new(TestMethodLevel)
        .apply(f.clone())
        .unwrap();
    assert_eq!(decorated.meta(), f.meta());
    assert!(Function::ptr_eq(decorated.wrapped().unwrap(), &f));

    ClassStatement::new("Holder")
        .define(|body| {
            let class_level = ClassLevelDecorator::new(TestClassLevel).apply(f.clone())?;
            let stacked = MethodLevelDecorator::new(TestMethodLevel).apply(class_level.clone())?;
            assert_eq!(stacked.doc(), Some("Compute things."));
            assert!(Function::ptr_eq(stacked.wrapped().unwrap(), &class_level));
            assert!(Function::ptr_eq(stacked.innermost(), &f));
            body.def(stacked);
            Ok(())
        })
        .unwrap();
}

#[test]
fn instance_level_hooks_fire_through_chained_constructors() {
    let base = ClassStatement::new("Base")
        .define(|body| {
            body.def_with(
                &InstanceLevelDecorator::new(TestInstanceLevel),
                noop("instancelevel"),
            )?;
            body.init(counting_init());
            Ok(())
        })
        .unwrap();

    let parent = base.clone();
    let derived = ClassStatement::new("Derived")
        .base(&base)
        .define(move |body| {
            body.init(Function::new("__init__", move |args: Args| {
                let instance = args.require(0, "__init__")?.as_instance()?.clone();
                instance.setattr("derived", true);
                parent.init_instance(&instance, Args::new())?;
                Ok(Value::None)
            }));
            Ok(())
        })
        .unwrap();

    let instance = derived.instantiate(Args::new()).unwrap();
    assert_eq!(seen(&*instance, "inst_seen"), 1);
    assert_eq!(seen(&*derived, "inits"), 1);
    assert_eq!(instance.getattr("derived").unwrap(), Value::Bool(true));
}
