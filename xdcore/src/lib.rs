//! Class-, instance- and method-level advice decorators.
//!
//! A decorator applied to a function inside a class body cannot see the class it is declared
//! in, because the class only exists once its body has been evaluated. This crate closes that
//! gap with a registration/flush protocol:
//!
//! - [`advice::ClassStatement::define`] evaluates a class body inside an open advisory scope.
//! - Class- and instance-level decorators register [`advice::Advisor`]s in that scope while the
//!   body runs.
//! - Once the class object is created the scope is closed and its advisors are applied to the
//!   finished class, in registration order.
//!
//! Method-level decorators need no scope: they replace the function with a dispatcher that
//! rebuilds the bound method on every call.
//!
//! ```rust
//! use xdcore::{advice::ClassStatement, factory::class_level_decorator};
//! use xdobject::{attrs::HasAttrs, function::Function, value::Value};
//!
//! let register = class_level_decorator(|_method, class| {
//!     class.incr("registered")?;
//!     Ok(())
//! });
//!
//! let class = ClassStatement::new("Service")
//!     .define(|body| {
//!         body.def_with(&register, Function::new("start", |_| Ok(Value::None)))?;
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(class.getattr("registered").unwrap(), Value::Int(1));
//! ```

pub mod advice;
pub mod config;
pub mod decorators;
pub mod factory;
pub mod magic;

pub extern crate xdobject;
