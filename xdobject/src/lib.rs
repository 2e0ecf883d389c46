//! Dynamic object model used by the `xdeco` decorators.
//!
//! Rust has no runtime class statement, so this crate provides the small set of runtime
//! objects the advice decorators act on:
//!
//! - [`function::Function`]: a named callable carrying identity metadata, an attribute
//!   dictionary and (when it wraps another function) a reference to the wrapped callable.
//! - [`method::BoundMethod`]: a function paired with the receiver it was looked up on.
//! - [`class::ClassObject`]: a class with bases, a C3 method resolution order, an attribute
//!   dictionary and a constructor made of ordered pre-construction hooks and a body.
//! - [`instance::InstanceObject`]: an instance of a class with its own attributes.
//!
//! Every object is reference counted and uses interior mutability, so hooks can mutate classes
//! and instances after they were created. Most consumers will build classes through
//! `xdcore::advice::ClassStatement` rather than [`class::ClassObject::create`] directly.

pub mod args;
pub mod attrs;
pub mod class;
pub mod function;
pub mod instance;
pub mod method;
#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;
pub mod utils;
pub mod value;
