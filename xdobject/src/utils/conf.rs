use downcast_rs::{DowncastSync, impl_downcast};

/// Arbitrary Rust data that can be stored inside a [`crate::value::Value`].
///
/// Hooks use it to attach state that does not fit the primitive value kinds (logs,
/// handles, shared counters) to functions, classes or instances.
pub trait OpaqueObject: DowncastSync + std::fmt::Debug {}
impl_downcast!(sync OpaqueObject);
