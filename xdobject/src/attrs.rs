//! Attribute dictionaries shared by functions, classes and instances.
use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::{
    utils::error::{XdError, XdResult},
    value::Value,
};

/// A thread-safe attribute dictionary.
///
/// Reads clone the stored [`Value`] out of the lock, so no guard is ever held while user code
/// runs with the returned value.
#[derive(Default)]
pub struct AttrMap {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.read().get(name).cloned()
    }

    /// Store `value` under `name`, returning the previous value if any.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.write().insert(name.into(), value.into())
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.entries.write().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Copy of the whole dictionary.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.read().clone()
    }

    /// Increment the integer stored under `name` (missing counts as zero) and return the new
    /// value. The read-modify-write happens under a single write lock.
    pub fn incr(&self, name: &str) -> XdResult<i64> {
        let mut entries = self.entries.write();
        let slot = entries.entry(name.to_string()).or_insert(Value::Int(0));
        match slot {
            Value::Int(count) => {
                *count = count.checked_add(1).ok_or_else(|| XdError::CounterOverflow {
                    name: name.to_string(),
                })?;
                Ok(*count)
            }
            other => Err(XdError::TypeMismatch {
                expected: "int",
                found: other.kind(),
            }),
        }
    }
}

impl std::fmt::Debug for AttrMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.read().keys()).finish()
    }
}

/// Objects carrying an attribute dictionary.
///
/// [`HasAttrs::lookup`] is the only resolution rule implementors usually override (classes walk
/// their method resolution order, instances fall back to their class). Writes always go to the
/// object's own dictionary.
pub trait HasAttrs {
    fn attrs(&self) -> &AttrMap;

    /// Name used when reporting missing attributes.
    fn owner_name(&self) -> String;

    fn lookup(&self, name: &str) -> Option<Value> {
        self.attrs().get(name)
    }

    fn getattr(&self, name: &str) -> XdResult<Value> {
        self.lookup(name).ok_or_else(|| XdError::AttributeError {
            owner: self.owner_name(),
            name: name.to_string(),
        })
    }

    fn getattr_or(&self, name: &str, default: impl Into<Value>) -> Value
    where
        Self: Sized,
    {
        self.lookup(name).unwrap_or_else(|| default.into())
    }

    fn setattr(&self, name: &str, value: impl Into<Value>)
    where
        Self: Sized,
    {
        self.attrs().set(name, value);
    }

    fn hasattr(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn delattr(&self, name: &str) -> XdResult<Value> {
        self.attrs()
            .remove(name)
            .ok_or_else(|| XdError::AttributeError {
                owner: self.owner_name(),
                name: name.to_string(),
            })
    }

    /// Increment an integer counter in the object's own dictionary.
    fn incr(&self, name: &str) -> XdResult<i64> {
        self.attrs().incr(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_starts_from_zero() {
        let attrs = AttrMap::new();
        assert_eq!(attrs.incr("seen").unwrap(), 1);
        assert_eq!(attrs.incr("seen").unwrap(), 2);
        assert_eq!(attrs.get("seen"), Some(Value::Int(2)));
    }

    #[test]
    fn incr_reports_overflow() {
        let attrs = AttrMap::new();
        attrs.set("seen", i64::MAX);
        assert!(matches!(
            attrs.incr("seen"),
            Err(XdError::CounterOverflow { name }) if name == "seen"
        ));
        assert_eq!(attrs.get("seen"), Some(Value::Int(i64::MAX)));
    }

    #[test]
    fn incr_rejects_non_integers() {
        let attrs = AttrMap::new();
        attrs.set("seen", "many");
        assert!(matches!(
            attrs.incr("seen"),
            Err(XdError::TypeMismatch { found: "str", .. })
        ));
    }

    #[test]
    fn set_returns_previous_value() {
        let attrs = AttrMap::new();
        assert_eq!(attrs.set("a", 1), None);
        assert_eq!(attrs.set("a", 2), Some(Value::Int(1)));
        assert_eq!(attrs.keys(), vec!["a".to_string()]);
        assert_eq!(attrs.remove("a"), Some(Value::Int(2)));
        assert!(attrs.is_empty());
    }
}
