use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
    utils::error::{XdError, XdResult},
    value::Value,
};

/// Arguments of a call: positional values followed by keyword values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: SmallVec<[Value; 4]>,
    keywords: BTreeMap<String, Value>,
}

/// Build an [`Args`] from positional expressions convertible into [`Value`].
///
/// ```rust
/// # use xdobject::{args, value::Value};
/// let args = args![2, "two"];
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get(0), Some(&Value::Int(2)));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::args::Args::new()
    };
    (
        $( $value:expr ),+
        $(,)?
    ) => {
        $crate::args::Args::from_positional([ $( $crate::value::Value::from($value) ),+ ])
    };
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keywords: BTreeMap::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    /// Insert `value` as the first positional argument (used to pass receivers).
    pub fn prepend(&mut self, value: Value) {
        self.positional.insert(0, value);
    }

    /// Split off the first positional argument.
    ///
    /// Returns `None` when there is no positional argument at all.
    pub fn split_receiver(mut self) -> Option<(Value, Args)> {
        if self.positional.is_empty() {
            return None;
        }
        let receiver = self.positional.remove(0);
        Some((receiver, self))
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Positional argument `index`, failing with [`XdError::MissingArgument`] when absent.
    pub fn require(&self, index: usize, function: &str) -> XdResult<&Value> {
        self.positional
            .get(index)
            .ok_or_else(|| XdError::MissingArgument {
                index,
                function: function.to_string(),
            })
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<String, Value> {
        &self.keywords
    }
}
