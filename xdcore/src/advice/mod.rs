//! Deferred class advisors.
//!
//! Every class statement being evaluated owns one advisory scope. Scopes form a thread-local
//! stack: evaluating a class statement inside another class body pushes a new scope, so
//! advisors registered by the inner body never leak into the outer one.
//!
//! Lifecycle of a scope:
//! 1. [`AdvisoryScope::open`] pushes an empty advisor list when the class body starts.
//! 2. Decorators call [`add_class_advisor`] while the body runs; advisors go to the innermost
//!    open scope.
//! 3. Once the class object exists, [`AdvisoryScope::seal`] takes the advisors and [`flush`]
//!    applies them in registration order. A sealed scope stays on the stack until it is closed,
//!    and registrations reaching it fail with [`XdError::SealedScope`].
//!
//! A scope dropped without being closed (failed or panicking class body) is popped and its
//! advisors are discarded unapplied.
use std::{cell::RefCell, marker::PhantomData};

use log::{debug, warn};
use xdobject::{
    class::ClassRef,
    utils::error::{XdError, XdResult},
};

use crate::config::{self, OutsideScopePolicy};

mod statement;

pub use statement::{ClassBody, ClassStatement};

/// One-shot callback applied to a finished class. Returns the class object that replaces it.
pub struct Advisor {
    label: String,
    apply: Box<dyn FnOnce(ClassRef) -> XdResult<ClassRef>>,
}

impl Advisor {
    pub fn new<F>(label: impl Into<String>, apply: F) -> Self
    where
        F: FnOnce(ClassRef) -> XdResult<ClassRef> + 'static,
    {
        Self {
            label: label.into(),
            apply: Box::new(apply),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn apply(self, class: ClassRef) -> XdResult<ClassRef> {
        (self.apply)(class)
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Advisor").field(&self.label).finish()
    }
}

struct PendingScope {
    class_name: String,
    advisors: Vec<Advisor>,
    sealed: bool,
}

thread_local! {
    static SCOPES: RefCell<Vec<PendingScope>> = const { RefCell::new(Vec::new()) };
}

/// Guard of an open advisory scope.
#[must_use = "dropping the scope discards its advisors"]
#[derive(Debug)]
pub struct AdvisoryScope {
    /// Index of this scope in the stack.
    depth: usize,
    class_name: String,
    closed: bool,
    /// The scope lives in a thread-local stack.
    _not_send: PhantomData<*const ()>,
}

impl AdvisoryScope {
    /// Open the scope of the class statement `class_name`.
    pub fn open(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        let depth = SCOPES.with_borrow_mut(|scopes| {
            scopes.push(PendingScope {
                class_name: class_name.clone(),
                advisors: Vec::new(),
                sealed: false,
            });
            scopes.len() - 1
        });
        debug!(
            "Opened advisory scope for class '{}' (depth {})",
            class_name, depth
        );
        Self {
            depth,
            class_name,
            closed: false,
            _not_send: PhantomData,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Take the advisors registered so far, in registration order, and refuse any later
    /// registration. The scope stays open until [`AdvisoryScope::close`].
    pub fn seal(&mut self) -> Vec<Advisor> {
        let advisors = SCOPES.with_borrow_mut(|scopes| match scopes.get_mut(self.depth) {
            Some(scope) => {
                scope.sealed = true;
                std::mem::take(&mut scope.advisors)
            }
            None => Vec::new(),
        });
        debug!(
            "Sealed advisory scope for class '{}' with {} advisor(s)",
            self.class_name,
            advisors.len()
        );
        advisors
    }

    /// Close the scope and hand back the advisors it still holds in registration order.
    pub fn close(mut self) -> Vec<Advisor> {
        self.closed = true;
        let advisors = take_scope(self.depth);
        debug!(
            "Closed advisory scope for class '{}' with {} advisor(s)",
            self.class_name,
            advisors.len()
        );
        advisors
    }
}

impl Drop for AdvisoryScope {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let discarded = take_scope(self.depth);
        if !discarded.is_empty() {
            warn!(
                "Discarding {} advisor(s) of unfinished class statement '{}': [{}]",
                discarded.len(),
                self.class_name,
                discarded
                    .iter()
                    .map(Advisor::label)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}

/// Pop the scope at `depth`, together with any inner scope left open above it.
fn take_scope(depth: usize) -> Vec<Advisor> {
    SCOPES.with_borrow_mut(|scopes| {
        if scopes.len() <= depth {
            return Vec::new();
        }
        scopes
            .drain(depth..)
            .next()
            .map(|scope| scope.advisors)
            .unwrap_or_default()
    })
}

/// Register `advisor` with the innermost open class statement.
///
/// Outside of any class statement, or while the innermost one is being sealed, the active
/// [`OutsideScopePolicy`] decides: the default fails with [`XdError::NoClassScope`] or
/// [`XdError::SealedScope`].
pub fn add_class_advisor(advisor: Advisor) -> XdResult<()> {
    let rejected = SCOPES.with_borrow_mut(|scopes| match scopes.last_mut() {
        Some(scope) if scope.sealed => Some((advisor, Some(scope.class_name.clone()))),
        Some(scope) => {
            debug!(
                "Registered advisor '{}' for class '{}'",
                advisor.label(),
                scope.class_name
            );
            scope.advisors.push(advisor);
            None
        }
        None => Some((advisor, None)),
    });

    let Some((advisor, sealed)) = rejected else {
        return Ok(());
    };
    match (config::current().outside_scope, sealed) {
        (OutsideScopePolicy::Error, Some(class)) => Err(XdError::SealedScope {
            class,
            advisor: advisor.label,
        }),
        (OutsideScopePolicy::Error, None) => Err(XdError::NoClassScope {
            advisor: advisor.label,
        }),
        (OutsideScopePolicy::Ignore, _) => {
            warn!(
                "Ignoring advisor '{}' registered outside of an open class statement",
                advisor.label()
            );
            Ok(())
        }
    }
}

/// Apply `advisors` to `class` in order, threading each result into the next advisor.
pub fn flush(class: ClassRef, advisors: Vec<Advisor>) -> XdResult<ClassRef> {
    advisors.into_iter().try_fold(class, |class, advisor| {
        debug!(
            "Applying advisor '{}' to class '{}'",
            advisor.label(),
            class.name()
        );
        advisor.apply(class)
    })
}

/// Number of class statements currently being evaluated on this thread.
pub fn scope_depth() -> usize {
    SCOPES.with_borrow(|scopes| scopes.len())
}

/// Number of advisors waiting in the innermost scope.
pub fn pending_advisors() -> usize {
    SCOPES.with_borrow(|scopes| scopes.last().map_or(0, |scope| scope.advisors.len()))
}

/// Name of the innermost class statement being evaluated.
pub fn current_scope() -> Option<String> {
    SCOPES.with_borrow(|scopes| scopes.last().map(|scope| scope.class_name.clone()))
}
