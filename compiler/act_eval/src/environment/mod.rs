//! Name resolution and call tracking.
//!
//! - [`Scope`]: one frame of a chained name-resolution structure, in one of
//!   three flavors ([`ScopeKind`])
//! - [`CallStack`]: LIFO of active calls, shared by every context of one
//!   execution
//! - [`ExecutionContext`]: three parallel scope chains plus the shared call
//!   stack, i.e. one lexical evaluation frame

mod call_stack;
mod context;
mod scope;

pub use call_stack::{CallFrame, CallStack, SharedCallStack};
pub use context::{DeclarationKind, ExecutionContext};
pub use scope::{Scope, ScopeError, ScopeKind};

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Single-threaded shared, mutable handle (`Rc<RefCell<T>>`).
///
/// All interpreter state that several owners need to see mutate (scope
/// frames, the call stack, arrays, objects) is allocated through
/// [`LocalScope::new`]. It is deliberately not `Send`: one execution runs
/// on one thread.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the allocation, for cycle detection.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Move the contents out when this is the only handle left.
    pub(crate) fn take_if_unique(&self) -> Option<T>
    where
        T: Default,
    {
        if Rc::strong_count(&self.0) != 1 {
            return None;
        }
        self.0
            .try_borrow_mut()
            .ok()
            .map(|mut inner| std::mem::take(&mut *inner))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f.debug_tuple("LocalScope").field(&*inner).finish(),
            Err(_) => f.write_str("LocalScope(<borrowed>)"),
        }
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
