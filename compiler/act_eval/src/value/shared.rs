//! Shared array and object handles.
//!
//! Dropping the last handle to a container tears its contents down with a
//! work list instead of recursing through nested `Drop` calls, so a value
//! nested thousands of levels deep is released without exhausting the
//! native stack.

use std::cell::{Ref, RefMut};
use std::ops::Deref;

use super::{PropertyMap, Value};
use crate::environment::LocalScope;

/// Shared array storage.
#[derive(Clone, Debug, Default)]
pub struct ArrayRef(LocalScope<Vec<Value>>);

/// Shared object storage.
#[derive(Clone, Debug, Default)]
pub struct ObjectRef(LocalScope<PropertyMap>);

macro_rules! shared_handle {
    ($handle:ident, $inner:ty) => {
        impl $handle {
            #[inline]
            pub fn new(value: $inner) -> Self {
                $handle(LocalScope::new(value))
            }

            #[inline]
            pub fn borrow(&self) -> Ref<'_, $inner> {
                self.0.borrow()
            }

            #[inline]
            pub fn borrow_mut(&self) -> RefMut<'_, $inner> {
                self.0.borrow_mut()
            }

            #[inline]
            pub fn ptr_eq(&self, other: &Self) -> bool {
                self.0.ptr_eq(&other.0)
            }

            #[inline]
            pub fn addr(&self) -> usize {
                self.0.addr()
            }
        }

        impl Deref for $handle {
            type Target = LocalScope<$inner>;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

shared_handle!(ArrayRef, Vec<Value>);
shared_handle!(ObjectRef, PropertyMap);

impl Drop for ArrayRef {
    fn drop(&mut self) {
        if let Some(items) = self.0.take_if_unique() {
            release(items);
        }
    }
}

impl Drop for ObjectRef {
    fn drop(&mut self) {
        if let Some(props) = self.0.take_if_unique() {
            release(props.into_values().collect());
        }
    }
}

/// Drop `pending`, flattening containers this is the last owner of.
///
/// A container taken here is left empty, so its own `Drop` has nothing
/// left to recurse into.
fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => {
                if let Some(inner) = items.0.take_if_unique() {
                    pending.extend(inner);
                }
            }
            Value::Object(props) => {
                if let Some(inner) = props.0.take_if_unique() {
                    pending.extend(inner.into_values());
                }
            }
            _ => {}
        }
    }
}
