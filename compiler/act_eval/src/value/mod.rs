//! Runtime values.
//!
//! Primitives are stored inline. Arrays and objects are shared, mutable
//! handles (two bindings to the same array observe each other's writes),
//! allocated through [`LocalScope`](crate::environment::LocalScope) like every other piece of shared
//! interpreter state.

mod function;
mod object;
mod shared;

pub use function::{Closure, NativeFn, NativeFunction};
pub use object::PropertyMap;
pub use shared::{ArrayRef, ObjectRef};

use std::fmt;
use std::rc::Rc;

use act_ir::AttrValue;

use crate::coerce;
use crate::host::HostObject;

/// A script value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Script-defined function closing over its defining context.
    Function(Rc<Closure>),
    /// Built-in routine.
    Native(NativeFunction),
    /// Object owned by a bound environment.
    Host(Rc<dyn HostObject>),
}

impl Value {
    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(ArrayRef::new(items))
    }

    pub fn object(props: PropertyMap) -> Value {
        Value::Object(ObjectRef::new(props))
    }

    pub fn host(object: Rc<dyn HostObject>) -> Value {
        Value::Host(object)
    }

    /// Convert a scalar attribute into a value.
    pub fn from_attr(attr: &AttrValue) -> Value {
        match attr {
            AttrValue::Undefined => Value::Undefined,
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(*n),
            AttrValue::Str(s) => Value::string(s.as_str()),
        }
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short type description used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Undefined => "undefined".into(),
            Value::Null => "null".into(),
            Value::Bool(_) => "boolean".into(),
            Value::Number(_) => "number".into(),
            Value::Str(_) => "string".into(),
            Value::Array(_) => "array".into(),
            Value::Object(_) => "object".into(),
            Value::Function(_) | Value::Native(_) => "function".into(),
            Value::Host(h) => h.class_name().to_string(),
        }
    }

    /// Snapshot of an array's elements.
    pub fn array_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Read an own property of a plain object.
    pub fn get_field(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow().get(key).cloned(),
            _ => None,
        }
    }
}

/// Strict (`===`) equality: primitives by value, everything else by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        coerce::strict_equal(self, other)
    }
}

/// Shallow rendering; shared containers may be cyclic.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(items) => match items.try_borrow() {
                Ok(items) => write!(f, "Array(len={})", items.len()),
                Err(_) => write!(f, "Array(<borrowed>)"),
            },
            Value::Object(obj) => match obj.try_borrow() {
                Ok(obj) => {
                    let keys: Vec<&str> = obj.keys().collect();
                    write!(f, "Object{keys:?}")
                }
                Err(_) => write!(f, "Object(<borrowed>)"),
            },
            Value::Function(closure) => {
                write!(f, "Function({})", closure.name().unwrap_or("<anonymous>"))
            }
            Value::Native(native) => write!(f, "Native({})", native.name()),
            Value::Host(host) => write!(f, "Host({})", host.class_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&coerce::to_display_string(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}
