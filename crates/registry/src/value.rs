//! Dynamically typed values carried through filters and actions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A value passed to, and returned from, hook callbacks.
///
/// Plain variants are passed by value: a callback that changes its copy does
/// not affect the caller. [`Value::Object`] is the exception; it wraps a
/// [`SharedValue`] whose clones alias the same storage, so mutations made by
/// one callback are visible to the caller and to every later callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
	List(Vec<Value>),
	Map(BTreeMap<String, Value>),
	/// Shared, mutable object.
	Object(SharedValue),
}

impl Value {
	/// Returns a short name for the variant, used in argument errors.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Object(_) => "object",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&SharedValue> {
		match self {
			Value::Object(obj) => Some(obj),
			_ => None,
		}
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Value::Null
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Value::Int(n)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Value::Int(n.into())
	}
}

impl From<f64> for Value {
	fn from(x: f64) -> Self {
		Value::Float(x)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_owned())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items)
	}
}

impl From<BTreeMap<String, Value>> for Value {
	fn from(map: BTreeMap<String, Value>) -> Self {
		Value::Map(map)
	}
}

impl From<SharedValue> for Value {
	fn from(obj: SharedValue) -> Self {
		Value::Object(obj)
	}
}

/// Reference-counted, interior-mutable value.
///
/// Clones share storage. Equality compares contents, short-circuiting on
/// identical handles; comparing distinct handles locks each in turn.
#[derive(Clone, Default)]
pub struct SharedValue(Arc<Mutex<Value>>);

impl SharedValue {
	pub fn new(value: impl Into<Value>) -> Self {
		Self(Arc::new(Mutex::new(value.into())))
	}

	/// Returns a copy of the current contents.
	pub fn get(&self) -> Value {
		self.0.lock().clone()
	}

	/// Replaces the contents.
	pub fn set(&self, value: impl Into<Value>) {
		*self.0.lock() = value.into();
	}

	/// Runs `f` with exclusive access to the contents.
	///
	/// The lock is held for the duration of `f` and is not reentrant. Inside
	/// `f`, do not trigger hooks that touch the same object, and do not
	/// compare this handle with a distinct [`SharedValue`] (equality locks
	/// both sides).
	pub fn with<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
		f(&mut self.0.lock())
	}

	/// Returns true if both handles point at the same storage.
	pub fn ptr_eq(&self, other: &SharedValue) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for SharedValue {
	fn eq(&self, other: &Self) -> bool {
		if self.ptr_eq(other) {
			return true;
		}
		// Copies first so the two locks are never held together.
		let lhs = self.get();
		let rhs = other.get();
		lhs == rhs
	}
}

impl fmt::Debug for SharedValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.try_lock() {
			Some(inner) => f.debug_tuple("SharedValue").field(&*inner).finish(),
			None => f.write_str("SharedValue(<locked>)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn clones_alias_storage() {
		let obj = SharedValue::new(1);
		let alias = obj.clone();
		alias.set(2);
		assert_eq!(obj.get(), Value::Int(2));
		assert!(obj.ptr_eq(&alias));
	}

	#[test]
	fn distinct_handles_compare_by_contents() {
		let one = SharedValue::new("x");
		let two = SharedValue::new("x");
		assert!(!one.ptr_eq(&two));
		assert_eq!(one, two);
		two.set("y");
		assert_ne!(one, two);
	}

	#[test]
	fn same_handle_compares_without_locking() {
		let obj = SharedValue::new(1);
		let alias = obj.clone();
		let equal = obj.with(|_| obj == alias);
		assert!(equal);
	}

	#[test]
	fn debug_shows_locked_object() {
		let obj = SharedValue::new(1);
		assert_eq!(format!("{obj:?}"), "SharedValue(Int(1))");
		obj.with(|_| assert_eq!(format!("{obj:?}"), "SharedValue(<locked>)"));
	}
}
