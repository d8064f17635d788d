//! Invocable callbacks and their registration identity.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::value::Value;

/// Failure raised by a callback while it runs.
///
/// The dispatcher never inspects or wraps these; they reach the caller of
/// [`apply_filters`](crate::HookRegistry::apply_filters) or
/// [`trigger_action`](crate::HookRegistry::trigger_action) as returned.
#[derive(Debug, Error)]
pub enum InvocationError {
	/// The callback asked for an argument it was not given.
	#[error("too few arguments: argument {index} requested, {received} received")]
	TooFewArguments { index: usize, received: usize },

	/// An argument had an unexpected variant.
	#[error("argument {index}: expected {expected}, got {got}")]
	ArgumentType {
		index: usize,
		expected: &'static str,
		got: &'static str,
	},

	/// Free-form failure reported by the callback.
	#[error("{0}")]
	Failed(String),

	/// Any other error raised by the callback, passed through unchanged.
	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl InvocationError {
	pub fn msg(message: impl Into<String>) -> Self {
		InvocationError::Failed(message.into())
	}
}

/// Arguments handed to a single callback invocation, already truncated to the
/// callback's accepted argument count.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
	values: &'a [Value],
}

impl<'a> Args<'a> {
	pub fn new(values: &'a [Value]) -> Self {
		Self { values }
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn as_slice(&self) -> &'a [Value] {
		self.values
	}

	/// Returns argument `index`, failing like an under-supplied call would.
	pub fn get(&self, index: usize) -> Result<&'a Value, InvocationError> {
		self.values.get(index).ok_or(InvocationError::TooFewArguments {
			index,
			received: self.values.len(),
		})
	}

	/// Returns argument `index` as a string slice.
	pub fn str(&self, index: usize) -> Result<&'a str, InvocationError> {
		let value = self.get(index)?;
		value.as_str().ok_or(InvocationError::ArgumentType {
			index,
			expected: "string",
			got: value.type_name(),
		})
	}

	/// Returns argument `index` as an integer.
	pub fn int(&self, index: usize) -> Result<i64, InvocationError> {
		let value = self.get(index)?;
		value.as_int().ok_or(InvocationError::ArgumentType {
			index,
			expected: "int",
			got: value.type_name(),
		})
	}
}

/// Something the dispatcher can call.
///
/// Bare functions, closures and bound methods all reduce to this one
/// operation. The return value threads through filters and is discarded by
/// actions.
pub trait Invocable: Send + Sync {
	fn invoke(&self, args: Args<'_>) -> Result<Value, InvocationError>;
}

impl<F, R> Invocable for F
where
	F: Fn(Args<'_>) -> R + Send + Sync,
	R: IntoHookResult,
{
	fn invoke(&self, args: Args<'_>) -> Result<Value, InvocationError> {
		self(args).into_hook_result()
	}
}

/// Conversion from a callback's natural return type into a hook result.
pub trait IntoHookResult {
	fn into_hook_result(self) -> Result<Value, InvocationError>;
}

impl IntoHookResult for Value {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		Ok(self)
	}
}

impl IntoHookResult for () {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		Ok(Value::Null)
	}
}

impl IntoHookResult for String {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		Ok(Value::Str(self))
	}
}

impl IntoHookResult for bool {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		Ok(Value::Bool(self))
	}
}

impl IntoHookResult for i64 {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		Ok(Value::Int(self))
	}
}

impl IntoHookResult for Result<Value, InvocationError> {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		self
	}
}

impl IntoHookResult for Result<(), InvocationError> {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		self.map(|()| Value::Null)
	}
}

impl IntoHookResult for Result<String, InvocationError> {
	fn into_hook_result(self) -> Result<Value, InvocationError> {
		self.map(Value::Str)
	}
}

/// Registration identity of a callback.
///
/// Two registrations with equal ids at the same tag and priority are the same
/// registration: registering again replaces, unregistering removes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallbackId {
	/// A named function reference.
	Named(Arc<str>),
	/// A resolved `target@method` descriptor.
	Descriptor { target: Arc<str>, method: Arc<str> },
	/// A method bound to a specific object instance.
	Bound { instance: usize, method: Arc<str> },
	/// An anonymous callback; the token is minted once per [`Callback::new`].
	Token(u64),
}

impl fmt::Display for CallbackId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CallbackId::Named(name) => f.write_str(name),
			CallbackId::Descriptor { target, method } => write!(f, "{target}@{method}"),
			CallbackId::Bound { instance, method } => write!(f, "{instance:#x}::{method}"),
			CallbackId::Token(token) => write!(f, "closure#{token}"),
		}
	}
}

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);

/// An invocable paired with its identity. Cheap to clone; clones keep the id.
#[derive(Clone)]
pub struct Callback {
	id: CallbackId,
	invocable: Arc<dyn Invocable>,
}

impl Callback {
	/// Wraps an anonymous closure under a fresh identity.
	pub fn new<F, R>(f: F) -> Self
	where
		F: Fn(Args<'_>) -> R + Send + Sync + 'static,
		R: IntoHookResult,
	{
		let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
		Self::from_parts(CallbackId::Token(token), Arc::new(f))
	}

	/// Wraps a function under its name. Every callback built with the same
	/// name has the same identity.
	pub fn named<F, R>(name: &str, f: F) -> Self
	where
		F: Fn(Args<'_>) -> R + Send + Sync + 'static,
		R: IntoHookResult,
	{
		Self::from_parts(CallbackId::Named(name.into()), Arc::new(f))
	}

	/// Binds `method` on a shared instance.
	///
	/// Identity follows the instance's allocation, not its value: two distinct
	/// instances never collide, and the same instance and method name always
	/// produce the same id. The callback keeps the instance alive, so the
	/// address stays unique for as long as the registration exists.
	pub fn bound<T, F, R>(instance: &Arc<T>, method: &str, f: F) -> Self
	where
		T: Send + Sync + 'static,
		F: Fn(&T, Args<'_>) -> R + Send + Sync + 'static,
		R: IntoHookResult,
	{
		let id = CallbackId::Bound {
			instance: Arc::as_ptr(instance) as *const () as usize,
			method: method.into(),
		};
		let instance = Arc::clone(instance);
		Self::from_parts(id, Arc::new(move |args: Args<'_>| f(&instance, args)))
	}

	/// Assembles a callback from an explicit id and invocable.
	pub fn from_parts(id: CallbackId, invocable: Arc<dyn Invocable>) -> Self {
		Self { id, invocable }
	}

	pub fn id(&self) -> &CallbackId {
		&self.id
	}

	pub fn invoke(&self, args: &[Value]) -> Result<Value, InvocationError> {
		self.invocable.invoke(Args::new(args))
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callback").field("id", &self.id).finish()
	}
}
