//! Named functions and services that descriptors resolve against.

use std::sync::Arc;

use hookline_registry::{
	Args, Callback, CallbackId, IntoHookResult, Invocable, InvocationError, Value,
};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::error::ResolveError;

/// An object whose methods can be named by descriptor.
pub trait Service: Send + Sync {
	/// Calls `method`. Only invoked for methods [`responds_to`](Self::responds_to) accepted.
	fn call(&self, method: &str, args: Args<'_>) -> Result<Value, InvocationError>;

	fn responds_to(&self, method: &str) -> bool;
}

/// Either a callback ready to register or a descriptor still to resolve.
#[derive(Debug, Clone)]
pub enum CallbackSpec {
	Callback(Callback),
	Descriptor(String),
}

impl From<Callback> for CallbackSpec {
	fn from(callback: Callback) -> Self {
		CallbackSpec::Callback(callback)
	}
}

impl From<&str> for CallbackSpec {
	fn from(descriptor: &str) -> Self {
		CallbackSpec::Descriptor(descriptor.to_string())
	}
}

impl From<String> for CallbackSpec {
	fn from(descriptor: String) -> Self {
		CallbackSpec::Descriptor(descriptor)
	}
}

/// Bindings from names to functions and service instances.
#[derive(Default)]
pub struct Container {
	functions: FxHashMap<String, Arc<dyn Invocable>>,
	services: FxHashMap<String, Arc<dyn Service>>,
}

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds a function reachable by its bare name.
	pub fn bind_function<F, R>(&mut self, name: &str, f: F) -> &mut Self
	where
		F: Fn(Args<'_>) -> R + Send + Sync + 'static,
		R: IntoHookResult,
	{
		self.functions.insert(name.to_string(), Arc::new(f));
		self
	}

	/// Binds a shared service instance under `name`.
	pub fn bind_service(&mut self, name: &str, service: Arc<dyn Service>) -> &mut Self {
		self.services.insert(name.to_string(), service);
		self
	}

	pub fn has_function(&self, name: &str) -> bool {
		self.functions.contains_key(name)
	}

	pub fn has_service(&self, name: &str) -> bool {
		self.services.contains_key(name)
	}

	/// Resolves a descriptor string into a callback.
	///
	/// A bare name bound as a function wins. Otherwise the target must be a
	/// bound service that responds to the method. Resolving the same
	/// descriptor twice yields callbacks with equal identity.
	pub fn resolve(&self, descriptor: &str) -> Result<Callback, ResolveError> {
		let result = Descriptor::parse(descriptor).and_then(|parsed| self.resolve_descriptor(&parsed));
		if let Err(error) = &result {
			warn!(descriptor, %error, "hooks.resolve.failed");
		}
		result
	}

	/// Resolves an already parsed descriptor.
	pub fn resolve_descriptor(&self, descriptor: &Descriptor) -> Result<Callback, ResolveError> {
		let target = descriptor.target();
		if descriptor.is_bare() {
			if let Some(function) = self.functions.get(target) {
				debug!(target, "hooks.resolve.function");
				return Ok(Callback::from_parts(
					CallbackId::Named(target.into()),
					Arc::clone(function),
				));
			}
		}

		let service = self
			.services
			.get(target)
			.ok_or_else(|| ResolveError::UnknownTarget(target.to_string()))?;
		let method = descriptor.method();
		if !service.responds_to(method) {
			return Err(ResolveError::UnknownMethod {
				target: target.to_string(),
				method: method.to_string(),
			});
		}

		debug!(target, method, "hooks.resolve.service");
		let id = CallbackId::Descriptor {
			target: target.into(),
			method: method.into(),
		};
		let service = Arc::clone(service);
		let method = method.to_string();
		Ok(Callback::from_parts(
			id,
			Arc::new(move |args: Args<'_>| service.call(&method, args)),
		))
	}

	/// Passes a callback through, or resolves a descriptor.
	pub fn resolve_callback(&self, spec: impl Into<CallbackSpec>) -> Result<Callback, ResolveError> {
		match spec.into() {
			CallbackSpec::Callback(callback) => Ok(callback),
			CallbackSpec::Descriptor(descriptor) => self.resolve(&descriptor),
		}
	}
}

impl std::fmt::Debug for Container {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut functions: Vec<_> = self.functions.keys().collect();
		let mut services: Vec<_> = self.services.keys().collect();
		functions.sort();
		services.sort();
		f.debug_struct("Container")
			.field("functions", &functions)
			.field("services", &services)
			.finish()
	}
}
