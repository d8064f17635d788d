//! Descriptor resolution for hook callbacks.
//!
//! A descriptor names a callback by string: `"Target@method"` calls `method`
//! on the service bound as `Target`, and a bare `"Target"` is either a bound
//! function or the service's `handle` method. Resolution happens at
//! registration time, so an unknown target fails when the hook is added.

use hookline_registry::{HookRegistry, Priority, Registration};

mod container;
mod descriptor;
mod error;

pub use container::{CallbackSpec, Container, Service};
pub use descriptor::{DEFAULT_METHOD, Descriptor, SEPARATOR};
pub use error::ResolveError;

/// Resolves `spec` and registers it as a filter under `tag`.
pub fn add_filter(
	hooks: &HookRegistry,
	container: &Container,
	tag: &str,
	spec: impl Into<CallbackSpec>,
	priority: Option<Priority>,
	accepted_args: Option<usize>,
) -> Result<(), ResolveError> {
	let registration = registration(container, spec, priority, accepted_args)?;
	hooks.register_filter(tag, registration);
	Ok(())
}

/// Resolves `spec` and registers it as an action under `tag`.
pub fn add_action(
	hooks: &HookRegistry,
	container: &Container,
	tag: &str,
	spec: impl Into<CallbackSpec>,
	priority: Option<Priority>,
	accepted_args: Option<usize>,
) -> Result<(), ResolveError> {
	let registration = registration(container, spec, priority, accepted_args)?;
	hooks.register_action(tag, registration);
	Ok(())
}

fn registration(
	container: &Container,
	spec: impl Into<CallbackSpec>,
	priority: Option<Priority>,
	accepted_args: Option<usize>,
) -> Result<Registration, ResolveError> {
	let mut registration = Registration::new(container.resolve_callback(spec)?);
	if let Some(priority) = priority {
		registration = registration.priority(priority);
	}
	if let Some(accepted_args) = accepted_args {
		registration = registration.accepted_args(accepted_args);
	}
	Ok(registration)
}
