//! The hook registry: registration, removal and lookup.

use parking_lot::Mutex;
use tracing::debug;

use crate::Priority;
use crate::callback::Callback;
use crate::config::HooksConfig;
use crate::context::ExecutionContext;
use crate::table::{HookTable, RegisteredCallback};

/// A callback plus the priority and arity it should be registered with.
///
/// Unset fields fall back to the registry's configured defaults.
#[derive(Debug, Clone)]
pub struct Registration {
	callback: Callback,
	priority: Option<Priority>,
	accepted_args: Option<usize>,
}

impl Registration {
	pub fn new(callback: Callback) -> Self {
		Self {
			callback,
			priority: None,
			accepted_args: None,
		}
	}

	/// Lower runs first.
	pub fn priority(mut self, priority: Priority) -> Self {
		self.priority = Some(priority);
		self
	}

	/// Maximum number of dispatch arguments the callback receives.
	pub fn accepted_args(mut self, accepted_args: usize) -> Self {
		self.accepted_args = Some(accepted_args);
		self
	}
}

impl From<Callback> for Registration {
	fn from(callback: Callback) -> Self {
		Registration::new(callback)
	}
}

/// Result of [`HookRegistry::has`].
///
/// Priority `0` is a legitimate match, so a found callback is reported as
/// [`Lookup::At`] rather than folded into a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
	/// Nothing matched.
	Absent,
	/// The tag has callbacks (no callback was asked about).
	Present,
	/// The callback is registered at this priority.
	At(Priority),
}

impl Lookup {
	pub fn is_found(self) -> bool {
		!matches!(self, Lookup::Absent)
	}

	pub fn priority(self) -> Option<Priority> {
		match self {
			Lookup::At(priority) => Some(priority),
			_ => None,
		}
	}
}

/// Filter and action hooks keyed by tag.
///
/// Every method takes `&self`; internal locks are released before any
/// callback runs, so callbacks may register, remove or dispatch on the same
/// registry while it is dispatching. Share one instance with `Arc`; each
/// thread dispatching on it keeps its own dispatch stack.
#[derive(Debug, Default)]
pub struct HookRegistry {
	pub(crate) config: HooksConfig,
	pub(crate) table: Mutex<HookTable>,
	pub(crate) context: ExecutionContext,
}

impl HookRegistry {
	/// Creates an empty registry with default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: HooksConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &HooksConfig {
		&self.config
	}

	/// Registers a callback under `tag`.
	///
	/// A callback with the same identity already registered at the same
	/// priority is replaced in place. Callability is not checked here;
	/// failures surface when the tag is dispatched.
	pub fn register(&self, tag: &str, registration: impl Into<Registration>) {
		let Registration {
			callback,
			priority,
			accepted_args,
		} = registration.into();
		let priority = priority.unwrap_or(self.config.default_priority);
		let accepted_args = accepted_args.unwrap_or(self.config.default_accepted_args);
		debug!(tag, priority, accepted_args, id = %callback.id(), "hooks.register");
		self.table.lock().insert(
			tag,
			priority,
			RegisteredCallback {
				callback,
				accepted_args,
			},
		);
	}

	/// Removes `callback` from `tag` at `priority`.
	///
	/// Returns false, and changes nothing, if it was not registered there.
	pub fn unregister(&self, tag: &str, callback: &Callback, priority: Priority) -> bool {
		let removed = self.table.lock().remove(tag, priority, callback.id());
		if removed {
			debug!(tag, priority, id = %callback.id(), "hooks.unregister");
		}
		removed
	}

	/// Removes every callback under `tag`.
	///
	/// A priority may be named, but the whole tag is cleared either way.
	pub fn unregister_all(&self, tag: &str, priority: Option<Priority>) {
		debug!(tag, ?priority, "hooks.unregister_all");
		self.table.lock().remove_tag(tag, priority);
	}

	/// Without a callback: [`Lookup::Present`] if `tag` has any callbacks.
	/// With one: [`Lookup::At`] the lowest priority it is registered at.
	pub fn has(&self, tag: &str, callback: Option<&Callback>) -> Lookup {
		let table = self.table.lock();
		match callback {
			None if table.contains(tag) => Lookup::Present,
			None => Lookup::Absent,
			Some(callback) => table
				.find(tag, callback.id())
				.map_or(Lookup::Absent, Lookup::At),
		}
	}

	/// Tags with at least one callback, sorted.
	pub fn tags(&self) -> Vec<String> {
		self.table.lock().tags()
	}

	/// Number of callbacks registered under `tag`.
	pub fn callback_count(&self, tag: &str) -> usize {
		self.table.lock().len(tag)
	}

	pub fn register_filter(&self, tag: &str, registration: impl Into<Registration>) {
		self.register(tag, registration);
	}

	pub fn register_action(&self, tag: &str, registration: impl Into<Registration>) {
		self.register(tag, registration);
	}

	pub fn unregister_filter(&self, tag: &str, callback: &Callback, priority: Priority) -> bool {
		self.unregister(tag, callback, priority)
	}

	pub fn unregister_action(&self, tag: &str, callback: &Callback, priority: Priority) -> bool {
		self.unregister(tag, callback, priority)
	}

	pub fn unregister_all_filters(&self, tag: &str, priority: Option<Priority>) {
		self.unregister_all(tag, priority);
	}

	pub fn unregister_all_actions(&self, tag: &str, priority: Option<Priority>) {
		self.unregister_all(tag, priority);
	}

	pub fn has_filter(&self, tag: &str, callback: Option<&Callback>) -> Lookup {
		self.has(tag, callback)
	}

	pub fn has_action(&self, tag: &str, callback: Option<&Callback>) -> Lookup {
		self.has(tag, callback)
	}

	/// The innermost tag currently dispatching on this thread.
	pub fn current_tag(&self) -> Option<String> {
		self.context.current()
	}

	pub fn current_filter(&self) -> Option<String> {
		self.current_tag()
	}

	pub fn current_action(&self) -> Option<String> {
		self.current_tag()
	}

	/// Whether this thread is dispatching, or whether `tag` is anywhere in
	/// this thread's dispatch stack (not only at the top).
	pub fn is_dispatching(&self, tag: Option<&str>) -> bool {
		self.context.is_dispatching(tag)
	}

	pub fn is_dispatching_filter(&self, tag: Option<&str>) -> bool {
		self.is_dispatching(tag)
	}

	pub fn is_dispatching_action(&self, tag: Option<&str>) -> bool {
		self.is_dispatching(tag)
	}

	/// Number of action dispatches of `tag` so far.
	pub fn times_triggered(&self, tag: &str) -> u64 {
		self.context.times_triggered(tag)
	}

	/// Depth of this thread's dispatch stack.
	pub fn dispatch_depth(&self) -> usize {
		self.context.depth()
	}
}

/// Separate filter and action registries, for applications that keep the two
/// hook kinds in distinct namespaces.
#[derive(Debug, Default)]
pub struct HookRegistries {
	pub filters: HookRegistry,
	pub actions: HookRegistry,
}

impl HookRegistries {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: HooksConfig) -> Self {
		Self {
			filters: HookRegistry::with_config(config.clone()),
			actions: HookRegistry::with_config(config),
		}
	}
}
