//! Dispatch introspection: the stack of tags currently executing and the
//! per-tag action counters.
//!
//! Each thread has its own stack, so concurrent dispatches on a shared
//! registry only see their own nesting.

use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub(crate) struct ExecutionContext {
	stacks: Mutex<FxHashMap<ThreadId, Vec<String>>>,
	actions: Mutex<FxHashMap<String, u64>>,
}

impl ExecutionContext {
	/// Pushes `tag` on the calling thread's stack; the returned guard pops it
	/// when dropped.
	pub(crate) fn enter(&self, tag: &str) -> ExecutionGuard<'_> {
		let thread = thread::current().id();
		self.stacks
			.lock()
			.entry(thread)
			.or_default()
			.push(tag.to_owned());
		ExecutionGuard { ctx: self, thread }
	}

	pub(crate) fn current(&self) -> Option<String> {
		let stacks = self.stacks.lock();
		stacks.get(&thread::current().id())?.last().cloned()
	}

	/// With no tag: whether any dispatch is running on this thread. With a
	/// tag: whether that tag appears anywhere in this thread's stack.
	pub(crate) fn is_dispatching(&self, tag: Option<&str>) -> bool {
		let stacks = self.stacks.lock();
		let Some(stack) = stacks.get(&thread::current().id()) else {
			return false;
		};
		match tag {
			None => !stack.is_empty(),
			Some(tag) => stack.iter().any(|t| t == tag),
		}
	}

	pub(crate) fn depth(&self) -> usize {
		let stacks = self.stacks.lock();
		stacks.get(&thread::current().id()).map_or(0, Vec::len)
	}

	/// Counts one trigger of `tag` and returns the new total.
	pub(crate) fn record_action(&self, tag: &str) -> u64 {
		let mut actions = self.actions.lock();
		let count = actions.entry(tag.to_owned()).or_insert(0);
		*count += 1;
		*count
	}

	pub(crate) fn times_triggered(&self, tag: &str) -> u64 {
		self.actions.lock().get(tag).copied().unwrap_or(0)
	}
}

/// Scoped stack entry. Pops on every exit path, including unwinding.
#[must_use]
pub(crate) struct ExecutionGuard<'a> {
	ctx: &'a ExecutionContext,
	thread: ThreadId,
}

impl Drop for ExecutionGuard<'_> {
	fn drop(&mut self) {
		let mut stacks = self.ctx.stacks.lock();
		if let Some(stack) = stacks.get_mut(&self.thread) {
			stack.pop();
			if stack.is_empty() {
				stacks.remove(&self.thread);
			}
		}
	}
}
