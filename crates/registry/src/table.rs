//! Tag → priority → callback storage.
//!
//! Priority groups for a tag are kept in insertion order until the first
//! dispatch after a mutation sorts them; the per-tag `sorted` flag caches that
//! work until the next add or remove.

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::Priority;
use crate::callback::{Callback, CallbackId};

/// A callback together with the argument count it accepts.
#[derive(Debug, Clone)]
pub struct RegisteredCallback {
	pub callback: Callback,
	pub accepted_args: usize,
}

/// Callbacks sharing one priority, in registration order.
type PriorityGroup = IndexMap<CallbackId, RegisteredCallback, FxBuildHasher>;

#[derive(Debug, Default)]
struct TagHooks {
	groups: Vec<(Priority, PriorityGroup)>,
	sorted: bool,
}

impl TagHooks {
	fn group_mut(&mut self, priority: Priority) -> Option<&mut PriorityGroup> {
		self.groups
			.iter_mut()
			.find(|(p, _)| *p == priority)
			.map(|(_, group)| group)
	}

	fn ensure_sorted(&mut self) {
		if !self.sorted {
			self.groups.sort_by_key(|(priority, _)| *priority);
			self.sorted = true;
		}
	}

	fn is_empty(&self) -> bool {
		self.groups.iter().all(|(_, group)| group.is_empty())
	}

	fn len(&self) -> usize {
		self.groups.iter().map(|(_, group)| group.len()).sum()
	}
}

/// Members of one priority group, captured for invocation.
pub type GroupSnapshot = (Priority, Vec<RegisteredCallback>);

#[derive(Debug, Default)]
pub struct HookTable {
	tags: FxHashMap<String, TagHooks>,
}

impl HookTable {
	#[cfg(test)]
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces the entry for the callback's id at `priority`.
	///
	/// A replaced entry keeps its position within the group.
	pub fn insert(&mut self, tag: &str, priority: Priority, entry: RegisteredCallback) {
		let hooks = self.tags.entry(tag.to_owned()).or_default();
		let id = entry.callback.id().clone();
		match hooks.group_mut(priority) {
			Some(group) => {
				group.insert(id, entry);
			}
			None => {
				let mut group = PriorityGroup::default();
				group.insert(id, entry);
				hooks.groups.push((priority, group));
			}
		}
		hooks.sorted = false;
	}

	/// Removes the entry for `id` at `priority`. Returns whether it existed.
	pub fn remove(&mut self, tag: &str, priority: Priority, id: &CallbackId) -> bool {
		let Some(hooks) = self.tags.get_mut(tag) else {
			return false;
		};
		let Some(group) = hooks.group_mut(priority) else {
			return false;
		};
		if group.shift_remove(id).is_none() {
			return false;
		}
		if group.is_empty() {
			hooks.groups.retain(|(p, _)| *p != priority);
		}
		hooks.sorted = false;
		if hooks.groups.is_empty() {
			self.tags.remove(tag);
		}
		true
	}

	/// Drops the group at `priority`, then the whole tag.
	///
	/// The priority-scoped removal is always followed by removal of the tag,
	/// so every priority is cleared regardless of the argument.
	pub fn remove_tag(&mut self, tag: &str, priority: Option<Priority>) {
		if let (Some(priority), Some(hooks)) = (priority, self.tags.get_mut(tag)) {
			hooks.groups.retain(|(p, _)| *p != priority);
		}
		self.tags.remove(tag);
	}

	/// Returns true if at least one callback is registered under `tag`.
	pub fn contains(&self, tag: &str) -> bool {
		self.tags.get(tag).is_some_and(|hooks| !hooks.is_empty())
	}

	/// Returns the lowest priority at which `id` is registered under `tag`.
	pub fn find(&self, tag: &str, id: &CallbackId) -> Option<Priority> {
		self.tags
			.get(tag)?
			.groups
			.iter()
			.filter(|(_, group)| group.contains_key(id))
			.map(|(priority, _)| *priority)
			.min()
	}

	/// Number of callbacks registered under `tag`.
	pub fn len(&self, tag: &str) -> usize {
		self.tags.get(tag).map_or(0, TagHooks::len)
	}

	/// Registered tags, sorted by name.
	pub fn tags(&self) -> Vec<String> {
		let mut tags: Vec<_> = self
			.tags
			.iter()
			.filter(|(_, hooks)| !hooks.is_empty())
			.map(|(tag, _)| tag.clone())
			.collect();
		tags.sort();
		tags
	}

	/// Whether the sort cache for `tag` is currently valid.
	#[cfg(test)]
	pub fn is_sorted(&self, tag: &str) -> bool {
		self.tags.get(tag).is_some_and(|hooks| hooks.sorted)
	}

	/// Sorts the priority groups of `tag` if the cache was invalidated.
	#[cfg(test)]
	pub fn ensure_sorted(&mut self, tag: &str) {
		if let Some(hooks) = self.tags.get_mut(tag) {
			hooks.ensure_sorted();
		}
	}

	/// Returns the first group whose priority is strictly greater than
	/// `after`, or the lowest group when `after` is `None`.
	///
	/// This is the live cursor step: it reads whatever the table holds now.
	pub fn next_group(&mut self, tag: &str, after: Option<Priority>) -> Option<GroupSnapshot> {
		let hooks = self.tags.get_mut(tag)?;
		hooks.ensure_sorted();
		let start = match after {
			Some(after) => hooks.groups.partition_point(|(p, _)| *p <= after),
			None => 0,
		};
		hooks
			.groups
			.get(start)
			.map(|(priority, group)| (*priority, group.values().cloned().collect()))
	}

	/// Captures every group of `tag` in priority order.
	pub fn snapshot(&mut self, tag: &str) -> Vec<GroupSnapshot> {
		let Some(hooks) = self.tags.get_mut(tag) else {
			return Vec::new();
		};
		hooks.ensure_sorted();
		hooks
			.groups
			.iter()
			.map(|(priority, group)| (*priority, group.values().cloned().collect()))
			.collect()
	}
}
