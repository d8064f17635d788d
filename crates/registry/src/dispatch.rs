//! Filter and action dispatch.
//!
//! Both paths share one loop: push the tag, run the reserved "all" callbacks,
//! then walk the tag's priority groups in ascending order. Filters thread the
//! first argument through each callback; actions discard return values.

use tracing::trace;

use crate::callback::InvocationError;
use crate::config::IterationMode;
use crate::context::ExecutionGuard;
use crate::registry::HookRegistry;
use crate::table::RegisteredCallback;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Threading {
	/// Each callback's return value replaces argument 0.
	Filter,
	/// Return values are discarded.
	Action,
}

impl HookRegistry {
	/// Runs `value` through every filter registered under `tag`.
	///
	/// Each callback receives `(value, extra..)` truncated to its accepted
	/// argument count and returns the value the next callback sees. With no
	/// filters the value comes back unchanged. The first callback failure is
	/// returned as is and stops the dispatch.
	pub fn apply_filters(
		&self,
		tag: &str,
		value: Value,
		extra: &[Value],
	) -> Result<Value, InvocationError> {
		let mut args = Vec::with_capacity(extra.len() + 1);
		args.push(value);
		args.extend_from_slice(extra);

		let mut all_args = Vec::with_capacity(args.len() + 1);
		all_args.push(Value::from(tag));
		all_args.extend_from_slice(&args);

		let args = self.dispatch(tag, args, all_args, Threading::Filter)?;
		Ok(args.into_iter().next().unwrap_or_default())
	}

	/// Filters `args[0]`, handing each callback the argument vector truncated
	/// to its accepted count. An empty vector filters [`Value::Null`].
	pub fn apply_filters_ref_array(
		&self,
		tag: &str,
		mut args: Vec<Value>,
	) -> Result<Value, InvocationError> {
		let all_args = vec![Value::from(tag), Value::List(args.clone())];
		if args.is_empty() {
			args.push(Value::Null);
		}
		let args = self.dispatch(tag, args, all_args, Threading::Filter)?;
		Ok(args.into_iter().next().unwrap_or_default())
	}

	/// Triggers every action registered under `tag`.
	///
	/// The trigger is counted even when nothing is registered. With no
	/// arguments, callbacks receive a single empty string; "all" callbacks
	/// still see only the tag. If the only argument is a one-element list
	/// holding a [`Value::Object`], the object itself is passed, so callbacks
	/// mutate the caller's instance.
	pub fn trigger_action(&self, tag: &str, args: Vec<Value>) -> Result<(), InvocationError> {
		let count = self.context.record_action(tag);
		trace!(tag, count, "hooks.action");

		let mut all_args = Vec::with_capacity(args.len() + 1);
		all_args.push(Value::from(tag));
		all_args.extend_from_slice(&args);

		let args = if args.is_empty() {
			vec![Value::from("")]
		} else {
			unwrap_single_object(args)
		};
		self.dispatch(tag, args, all_args, Threading::Action)?;
		Ok(())
	}

	/// Triggers `tag` with an argument vector passed through untouched.
	pub fn trigger_action_ref_array(
		&self,
		tag: &str,
		args: Vec<Value>,
	) -> Result<(), InvocationError> {
		let count = self.context.record_action(tag);
		trace!(tag, count, "hooks.action");

		let all_args = vec![Value::from(tag), Value::List(args.clone())];
		self.dispatch(tag, args, all_args, Threading::Action)?;
		Ok(())
	}

	fn dispatch(
		&self,
		tag: &str,
		mut args: Vec<Value>,
		all_args: Vec<Value>,
		threading: Threading,
	) -> Result<Vec<Value>, InvocationError> {
		let all_tag = self.config.all_tag.as_str();
		let mut guard: Option<ExecutionGuard<'_>> = None;

		let all_groups = self.table.lock().snapshot(all_tag);
		if !all_groups.is_empty() {
			guard = Some(self.context.enter(tag));
			trace!(tag, all_tag, "hooks.dispatch.all");
			for (_, entries) in &all_groups {
				for entry in entries {
					entry.callback.invoke(&all_args)?;
				}
			}
		}

		if !self.table.lock().contains(tag) {
			return Ok(args);
		}

		let _guard = match guard {
			Some(guard) => guard,
			None => self.context.enter(tag),
		};
		trace!(tag, ?threading, depth = self.context.depth(), "hooks.dispatch.begin");

		match self.config.iteration {
			IterationMode::Live => {
				let mut cursor = None;
				loop {
					let next = self.table.lock().next_group(tag, cursor);
					let Some((priority, entries)) = next else {
						break;
					};
					cursor = Some(priority);
					invoke_group(&entries, &mut args, threading)?;
				}
			}
			IterationMode::Snapshot => {
				let groups = self.table.lock().snapshot(tag);
				for (_, entries) in &groups {
					invoke_group(entries, &mut args, threading)?;
				}
			}
		}

		trace!(tag, "hooks.dispatch.end");
		Ok(args)
	}
}

fn invoke_group(
	entries: &[RegisteredCallback],
	args: &mut [Value],
	threading: Threading,
) -> Result<(), InvocationError> {
	for entry in entries {
		let take = entry.accepted_args.min(args.len());
		let out = entry.callback.invoke(&args[..take])?;
		if threading == Threading::Filter {
			args[0] = out;
		}
	}
	Ok(())
}

/// `[[object]]` becomes `[object]`; anything else is passed as given.
fn unwrap_single_object(args: Vec<Value>) -> Vec<Value> {
	let unwrapped = match args.as_slice() {
		[Value::List(items)] => match items.as_slice() {
			[Value::Object(obj)] => Some(Value::Object(obj.clone())),
			_ => None,
		},
		_ => None,
	};
	match unwrapped {
		Some(obj) => vec![obj],
		None => args,
	}
}
