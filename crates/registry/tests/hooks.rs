//! End-to-end behaviour of the public registry API.

use std::sync::{Arc, Barrier};

use hookline_registry::{
	Args, Callback, DEFAULT_PRIORITY, HookRegistry, HooksConfig, InvocationError, IterationMode,
	Lookup, Registration, Value,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn filter_callback() -> Callback {
	Callback::named("filterCallback", |args: Args<'_>| -> Result<Value, InvocationError> {
		Ok(format!("{} filtered", args.str(0)?).into())
	})
}

fn action_callback(out: &Arc<Mutex<String>>) -> Callback {
	let out = Arc::clone(out);
	Callback::named("actionCallback", move |_args: Args<'_>| {
		out.lock().push_str("Action executed");
	})
}

#[test]
fn adding_and_removing_filters() {
	init_tracing();
	let hooks = HookRegistry::new();

	hooks.register_filter(
		"my_filter",
		Registration::new(filter_callback()).priority(10).accepted_args(1),
	);
	assert_eq!(hooks.has_filter("my_filter", Some(&filter_callback())), Lookup::At(10));

	assert!(hooks.unregister_filter("my_filter", &filter_callback(), 10));
	assert_eq!(hooks.has_filter("my_filter", Some(&filter_callback())), Lookup::Absent);
}

#[test]
fn applying_filters() {
	init_tracing();
	let hooks = HookRegistry::new();
	hooks.register_filter("my_filter", filter_callback());

	let out = hooks.apply_filters("my_filter", "Hello World".into(), &[]).unwrap();
	assert_eq!(out, Value::from("Hello World filtered"));
}

#[test]
fn adding_and_removing_actions() {
	init_tracing();
	let hooks = HookRegistry::new();
	let out = Arc::new(Mutex::new(String::new()));

	hooks.register_action("my_action", action_callback(&out));
	assert_eq!(
		hooks.has_action("my_action", Some(&action_callback(&out))),
		Lookup::At(DEFAULT_PRIORITY)
	);
	assert!(hooks.unregister_action("my_action", &action_callback(&out), DEFAULT_PRIORITY));
	assert_eq!(hooks.has_action("my_action", None), Lookup::Absent);
}

#[test]
fn triggering_action_runs_callback_and_counts() {
	init_tracing();
	let hooks = HookRegistry::new();
	let out = Arc::new(Mutex::new(String::new()));
	hooks.register_action("my_action", Registration::new(action_callback(&out)).accepted_args(0));

	hooks.trigger_action("my_action", Vec::new()).unwrap();

	assert_eq!(hooks.times_triggered("my_action"), 1);
	assert_eq!(*out.lock(), "Action executed");
}

#[test]
fn removing_all_hooks() {
	init_tracing();
	let hooks = HookRegistry::new();
	let out = Arc::new(Mutex::new(String::new()));
	hooks.register_filter("my_filter", filter_callback());
	hooks.register_action("my_action", action_callback(&out));

	hooks.unregister_all_filters("my_filter", None);
	assert_eq!(hooks.has_filter("my_filter", Some(&filter_callback())), Lookup::Absent);

	hooks.unregister_all_actions("my_action", None);
	assert_eq!(hooks.has_action("my_action", Some(&action_callback(&out))), Lookup::Absent);
}

#[test]
fn registry_is_shareable_across_threads() {
	init_tracing();
	let hooks = Arc::new(HookRegistry::with_config(HooksConfig {
		iteration: IterationMode::Snapshot,
		..HooksConfig::default()
	}));
	hooks.register_filter("double", Callback::new(|args: Args<'_>| -> Result<Value, InvocationError> {
		Ok(Value::Int(args.int(0)? * 2))
	}));

	let handles: Vec<_> = (0..4)
		.map(|n| {
			let hooks = Arc::clone(&hooks);
			std::thread::spawn(move || hooks.apply_filters("double", Value::Int(n), &[]).unwrap())
		})
		.collect();
	let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	assert_eq!(
		results,
		vec![Value::Int(0), Value::Int(2), Value::Int(4), Value::Int(6)]
	);
}

#[test]
fn concurrent_dispatches_keep_their_own_stack() {
	init_tracing();
	let hooks = Arc::new(HookRegistry::new());
	let barrier = Arc::new(Barrier::new(2));
	let seen = Arc::new(Mutex::new(None));

	let weak = Arc::downgrade(&hooks);
	let b = Arc::clone(&barrier);
	let s = Arc::clone(&seen);
	hooks.register_action(
		"b",
		Callback::new(move |_args: Args<'_>| {
			b.wait();
			// "a" is dispatched and finished on the main thread here.
			b.wait();
			let Some(hooks) = weak.upgrade() else { return };
			*s.lock() = Some((
				hooks.is_dispatching_action(Some("b")),
				hooks.is_dispatching_action(Some("a")),
				hooks.current_action(),
			));
		}),
	);
	hooks.register_action("a", Callback::new(|_args: Args<'_>| ()));

	let worker = {
		let hooks = Arc::clone(&hooks);
		std::thread::spawn(move || hooks.trigger_action("b", Vec::new()))
	};
	barrier.wait();
	hooks.trigger_action("a", Vec::new()).unwrap();
	assert!(!hooks.is_dispatching(None));
	barrier.wait();
	worker.join().unwrap().unwrap();

	assert_eq!(*seen.lock(), Some((true, false, Some("b".to_string()))));
}
