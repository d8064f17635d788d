//! Priority-ordered filter and action hooks.
//!
//! Callbacks are registered against a string tag at a numeric priority. A
//! filter dispatch threads a value through every callback for the tag; an
//! action dispatch calls each one for its side effects. Lower priorities run
//! first, and callbacks sharing a priority run in registration order.
//!
//! ```ignore
//! let hooks = HookRegistry::new();
//! hooks.register_filter("greet", Callback::new(|args: Args<'_>| {
//!     Ok::<_, InvocationError>(format!("{} filtered", args.str(0)?))
//! }));
//! let out = hooks.apply_filters("greet", "Hello World".into(), &[])?;
//! assert_eq!(out, Value::from("Hello World filtered"));
//! ```
//!
//! # Identity
//!
//! Registration, removal and lookup compare callbacks by [`CallbackId`], not
//! by the closure value. Clone a [`Callback`] to refer to the same
//! registration later.
//!
//! # Reentrancy
//!
//! Callbacks may call back into the registry. A dispatch that sees its own tag
//! mutated follows [`IterationMode`].

mod callback;
mod config;
mod context;
mod dispatch;
mod registry;
mod table;
mod value;

pub use callback::{Args, Callback, CallbackId, IntoHookResult, Invocable, InvocationError};
pub use config::{ALL_TAG, ConfigError, HooksConfig, IterationMode};
pub use registry::{HookRegistries, HookRegistry, Lookup, Registration};
pub use value::{SharedValue, Value};

/// Execution order key. Lower runs first.
pub type Priority = i64;

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: Priority = 10;

/// Accepted argument count used when none is given.
pub const DEFAULT_ACCEPTED_ARGS: usize = 1;
