use thiserror::Error;

/// Failure to turn a descriptor into a callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	#[error("malformed descriptor {descriptor:?}: {reason}")]
	Malformed {
		descriptor: String,
		reason: &'static str,
	},

	#[error("no function or service bound as {0:?}")]
	UnknownTarget(String),

	#[error("service {target:?} does not respond to {method:?}")]
	UnknownMethod { target: String, method: String },
}
