use hookline_registry::InvocationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectiveError {
	/// The argument is not a literal this directive can evaluate.
	#[error("unsupported directive expression: {0:?}")]
	UnsupportedExpression(String),

	#[error("unterminated @doAction at byte {offset}")]
	Unterminated { offset: usize },

	#[error("@doAction without a hook name")]
	MissingTag,

	/// A callback failed while the directive ran.
	#[error(transparent)]
	Invocation(#[from] InvocationError),
}
