use hookline_registry::HookRegistry;
use tracing::trace;

use crate::error::DirectiveError;
use crate::expr::{Directive, find_close};

/// Opening of a directive occurrence.
pub const OPEN: &str = "@doAction(";

/// Renders `template`, triggering each `@doAction(tag[, arg])` in order.
///
/// Directives expand to nothing; the surrounding text is copied unchanged.
/// Actions run as the template is scanned, so text after a failing directive
/// is never reached.
pub fn render(hooks: &HookRegistry, template: &str) -> Result<String, DirectiveError> {
	let mut out = String::with_capacity(template.len());
	let mut rest = template;
	let mut offset = 0;

	while let Some(start) = rest.find(OPEN) {
		out.push_str(&rest[..start]);

		let body_start = start + OPEN.len();
		let body = &rest[body_start..];
		let end = find_close(body).ok_or(DirectiveError::Unterminated {
			offset: offset + start,
		})?;

		let Directive { tag, arg } = Directive::parse(&body[..end])?;
		trace!(tag = %tag, offset = offset + start, "hooks.directive");
		hooks.trigger_action(&tag, vec![arg])?;

		let consumed = body_start + end + 1;
		offset += consumed;
		rest = &rest[consumed..];
	}

	out.push_str(rest);
	Ok(out)
}
