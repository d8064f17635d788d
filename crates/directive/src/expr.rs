//! Parsing of `@doAction(...)` argument lists.

use hookline_registry::Value;

use crate::error::DirectiveError;

/// One `@doAction(tag[, arg])` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
	pub tag: String,
	pub arg: Value,
}

impl Directive {
	/// Parses the text between the directive's parentheses.
	///
	/// The list splits at the first top-level comma. A missing argument is the
	/// empty string.
	pub fn parse(expression: &str) -> Result<Self, DirectiveError> {
		let (tag, arg) = match split_first_comma(expression) {
			Some(at) => (&expression[..at], Some(&expression[at + 1..])),
			None => (expression, None),
		};

		if tag.trim().is_empty() {
			return Err(DirectiveError::MissingTag);
		}
		let tag = match parse_literal(tag)? {
			Value::Str(tag) => tag,
			_ => return Err(DirectiveError::UnsupportedExpression(tag.trim().to_string())),
		};
		let arg = match arg {
			Some(arg) => parse_literal(arg)?,
			None => Value::Str(String::new()),
		};

		Ok(Self { tag, arg })
	}
}

/// Evaluates a literal: a quoted string, an integer, a float, or
/// `true`/`false`/`null`.
pub fn parse_literal(raw: &str) -> Result<Value, DirectiveError> {
	let text = raw.trim();
	let unsupported = || DirectiveError::UnsupportedExpression(text.to_string());

	if let Some(quote) = text.chars().next().filter(|c| matches!(c, '\'' | '"')) {
		return unquote(text, quote).map(Value::Str).ok_or_else(unsupported);
	}

	if text.eq_ignore_ascii_case("true") {
		return Ok(Value::Bool(true));
	}
	if text.eq_ignore_ascii_case("false") {
		return Ok(Value::Bool(false));
	}
	if text.eq_ignore_ascii_case("null") {
		return Ok(Value::Null);
	}

	if let Ok(int) = text.parse::<i64>() {
		return Ok(Value::Int(int));
	}
	let numeric = text.bytes().any(|b| b.is_ascii_digit())
		&& text
			.bytes()
			.all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'));
	if numeric {
		if let Ok(float) = text.parse::<f64>() {
			return Ok(Value::Float(float));
		}
	}

	Err(unsupported())
}

/// Strips matching quotes and resolves `\\` and escaped quotes. `None` if the
/// literal does not end at its closing quote.
fn unquote(text: &str, quote: char) -> Option<String> {
	let inner = &text[quote.len_utf8()..];
	let mut out = String::with_capacity(inner.len());
	let mut escaped = false;

	for (at, c) in inner.char_indices() {
		if escaped {
			if c != quote && c != '\\' {
				out.push('\\');
			}
			out.push(c);
			escaped = false;
		} else if c == '\\' {
			escaped = true;
		} else if c == quote {
			return (at + c.len_utf8() == inner.len()).then_some(out);
		} else {
			out.push(c);
		}
	}
	None
}

/// Tracks whether a character stream is inside a string literal.
#[derive(Debug, Default)]
struct Quoting {
	quote: Option<char>,
	escaped: bool,
}

impl Quoting {
	/// Advances over `c`. True if `c` is code rather than string content or
	/// a quote delimiter.
	fn step(&mut self, c: char) -> bool {
		match self.quote {
			Some(quote) => {
				if self.escaped {
					self.escaped = false;
				} else if c == '\\' {
					self.escaped = true;
				} else if c == quote {
					self.quote = None;
				}
				false
			}
			None if matches!(c, '\'' | '"') => {
				self.quote = Some(c);
				false
			}
			None => true,
		}
	}
}

/// Byte offset of the first comma outside strings and nested parentheses.
fn split_first_comma(expression: &str) -> Option<usize> {
	let mut quoting = Quoting::default();
	let mut depth = 0usize;
	for (at, c) in expression.char_indices() {
		if !quoting.step(c) {
			continue;
		}
		match c {
			'(' => depth += 1,
			')' => depth = depth.saturating_sub(1),
			',' if depth == 0 => return Some(at),
			_ => {}
		}
	}
	None
}

/// Byte offset of the `)` closing a list whose `(` precedes `body`.
pub(crate) fn find_close(body: &str) -> Option<usize> {
	let mut quoting = Quoting::default();
	let mut depth = 0usize;
	for (at, c) in body.char_indices() {
		if !quoting.step(c) {
			continue;
		}
		match c {
			'(' => depth += 1,
			')' if depth == 0 => return Some(at),
			')' => depth -= 1,
			_ => {}
		}
	}
	None
}

#[cfg(test)]
mod tests;
