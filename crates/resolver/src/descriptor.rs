//! `Target@method` descriptors.

use std::fmt;
use std::str::FromStr;

use crate::error::ResolveError;

/// Separates the target from the method in a descriptor.
pub const SEPARATOR: char = '@';

/// Method used when a descriptor names only a target.
pub const DEFAULT_METHOD: &str = "handle";

/// A parsed `Target@method` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
	target: String,
	method: Option<String>,
}

impl Descriptor {
	/// Parses `"Target@method"` or a bare `"Target"`.
	///
	/// Only the first separator splits; the method keeps anything after it.
	pub fn parse(input: &str) -> Result<Self, ResolveError> {
		let malformed = |reason| ResolveError::Malformed {
			descriptor: input.to_string(),
			reason,
		};

		let input_trimmed = input.trim();
		let (target, method) = match input_trimmed.split_once(SEPARATOR) {
			Some((target, method)) => (target.trim(), Some(method.trim())),
			None => (input_trimmed, None),
		};

		if target.is_empty() {
			return Err(malformed("empty target"));
		}
		if method.is_some_and(str::is_empty) {
			return Err(malformed("empty method"));
		}

		Ok(Self {
			target: target.to_string(),
			method: method.map(str::to_string),
		})
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	/// The named method, or [`DEFAULT_METHOD`] for a bare target.
	pub fn method(&self) -> &str {
		self.method.as_deref().unwrap_or(DEFAULT_METHOD)
	}

	/// True when no method was written.
	pub fn is_bare(&self) -> bool {
		self.method.is_none()
	}
}

impl FromStr for Descriptor {
	type Err = ResolveError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Descriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{SEPARATOR}{}", self.target, self.method())
	}
}

#[cfg(test)]
mod tests;
