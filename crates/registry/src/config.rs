//! Registry configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY, Priority};

/// Tag whose callbacks run before every dispatch.
pub const ALL_TAG: &str = "all";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}

/// How a dispatch reacts to its own tag being mutated while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationMode {
	/// Visit priority groups through a cursor over the live table. Groups
	/// added above the cursor run; groups removed above it do not.
	#[default]
	Live,
	/// Capture every group when the dispatch starts.
	Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HooksConfig {
	/// Priority used when a registration does not name one.
	pub default_priority: Priority,
	/// Accepted argument count used when a registration does not name one.
	pub default_accepted_args: usize,
	/// Reserved tag whose callbacks observe every dispatch.
	pub all_tag: String,
	pub iteration: IterationMode,
}

impl Default for HooksConfig {
	fn default() -> Self {
		Self {
			default_priority: DEFAULT_PRIORITY,
			default_accepted_args: DEFAULT_ACCEPTED_ARGS,
			all_tag: ALL_TAG.to_owned(),
			iteration: IterationMode::default(),
		}
	}
}

impl HooksConfig {
	/// Parses a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		let config = HooksConfig::from_toml_str("").unwrap();
		assert_eq!(config, HooksConfig::default());
		assert_eq!(config.default_priority, 10);
		assert_eq!(config.default_accepted_args, 1);
		assert_eq!(config.all_tag, "all");
		assert_eq!(config.iteration, IterationMode::Live);
	}

	#[test]
	fn parses_every_field() {
		let config = HooksConfig::from_toml_str(
			r#"
				default_priority = 50
				default_accepted_args = 3
				all_tag = "*"
				iteration = "snapshot"
			"#,
		)
		.unwrap();
		assert_eq!(
			config,
			HooksConfig {
				default_priority: 50,
				default_accepted_args: 3,
				all_tag: "*".into(),
				iteration: IterationMode::Snapshot,
			}
		);
	}

	#[test]
	fn rejects_unknown_keys() {
		let err = HooksConfig::from_toml_str("priority = 3").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)));
	}

	#[test]
	fn rejects_unknown_iteration_mode() {
		assert!(HooksConfig::from_toml_str(r#"iteration = "random""#).is_err());
	}

	#[test]
	fn load_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "default_priority = -5").unwrap();
		let config = HooksConfig::load(file.path()).unwrap();
		assert_eq!(config.default_priority, -5);
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = HooksConfig::load(dir.path().join("hooks.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
