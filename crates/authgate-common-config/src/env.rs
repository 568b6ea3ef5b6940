// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret loading from the environment.
//!
//! A secret named `FOO` can be supplied either directly as `FOO=value` or
//! indirectly as `FOO_FILE=/run/secrets/foo`, the convention used by Docker
//! and Kubernetes secret mounts. Setting both is an error.

use std::path::PathBuf;

use authgate_common_secret::SecretString;
use thiserror::Error;

/// Errors from [`load_secret_env`].
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Ambiguous { name: String },

	#[error("failed to read secret file {path} for {name}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Load an optional secret from `name` or `name_FILE`.
///
/// Empty values are treated as unset. Trailing newlines in secret files are
/// stripped.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let direct = std::env::var(name).ok().filter(|v| !v.is_empty());
	let file_var = format!("{name}_FILE");
	let file = std::env::var(&file_var).ok().filter(|v| !v.is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let content =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					name: name.to_string(),
					path: path.clone(),
					source,
				})?;
			let trimmed = content.trim_end_matches(['\n', '\r']);
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(trimmed.to_string())))
			}
		}
		(None, None) => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test uses its own variable names; the process environment is shared
	// between test threads.

	#[test]
	fn test_unset_secret_is_none() {
		let loaded = load_secret_env("AUTHGATE_TEST_SECRET_UNSET").unwrap();
		assert!(loaded.is_none());
	}

	#[test]
	fn test_direct_secret() {
		std::env::set_var("AUTHGATE_TEST_SECRET_DIRECT", "abc");
		let loaded = load_secret_env("AUTHGATE_TEST_SECRET_DIRECT").unwrap().unwrap();
		assert_eq!(loaded.expose(), "abc");
		std::env::remove_var("AUTHGATE_TEST_SECRET_DIRECT");
	}

	#[test]
	fn test_file_secret_strips_newline() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();
		std::env::set_var("AUTHGATE_TEST_SECRET_VIA_FILE_FILE", file.path());
		let loaded = load_secret_env("AUTHGATE_TEST_SECRET_VIA_FILE")
			.unwrap()
			.unwrap();
		assert_eq!(loaded.expose(), "from-file");
		std::env::remove_var("AUTHGATE_TEST_SECRET_VIA_FILE_FILE");
	}

	#[test]
	fn test_both_set_is_ambiguous() {
		std::env::set_var("AUTHGATE_TEST_SECRET_BOTH", "x");
		std::env::set_var("AUTHGATE_TEST_SECRET_BOTH_FILE", "/nonexistent");
		let result = load_secret_env("AUTHGATE_TEST_SECRET_BOTH");
		assert!(matches!(result, Err(SecretEnvError::Ambiguous { .. })));
		std::env::remove_var("AUTHGATE_TEST_SECRET_BOTH");
		std::env::remove_var("AUTHGATE_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn test_empty_file_is_none() {
		let file = tempfile::NamedTempFile::new().unwrap();
		std::env::set_var("AUTHGATE_TEST_SECRET_EMPTY_FILE_FILE", file.path());
		let loaded = load_secret_env("AUTHGATE_TEST_SECRET_EMPTY_FILE").unwrap();
		assert!(loaded.is_none());
		std::env::remove_var("AUTHGATE_TEST_SECRET_EMPTY_FILE_FILE");
	}
}
