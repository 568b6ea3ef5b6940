// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log output of the server binary.
//!
//! `RUST_LOG`, when set, takes precedence over `level`.

use serde::Deserialize;

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Pretty,
	/// One JSON object per event, for log shippers.
	Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		self.level = other.level.or(self.level.take());
		self.format = other.format.or(self.format);
	}

	pub fn finalize(self) -> LoggingConfig {
		let level = self
			.level
			.map(|level| level.trim().to_string())
			.filter(|level| !level.is_empty())
			.unwrap_or_else(|| DEFAULT_LEVEL.to_string());
		LoggingConfig {
			level,
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
	/// Filter directive, e.g. `info` or `authgate_core=debug,info`.
	pub level: String,
	pub format: LogFormat,
}
