// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Listener address of the gateway's HTTP API.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: Self) {
		self.host = other.host.or(self.host.take());
		self.port = other.port.or(self.port);
	}

	/// Binds every interface on 8080 unless told otherwise. A host that is
	/// set but blank is rejected rather than silently defaulted.
	pub fn finalize(self) -> Result<HttpConfig, ConfigError> {
		let host = match self.host {
			Some(host) if host.trim().is_empty() => {
				return Err(ConfigError::Validation(
					"AUTHGATE_SERVER_HOST must not be blank".to_string(),
				))
			}
			Some(host) => host.trim().to_string(),
			None => DEFAULT_HOST.to_string(),
		};
		Ok(HttpConfig {
			host,
			port: self.port.unwrap_or(DEFAULT_PORT),
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}
