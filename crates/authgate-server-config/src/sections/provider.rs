// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider configuration section.

use std::time::Duration;

use authgate_common_config::SecretString;
use authgate_core::AuthFlow;
use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
	#[default]
	Cognito,
}

impl std::fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ProviderKind::Cognito => write!(f, "cognito"),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfigLayer {
	pub kind: Option<ProviderKind>,
	pub region: Option<String>,
	pub user_pool_id: Option<String>,
	pub client_id: Option<String>,
	pub client_secret: Option<SecretString>,
	pub endpoint: Option<String>,
	pub auth_flow: Option<AuthFlow>,
	pub request_timeout_secs: Option<u64>,
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<SecretString>,
	pub session_token: Option<SecretString>,
}

impl ProviderConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.kind.is_some() {
			self.kind = other.kind;
		}
		if other.region.is_some() {
			self.region = other.region;
		}
		if other.user_pool_id.is_some() {
			self.user_pool_id = other.user_pool_id;
		}
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.auth_flow.is_some() {
			self.auth_flow = other.auth_flow;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
		if other.access_key_id.is_some() {
			self.access_key_id = other.access_key_id;
		}
		if other.secret_access_key.is_some() {
			self.secret_access_key = other.secret_access_key;
		}
		if other.session_token.is_some() {
			self.session_token = other.session_token;
		}
	}

	pub fn finalize(self) -> Result<ProviderConfig, ConfigError> {
		let user_pool_id = required(self.user_pool_id, "user_pool_id")?;
		// Pool ids are `<region>_<suffix>`.
		let region = match self.region {
			Some(region) => region,
			None => user_pool_id
				.split_once('_')
				.map(|(region, _)| region.to_string())
				.ok_or_else(|| missing("region"))?,
		};

		let request_timeout_secs = self
			.request_timeout_secs
			.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
		if request_timeout_secs == 0 {
			return Err(ConfigError::InvalidValue {
				key: "provider.request_timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(ProviderConfig {
			kind: self.kind.unwrap_or_default(),
			region,
			user_pool_id,
			client_id: required(self.client_id, "client_id")?,
			client_secret: self.client_secret,
			endpoint: self.endpoint,
			auth_flow: self.auth_flow.unwrap_or_default(),
			request_timeout: Duration::from_secs(request_timeout_secs),
			access_key_id: required(self.access_key_id, "access_key_id")?,
			secret_access_key: self
				.secret_access_key
				.ok_or_else(|| missing("secret_access_key"))?,
			session_token: self.session_token,
		})
	}
}

fn missing(field: &str) -> ConfigError {
	ConfigError::Missing(format!(
		"provider.{field} (AUTHGATE_SERVER_PROVIDER_{})",
		field.to_uppercase()
	))
}

fn required(value: Option<String>, field: &str) -> Result<String, ConfigError> {
	value
		.filter(|v| !v.trim().is_empty())
		.ok_or_else(|| missing(field))
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
	pub kind: ProviderKind,
	pub region: String,
	pub user_pool_id: String,
	pub client_id: String,
	pub client_secret: Option<SecretString>,
	/// Endpoint override, e.g. for a local emulator.
	pub endpoint: Option<String>,
	pub auth_flow: AuthFlow,
	pub request_timeout: Duration,
	pub access_key_id: String,
	pub secret_access_key: SecretString,
	pub session_token: Option<SecretString>,
}
