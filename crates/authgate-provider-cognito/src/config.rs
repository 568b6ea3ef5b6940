// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::time::Duration;

use authgate_common_secret::SecretString;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Static AWS credentials used to sign admin operations.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
	pub access_key_id: String,
	pub secret_access_key: SecretString,
	pub session_token: Option<SecretString>,
}

#[derive(Debug, Clone)]
pub struct CognitoConfig {
	pub region: String,
	pub user_pool_id: String,
	pub client_id: String,
	/// App client secret. When set, every call naming a user carries a
	/// `SECRET_HASH`.
	pub client_secret: Option<SecretString>,
	pub credentials: AwsCredentials,
	/// Overrides the regional endpoint, e.g. for a local emulator.
	pub endpoint: Option<String>,
	pub request_timeout: Duration,
}

impl CognitoConfig {
	pub fn endpoint_url(&self) -> String {
		match &self.endpoint {
			Some(endpoint) => endpoint.clone(),
			None => format!("https://cognito-idp.{}.amazonaws.com/", self.region),
		}
	}
}
