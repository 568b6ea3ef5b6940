// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Identity provider selection.

use std::sync::Arc;

use authgate_core::IdentityProvider;
use authgate_provider_cognito::{AwsCredentials, CognitoConfig, CognitoProvider};
use authgate_server_config::{ProviderConfig, ProviderKind};

use crate::error::ServerError;

pub fn build(config: &ProviderConfig) -> Result<Arc<dyn IdentityProvider>, ServerError> {
	match config.kind {
		ProviderKind::Cognito => {
			let provider = CognitoProvider::new(cognito_config(config))?;
			tracing::info!(
				region = %config.region,
				user_pool_id = %config.user_pool_id,
				"cognito identity provider ready"
			);
			Ok(Arc::new(provider))
		}
	}
}

fn cognito_config(config: &ProviderConfig) -> CognitoConfig {
	CognitoConfig {
		region: config.region.clone(),
		user_pool_id: config.user_pool_id.clone(),
		client_id: config.client_id.clone(),
		client_secret: config.client_secret.clone(),
		credentials: AwsCredentials {
			access_key_id: config.access_key_id.clone(),
			secret_access_key: config.secret_access_key.clone(),
			session_token: config.session_token.clone(),
		},
		endpoint: config.endpoint.clone(),
		request_timeout: config.request_timeout,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use authgate_core::{AuthFlow, SecretString};
	use std::time::Duration;

	fn provider_config(endpoint: Option<&str>) -> ProviderConfig {
		ProviderConfig {
			kind: ProviderKind::Cognito,
			region: "eu-west-1".to_string(),
			user_pool_id: "eu-west-1_pool".to_string(),
			client_id: "client".to_string(),
			client_secret: None,
			endpoint: endpoint.map(str::to_string),
			auth_flow: AuthFlow::AdminUserPassword,
			request_timeout: Duration::from_secs(2),
			access_key_id: "AKID".to_string(),
			secret_access_key: SecretString::from("secret"),
			session_token: None,
		}
	}

	#[test]
	fn builds_cognito_provider() {
		let provider = build(&provider_config(Some("http://127.0.0.1:9229"))).unwrap();
		assert_eq!(provider.name(), "cognito");
	}

	#[test]
	fn credentials_are_carried_over() {
		let cognito = cognito_config(&provider_config(None));
		assert_eq!(cognito.credentials.access_key_id, "AKID");
		assert_eq!(cognito.credentials.secret_access_key.expose(), "secret");
		assert_eq!(cognito.request_timeout, Duration::from_secs(2));
	}
}
