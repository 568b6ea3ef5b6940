// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Cognito user pool client implementing the identity provider port.

use std::collections::BTreeMap;

use async_trait::async_trait;
use authgate_common_secret::SecretString;
use authgate_core::{
	AttributeName, AuthChallenge, AuthFlow, AuthResult, AuthTokens, ChallengeKind,
	CreateUserRequest, DeliveryChannel, ErrorTranslator, GatewayError, IdentityProvider,
	InviteAction, ProviderFault, UserIdentity, Username,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;
use tracing::{debug, error, instrument, warn};

use crate::config::CognitoConfig;
use crate::error::CognitoError;
use crate::sigv4::{self, SignableRequest, SigningParams};
use crate::wire::{
	self, AdminCreateUserRequest, AdminCreateUserResponse, AdminGetUserRequest,
	AdminGetUserResponse, AdminInitiateAuthRequest, AdminRespondToAuthChallengeRequest,
	AdminUpdateUserAttributesRequest, AuthResponse, ConfirmForgotPasswordRequest, ErrorBody,
	ForgotPasswordRequest, GlobalSignOutRequest, Ignored, InitiateAuthRequest,
};

const SERVICE: &str = "cognito-idp";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signing {
	/// Admin operations, authorised by IAM credentials.
	Signed,
	/// Public operations, authorised by the client id or access token.
	Unsigned,
}

/// Cognito user pool adapter.
#[derive(Debug, Clone)]
pub struct CognitoProvider {
	http_client: Client,
	config: CognitoConfig,
	endpoint: Url,
	host: String,
	translator: ErrorTranslator,
}

impl CognitoProvider {
	pub fn new(config: CognitoConfig) -> Result<Self, CognitoError> {
		let http_client = authgate_common_http::provider_client(config.request_timeout)?;

		let raw_endpoint = config.endpoint_url();
		let invalid = |reason: String| CognitoError::InvalidEndpoint {
			endpoint: raw_endpoint.clone(),
			reason,
		};
		let endpoint = Url::parse(&raw_endpoint).map_err(|e| invalid(e.to_string()))?;
		let host = match (endpoint.host_str(), endpoint.port()) {
			(Some(host), Some(port)) => format!("{host}:{port}"),
			(Some(host), None) => host.to_string(),
			(None, _) => return Err(invalid("missing host".to_string())),
		};

		Ok(Self {
			http_client,
			config,
			endpoint,
			host,
			translator: ErrorTranslator::cognito(),
		})
	}

	fn secret_hash(&self, username: &str) -> Option<String> {
		self.config
			.client_secret
			.as_ref()
			.map(|secret| secret_hash(secret.expose(), username, &self.config.client_id))
	}

	async fn call<B, R>(
		&self,
		operation: &'static str,
		body: &B,
		signing: Signing,
	) -> Result<R, GatewayError>
	where
		B: Serialize + Sync,
		R: DeserializeOwned,
	{
		self.send(operation, body, signing)
			.await
			.map_err(|e| self.translator.translate(&ProviderFault::from(e)))
	}

	#[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
	async fn send<B, R>(
		&self,
		operation: &'static str,
		body: &B,
		signing: Signing,
	) -> Result<R, CognitoError>
	where
		B: Serialize + Sync,
		R: DeserializeOwned,
	{
		let payload = serde_json::to_vec(body).map_err(CognitoError::Encode)?;
		let target = format!("{TARGET_PREFIX}.{operation}");

		let mut request = self
			.http_client
			.post(self.endpoint.clone())
			.header("content-type", CONTENT_TYPE)
			.header("x-amz-target", &target);

		if signing == Signing::Signed {
			let credentials = &self.config.credentials;
			let params = SigningParams {
				access_key_id: &credentials.access_key_id,
				secret_access_key: credentials.secret_access_key.expose(),
				session_token: credentials.session_token.as_ref().map(|t| t.expose().as_str()),
				region: &self.config.region,
				service: SERVICE,
				time: Utc::now(),
			};
			let signed = sigv4::sign(
				&params,
				SignableRequest {
					method: "POST",
					path: self.endpoint.path(),
					query: self.endpoint.query().unwrap_or(""),
					headers: vec![
						("host".to_string(), self.host.clone()),
						("content-type".to_string(), CONTENT_TYPE.to_string()),
						("x-amz-target".to_string(), target.clone()),
					],
					payload: &payload,
				},
			);
			for (name, value) in signed {
				request = request.header(name, value);
			}
		}

		debug!("Sending request to Cognito");

		let response = request.body(payload).send().await.map_err(|e| {
			if e.is_timeout() {
				error!("Request timed out");
				return CognitoError::Timeout;
			}
			error!(error = %e, "Network error during Cognito request");
			CognitoError::Network(e)
		})?;

		let status = response.status();
		let header_code = response
			.headers()
			.get("x-amzn-errortype")
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.split(':').next())
			.map(str::to_string);
		let body = response.bytes().await?;
		debug!(status = %status, "Received response from Cognito");

		if !status.is_success() {
			let parsed: ErrorBody = serde_json::from_slice(&body).unwrap_or_default();
			let code = parsed.kind.or(header_code);
			warn!(status = status.as_u16(), code = ?code, "Cognito rejected request");
			return Err(CognitoError::Api {
				status: status.as_u16(),
				code,
				message: parsed.message.unwrap_or_default(),
			});
		}

		let body: &[u8] = if body.is_empty() { b"{}" } else { &body };
		serde_json::from_slice(body).map_err(|e| {
			error!(error = %e, "Failed to parse Cognito response");
			CognitoError::InvalidResponse(e.to_string())
		})
	}

	fn auth_parameters(
		&self,
		username: &Username,
		password_key: &'static str,
		password: &SecretString,
	) -> BTreeMap<&'static str, String> {
		let mut parameters = BTreeMap::new();
		parameters.insert("USERNAME", username.as_str().to_string());
		parameters.insert(password_key, password.expose().clone());
		if let Some(hash) = self.secret_hash(username.as_str()) {
			parameters.insert("SECRET_HASH", hash);
		}
		parameters
	}
}

/// `SECRET_HASH` for app clients that have a secret:
/// `base64(HMAC-SHA256(client_secret, username + client_id))`.
pub fn secret_hash(client_secret: &str, username: &str, client_id: &str) -> String {
	let mut mac = Hmac::<Sha256>::new_from_slice(client_secret.as_bytes())
		.expect("HMAC can take key of any size");
	mac.update(username.as_bytes());
	mac.update(client_id.as_bytes());
	STANDARD.encode(mac.finalize().into_bytes())
}

fn auth_result(response: AuthResponse) -> Result<AuthResult, GatewayError> {
	if let Some(name) = response.challenge_name {
		let kind = if name == wire::CHALLENGE_NEW_PASSWORD_REQUIRED {
			ChallengeKind::NewPasswordRequired
		} else {
			ChallengeKind::Unsupported(name)
		};
		let session = response
			.session
			.ok_or_else(|| GatewayError::unknown("Cognito issued a challenge without a session"))?;
		return Ok(AuthResult::challenge_pending(AuthChallenge::new(
			kind,
			session.into(),
		)));
	}

	let Some(result) = response.authentication_result else {
		return Err(GatewayError::unknown(
			"Cognito returned neither tokens nor a challenge",
		));
	};
	let Some(access_token) = result.access_token else {
		return Err(GatewayError::unknown("Cognito returned no access token"));
	};

	let mut tokens = AuthTokens::new(access_token);
	tokens.refresh_token = result.refresh_token.map(SecretString::from);
	tokens.id_token = result.id_token.map(SecretString::from);
	tokens.expires_in = result.expires_in;
	tokens.token_type = result.token_type;
	Ok(AuthResult::authenticated(tokens))
}

fn delivery_medium(channel: DeliveryChannel) -> &'static str {
	match channel {
		DeliveryChannel::Email => "EMAIL",
		DeliveryChannel::Sms => "SMS",
	}
}

#[async_trait]
impl IdentityProvider for CognitoProvider {
	fn name(&self) -> &'static str {
		"cognito"
	}

	#[instrument(skip_all, fields(action = ?request.action))]
	async fn create_user(&self, request: CreateUserRequest) -> Result<UserIdentity, GatewayError> {
		let (message_action, user_attributes) = match request.action {
			InviteAction::Send => (None, wire::to_attributes(&request.attributes)),
			InviteAction::Resend => (Some("RESEND"), Vec::new()),
		};
		let body = AdminCreateUserRequest {
			user_pool_id: &self.config.user_pool_id,
			username: request.username.as_str(),
			temporary_password: request
				.temporary_credential
				.as_ref()
				.map(|c| c.expose().as_str()),
			user_attributes,
			desired_delivery_mediums: vec![delivery_medium(request.delivery)],
			message_action,
		};

		let response: AdminCreateUserResponse =
			self.call("AdminCreateUser", &body, Signing::Signed).await?;
		Ok(response.user.into())
	}

	#[instrument(skip_all, fields(flow = ?flow))]
	async fn initiate_auth(
		&self,
		flow: AuthFlow,
		username: &Username,
		credential: &SecretString,
	) -> Result<AuthResult, GatewayError> {
		let auth_parameters = self.auth_parameters(username, "PASSWORD", credential);
		let response: AuthResponse = match flow {
			AuthFlow::AdminUserPassword => {
				let body = AdminInitiateAuthRequest {
					user_pool_id: &self.config.user_pool_id,
					client_id: &self.config.client_id,
					auth_flow: "ADMIN_USER_PASSWORD_AUTH",
					auth_parameters,
				};
				self.call("AdminInitiateAuth", &body, Signing::Signed).await?
			}
			AuthFlow::UserPassword => {
				let body = InitiateAuthRequest {
					client_id: &self.config.client_id,
					auth_flow: "USER_PASSWORD_AUTH",
					auth_parameters,
				};
				self.call("InitiateAuth", &body, Signing::Unsigned).await?
			}
		};
		auth_result(response)
	}

	#[instrument(skip_all, fields(challenge = challenge.kind.name()))]
	async fn respond_to_challenge(
		&self,
		username: &Username,
		challenge: &AuthChallenge,
		new_credential: &SecretString,
	) -> Result<AuthResult, GatewayError> {
		let body = AdminRespondToAuthChallengeRequest {
			user_pool_id: &self.config.user_pool_id,
			client_id: &self.config.client_id,
			challenge_name: challenge.kind.name(),
			session: challenge.session_token.expose(),
			challenge_responses: self.auth_parameters(username, "NEW_PASSWORD", new_credential),
		};
		let response: AuthResponse = self
			.call("AdminRespondToAuthChallenge", &body, Signing::Signed)
			.await?;
		auth_result(response)
	}

	#[instrument(skip_all)]
	async fn update_attributes(
		&self,
		username: &Username,
		attributes: &[(AttributeName, String)],
	) -> Result<(), GatewayError> {
		let body = AdminUpdateUserAttributesRequest {
			user_pool_id: &self.config.user_pool_id,
			username: username.as_str(),
			user_attributes: wire::to_attributes(attributes),
		};
		let _: Ignored = self
			.call("AdminUpdateUserAttributes", &body, Signing::Signed)
			.await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn sign_out(&self, access_token: &SecretString) -> Result<(), GatewayError> {
		let body = GlobalSignOutRequest {
			access_token: access_token.expose(),
		};
		let _: Ignored = self.call("GlobalSignOut", &body, Signing::Unsigned).await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn request_password_reset(&self, username: &Username) -> Result<(), GatewayError> {
		let body = ForgotPasswordRequest {
			client_id: &self.config.client_id,
			username: username.as_str(),
			secret_hash: self.secret_hash(username.as_str()),
		};
		let _: Ignored = self.call("ForgotPassword", &body, Signing::Unsigned).await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn confirm_password_reset(
		&self,
		username: &Username,
		code: &SecretString,
		new_credential: &SecretString,
	) -> Result<(), GatewayError> {
		let body = ConfirmForgotPasswordRequest {
			client_id: &self.config.client_id,
			username: username.as_str(),
			confirmation_code: code.expose(),
			password: new_credential.expose(),
			secret_hash: self.secret_hash(username.as_str()),
		};
		let _: Ignored = self
			.call("ConfirmForgotPassword", &body, Signing::Unsigned)
			.await?;
		Ok(())
	}

	#[instrument(skip_all)]
	async fn get_user(&self, username: &Username) -> Result<UserIdentity, GatewayError> {
		let body = AdminGetUserRequest {
			user_pool_id: &self.config.user_pool_id,
			username: username.as_str(),
		};
		let response: AdminGetUserResponse =
			self.call("AdminGetUser", &body, Signing::Signed).await?;
		Ok(response.into())
	}
}
