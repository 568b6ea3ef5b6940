// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The identity provider port.

use async_trait::async_trait;
use authgate_common_secret::SecretString;

use crate::error::GatewayError;
use crate::types::{
	AttributeName, AuthChallenge, AuthFlow, AuthResult, CreateUserRequest, UserIdentity, Username,
};

/// Operations the gateway needs from an external identity provider.
///
/// Implementations translate provider failures with an
/// [`ErrorTranslator`](crate::ErrorTranslator) before returning, so every
/// error crossing this boundary is already provider-neutral.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Short provider name used in logs.
	fn name(&self) -> &'static str;

	/// Creates an account, or re-sends the invitation when `request.action`
	/// is [`InviteAction::Resend`](crate::InviteAction::Resend).
	async fn create_user(&self, request: CreateUserRequest) -> Result<UserIdentity, GatewayError>;

	async fn initiate_auth(
		&self,
		flow: AuthFlow,
		username: &Username,
		credential: &SecretString,
	) -> Result<AuthResult, GatewayError>;

	async fn respond_to_challenge(
		&self,
		username: &Username,
		challenge: &AuthChallenge,
		new_credential: &SecretString,
	) -> Result<AuthResult, GatewayError>;

	async fn update_attributes(
		&self,
		username: &Username,
		attributes: &[(AttributeName, String)],
	) -> Result<(), GatewayError>;

	/// Revokes every token issued to the session owning `access_token`.
	async fn sign_out(&self, access_token: &SecretString) -> Result<(), GatewayError>;

	async fn request_password_reset(&self, username: &Username) -> Result<(), GatewayError>;

	async fn confirm_password_reset(
		&self,
		username: &Username,
		code: &SecretString,
		new_credential: &SecretString,
	) -> Result<(), GatewayError>;

	async fn get_user(&self, username: &Username) -> Result<UserIdentity, GatewayError>;
}
