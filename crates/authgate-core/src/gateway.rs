// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The authentication gateway.

use std::sync::Arc;

use authgate_common_secret::SecretString;
use tracing::{debug, info, instrument, warn};

use crate::credential::generate_temporary_credential;
use crate::error::{ErrorKind, GatewayError};
use crate::port::IdentityProvider;
use crate::types::{
	AttributeName, AuthChallenge, AuthFlow, AuthResult, AuthStatus, ChallengeCompletion,
	ChallengeKind, CreateUserRequest, DeliveryChannel, InviteAction, LoginState, SignOutOutcome,
	UserIdentity, Username,
};
use crate::validation::{
	CompleteChallengeRequest, ConfirmForgotPasswordRequest, LoginRequest, SignupRequest,
	UserLookupRequest,
};

/// Returned to callers who must set a new password before logging in.
pub const NEW_PASSWORD_REQUIRED_MESSAGE: &str = "User need to change password";

/// Returned once a new-password challenge has been answered.
pub const PASSWORD_SET_MESSAGE: &str = "Set new password successfully";

const UNEXPECTED_CHALLENGE_MESSAGE: &str = "Unexpected challenge type";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayConfig {
	/// Flow used for credential logins.
	pub auth_flow: AuthFlow,
	/// Channel for both the first invitation and any re-send.
	pub invite_delivery: DeliveryChannel,
}

/// Maps account operations onto [`IdentityProvider`] calls.
///
/// Holds no per-request state. Cloning is cheap.
#[derive(Clone)]
pub struct AuthGateway {
	provider: Arc<dyn IdentityProvider>,
	config: GatewayConfig,
}

impl AuthGateway {
	pub fn new(provider: Arc<dyn IdentityProvider>, config: GatewayConfig) -> Self {
		Self { provider, config }
	}

	pub fn provider_name(&self) -> &'static str {
		self.provider.name()
	}

	/// Creates an account with the four caller-supplied attributes and sends
	/// the invitation over the configured channel.
	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn signup(&self, request: &SignupRequest) -> Result<UserIdentity, GatewayError> {
		let user = self
			.provider
			.create_user(CreateUserRequest {
				username: request.username().clone(),
				temporary_credential: Some(request.temporary_credential().clone()),
				attributes: request.attributes().to_vec(),
				delivery: self.config.invite_delivery,
				action: InviteAction::Send,
			})
			.await?;

		info!(delivery = ?self.config.invite_delivery, "user invited");
		Ok(user)
	}

	/// Authenticates with a credential.
	///
	/// Returns tokens, or a pending new-password challenge. Any other
	/// challenge fails with [`ErrorKind::UnsupportedChallenge`].
	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn login(&self, request: &LoginRequest) -> Result<AuthResult, GatewayError> {
		let result = self
			.provider
			.initiate_auth(self.config.auth_flow, request.username(), request.credential())
			.await
			.and_then(accept_login_result);

		let state = LoginState::after(&result);
		match &result {
			Ok(_) => debug!(?state, "login step complete"),
			Err(e) => info!(?state, kind = %e.kind, "login rejected"),
		}
		result
	}

	/// Authenticates with a temporary credential. Succeeds only when the
	/// provider asks for a new password.
	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn login_with_temporary_credential(
		&self,
		request: &LoginRequest,
	) -> Result<AuthChallenge, GatewayError> {
		let result = self.login(request).await?;
		match (result.status, result.challenge) {
			(AuthStatus::ChallengePending, Some(challenge)) => Ok(challenge),
			_ => {
				warn!("temporary credential login completed without a challenge");
				Err(GatewayError::new(
					ErrorKind::UnsupportedChallenge,
					UNEXPECTED_CHALLENGE_MESSAGE,
				))
			}
		}
	}

	/// Answers a new-password challenge, then marks the contact attributes
	/// verified.
	///
	/// Once the provider accepts the new password the outcome is never an
	/// error: a failed second step reports
	/// [`PasswordSetVerificationPending`](ChallengeCompletion::PasswordSetVerificationPending),
	/// and a further provider challenge reports
	/// [`PasswordSetChallengePending`](ChallengeCompletion::PasswordSetChallengePending).
	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn complete_challenge(
		&self,
		request: &CompleteChallengeRequest,
	) -> Result<ChallengeCompletion, GatewayError> {
		let challenge = AuthChallenge::new(
			ChallengeKind::NewPasswordRequired,
			request.session_token().clone(),
		);
		let result = self
			.provider
			.respond_to_challenge(request.username(), &challenge, request.new_credential())
			.await?;

		if result.status == AuthStatus::Failed {
			return Err(GatewayError::from_kind(ErrorKind::ChallengeExpired));
		}

		let verification = self.mark_contacts_verified(request.username()).await;
		match (result.challenge.clone(), verification) {
			(Some(next), verification) => {
				warn!(
					challenge = next.kind.name(),
					"new password set but provider issued a further challenge"
				);
				Ok(ChallengeCompletion::PasswordSetChallengePending {
					challenge: next,
					verification_error: verification.err(),
				})
			}
			(None, Ok(())) => {
				info!("new password set");
				Ok(ChallengeCompletion::PasswordSet(result))
			}
			(None, Err(verification_error)) => {
				Ok(ChallengeCompletion::PasswordSetVerificationPending {
					result,
					verification_error,
				})
			}
		}
	}

	async fn mark_contacts_verified(&self, username: &Username) -> Result<(), GatewayError> {
		let verified = [
			(AttributeName::EmailVerified, "true".to_string()),
			(AttributeName::PhoneVerified, "true".to_string()),
		];
		let outcome = self.provider.update_attributes(username, &verified).await;
		if let Err(e) = &outcome {
			warn!(kind = %e.kind, "new password set but contact verification failed");
		}
		outcome
	}

	/// Revokes the session behind `access_token`. Signing out twice is not an
	/// error.
	#[instrument(skip_all, fields(provider = self.provider.name()))]
	pub async fn logout(&self, access_token: &SecretString) -> Result<SignOutOutcome, GatewayError> {
		match self.provider.sign_out(access_token).await {
			Ok(()) => {
				debug!("signed out");
				Ok(SignOutOutcome::SignedOut)
			}
			Err(e) if e.kind == ErrorKind::TokenRevoked => {
				debug!("token already revoked");
				Ok(SignOutOutcome::AlreadySignedOut)
			}
			Err(e) => Err(e),
		}
	}

	/// Re-sends the invitation with a freshly generated temporary credential
	/// over the same channel used at signup.
	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn resend_invite(
		&self,
		request: &UserLookupRequest,
	) -> Result<UserIdentity, GatewayError> {
		let user = self
			.provider
			.create_user(CreateUserRequest {
				username: request.username().clone(),
				temporary_credential: Some(generate_temporary_credential()),
				attributes: Vec::new(),
				delivery: self.config.invite_delivery,
				action: InviteAction::Resend,
			})
			.await?;

		info!(delivery = ?self.config.invite_delivery, "invitation re-sent");
		Ok(user)
	}

	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn forgot_password(&self, request: &UserLookupRequest) -> Result<(), GatewayError> {
		self.provider
			.request_password_reset(request.username())
			.await?;
		info!("password reset requested");
		Ok(())
	}

	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn confirm_forgot_password(
		&self,
		request: &ConfirmForgotPasswordRequest,
	) -> Result<(), GatewayError> {
		self.provider
			.confirm_password_reset(request.username(), request.code(), request.new_credential())
			.await?;
		info!("password reset confirmed");
		Ok(())
	}

	#[instrument(skip_all, fields(provider = self.provider.name(), username = %request.username()))]
	pub async fn get_user(&self, request: &UserLookupRequest) -> Result<UserIdentity, GatewayError> {
		self.provider.get_user(request.username()).await
	}
}

fn accept_login_result(result: AuthResult) -> Result<AuthResult, GatewayError> {
	match result.status {
		AuthStatus::Authenticated if result.tokens.is_some() => Ok(result),
		AuthStatus::Authenticated => Err(GatewayError::unknown(
			"Identity provider reported success without tokens",
		)),
		AuthStatus::ChallengePending => match result.challenge.as_ref().map(|c| c.kind.clone()) {
			Some(ChallengeKind::NewPasswordRequired) => Ok(result),
			Some(ChallengeKind::Unsupported(name)) => Err(GatewayError::unsupported_challenge(&name)),
			Some(ChallengeKind::None) | None => Err(GatewayError::new(
				ErrorKind::UnsupportedChallenge,
				UNEXPECTED_CHALLENGE_MESSAGE,
			)),
		},
		AuthStatus::SignedOut | AuthStatus::Failed => {
			Err(GatewayError::from_kind(ErrorKind::InvalidCredentials))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{FakeProvider, Operation, ProviderCall};
	use crate::translate::ProviderFault;
	use crate::validation::{
		validate_complete_challenge, validate_confirm_forgot_password, validate_login,
		validate_signup, validate_temporary_login, validate_user_lookup, RawFields,
	};
	use serde_json::{json, Value};

	fn fields(value: Value) -> RawFields {
		match value {
			Value::Object(map) => map,
			_ => panic!("expected object"),
		}
	}

	fn gateway(provider: &Arc<FakeProvider>, config: GatewayConfig) -> AuthGateway {
		AuthGateway::new(provider.clone(), config)
	}

	fn signup_fields() -> RawFields {
		fields(json!({
			"tempPwd": "T3mp#Pass",
			"email": "A@X.io",
			"phone": "+15550001111",
			"firstName": "A",
			"lastName": "B",
		}))
	}

	#[tokio::test]
	async fn signup_sends_exactly_four_attributes_over_configured_channel() {
		let provider = Arc::new(FakeProvider::new());
		let gateway = gateway(
			&provider,
			GatewayConfig {
				invite_delivery: DeliveryChannel::Sms,
				..Default::default()
			},
		);

		let request = validate_signup(&signup_fields()).unwrap();
		let user = gateway.signup(&request).await.unwrap();
		assert_eq!(user.username, "a@x.io");

		assert_eq!(
			provider.calls(),
			vec![ProviderCall::CreateUser {
				username: "a@x.io".into(),
				attributes: vec![
					(AttributeName::Email, "a@x.io".into()),
					(AttributeName::Phone, "+15550001111".into()),
					(AttributeName::GivenName, "A".into()),
					(AttributeName::FamilyName, "B".into()),
				],
				delivery: DeliveryChannel::Sms,
				action: InviteAction::Send,
				has_temporary_credential: true,
			}]
		);
	}

	#[tokio::test]
	async fn signup_twice_reports_existing_user() {
		let provider = Arc::new(FakeProvider::new());
		let gateway = gateway(&provider, GatewayConfig::default());
		let request = validate_signup(&signup_fields()).unwrap();

		gateway.signup(&request).await.unwrap();
		let err = gateway.signup(&request).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::UserAlreadyExists);
	}

	#[tokio::test]
	async fn temporary_login_returns_session_token() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "T3mp#Pass", true)
				.with_session_token("tok123"),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let request =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "T3mp#Pass" })))
				.unwrap();

		let challenge = gateway
			.login_with_temporary_credential(&request)
			.await
			.unwrap();
		assert_eq!(challenge.kind, ChallengeKind::NewPasswordRequired);
		assert_eq!(challenge.session_token.expose(), "tok123");
	}

	#[tokio::test]
	async fn temporary_login_without_challenge_is_unexpected() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		let gateway = gateway(&provider, GatewayConfig::default());
		let request =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "Pass#1234" })))
				.unwrap();

		let err = gateway
			.login_with_temporary_credential(&request)
			.await
			.unwrap_err();
		assert_eq!(err.kind, ErrorKind::UnsupportedChallenge);
		assert_eq!(err.message, "Unexpected challenge type");
	}

	#[tokio::test]
	async fn login_rejects_unsupported_challenges() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "Pass#1234", false)
				.with_challenge(ChallengeKind::Unsupported("SMS_MFA".into())),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let request =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "Pass#1234" }))).unwrap();

		let err = gateway.login(&request).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::UnsupportedChallenge);
		assert!(err.message.contains("SMS_MFA"));
	}

	#[tokio::test]
	async fn login_with_wrong_credential_fails() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		let gateway = gateway(&provider, GatewayConfig::default());
		let request =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "nope" }))).unwrap();

		let err = gateway.login(&request).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::InvalidCredentials);
		assert!(!err.retryable);
	}

	#[tokio::test]
	async fn login_uses_configured_flow() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		let gateway = gateway(
			&provider,
			GatewayConfig {
				auth_flow: AuthFlow::UserPassword,
				..Default::default()
			},
		);
		let request =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "Pass#1234" }))).unwrap();

		let result = gateway.login(&request).await.unwrap();
		assert_eq!(result.status, AuthStatus::Authenticated);
		assert_eq!(
			provider.calls_to(Operation::InitiateAuth),
			vec![ProviderCall::InitiateAuth {
				username: "u@x.io".into(),
				flow: AuthFlow::UserPassword,
			}]
		);
	}

	#[tokio::test]
	async fn complete_challenge_marks_contacts_verified() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "T3mp#Pass", true)
				.with_session_token("tok123"),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let login =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "T3mp#Pass" })))
				.unwrap();
		gateway
			.login_with_temporary_credential(&login)
			.await
			.unwrap();

		let request = validate_complete_challenge(&fields(json!({
			"email": "u@x.io",
			"password": "N3w#Pass",
			"session": "tok123",
		})))
		.unwrap();
		let outcome = gateway.complete_challenge(&request).await.unwrap();
		assert!(matches!(outcome, ChallengeCompletion::PasswordSet(_)));

		let attributes = provider.attributes("u@x.io").unwrap();
		assert_eq!(attributes.get("emailVerified").map(String::as_str), Some("true"));
		assert_eq!(attributes.get("phoneVerified").map(String::as_str), Some("true"));
	}

	#[tokio::test]
	async fn complete_challenge_reports_partial_success() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "T3mp#Pass", true)
				.with_session_token("tok123"),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let login =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "T3mp#Pass" })))
				.unwrap();
		gateway
			.login_with_temporary_credential(&login)
			.await
			.unwrap();

		provider.fail_next(
			Operation::UpdateAttributes,
			ProviderFault::Transport {
				timeout: true,
				message: "deadline elapsed".into(),
			},
		);
		let request = validate_complete_challenge(&fields(json!({
			"email": "u@x.io",
			"password": "N3w#Pass",
			"session": "tok123",
		})))
		.unwrap();

		match gateway.complete_challenge(&request).await.unwrap() {
			ChallengeCompletion::PasswordSetVerificationPending {
				verification_error, ..
			} => assert_eq!(verification_error.kind, ErrorKind::UpstreamUnavailable),
			other => panic!("expected partial success, got {other:?}"),
		}

		let login =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "N3w#Pass" }))).unwrap();
		let result = gateway.login(&login).await.unwrap();
		assert_eq!(result.status, AuthStatus::Authenticated);
	}

	#[tokio::test]
	async fn complete_challenge_reports_further_challenge_as_password_set() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "T3mp#Pass", true)
				.with_session_token("tok123")
				.with_follow_up_challenge(ChallengeKind::Unsupported("MFA_SETUP".into())),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let login =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "T3mp#Pass" })))
				.unwrap();
		gateway
			.login_with_temporary_credential(&login)
			.await
			.unwrap();

		let request = validate_complete_challenge(&fields(json!({
			"email": "u@x.io",
			"password": "N3w#Pass",
			"session": "tok123",
		})))
		.unwrap();
		match gateway.complete_challenge(&request).await.unwrap() {
			ChallengeCompletion::PasswordSetChallengePending {
				challenge,
				verification_error,
			} => {
				assert_eq!(challenge.kind.name(), "MFA_SETUP");
				assert!(verification_error.is_none());
			}
			other => panic!("expected further challenge, got {other:?}"),
		}

		assert_eq!(provider.calls_to(Operation::UpdateAttributes).len(), 1);
		let attributes = provider.attributes("u@x.io").unwrap();
		assert_eq!(attributes.get("emailVerified").map(String::as_str), Some("true"));
	}

	#[tokio::test]
	async fn further_challenge_keeps_verification_failure() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("u@x.io", "T3mp#Pass", true)
				.with_session_token("tok123")
				.with_follow_up_challenge(ChallengeKind::Unsupported("SOFTWARE_TOKEN_MFA".into())),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let login =
			validate_temporary_login(&fields(json!({ "email": "u@x.io", "tempPwd": "T3mp#Pass" })))
				.unwrap();
		gateway
			.login_with_temporary_credential(&login)
			.await
			.unwrap();
		provider.fail_next(
			Operation::UpdateAttributes,
			ProviderFault::rejected("TooManyRequestsException", "Rate exceeded"),
		);

		let request = validate_complete_challenge(&fields(json!({
			"email": "u@x.io",
			"password": "N3w#Pass",
			"session": "tok123",
		})))
		.unwrap();
		match gateway.complete_challenge(&request).await.unwrap() {
			ChallengeCompletion::PasswordSetChallengePending {
				verification_error: Some(e),
				..
			} => assert_eq!(e.kind, ErrorKind::RateLimited),
			other => panic!("expected further challenge with failed verification, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn complete_challenge_with_stale_session_expires() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "T3mp#Pass", true));
		let gateway = gateway(&provider, GatewayConfig::default());
		let request = validate_complete_challenge(&fields(json!({
			"email": "u@x.io",
			"password": "N3w#Pass",
			"session": "never-issued",
		})))
		.unwrap();

		let err = gateway.complete_challenge(&request).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::ChallengeExpired);
		assert!(provider.calls_to(Operation::UpdateAttributes).is_empty());
	}

	#[tokio::test]
	async fn second_logout_is_already_signed_out() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		let gateway = gateway(&provider, GatewayConfig::default());
		let request =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "Pass#1234" }))).unwrap();
		let result = gateway.login(&request).await.unwrap();
		let access_token = result.tokens.unwrap().access_token;

		assert_eq!(
			gateway.logout(&access_token).await.unwrap(),
			SignOutOutcome::SignedOut
		);
		assert_eq!(
			gateway.logout(&access_token).await.unwrap(),
			SignOutOutcome::AlreadySignedOut
		);
	}

	#[tokio::test]
	async fn logout_with_unknown_token_fails() {
		let provider = Arc::new(FakeProvider::new());
		let gateway = gateway(&provider, GatewayConfig::default());

		let err = gateway
			.logout(&SecretString::from("forged"))
			.await
			.unwrap_err();
		assert_eq!(err.kind, ErrorKind::InvalidCredentials);
	}

	#[tokio::test]
	async fn resend_uses_signup_channel_and_fresh_credential() {
		let provider = Arc::new(FakeProvider::new());
		let gateway = gateway(
			&provider,
			GatewayConfig {
				invite_delivery: DeliveryChannel::Sms,
				..Default::default()
			},
		);
		gateway
			.signup(&validate_signup(&signup_fields()).unwrap())
			.await
			.unwrap();
		gateway
			.resend_invite(&validate_user_lookup(&fields(json!({ "email": "a@x.io" }))).unwrap())
			.await
			.unwrap();

		let deliveries: Vec<_> = provider
			.calls_to(Operation::CreateUser)
			.into_iter()
			.map(|call| match call {
				ProviderCall::CreateUser {
					delivery,
					action,
					has_temporary_credential,
					..
				} => (delivery, action, has_temporary_credential),
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(
			deliveries,
			vec![
				(DeliveryChannel::Sms, InviteAction::Send, true),
				(DeliveryChannel::Sms, InviteAction::Resend, true),
			]
		);
	}

	#[tokio::test]
	async fn resend_for_unknown_user_fails() {
		let provider = Arc::new(FakeProvider::new());
		let gateway = gateway(&provider, GatewayConfig::default());
		let err = gateway
			.resend_invite(&validate_user_lookup(&fields(json!({ "email": "nobody@x.io" }))).unwrap())
			.await
			.unwrap_err();
		assert_eq!(err.kind, ErrorKind::UserNotFound);
	}

	#[tokio::test]
	async fn password_reset_round_trip() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Old#Pass1", false));
		let gateway = gateway(&provider, GatewayConfig::default());
		gateway
			.forgot_password(&validate_user_lookup(&fields(json!({ "email": "u@x.io" }))).unwrap())
			.await
			.unwrap();

		let wrong = validate_confirm_forgot_password(&fields(json!({
			"email": "u@x.io",
			"code": "000000",
			"password": "N3w#Pass",
		})))
		.unwrap();
		assert_eq!(
			gateway.confirm_forgot_password(&wrong).await.unwrap_err().kind,
			ErrorKind::InvalidCode
		);

		let code = provider.reset_code("u@x.io").unwrap();
		let right = validate_confirm_forgot_password(&fields(json!({
			"email": "u@x.io",
			"code": code,
			"password": "N3w#Pass",
		})))
		.unwrap();
		gateway.confirm_forgot_password(&right).await.unwrap();

		let login =
			validate_login(&fields(json!({ "email": "u@x.io", "password": "N3w#Pass" }))).unwrap();
		assert!(gateway.login(&login).await.is_ok());
	}

	#[tokio::test]
	async fn get_user_reports_status() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		let gateway = gateway(&provider, GatewayConfig::default());
		let user = gateway
			.get_user(&validate_user_lookup(&fields(json!({ "email": "U@X.io" }))).unwrap())
			.await
			.unwrap();
		assert_eq!(user.username, "u@x.io");
		assert_eq!(user.status.as_deref(), Some("CONFIRMED"));
	}

	#[tokio::test]
	async fn transport_failure_is_retryable() {
		let provider = Arc::new(FakeProvider::new().with_account("u@x.io", "Pass#1234", false));
		provider.fail_next(
			Operation::GetUser,
			ProviderFault::Transport {
				timeout: false,
				message: "connection refused".into(),
			},
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let err = gateway
			.get_user(&validate_user_lookup(&fields(json!({ "email": "u@x.io" }))).unwrap())
			.await
			.unwrap_err();
		assert_eq!(err.kind, ErrorKind::UpstreamUnavailable);
		assert!(err.retryable);
	}

	#[tokio::test]
	async fn concurrent_logins_are_independent() {
		let provider = Arc::new(
			FakeProvider::new()
				.with_account("a@x.io", "Pass#1234", false)
				.with_account("b@x.io", "Pass#5678", false),
		);
		let gateway = gateway(&provider, GatewayConfig::default());
		let a = validate_login(&fields(json!({ "email": "a@x.io", "password": "Pass#1234" }))).unwrap();
		let b = validate_login(&fields(json!({ "email": "b@x.io", "password": "wrong" }))).unwrap();

		let (a, b) = futures::join!(gateway.login(&a), gateway.login(&b));
		assert_eq!(a.unwrap().status, AuthStatus::Authenticated);
		assert_eq!(b.unwrap_err().kind, ErrorKind::InvalidCredentials);
	}
}
