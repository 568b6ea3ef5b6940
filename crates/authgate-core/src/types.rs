// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Provider-neutral data model shared by the gateway and its adapters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use authgate_common_secret::SecretString;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, ValidationError, ValidationReason};

/// Maximum email length per RFC 5321.
pub const MAX_USERNAME_LEN: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
		.expect("valid email regex")
});

/// Opaque token correlating a pending challenge with its response.
pub type SessionToken = SecretString;

/// Normalised account identifier. Always a lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
	/// Trims, lower-cases and checks the address shape.
	pub fn parse(raw: &str) -> Result<Self, ValidationError> {
		Self::parse_field("email", raw)
	}

	pub(crate) fn parse_field(field: &'static str, raw: &str) -> Result<Self, ValidationError> {
		let normalized = raw.trim().to_lowercase();
		if normalized.is_empty() {
			return Err(ValidationError::new(field, ValidationReason::Empty));
		}
		if normalized.len() > MAX_USERNAME_LEN {
			return Err(ValidationError::new(
				field,
				ValidationReason::Malformed("must be at most 254 characters"),
			));
		}
		if !EMAIL_RE.is_match(&normalized) {
			return Err(ValidationError::new(
				field,
				ValidationReason::Malformed("must be a valid email address"),
			));
		}
		Ok(Self(normalized))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Username {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Attributes the gateway knows about, named in provider-neutral terms.
///
/// Adapters own the mapping to provider attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeName {
	Email,
	Phone,
	GivenName,
	FamilyName,
	EmailVerified,
	PhoneVerified,
}

impl AttributeName {
	/// Attributes a caller may supply at signup, in the order they are sent.
	pub const CALLER_SETTABLE: [AttributeName; 4] = [
		AttributeName::Email,
		AttributeName::Phone,
		AttributeName::GivenName,
		AttributeName::FamilyName,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			AttributeName::Email => "email",
			AttributeName::Phone => "phone",
			AttributeName::GivenName => "givenName",
			AttributeName::FamilyName => "familyName",
			AttributeName::EmailVerified => "emailVerified",
			AttributeName::PhoneVerified => "phoneVerified",
		}
	}

	/// Request field names accepted for a caller-settable attribute.
	///
	/// The first entry is the canonical name used in validation errors.
	pub fn field_aliases(&self) -> &'static [&'static str] {
		match self {
			AttributeName::Email => &["email"],
			AttributeName::Phone => &["phone", "phoneNumber"],
			AttributeName::GivenName => &["givenName", "firstName"],
			AttributeName::FamilyName => &["familyName", "lastName"],
			AttributeName::EmailVerified | AttributeName::PhoneVerified => &[],
		}
	}

	pub fn is_caller_settable(&self) -> bool {
		!self.field_aliases().is_empty()
	}

	pub fn from_neutral_name(name: &str) -> Option<Self> {
		match name {
			"email" => Some(AttributeName::Email),
			"phone" => Some(AttributeName::Phone),
			"givenName" => Some(AttributeName::GivenName),
			"familyName" => Some(AttributeName::FamilyName),
			"emailVerified" => Some(AttributeName::EmailVerified),
			"phoneVerified" => Some(AttributeName::PhoneVerified),
			_ => None,
		}
	}
}

impl fmt::Display for AttributeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
	pub username: String,
	/// Keyed by neutral attribute name where one exists, otherwise the
	/// provider's own attribute name.
	pub attributes: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<DateTime<Utc>>,
}

impl UserIdentity {
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			attributes: BTreeMap::new(),
			status: None,
			enabled: None,
			created_at: None,
			updated_at: None,
		}
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn with_status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());
		self
	}
}

/// Challenge the provider issued in place of tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeKind {
	NewPasswordRequired,
	None,
	/// Any challenge the gateway does not complete, carrying the provider's
	/// name for it.
	Unsupported(String),
}

impl ChallengeKind {
	pub fn name(&self) -> &str {
		match self {
			ChallengeKind::NewPasswordRequired => "NEW_PASSWORD_REQUIRED",
			ChallengeKind::None => "NONE",
			ChallengeKind::Unsupported(name) => name,
		}
	}
}

/// A pending challenge. The session token is the only thing a caller needs to
/// keep to answer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
	pub kind: ChallengeKind,
	pub session_token: SessionToken,
	pub issued_at: DateTime<Utc>,
}

impl AuthChallenge {
	pub fn new(kind: ChallengeKind, session_token: SessionToken) -> Self {
		Self {
			kind,
			session_token,
			issued_at: Utc::now(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
	ChallengePending,
	Authenticated,
	SignedOut,
	Failed,
}

/// Tokens issued after a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
	pub access_token: SecretString,
	pub refresh_token: Option<SecretString>,
	pub id_token: Option<SecretString>,
	pub expires_in: Option<u64>,
	pub token_type: Option<String>,
}

impl AuthTokens {
	pub fn new(access_token: impl Into<SecretString>) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: None,
			id_token: None,
			expires_in: None,
			token_type: None,
		}
	}
}

/// Outcome of an authentication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
	pub status: AuthStatus,
	pub tokens: Option<AuthTokens>,
	pub challenge: Option<AuthChallenge>,
}

impl AuthResult {
	pub fn authenticated(tokens: AuthTokens) -> Self {
		Self {
			status: AuthStatus::Authenticated,
			tokens: Some(tokens),
			challenge: None,
		}
	}

	pub fn challenge_pending(challenge: AuthChallenge) -> Self {
		Self {
			status: AuthStatus::ChallengePending,
			tokens: None,
			challenge: Some(challenge),
		}
	}

	pub fn signed_out() -> Self {
		Self {
			status: AuthStatus::SignedOut,
			tokens: None,
			challenge: None,
		}
	}

	pub fn failed() -> Self {
		Self {
			status: AuthStatus::Failed,
			tokens: None,
			challenge: None,
		}
	}
}

/// Provider authentication flow used for credential logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlow {
	/// Server-side admin flow; requires signed provider credentials.
	#[default]
	AdminUserPassword,
	/// Public client flow.
	UserPassword,
}

/// Channel used to deliver invitations and temporary credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
	#[default]
	Email,
	Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteAction {
	/// First invitation for a new account.
	Send,
	/// Re-send the invitation for an existing, unconfirmed account.
	Resend,
}

/// Input to [`IdentityProvider::create_user`](crate::IdentityProvider::create_user).
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
	pub username: Username,
	pub temporary_credential: Option<SecretString>,
	pub attributes: Vec<(AttributeName, String)>,
	pub delivery: DeliveryChannel,
	pub action: InviteAction,
}

/// Result of answering a new-password challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeCompletion {
	/// Password set and contact attributes marked verified.
	PasswordSet(AuthResult),
	/// Password set, but marking contact attributes verified failed.
	PasswordSetVerificationPending {
		result: AuthResult,
		verification_error: GatewayError,
	},
	/// Password set, but the provider issued a further challenge the gateway
	/// does not complete. Contact verification was still attempted.
	PasswordSetChallengePending {
		challenge: AuthChallenge,
		verification_error: Option<GatewayError>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
	SignedOut,
	/// The token had already been revoked.
	AlreadySignedOut,
}

/// Position of a login attempt, derived from each response rather than stored.
///
/// `Start -> AwaitingChallengeResponse -> Authenticated | Failed`, or
/// `Start -> Authenticated | Failed` when no challenge is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
	Start,
	AwaitingChallengeResponse,
	Authenticated,
	Failed,
}

impl LoginState {
	pub fn after(result: &Result<AuthResult, GatewayError>) -> Self {
		match result {
			Ok(result) => match result.status {
				AuthStatus::ChallengePending => LoginState::AwaitingChallengeResponse,
				AuthStatus::Authenticated => LoginState::Authenticated,
				AuthStatus::SignedOut | AuthStatus::Failed => LoginState::Failed,
			},
			Err(_) => LoginState::Failed,
		}
	}
}
