// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Response bodies.
//!
//! Tokens are exposed here and nowhere else: this is the point where they
//! leave the process.

use authgate_core::{
	AuthChallenge, AuthResult, AuthStatus, AuthTokens, NEW_PASSWORD_REQUIRED_MESSAGE,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
	pub access_token: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id_token: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub token_type: Option<String>,
}

impl From<&AuthTokens> for TokensResponse {
	fn from(tokens: &AuthTokens) -> Self {
		Self {
			access_token: tokens.access_token.expose().clone(),
			refresh_token: tokens.refresh_token.as_ref().map(|t| t.expose().clone()),
			id_token: tokens.id_token.as_ref().map(|t| t.expose().clone()),
			expires_in: tokens.expires_in,
			token_type: tokens.token_type.clone(),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
	pub name: String,
	pub session: String,
}

impl From<&AuthChallenge> for ChallengeResponse {
	fn from(challenge: &AuthChallenge) -> Self {
		Self {
			name: challenge.kind.name().to_string(),
			session: challenge.session_token.expose().clone(),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResultResponse {
	pub status: AuthStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tokens: Option<TokensResponse>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub challenge: Option<ChallengeResponse>,
}

impl From<&AuthResult> for AuthResultResponse {
	fn from(result: &AuthResult) -> Self {
		Self {
			status: result.status,
			tokens: result.tokens.as_ref().map(TokensResponse::from),
			challenge: result.challenge.as_ref().map(ChallengeResponse::from),
		}
	}
}

/// Reply to a temporary-credential login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
	pub session: String,
	pub message: &'static str,
}

impl From<&AuthChallenge> for SessionResponse {
	fn from(challenge: &AuthChallenge) -> Self {
		Self {
			session: challenge.session_token.expose().clone(),
			message: NEW_PASSWORD_REQUIRED_MESSAGE,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
	pub message: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<&'static str>,
	/// Name of a further challenge the provider issued.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub challenge: Option<String>,
}

impl MessageResponse {
	pub fn new(message: &'static str) -> Self {
		Self {
			message,
			status: None,
			challenge: None,
		}
	}

	pub fn with_status(mut self, status: &'static str) -> Self {
		self.status = Some(status);
		self
	}

	pub fn with_challenge(mut self, name: &str) -> Self {
		self.challenge = Some(name.to_string());
		self
	}
}

/// Body of operations with nothing to report; `{}` on plain success.
#[derive(Debug, Default, Serialize)]
pub struct StatusResponse {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
	pub provider: &'static str,
}
