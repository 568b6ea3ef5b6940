// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Gateway error taxonomy.
//!
//! Every failure that leaves the gateway is a [`GatewayError`] carrying one
//! [`ErrorKind`]. Provider-specific codes never escape the adapter boundary.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Provider-neutral failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// Username or credential was rejected.
	InvalidCredentials,
	/// No account exists for the username.
	UserNotFound,
	/// An account already exists for the username.
	UserAlreadyExists,
	/// The challenge session token is expired or otherwise unusable.
	ChallengeExpired,
	/// The provider is throttling requests.
	RateLimited,
	/// Request input failed validation (locally or at the provider).
	ValidationFailed,
	/// The provider could not be reached or reported an internal failure.
	UpstreamUnavailable,
	/// The access token was already revoked.
	TokenRevoked,
	/// A password reset confirmation code was wrong or expired.
	InvalidCode,
	/// The provider asked for a challenge the gateway does not handle.
	UnsupportedChallenge,
	/// Anything the translator could not classify.
	Unknown,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::InvalidCredentials => "invalid_credentials",
			ErrorKind::UserNotFound => "user_not_found",
			ErrorKind::UserAlreadyExists => "user_already_exists",
			ErrorKind::ChallengeExpired => "challenge_expired",
			ErrorKind::RateLimited => "rate_limited",
			ErrorKind::ValidationFailed => "validation_failed",
			ErrorKind::UpstreamUnavailable => "upstream_unavailable",
			ErrorKind::TokenRevoked => "token_revoked",
			ErrorKind::InvalidCode => "invalid_code",
			ErrorKind::UnsupportedChallenge => "unsupported_challenge",
			ErrorKind::Unknown => "unknown",
		}
	}

	/// Whether a caller may reasonably retry the same request later.
	pub fn default_retryable(&self) -> bool {
		matches!(self, ErrorKind::RateLimited | ErrorKind::UpstreamUnavailable)
	}

	/// User-facing message used when the provider supplied none.
	pub fn default_message(&self) -> &'static str {
		match self {
			ErrorKind::InvalidCredentials => "Incorrect username or password",
			ErrorKind::UserNotFound => "User does not exist",
			ErrorKind::UserAlreadyExists => "User already exists",
			ErrorKind::ChallengeExpired => "Session is expired or invalid",
			ErrorKind::RateLimited => "Too many requests, try again later",
			ErrorKind::ValidationFailed => "Invalid request",
			ErrorKind::UpstreamUnavailable => "Identity provider is unavailable",
			ErrorKind::TokenRevoked => "Access token has been revoked",
			ErrorKind::InvalidCode => "Invalid or expired confirmation code",
			ErrorKind::UnsupportedChallenge => "Unexpected challenge type",
			ErrorKind::Unknown => "Unexpected identity provider error",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Failure returned by every gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
	pub kind: ErrorKind,
	pub message: String,
	pub retryable: bool,
}

impl GatewayError {
	/// Builds an error with the kind's default retry hint.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			retryable: kind.default_retryable(),
		}
	}

	/// Builds an error using the kind's default message.
	pub fn from_kind(kind: ErrorKind) -> Self {
		Self::new(kind, kind.default_message())
	}

	pub fn with_retryable(mut self, retryable: bool) -> Self {
		self.retryable = retryable;
		self
	}

	pub fn unsupported_challenge(name: &str) -> Self {
		Self::new(
			ErrorKind::UnsupportedChallenge,
			format!("Unexpected challenge type: {name}"),
		)
	}

	pub fn upstream_unavailable(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::UpstreamUnavailable, message)
	}

	pub fn unknown(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Unknown, message)
	}
}

/// Why a single input field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
	#[error("is required")]
	Missing,

	#[error("must not be empty")]
	Empty,

	#[error("must be a string")]
	NotAString,

	#[error("{0}")]
	Malformed(&'static str),
}

/// Local input validation failure. Raised before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
	pub field: &'static str,
	pub reason: ValidationReason,
}

impl ValidationError {
	pub fn new(field: &'static str, reason: ValidationReason) -> Self {
		Self { field, reason }
	}

	pub fn missing(field: &'static str) -> Self {
		Self::new(field, ValidationReason::Missing)
	}
}

impl From<ValidationError> for GatewayError {
	fn from(err: ValidationError) -> Self {
		GatewayError::new(ErrorKind::ValidationFailed, err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_throttling_and_outages_are_retryable() {
		let retryable: Vec<_> = [
			ErrorKind::InvalidCredentials,
			ErrorKind::UserNotFound,
			ErrorKind::UserAlreadyExists,
			ErrorKind::ChallengeExpired,
			ErrorKind::RateLimited,
			ErrorKind::ValidationFailed,
			ErrorKind::UpstreamUnavailable,
			ErrorKind::TokenRevoked,
			ErrorKind::InvalidCode,
			ErrorKind::UnsupportedChallenge,
			ErrorKind::Unknown,
		]
		.into_iter()
		.filter(ErrorKind::default_retryable)
		.collect();

		assert_eq!(
			retryable,
			vec![ErrorKind::RateLimited, ErrorKind::UpstreamUnavailable]
		);
	}

	#[test]
	fn kind_serializes_as_snake_case() {
		let json = serde_json::to_string(&ErrorKind::UserAlreadyExists).unwrap();
		assert_eq!(json, "\"user_already_exists\"");
		assert_eq!(ErrorKind::UserAlreadyExists.as_str(), "user_already_exists");
	}

	#[test]
	fn validation_error_becomes_validation_failed() {
		let err: GatewayError = ValidationError::missing("email").into();
		assert_eq!(err.kind, ErrorKind::ValidationFailed);
		assert_eq!(err.message, "email is required");
		assert!(!err.retryable);
	}

	#[test]
	fn unsupported_challenge_names_the_challenge() {
		let err = GatewayError::unsupported_challenge("SMS_MFA");
		assert_eq!(err.kind, ErrorKind::UnsupportedChallenge);
		assert!(err.message.contains("SMS_MFA"));
	}
}
