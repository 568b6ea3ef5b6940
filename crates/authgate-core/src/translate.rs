// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Translation of provider failures into the gateway error taxonomy.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ErrorKind, GatewayError};

/// A provider failure as observed by an adapter, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFault {
	/// The provider answered with an error.
	Rejected {
		/// Provider error code, e.g. `NotAuthorizedException`.
		code: Option<String>,
		message: String,
		/// HTTP status of the provider response, when there was one.
		status: Option<u16>,
	},
	/// The provider could not be reached.
	Transport { timeout: bool, message: String },
	/// The provider answered successfully but the body could not be read.
	MalformedResponse(String),
}

impl ProviderFault {
	pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
		ProviderFault::Rejected {
			code: Some(code.into()),
			message: message.into(),
			status: None,
		}
	}
}

#[derive(Debug, Clone)]
struct Refinement {
	code: String,
	needle: String,
	kind: ErrorKind,
}

/// Maps provider error signals onto [`ErrorKind`].
///
/// Codes are matched exactly after stripping any `namespace#` prefix.
/// Refinements let one code map to several kinds depending on the message,
/// and are checked before the plain code table. Unrecognised codes fall back
/// to the HTTP status, then to [`ErrorKind::Unknown`] (never retryable).
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator {
	codes: HashMap<String, ErrorKind>,
	refinements: Vec<Refinement>,
}

impl ErrorTranslator {
	/// An empty translator. Everything but transport failures and status
	/// fallbacks translates to `Unknown`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Error codes used by AWS Cognito user pools.
	pub fn cognito() -> Self {
		Self::new()
			.with_refinement("NotAuthorizedException", "revoked", ErrorKind::TokenRevoked)
			.with_refinement("NotAuthorizedException", "session", ErrorKind::ChallengeExpired)
			.with_refinement(
				"NotAuthorizedException",
				"attempts exceeded",
				ErrorKind::RateLimited,
			)
			.with_code("NotAuthorizedException", ErrorKind::InvalidCredentials)
			.with_code("UserNotConfirmedException", ErrorKind::InvalidCredentials)
			.with_code("PasswordResetRequiredException", ErrorKind::InvalidCredentials)
			.with_code("UserNotFoundException", ErrorKind::UserNotFound)
			.with_code("UsernameExistsException", ErrorKind::UserAlreadyExists)
			.with_code("AliasExistsException", ErrorKind::UserAlreadyExists)
			.with_code("InvalidParameterException", ErrorKind::ValidationFailed)
			.with_code("InvalidPasswordException", ErrorKind::ValidationFailed)
			.with_code("UnsupportedUserStateException", ErrorKind::ValidationFailed)
			.with_code("CodeMismatchException", ErrorKind::InvalidCode)
			.with_code("ExpiredCodeException", ErrorKind::InvalidCode)
			.with_code("LimitExceededException", ErrorKind::RateLimited)
			.with_code("TooManyRequestsException", ErrorKind::RateLimited)
			.with_code("TooManyFailedAttemptsException", ErrorKind::RateLimited)
			.with_code("InternalErrorException", ErrorKind::UpstreamUnavailable)
	}

	pub fn with_code(mut self, code: impl Into<String>, kind: ErrorKind) -> Self {
		self.codes.insert(code.into(), kind);
		self
	}

	/// Maps `code` to `kind` when the message contains `needle`
	/// (case-insensitive).
	pub fn with_refinement(
		mut self,
		code: impl Into<String>,
		needle: impl Into<String>,
		kind: ErrorKind,
	) -> Self {
		self.refinements.push(Refinement {
			code: code.into(),
			needle: needle.into().to_lowercase(),
			kind,
		});
		self
	}

	pub fn translate(&self, fault: &ProviderFault) -> GatewayError {
		let error = match fault {
			ProviderFault::Transport { timeout, message } => {
				let message = if *timeout {
					format!("Identity provider timed out: {message}")
				} else {
					format!("Identity provider unreachable: {message}")
				};
				GatewayError::upstream_unavailable(message)
			}
			ProviderFault::MalformedResponse(message) => {
				GatewayError::unknown(format!("Unreadable identity provider response: {message}"))
			}
			ProviderFault::Rejected {
				code,
				message,
				status,
			} => {
				let code = code.as_deref().map(strip_namespace);
				let kind = code
					.and_then(|code| self.classify(code, message))
					.or_else(|| status.and_then(classify_status))
					.unwrap_or(ErrorKind::Unknown);
				let message = if message.trim().is_empty() {
					kind.default_message().to_string()
				} else {
					message.clone()
				};
				GatewayError::new(kind, message)
			}
		};

		debug!(kind = %error.kind, retryable = error.retryable, "translated provider fault");
		error
	}

	fn classify(&self, code: &str, message: &str) -> Option<ErrorKind> {
		let lowered = message.to_lowercase();
		self.refinements
			.iter()
			.find(|r| r.code == code && lowered.contains(&r.needle))
			.map(|r| r.kind)
			.or_else(|| self.codes.get(code).copied())
	}
}

fn strip_namespace(code: &str) -> &str {
	code.rsplit('#').next().unwrap_or(code)
}

fn classify_status(status: u16) -> Option<ErrorKind> {
	match status {
		429 => Some(ErrorKind::RateLimited),
		500..=599 => Some(ErrorKind::UpstreamUnavailable),
		_ => None,
	}
}
