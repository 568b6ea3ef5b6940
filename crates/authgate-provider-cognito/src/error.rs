// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Cognito adapter.

use authgate_core::ProviderFault;
use thiserror::Error;

/// Errors raised while talking to Cognito, before translation into the
/// gateway taxonomy.
#[derive(Debug, Error)]
pub enum CognitoError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The configured endpoint is not a usable URL.
	#[error("Invalid Cognito endpoint {endpoint}: {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	/// Request body could not be encoded.
	#[error("Failed to encode request: {0}")]
	Encode(#[source] serde_json::Error),

	/// Invalid or unparseable response from Cognito.
	#[error("Invalid response from Cognito: {0}")]
	InvalidResponse(String),

	/// Cognito returned an error status.
	#[error("Cognito API error: {status} {code:?} - {message}")]
	Api {
		status: u16,
		code: Option<String>,
		message: String,
	},
}

impl From<CognitoError> for ProviderFault {
	fn from(err: CognitoError) -> Self {
		match err {
			CognitoError::Network(e) => ProviderFault::Transport {
				timeout: e.is_timeout(),
				message: e.to_string(),
			},
			CognitoError::Timeout => ProviderFault::Transport {
				timeout: true,
				message: "request timed out".to_string(),
			},
			CognitoError::Api {
				status,
				code,
				message,
			} => ProviderFault::Rejected {
				code,
				message,
				status: Some(status),
			},
			other @ (CognitoError::InvalidEndpoint { .. }
			| CognitoError::Encode(_)
			| CognitoError::InvalidResponse(_)) => ProviderFault::MalformedResponse(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn api_errors_keep_code_and_status() {
		let fault: ProviderFault = CognitoError::Api {
			status: 400,
			code: Some("UserNotFoundException".into()),
			message: "User does not exist.".into(),
		}
		.into();
		assert_eq!(
			fault,
			ProviderFault::Rejected {
				code: Some("UserNotFoundException".into()),
				message: "User does not exist.".into(),
				status: Some(400),
			}
		);
	}

	#[test]
	fn timeouts_are_transport_faults() {
		let fault: ProviderFault = CognitoError::Timeout.into();
		assert!(matches!(fault, ProviderFault::Transport { timeout: true, .. }));
	}
}
