// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server errors and their HTTP representation.

use authgate_core::{ErrorKind, GatewayError, ValidationError};
use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;

/// Startup failures of the server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error(transparent)]
	Config(#[from] authgate_server_config::ConfigError),

	#[error("failed to build identity provider: {0}")]
	Provider(#[from] authgate_provider_cognito::CognitoError),
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub retryable: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error(transparent)]
	Gateway(#[from] GatewayError),

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("{0}")]
	MalformedBody(String),

	#[error("Authorization header with a bearer token is required")]
	MissingBearer,

	#[error("gateway operation did not complete: {0}")]
	Task(#[from] tokio::task::JoinError),
}

/// HTTP status for a gateway error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
	match kind {
		ErrorKind::ValidationFailed | ErrorKind::InvalidCode => StatusCode::BAD_REQUEST,
		ErrorKind::InvalidCredentials | ErrorKind::ChallengeExpired | ErrorKind::TokenRevoked => {
			StatusCode::UNAUTHORIZED
		}
		ErrorKind::UserNotFound => StatusCode::NOT_FOUND,
		ErrorKind::UserAlreadyExists => StatusCode::CONFLICT,
		ErrorKind::UnsupportedChallenge => StatusCode::UNPROCESSABLE_ENTITY,
		ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
		ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
		ErrorKind::Unknown => StatusCode::BAD_GATEWAY,
	}
}

impl ApiError {
	fn parts(&self) -> (StatusCode, ErrorResponse) {
		match self {
			ApiError::Gateway(e) => (
				status_for(e.kind),
				ErrorResponse {
					error: e.kind.as_str().to_string(),
					message: e.message.clone(),
					retryable: e.retryable,
					field: None,
				},
			),
			ApiError::Validation(e) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse {
					error: ErrorKind::ValidationFailed.as_str().to_string(),
					message: e.to_string(),
					retryable: false,
					field: Some(e.field.to_string()),
				},
			),
			ApiError::MalformedBody(message) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse {
					error: ErrorKind::ValidationFailed.as_str().to_string(),
					message: message.clone(),
					retryable: false,
					field: None,
				},
			),
			ApiError::MissingBearer => (
				StatusCode::UNAUTHORIZED,
				ErrorResponse {
					error: ErrorKind::InvalidCredentials.as_str().to_string(),
					message: self.to_string(),
					retryable: false,
					field: Some("authorization".to_string()),
				},
			),
			ApiError::Task(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				ErrorResponse {
					error: ErrorKind::Unknown.as_str().to_string(),
					message: "Internal server error".to_string(),
					retryable: false,
					field: None,
				},
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, body) = self.parts();
		if status.is_server_error() {
			tracing::warn!(status = %status, error = %body.error, detail = %self, "request failed");
		} else {
			tracing::debug!(status = %status, error = %body.error, "request rejected");
		}
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_kind_maps_to_a_distinct_client_or_gateway_status() {
		assert_eq!(status_for(ErrorKind::ValidationFailed), StatusCode::BAD_REQUEST);
		assert_eq!(status_for(ErrorKind::InvalidCode), StatusCode::BAD_REQUEST);
		assert_eq!(status_for(ErrorKind::InvalidCredentials), StatusCode::UNAUTHORIZED);
		assert_eq!(status_for(ErrorKind::ChallengeExpired), StatusCode::UNAUTHORIZED);
		assert_eq!(status_for(ErrorKind::TokenRevoked), StatusCode::UNAUTHORIZED);
		assert_eq!(status_for(ErrorKind::UserNotFound), StatusCode::NOT_FOUND);
		assert_eq!(status_for(ErrorKind::UserAlreadyExists), StatusCode::CONFLICT);
		assert_eq!(
			status_for(ErrorKind::UnsupportedChallenge),
			StatusCode::UNPROCESSABLE_ENTITY
		);
		assert_eq!(status_for(ErrorKind::RateLimited), StatusCode::TOO_MANY_REQUESTS);
		assert_eq!(
			status_for(ErrorKind::UpstreamUnavailable),
			StatusCode::SERVICE_UNAVAILABLE
		);
		assert_eq!(status_for(ErrorKind::Unknown), StatusCode::BAD_GATEWAY);
	}

	#[test]
	fn validation_errors_name_the_field() {
		let (status, body) = ApiError::from(ValidationError::missing("email")).parts();
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.error, "validation_failed");
		assert_eq!(body.field.as_deref(), Some("email"));
		assert_eq!(body.message, "email is required");
	}

	#[test]
	fn gateway_errors_keep_retryable_flag() {
		let error = GatewayError::from_kind(ErrorKind::RateLimited);
		let (status, body) = ApiError::from(error).parts();
		assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
		assert!(body.retryable);
		assert!(body.field.is_none());
	}

	#[tokio::test]
	async fn panicked_task_is_internal_and_hides_detail() {
		let join_error = tokio::spawn(async { panic!("secret detail") }).await.unwrap_err();
		let (status, body) = ApiError::from(join_error).parts();
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body.error, "unknown");
		assert!(!body.message.contains("secret detail"));
	}
}
