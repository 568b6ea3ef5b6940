// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Session handlers.
//!
//! | Route               | Body                                        |
//! |---------------------|---------------------------------------------|
//! | `/login-temp-pwd`   | `email`, `tempCredential`                   |
//! | `/set-new-password` | `email`, `session`, `newCredential`         |
//! | `/login`            | `email`, `credential`                       |
//! | `/logout`           | none; `Authorization: Bearer <accessToken>` |

use authgate_core::{
	validation::{validate_complete_challenge, validate_login, validate_temporary_login},
	ChallengeCompletion, SignOutOutcome, PASSWORD_SET_MESSAGE,
};
use axum::{extract::State, http::StatusCode, Json};

use crate::{
	api::AppState,
	dto::{AuthResultResponse, MessageResponse, SessionResponse, StatusResponse},
	error::ApiError,
	extract::{BearerToken, JsonFields},
	routes::detached,
};

/// POST /login-temp-pwd - First login of an invited account.
///
/// Returns the session to answer the new-password challenge with.
pub async fn login_with_temporary_credential(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<SessionResponse>, ApiError> {
	let request = validate_temporary_login(&fields)?;
	let gateway = state.gateway.clone();
	let challenge =
		detached(async move { gateway.login_with_temporary_credential(&request).await }).await?;
	Ok(Json(SessionResponse::from(&challenge)))
}

/// POST /set-new-password - Answers the new-password challenge.
///
/// `202 Accepted` when the password was set but the contact attributes could
/// not be marked verified, or when the provider asked for a further challenge
/// the gateway does not complete.
pub async fn set_new_password(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
	let request = validate_complete_challenge(&fields)?;
	let gateway = state.gateway.clone();
	let completion = detached(async move { gateway.complete_challenge(&request).await }).await?;

	let (status, body) = match completion {
		ChallengeCompletion::PasswordSet(_) => {
			(StatusCode::OK, MessageResponse::new(PASSWORD_SET_MESSAGE))
		}
		ChallengeCompletion::PasswordSetVerificationPending {
			verification_error, ..
		} => {
			tracing::warn!(kind = %verification_error.kind, "contact verification pending");
			(
				StatusCode::ACCEPTED,
				MessageResponse::new(PASSWORD_SET_MESSAGE)
					.with_status("password_set_verification_pending"),
			)
		}
		ChallengeCompletion::PasswordSetChallengePending { challenge, .. } => (
			StatusCode::ACCEPTED,
			MessageResponse::new(PASSWORD_SET_MESSAGE)
				.with_status("password_set_challenge_pending")
				.with_challenge(challenge.kind.name()),
		),
	};
	Ok((status, Json(body)))
}

/// POST /login
pub async fn login(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<AuthResultResponse>, ApiError> {
	let request = validate_login(&fields)?;
	let gateway = state.gateway.clone();
	let result = detached(async move { gateway.login(&request).await }).await?;
	Ok(Json(AuthResultResponse::from(&result)))
}

/// POST /logout - Revokes every session of the token's user. Repeating it
/// with the same token reports `already_signed_out`.
pub async fn logout(
	State(state): State<AppState>,
	BearerToken(access_token): BearerToken,
) -> Result<Json<StatusResponse>, ApiError> {
	let gateway = state.gateway.clone();
	let outcome = detached(async move { gateway.logout(&access_token).await }).await?;
	let status = match outcome {
		SignOutOutcome::SignedOut => None,
		SignOutOutcome::AlreadySignedOut => Some("already_signed_out"),
	};
	Ok(Json(StatusResponse { status }))
}
