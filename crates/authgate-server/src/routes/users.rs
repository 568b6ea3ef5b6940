// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Account lifecycle handlers: signup, invitation re-send and lookup.

use authgate_core::{
	validation::{validate_signup, validate_user_lookup},
	UserIdentity,
};
use axum::{extract::State, Json};

use crate::{api::AppState, error::ApiError, extract::JsonFields, routes::detached};

/// POST /signup - Creates an account and sends the invitation.
///
/// Body: `email`, `tempCredential` (or `tempPwd`), `phone`, `givenName`,
/// `familyName`. Older clients may send `phoneNumber`, `firstName` and
/// `lastName` instead.
pub async fn signup(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<UserIdentity>, ApiError> {
	let request = validate_signup(&fields)?;
	let gateway = state.gateway.clone();
	let user = detached(async move { gateway.signup(&request).await }).await?;
	Ok(Json(user))
}

/// POST /resend-email - Re-sends the invitation with a fresh temporary
/// credential.
pub async fn resend_invite(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<UserIdentity>, ApiError> {
	let request = validate_user_lookup(&fields)?;
	let gateway = state.gateway.clone();
	let user = detached(async move { gateway.resend_invite(&request).await }).await?;
	Ok(Json(user))
}

/// POST /get-user
pub async fn get_user(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<UserIdentity>, ApiError> {
	let request = validate_user_lookup(&fields)?;
	let gateway = state.gateway.clone();
	let user = detached(async move { gateway.get_user(&request).await }).await?;
	Ok(Json(user))
}
