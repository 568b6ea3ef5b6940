// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Password reset handlers.

use authgate_core::validation::{validate_confirm_forgot_password, validate_user_lookup};
use axum::{extract::State, Json};

use crate::{
	api::AppState, dto::StatusResponse, error::ApiError, extract::JsonFields, routes::detached,
};

/// POST /forgot-password - Asks the provider to deliver a reset code.
pub async fn forgot_password(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<StatusResponse>, ApiError> {
	let request = validate_user_lookup(&fields)?;
	let gateway = state.gateway.clone();
	detached(async move { gateway.forgot_password(&request).await }).await?;
	Ok(Json(StatusResponse::default()))
}

/// POST /confirm-forgot-password - Sets a new password with the delivered
/// code. A blank code never reaches the provider.
pub async fn confirm_forgot_password(
	State(state): State<AppState>,
	JsonFields(fields): JsonFields,
) -> Result<Json<StatusResponse>, ApiError> {
	let request = validate_confirm_forgot_password(&fields)?;
	let gateway = state.gateway.clone();
	detached(async move { gateway.confirm_forgot_password(&request).await }).await?;
	Ok(Json(StatusResponse::default()))
}
