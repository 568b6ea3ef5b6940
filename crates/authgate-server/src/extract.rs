// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request extractors.
//!
//! Bodies are handed to the validators as raw JSON objects so that a missing
//! field, a blank field and a field of the wrong type are reported the same
//! way on every route.

use authgate_core::validation::{validate_access_token, RawFields};
use authgate_core::SecretString;
use axum::{
	body::Bytes,
	extract::{FromRequest, FromRequestParts, Request},
	http::{header::AUTHORIZATION, request::Parts},
};
use serde_json::Value;

use crate::error::ApiError;

/// A JSON object body. An empty body reads as `{}`.
#[derive(Debug, Clone, Default)]
pub struct JsonFields(pub RawFields);

impl<S> FromRequest<S> for JsonFields
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let bytes = Bytes::from_request(req, state)
			.await
			.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
		parse_fields(&bytes).map(JsonFields)
	}
}

pub fn parse_fields(bytes: &[u8]) -> Result<RawFields, ApiError> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(RawFields::new());
	}
	match serde_json::from_slice::<Value>(bytes) {
		Ok(Value::Object(fields)) => Ok(fields),
		Ok(_) => Err(ApiError::MalformedBody(
			"request body must be a JSON object".to_string(),
		)),
		Err(e) => Err(ApiError::MalformedBody(format!(
			"request body is not valid JSON: {e}"
		))),
	}
}

/// Access token from an `Authorization: Bearer <token>` header.
pub struct BearerToken(pub SecretString);

impl<S> FromRequestParts<S> for BearerToken
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.ok_or(ApiError::MissingBearer)?;
		let token = extract_bearer_token(header).ok_or(ApiError::MissingBearer)?;
		Ok(BearerToken(validate_access_token(token)?))
	}
}

/// Extracts the token from a "Bearer <token>" Authorization header. The
/// scheme is matched case-insensitively.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
	let (scheme, token) = header.trim().split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}
	let token = token.trim();
	(!token.is_empty()).then_some(token)
}
