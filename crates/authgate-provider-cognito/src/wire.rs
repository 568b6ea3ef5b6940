// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Cognito JSON 1.1 request and response bodies.

use std::collections::BTreeMap;

use authgate_core::{AttributeName, UserIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHALLENGE_NEW_PASSWORD_REQUIRED: &str = "NEW_PASSWORD_REQUIRED";

pub fn attribute_name(name: AttributeName) -> &'static str {
	match name {
		AttributeName::Email => "email",
		AttributeName::Phone => "phone_number",
		AttributeName::GivenName => "given_name",
		AttributeName::FamilyName => "family_name",
		AttributeName::EmailVerified => "email_verified",
		AttributeName::PhoneVerified => "phone_number_verified",
	}
}

fn neutral_attribute_name(cognito: &str) -> Option<AttributeName> {
	match cognito {
		"email" => Some(AttributeName::Email),
		"phone_number" => Some(AttributeName::Phone),
		"given_name" => Some(AttributeName::GivenName),
		"family_name" => Some(AttributeName::FamilyName),
		"email_verified" => Some(AttributeName::EmailVerified),
		"phone_number_verified" => Some(AttributeName::PhoneVerified),
		_ => None,
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
	pub name: String,
	#[serde(default)]
	pub value: String,
}

pub fn to_attributes(attributes: &[(AttributeName, String)]) -> Vec<Attribute> {
	attributes
		.iter()
		.map(|(name, value)| Attribute {
			name: attribute_name(*name).to_string(),
			value: value.clone(),
		})
		.collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminCreateUserRequest<'a> {
	pub user_pool_id: &'a str,
	pub username: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temporary_password: Option<&'a str>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub user_attributes: Vec<Attribute>,
	pub desired_delivery_mediums: Vec<&'static str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message_action: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminCreateUserResponse {
	pub user: CognitoUser,
}

/// `UserType`, as embedded in `AdminCreateUser` responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CognitoUser {
	pub username: String,
	#[serde(default)]
	pub attributes: Vec<Attribute>,
	pub user_status: Option<String>,
	pub enabled: Option<bool>,
	pub user_create_date: Option<f64>,
	pub user_last_modified_date: Option<f64>,
}

/// `AdminGetUser` response. Same fields as [`CognitoUser`], different name
/// for the attribute list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminGetUserResponse {
	pub username: String,
	#[serde(default)]
	pub user_attributes: Vec<Attribute>,
	pub user_status: Option<String>,
	pub enabled: Option<bool>,
	pub user_create_date: Option<f64>,
	pub user_last_modified_date: Option<f64>,
}

impl From<CognitoUser> for UserIdentity {
	fn from(user: CognitoUser) -> Self {
		identity(
			user.username,
			user.attributes,
			user.user_status,
			user.enabled,
			user.user_create_date,
			user.user_last_modified_date,
		)
	}
}

impl From<AdminGetUserResponse> for UserIdentity {
	fn from(user: AdminGetUserResponse) -> Self {
		identity(
			user.username,
			user.user_attributes,
			user.user_status,
			user.enabled,
			user.user_create_date,
			user.user_last_modified_date,
		)
	}
}

fn identity(
	username: String,
	attributes: Vec<Attribute>,
	status: Option<String>,
	enabled: Option<bool>,
	created: Option<f64>,
	modified: Option<f64>,
) -> UserIdentity {
	let attributes: BTreeMap<String, String> = attributes
		.into_iter()
		.map(|attribute| {
			let key = neutral_attribute_name(&attribute.name)
				.map(|name| name.as_str().to_string())
				.unwrap_or(attribute.name);
			(key, attribute.value)
		})
		.collect();

	let mut user = UserIdentity::new(username);
	user.attributes = attributes;
	user.status = status;
	user.enabled = enabled;
	user.created_at = created.and_then(epoch_seconds);
	user.updated_at = modified.and_then(epoch_seconds);
	user
}

/// Cognito timestamps are fractional epoch seconds.
fn epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
	if !seconds.is_finite() {
		return None;
	}
	DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminInitiateAuthRequest<'a> {
	pub user_pool_id: &'a str,
	pub client_id: &'a str,
	pub auth_flow: &'static str,
	pub auth_parameters: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthRequest<'a> {
	pub client_id: &'a str,
	pub auth_flow: &'static str,
	pub auth_parameters: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminRespondToAuthChallengeRequest<'a> {
	pub user_pool_id: &'a str,
	pub client_id: &'a str,
	pub challenge_name: &'a str,
	pub session: &'a str,
	pub challenge_responses: BTreeMap<&'static str, String>,
}

/// Shared by the initiate and respond operations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthResponse {
	pub challenge_name: Option<String>,
	pub session: Option<String>,
	pub authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
	pub access_token: Option<String>,
	pub expires_in: Option<u64>,
	pub token_type: Option<String>,
	pub refresh_token: Option<String>,
	pub id_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminUpdateUserAttributesRequest<'a> {
	pub user_pool_id: &'a str,
	pub username: &'a str,
	pub user_attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSignOutRequest<'a> {
	pub access_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForgotPasswordRequest<'a> {
	pub client_id: &'a str,
	pub username: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret_hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfirmForgotPasswordRequest<'a> {
	pub client_id: &'a str,
	pub username: &'a str,
	pub confirmation_code: &'a str,
	pub password: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secret_hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdminGetUserRequest<'a> {
	pub user_pool_id: &'a str,
	pub username: &'a str,
}

/// Body of operations whose response carries nothing the gateway uses.
#[derive(Debug, Default, Deserialize)]
pub struct Ignored {}

/// Error body: `{"__type": "...", "message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
	#[serde(rename = "__type")]
	pub kind: Option<String>,
	#[serde(alias = "Message")]
	pub message: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn create_user_request_uses_pascal_case() {
		let request = AdminCreateUserRequest {
			user_pool_id: "pool",
			username: "a@x.io",
			temporary_password: Some("T3mp#Pass"),
			user_attributes: to_attributes(&[(AttributeName::Phone, "+15550001111".into())]),
			desired_delivery_mediums: vec!["EMAIL"],
			message_action: None,
		};
		assert_eq!(
			serde_json::to_value(&request).unwrap(),
			json!({
				"UserPoolId": "pool",
				"Username": "a@x.io",
				"TemporaryPassword": "T3mp#Pass",
				"UserAttributes": [{ "Name": "phone_number", "Value": "+15550001111" }],
				"DesiredDeliveryMediums": ["EMAIL"],
			})
		);
	}

	#[test]
	fn get_user_maps_attribute_names_back() {
		let response: AdminGetUserResponse = serde_json::from_value(json!({
			"Username": "a@x.io",
			"UserAttributes": [
				{ "Name": "sub", "Value": "1234" },
				{ "Name": "given_name", "Value": "A" },
				{ "Name": "phone_number_verified", "Value": "true" },
			],
			"UserStatus": "CONFIRMED",
			"Enabled": true,
			"UserCreateDate": 1.7e9,
		}))
		.unwrap();

		let user = UserIdentity::from(response);
		assert_eq!(user.attributes[AttributeName::GivenName.as_str()], "A");
		assert_eq!(user.attributes[AttributeName::PhoneVerified.as_str()], "true");
		assert_eq!(user.attributes.get("sub").map(String::as_str), Some("1234"));
		assert_eq!(user.created_at.unwrap().timestamp(), 1_700_000_000);
		assert_eq!(user.status.as_deref(), Some("CONFIRMED"));
	}

	#[test]
	fn error_body_accepts_either_message_casing() {
		let body: ErrorBody = serde_json::from_value(json!({
			"__type": "NotAuthorizedException",
			"Message": "Incorrect username or password.",
		}))
		.unwrap();
		assert_eq!(body.kind.as_deref(), Some("NotAuthorizedException"));
		assert_eq!(body.message.as_deref(), Some("Incorrect username or password."));
	}
}
