// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Input validation for gateway requests.
//!
//! Each `validate_*` function turns a raw JSON object into a typed request.
//! Typed requests can only be built through validation, so a request that
//! reaches the gateway is already normalised. Unknown fields are ignored.

use std::sync::LazyLock;

use authgate_common_secret::SecretString;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationReason};
use crate::types::{AttributeName, SessionToken, Username};

/// Raw request fields, as decoded from a JSON object body.
pub type RawFields = Map<String, Value>;

const MAX_NAME_LEN: usize = 256;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap());

/// Validated signup input.
#[derive(Debug, Clone)]
pub struct SignupRequest {
	username: Username,
	temporary_credential: SecretString,
	attributes: Vec<(AttributeName, String)>,
}

impl SignupRequest {
	pub fn username(&self) -> &Username {
		&self.username
	}

	pub fn temporary_credential(&self) -> &SecretString {
		&self.temporary_credential
	}

	/// Exactly the four caller-settable attributes, in
	/// [`AttributeName::CALLER_SETTABLE`] order.
	pub fn attributes(&self) -> &[(AttributeName, String)] {
		&self.attributes
	}
}

/// Validated username plus credential, used by both login flavours.
#[derive(Debug, Clone)]
pub struct LoginRequest {
	username: Username,
	credential: SecretString,
}

impl LoginRequest {
	pub fn username(&self) -> &Username {
		&self.username
	}

	pub fn credential(&self) -> &SecretString {
		&self.credential
	}
}

#[derive(Debug, Clone)]
pub struct CompleteChallengeRequest {
	username: Username,
	session_token: SessionToken,
	new_credential: SecretString,
}

impl CompleteChallengeRequest {
	pub fn username(&self) -> &Username {
		&self.username
	}

	pub fn session_token(&self) -> &SessionToken {
		&self.session_token
	}

	pub fn new_credential(&self) -> &SecretString {
		&self.new_credential
	}
}

#[derive(Debug, Clone)]
pub struct ConfirmForgotPasswordRequest {
	username: Username,
	code: SecretString,
	new_credential: SecretString,
}

impl ConfirmForgotPasswordRequest {
	pub fn username(&self) -> &Username {
		&self.username
	}

	pub fn code(&self) -> &SecretString {
		&self.code
	}

	pub fn new_credential(&self) -> &SecretString {
		&self.new_credential
	}
}

/// Requests addressed only by username: forgot-password, invite resend and
/// user lookup.
#[derive(Debug, Clone)]
pub struct UserLookupRequest {
	username: Username,
}

impl UserLookupRequest {
	pub fn username(&self) -> &Username {
		&self.username
	}
}

pub fn validate_signup(fields: &RawFields) -> Result<SignupRequest, ValidationError> {
	let temporary_credential = credential(fields, &["tempCredential", "tempPwd"])?;
	let mut supplied = caller_attributes(fields)?;

	let mut attributes = Vec::with_capacity(AttributeName::CALLER_SETTABLE.len());
	for name in AttributeName::CALLER_SETTABLE {
		let position = supplied
			.iter()
			.position(|(supplied_name, _)| *supplied_name == name)
			.ok_or_else(|| ValidationError::missing(name.field_aliases()[0]))?;
		attributes.push(supplied.swap_remove(position));
	}

	let username = Username::parse(&attributes[0].1)?;
	Ok(SignupRequest {
		username,
		temporary_credential,
		attributes,
	})
}

/// Validates a password login (`credential` or `password`).
pub fn validate_login(fields: &RawFields) -> Result<LoginRequest, ValidationError> {
	Ok(LoginRequest {
		username: username(fields)?,
		credential: credential(fields, &["credential", "password"])?,
	})
}

/// Validates a temporary-credential login (`tempCredential` or `tempPwd`).
pub fn validate_temporary_login(fields: &RawFields) -> Result<LoginRequest, ValidationError> {
	Ok(LoginRequest {
		username: username(fields)?,
		credential: credential(fields, &["tempCredential", "tempPwd"])?,
	})
}

pub fn validate_complete_challenge(
	fields: &RawFields,
) -> Result<CompleteChallengeRequest, ValidationError> {
	Ok(CompleteChallengeRequest {
		username: username(fields)?,
		session_token: non_blank(fields, &["session", "sessionToken"])?,
		new_credential: credential(fields, &["newCredential", "password"])?,
	})
}

pub fn validate_confirm_forgot_password(
	fields: &RawFields,
) -> Result<ConfirmForgotPasswordRequest, ValidationError> {
	Ok(ConfirmForgotPasswordRequest {
		username: username(fields)?,
		code: non_blank(fields, &["code"])?,
		new_credential: credential(fields, &["newCredential", "password"])?,
	})
}

pub fn validate_user_lookup(fields: &RawFields) -> Result<UserLookupRequest, ValidationError> {
	Ok(UserLookupRequest {
		username: username(fields)?,
	})
}

/// Validates a bearer access token taken from a request header.
pub fn validate_access_token(raw: &str) -> Result<SecretString, ValidationError> {
	let token = raw.trim();
	if token.is_empty() {
		return Err(ValidationError::new("accessToken", ValidationReason::Empty));
	}
	if token.chars().any(char::is_whitespace) {
		return Err(ValidationError::new(
			"accessToken",
			ValidationReason::Malformed("must not contain whitespace"),
		));
	}
	Ok(SecretString::from(token))
}

/// Collects the caller-settable attributes present in `fields`.
///
/// Anything outside the allow-list is ignored, including the verification
/// flags, which only the gateway itself sets.
pub fn caller_attributes(
	fields: &RawFields,
) -> Result<Vec<(AttributeName, String)>, ValidationError> {
	let mut attributes = Vec::new();
	for name in AttributeName::CALLER_SETTABLE {
		let aliases = name.field_aliases();
		let Some(raw) = optional_string(fields, aliases)? else {
			continue;
		};
		let field = aliases[0];
		let value = match name {
			AttributeName::Email => Username::parse_field(field, raw)?.as_str().to_string(),
			AttributeName::Phone => phone(field, raw)?,
			_ => display_name(field, raw)?,
		};
		attributes.push((name, value));
	}
	Ok(attributes)
}

fn username(fields: &RawFields) -> Result<Username, ValidationError> {
	let raw = required_string(fields, &["email", "username"])?;
	Username::parse_field("email", raw)
}

fn credential(
	fields: &RawFields,
	aliases: &'static [&'static str],
) -> Result<SecretString, ValidationError> {
	let raw = required_string(fields, aliases)?;
	if raw.is_empty() {
		return Err(ValidationError::new(aliases[0], ValidationReason::Empty));
	}
	Ok(SecretString::from(raw))
}

fn non_blank(
	fields: &RawFields,
	aliases: &'static [&'static str],
) -> Result<SecretString, ValidationError> {
	let raw = required_string(fields, aliases)?.trim();
	if raw.is_empty() {
		return Err(ValidationError::new(aliases[0], ValidationReason::Empty));
	}
	Ok(SecretString::from(raw))
}

fn phone(field: &'static str, raw: &str) -> Result<String, ValidationError> {
	let value: String = raw
		.trim()
		.chars()
		.filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
		.collect();
	if !PHONE_RE.is_match(&value) {
		return Err(ValidationError::new(
			field,
			ValidationReason::Malformed("must be an E.164 phone number"),
		));
	}
	Ok(value)
}

fn display_name(field: &'static str, raw: &str) -> Result<String, ValidationError> {
	let value = raw.trim();
	if value.is_empty() {
		return Err(ValidationError::new(field, ValidationReason::Empty));
	}
	if value.chars().count() > MAX_NAME_LEN {
		return Err(ValidationError::new(
			field,
			ValidationReason::Malformed("must be at most 256 characters"),
		));
	}
	Ok(value.to_string())
}

fn required_string<'a>(
	fields: &'a RawFields,
	aliases: &'static [&'static str],
) -> Result<&'a str, ValidationError> {
	optional_string(fields, aliases)?.ok_or_else(|| ValidationError::missing(aliases[0]))
}

/// First alias present wins. `null` counts as absent.
fn optional_string<'a>(
	fields: &'a RawFields,
	aliases: &'static [&'static str],
) -> Result<Option<&'a str>, ValidationError> {
	for alias in aliases.iter().copied() {
		match fields.get(alias) {
			None | Some(Value::Null) => continue,
			Some(Value::String(value)) => return Ok(Some(value.as_str())),
			Some(_) => return Err(ValidationError::new(alias, ValidationReason::NotAString)),
		}
	}
	Ok(None)
}
