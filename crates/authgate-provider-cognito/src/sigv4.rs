// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! AWS Signature Version 4 request signing.
//!
//! Only what a JSON POST to a regional endpoint needs: header-based signing
//! with a fully buffered payload.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Credentials and scope used to sign a request.
pub struct SigningParams<'a> {
	pub access_key_id: &'a str,
	pub secret_access_key: &'a str,
	pub session_token: Option<&'a str>,
	pub region: &'a str,
	pub service: &'a str,
	pub time: DateTime<Utc>,
}

/// The parts of an HTTP request covered by the signature.
pub struct SignableRequest<'a> {
	pub method: &'a str,
	/// Absolute path, already URI-encoded.
	pub path: &'a str,
	/// Canonical query string (sorted, encoded). Empty when there is none.
	pub query: &'a str,
	/// Headers to sign. Must include `host`.
	pub headers: Vec<(String, String)>,
	pub payload: &'a [u8],
}

/// Signs `request` and returns the headers to attach: `x-amz-date`,
/// `x-amz-security-token` when a session token is present, and
/// `authorization`.
pub fn sign(params: &SigningParams<'_>, request: SignableRequest<'_>) -> Vec<(String, String)> {
	let amz_date = params.time.format("%Y%m%dT%H%M%SZ").to_string();
	let date = params.time.format("%Y%m%d").to_string();

	let mut added = vec![("x-amz-date".to_string(), amz_date.clone())];
	if let Some(token) = params.session_token {
		added.push(("x-amz-security-token".to_string(), token.to_string()));
	}

	let mut headers: Vec<(String, String)> = request
		.headers
		.into_iter()
		.chain(added.iter().cloned())
		.map(|(name, value)| (name.to_lowercase(), canonical_header_value(&value)))
		.collect();
	headers.sort();

	let canonical_headers: String = headers
		.iter()
		.map(|(name, value)| format!("{name}:{value}\n"))
		.collect();
	let signed_headers = headers
		.iter()
		.map(|(name, _)| name.as_str())
		.collect::<Vec<_>>()
		.join(";");

	let canonical_request = format!(
		"{}\n{}\n{}\n{}\n{}\n{}",
		request.method,
		request.path,
		request.query,
		canonical_headers,
		signed_headers,
		hex::encode(Sha256::digest(request.payload)),
	);

	let scope = format!("{date}/{}/{}/aws4_request", params.region, params.service);
	let string_to_sign = format!(
		"{ALGORITHM}\n{amz_date}\n{scope}\n{}",
		hex::encode(Sha256::digest(canonical_request.as_bytes()))
	);

	let key = signing_key(params.secret_access_key, &date, params.region, params.service);
	let signature = hex::encode(hmac(&key, string_to_sign.as_bytes()));

	added.push((
		"authorization".to_string(),
		format!(
			"{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
			params.access_key_id
		),
	));
	added
}

/// Derives the per-day, per-region, per-service signing key.
pub fn signing_key(secret_access_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
	let k_date = hmac(format!("AWS4{secret_access_key}").as_bytes(), date.as_bytes());
	let k_region = hmac(&k_date, region.as_bytes());
	let k_service = hmac(&k_region, service.as_bytes());
	hmac(&k_service, b"aws4_request")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
	mac.update(data);
	mac.finalize().into_bytes().to_vec()
}

fn canonical_header_value(value: &str) -> String {
	value.split_whitespace().collect::<Vec<_>>().join(" ")
}
