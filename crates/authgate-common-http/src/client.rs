// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Outbound client for identity provider APIs.

use reqwest::Client;
use std::time::Duration;

/// Upper bound on establishing a connection to the provider, independent of
/// the overall request deadline.
pub const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the client a provider adapter talks to its upstream with.
///
/// `request_timeout` bounds each call end to end. Connecting gets at most
/// [`MAX_CONNECT_TIMEOUT`] of it, so an unreachable endpoint surfaces quickly
/// as a transport failure.
pub fn provider_client(request_timeout: Duration) -> reqwest::Result<Client> {
	Client::builder()
		.user_agent(user_agent())
		.timeout(request_timeout)
		.connect_timeout(connect_timeout(request_timeout))
		.build()
}

fn connect_timeout(request_timeout: Duration) -> Duration {
	request_timeout.min(MAX_CONNECT_TIMEOUT)
}

/// `authgate/{version} ({os}-{arch})`
pub fn user_agent() -> String {
	format!(
		"authgate/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}
