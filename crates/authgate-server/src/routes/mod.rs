// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP handlers, grouped by concern.

use std::future::Future;

use authgate_core::GatewayError;
use tracing::Instrument;

use crate::error::ApiError;

pub mod auth;
pub mod health;
pub mod password;
pub mod users;

/// Runs a gateway operation on its own task and waits for it.
///
/// Hyper drops the handler future when the client disconnects. The spawned
/// operation keeps running to completion and its result is discarded, so a
/// two-step sequence such as setting a password and then marking contacts
/// verified is never cut in half.
pub(crate) async fn detached<T, F>(operation: F) -> Result<T, ApiError>
where
	F: Future<Output = Result<T, GatewayError>> + Send + 'static,
	T: Send + 'static,
{
	let outcome = tokio::spawn(operation.in_current_span()).await?;
	Ok(outcome?)
}
