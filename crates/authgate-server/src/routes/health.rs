// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Liveness handler.

use axum::{extract::State, Json};

use crate::{api::AppState, dto::HealthResponse};

/// GET /health - The gateway holds no state of its own, so being able to
/// answer is the whole check.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok",
		version: env!("CARGO_PKG_VERSION"),
		provider: state.gateway.provider_name(),
	})
}
