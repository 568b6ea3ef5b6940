// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router and shared state.

use std::sync::Arc;

use authgate_core::{AuthGateway, IdentityProvider};
use authgate_server_config::ServerConfig;
use axum::{
	routing::{get, post},
	Router,
};

use crate::{error::ServerError, provider, routes};

/// State shared by every handler. The gateway itself is stateless, so
/// cloning this is cheap and requests never contend on it.
#[derive(Clone)]
pub struct AppState {
	pub gateway: Arc<AuthGateway>,
}

impl AppState {
	pub fn new(gateway: AuthGateway) -> Self {
		Self {
			gateway: Arc::new(gateway),
		}
	}
}

/// Builds the gateway for `config`, wiring in the configured identity
/// provider.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let provider: Arc<dyn IdentityProvider> = provider::build(&config.provider)?;
	Ok(AppState::new(AuthGateway::new(provider, config.gateway())))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		// Account lifecycle
		.route("/signup", post(routes::users::signup))
		.route("/resend-email", post(routes::users::resend_invite))
		.route("/get-user", post(routes::users::get_user))
		// Sessions
		.route("/login-temp-pwd", post(routes::auth::login_with_temporary_credential))
		.route("/set-new-password", post(routes::auth::set_new_password))
		.route("/login", post(routes::auth::login))
		.route("/logout", post(routes::auth::logout))
		// Password reset
		.route("/forgot-password", post(routes::password::forgot_password))
		.route(
			"/confirm-forgot-password",
			post(routes::password::confirm_forgot_password),
		)
		.with_state(state)
}
