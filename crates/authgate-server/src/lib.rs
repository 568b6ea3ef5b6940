// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authgate HTTP server.
//!
//! Binds the [`AuthGateway`](authgate_core::AuthGateway) operations to JSON
//! routes. Every route is a single request/response exchange; nothing is
//! kept between requests.

pub mod api;
pub mod dto;
pub mod error;
pub mod extract;
pub mod provider;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use authgate_server_config::ServerConfig;
pub use error::{ApiError, ServerError};
