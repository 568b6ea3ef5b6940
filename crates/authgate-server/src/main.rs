// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authgate server binary.

use std::path::PathBuf;

use authgate_server::{create_app_state, create_router};
use authgate_server_config::{LogFormat, LoggingConfig};
use clap::{Parser, Subcommand};
use tower::ServiceBuilder;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Authgate server - account operations over a pluggable identity provider.
#[derive(Parser, Debug)]
#[command(name = "authgate-server", about = "Authentication gateway server", version)]
struct Args {
	/// Config file path (defaults to /etc/authgate/server.toml)
	#[arg(long, env = "AUTHGATE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => authgate_server_config::load_config_with_file(path)?,
		None => authgate_server_config::load_config()?,
	};

	init_tracing(&config.logging);
	config.log_summary();

	let state = create_app_state(&config)?;

	let app = create_router(state).layer(
		ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		),
	);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	tracing::info!("Server shutdown complete");
	Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json())
			.init(),
		LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
	tracing::info!("Received shutdown signal");
}
