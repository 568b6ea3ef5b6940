// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the authgate server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`AUTHGATE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use authgate_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use authgate_core::GatewayConfig;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub provider: ProviderConfig,
	pub invite: InviteConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}

	/// Logs the resolved settings. Secrets are reported by presence only.
	///
	/// Call once the tracing subscriber is installed.
	pub fn log_summary(&self) {
		info!(
			host = %self.http.host,
			port = self.http.port,
			provider = %self.provider.kind,
			region = %self.provider.region,
			user_pool_id = %self.provider.user_pool_id,
			auth_flow = ?self.provider.auth_flow,
			endpoint_override = self.provider.endpoint.is_some(),
			client_secret_configured = self.provider.client_secret.is_some(),
			invite_delivery = ?self.invite.delivery,
			log_format = ?self.logging.format,
			"Server configuration loaded"
		);
	}

	/// Gateway behaviour selected by this configuration.
	pub fn gateway(&self) -> GatewayConfig {
		GatewayConfig {
			auth_flow: self.provider.auth_flow,
			invite_delivery: self.invite.delivery,
		}
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`AUTHGATE_SERVER_*`)
/// 2. Config file (`/etc/authgate/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize()?;
	let provider = layer
		.provider
		.ok_or_else(|| {
			ConfigError::Missing(
				"provider section (set AUTHGATE_SERVER_PROVIDER_USER_POOL_ID and friends)"
					.to_string(),
			)
		})?
		.finalize()?;
	let invite = layer.invite.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&provider)?;

	Ok(ServerConfig {
		http,
		provider,
		invite,
		logging,
	})
}

fn validate_config(provider: &ProviderConfig) -> Result<(), ConfigError> {
	if let Some(endpoint) = &provider.endpoint {
		if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"AUTHGATE_SERVER_PROVIDER_ENDPOINT must be an http(s) URL, got '{endpoint}'"
			)));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use authgate_common_config::SecretString;
	use authgate_core::{AuthFlow, DeliveryChannel};

	fn provider_layer() -> ProviderConfigLayer {
		ProviderConfigLayer {
			user_pool_id: Some("us-east-1_pool".to_string()),
			client_id: Some("client".to_string()),
			access_key_id: Some("AKID".to_string()),
			secret_access_key: Some(SecretString::from("secret")),
			..Default::default()
		}
	}

	#[test]
	fn test_finalize_applies_defaults() {
		let config = finalize(ServerConfigLayer {
			provider: Some(provider_layer()),
			..Default::default()
		})
		.unwrap();

		assert_eq!(config.socket_addr(), "0.0.0.0:8080");
		assert_eq!(config.invite.delivery, DeliveryChannel::Email);
		assert_eq!(config.logging.level, "info");
		assert_eq!(config.logging.format, LogFormat::Pretty);
		assert_eq!(config.gateway().auth_flow, AuthFlow::AdminUserPassword);
	}

	#[test]
	fn test_missing_provider_section_is_an_error() {
		let result = finalize(ServerConfigLayer::default());
		assert!(matches!(result, Err(ConfigError::Missing(_))));
	}

	#[test]
	fn test_endpoint_must_be_a_url() {
		let mut provider = provider_layer();
		provider.endpoint = Some("localhost:9229".to_string());
		let result = finalize(ServerConfigLayer {
			provider: Some(provider),
			..Default::default()
		});
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_gateway_config_follows_sections() {
		let mut provider = provider_layer();
		provider.auth_flow = Some(AuthFlow::UserPassword);
		let config = finalize(ServerConfigLayer {
			provider: Some(provider),
			invite: Some(InviteConfigLayer {
				delivery: Some(DeliveryChannel::Sms),
			}),
			..Default::default()
		})
		.unwrap();

		let gateway = config.gateway();
		assert_eq!(gateway.auth_flow, AuthFlow::UserPassword);
		assert_eq!(gateway.invite_delivery, DeliveryChannel::Sms);
	}

	#[derive(Clone, Default)]
	struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

	impl std::io::Write for CapturedLogs {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn test_finalize_is_silent_and_summary_hides_secrets() {
		let mut provider = provider_layer();
		provider.client_secret = Some(SecretString::from("client-secret-value"));

		let logs = CapturedLogs::default();
		let writer = logs.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(move || writer.clone())
			.with_ansi(false)
			.finish();

		tracing::subscriber::with_default(subscriber, || {
			let config = finalize(ServerConfigLayer {
				provider: Some(provider),
				..Default::default()
			})
			.unwrap();
			assert!(logs.0.lock().unwrap().is_empty());
			config.log_summary();
		});

		let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
		assert!(output.contains("Server configuration loaded"));
		assert!(output.contains("client_secret_configured=true"));
		assert!(!output.contains("client-secret-value"));
		assert!(!output.contains("secret_access_key"));
	}

	#[test]
	fn test_load_config_with_file_merges_toml() {
		use std::io::Write;

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[http]
host = "127.0.0.1"
port = 7070

[provider]
user_pool_id = "eu-west-1_pool"
client_id = "client"
access_key_id = "AKID"
secret_access_key = "secret"

[logging]
format = "json"
"#
		)
		.unwrap();

		let mut merged = ServerConfigLayer::default();
		merged.merge(TomlSource::new(file.path()).load().unwrap());
		let config = finalize(merged).unwrap();

		assert_eq!(config.socket_addr(), "127.0.0.1:7070");
		assert_eq!(config.provider.region, "eu-west-1");
		assert_eq!(config.logging.format, LogFormat::Json);
	}
}
