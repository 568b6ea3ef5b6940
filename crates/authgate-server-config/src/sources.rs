// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use authgate_common_config::{load_secret_env, SecretString};
use authgate_core::{AuthFlow, DeliveryChannel};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	HttpConfigLayer, InviteConfigLayer, LogFormat, LoggingConfigLayer, ProviderConfigLayer,
	ProviderKind,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/authgate/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: AUTHGATE_SERVER_<SECTION>_<FIELD>. AWS credentials and region
/// also fall back to the standard `AWS_*` variables.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			provider: Some(load_provider_from_env()?),
			invite: Some(load_invite_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u16 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

/// Parses an enumerated setting, rejecting anything outside `choices`.
fn env_choice<T: Copy>(name: &str, choices: &[(&str, T)]) -> Result<Option<T>, ConfigError> {
	let Some(value) = env_var(name) else {
		return Ok(None);
	};
	let lowered = value.to_lowercase();
	choices
		.iter()
		.find(|(key, _)| *key == lowered)
		.map(|(_, choice)| Some(*choice))
		.ok_or_else(|| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!(
				"expected one of {}, got '{value}'",
				choices
					.iter()
					.map(|(key, _)| *key)
					.collect::<Vec<_>>()
					.join(", ")
			),
		})
}

fn secret_env(name: &str) -> Result<Option<SecretString>, ConfigError> {
	load_secret_env(name).map_err(|e| ConfigError::Secret(e.to_string()))
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("AUTHGATE_SERVER_HOST"),
		port: env_u16("AUTHGATE_SERVER_PORT")?,
	})
}

fn load_provider_from_env() -> Result<ProviderConfigLayer, ConfigError> {
	let secret_access_key = match secret_env("AUTHGATE_SERVER_PROVIDER_SECRET_ACCESS_KEY")? {
		Some(key) => Some(key),
		None => secret_env("AWS_SECRET_ACCESS_KEY")?,
	};
	let session_token = match secret_env("AUTHGATE_SERVER_PROVIDER_SESSION_TOKEN")? {
		Some(token) => Some(token),
		None => secret_env("AWS_SESSION_TOKEN")?,
	};

	Ok(ProviderConfigLayer {
		kind: env_choice(
			"AUTHGATE_SERVER_PROVIDER_KIND",
			&[("cognito", ProviderKind::Cognito)],
		)?,
		region: env_var("AUTHGATE_SERVER_PROVIDER_REGION").or_else(|| env_var("AWS_REGION")),
		user_pool_id: env_var("AUTHGATE_SERVER_PROVIDER_USER_POOL_ID"),
		client_id: env_var("AUTHGATE_SERVER_PROVIDER_CLIENT_ID"),
		client_secret: secret_env("AUTHGATE_SERVER_PROVIDER_CLIENT_SECRET")?,
		endpoint: env_var("AUTHGATE_SERVER_PROVIDER_ENDPOINT"),
		auth_flow: env_choice(
			"AUTHGATE_SERVER_PROVIDER_AUTH_FLOW",
			&[
				("admin_user_password", AuthFlow::AdminUserPassword),
				("user_password", AuthFlow::UserPassword),
			],
		)?,
		request_timeout_secs: env_u64("AUTHGATE_SERVER_PROVIDER_REQUEST_TIMEOUT_SECS")?,
		access_key_id: env_var("AUTHGATE_SERVER_PROVIDER_ACCESS_KEY_ID")
			.or_else(|| env_var("AWS_ACCESS_KEY_ID")),
		secret_access_key,
		session_token,
	})
}

fn load_invite_from_env() -> Result<InviteConfigLayer, ConfigError> {
	Ok(InviteConfigLayer {
		delivery: env_choice(
			"AUTHGATE_SERVER_INVITE_DELIVERY",
			&[("email", DeliveryChannel::Email), ("sms", DeliveryChannel::Sms)],
		)?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("AUTHGATE_SERVER_LOG_LEVEL"),
		format: env_choice(
			"AUTHGATE_SERVER_LOG_FORMAT",
			&[("pretty", LogFormat::Pretty), ("json", LogFormat::Json)],
		)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.provider.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/authgate.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[http]
port = 9090

[provider]
user_pool_id = "us-east-1_pool"
secret_access_key = "from-file"

[invite]
delivery = "sms"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9090));
		let provider = layer.provider.unwrap();
		assert_eq!(provider.user_pool_id.as_deref(), Some("us-east-1_pool"));
		assert_eq!(
			provider.secret_access_key.unwrap().expose(),
			"from-file"
		);
		assert_eq!(layer.invite.unwrap().delivery, Some(DeliveryChannel::Sms));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[http]\nport = \"not a number\"").unwrap();
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_choice_rejects_unknown_values() {
		std::env::set_var("AUTHGATE_TEST_ENV_CHOICE_BAD", "carrier-pigeon");
		let result = env_choice(
			"AUTHGATE_TEST_ENV_CHOICE_BAD",
			&[("email", DeliveryChannel::Email)],
		);
		std::env::remove_var("AUTHGATE_TEST_ENV_CHOICE_BAD");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_env_choice_is_case_insensitive() {
		std::env::set_var("AUTHGATE_TEST_ENV_CHOICE_OK", "SMS");
		let result = env_choice(
			"AUTHGATE_TEST_ENV_CHOICE_OK",
			&[("email", DeliveryChannel::Email), ("sms", DeliveryChannel::Sms)],
		);
		std::env::remove_var("AUTHGATE_TEST_ENV_CHOICE_OK");
		assert_eq!(result.unwrap(), Some(DeliveryChannel::Sms));
	}

	#[test]
	fn test_env_u16_rejects_garbage() {
		std::env::set_var("AUTHGATE_TEST_ENV_U16", "eighty");
		let result = env_u16("AUTHGATE_TEST_ENV_U16");
		std::env::remove_var("AUTHGATE_TEST_ENV_U16");
		assert!(result.is_err());
	}
}
