// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as produced by a single source.

use serde::Deserialize;

use crate::sections::{HttpConfigLayer, InviteConfigLayer, LoggingConfigLayer, ProviderConfigLayer};

/// Every field is optional; later layers override earlier ones field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub provider: Option<ProviderConfigLayer>,
	#[serde(default)]
	pub invite: Option<InviteConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if let Some(other) = other.http {
			self.http.get_or_insert_with(Default::default).merge(other);
		}
		if let Some(other) = other.provider {
			self.provider.get_or_insert_with(Default::default).merge(other);
		}
		if let Some(other) = other.invite {
			self.invite.get_or_insert_with(Default::default).merge(other);
		}
		if let Some(other) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(other);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn later_layers_override_field_by_field() {
		let mut base: ServerConfigLayer = toml::from_str(
			r#"
[http]
host = "127.0.0.1"
port = 9000

[logging]
level = "debug"
"#,
		)
		.unwrap();
		let overlay = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: None,
				port: Some(8443),
			}),
			..Default::default()
		};
		base.merge(overlay);

		let http = base.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(8443));
		assert_eq!(base.logging.unwrap().level.as_deref(), Some("debug"));
	}

	#[test]
	fn unknown_sections_are_rejected() {
		let result: Result<ServerConfigLayer, _> = toml::from_str("[database]\nurl = \"x\"\n");
		assert!(result.is_err());
	}
}
