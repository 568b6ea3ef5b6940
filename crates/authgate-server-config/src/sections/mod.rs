// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod invite;
mod logging;
mod provider;

pub use http::{HttpConfig, HttpConfigLayer};
pub use invite::{InviteConfig, InviteConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use provider::{ProviderConfig, ProviderConfigLayer, ProviderKind};
