// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation delivery section.

use authgate_core::DeliveryChannel;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InviteConfigLayer {
	pub delivery: Option<DeliveryChannel>,
}

impl InviteConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.delivery.is_some() {
			self.delivery = other.delivery;
		}
	}

	pub fn finalize(self) -> InviteConfig {
		InviteConfig {
			delivery: self.delivery.unwrap_or_default(),
		}
	}
}

/// Channel used for both the first invitation and re-sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InviteConfig {
	pub delivery: DeliveryChannel,
}
