// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for authgate.
//!
//! Provider adapters build their `reqwest` clients here so every outbound
//! request carries the same User-Agent and timeouts. Nothing retries; callers
//! decide whether to repeat an operation.

mod client;

pub use client::{provider_client, user_agent, MAX_CONNECT_TIMEOUT};
